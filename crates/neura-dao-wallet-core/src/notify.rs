//! Lifecycle records for dispatched operations, rendered by a shell as toasts.
//! Per record: `Pending -> Success` or `Pending -> Error`, both final; records
//! may also be created directly in a terminal state for local failures.

use alloy::primitives::B256;

use crate::domain::{Notification, NotificationId, NotificationKind, TimestampMs};

/// Patch applied to a live record; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPatch {
    pub kind: Option<NotificationKind>,
    pub message: Option<String>,
    pub tx_hash: Option<B256>,
}

impl NotificationPatch {
    pub fn success(message: impl Into<String>, tx_hash: B256) -> Self {
        Self {
            kind: Some(NotificationKind::Success),
            message: Some(message.into()),
            tx_hash: Some(tx_hash),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: Some(NotificationKind::Error),
            message: Some(message.into()),
            tx_hash: None,
        }
    }
}

/// Insertion-ordered record store. Records leave only through `dismiss`, the
/// settled-record TTL, or the terminal cap; the queue never drops a pending
/// record on its own.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    next_id: u64,
    entries: Vec<Notification>,
    terminal_cap: usize,
    ttl_ms: u64,
}

impl NotificationQueue {
    pub fn new(terminal_cap: usize, ttl_ms: u64) -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
            terminal_cap,
            ttl_ms,
        }
    }

    /// Creates a record and returns its id. Insertion order is rendering
    /// order, most recent last.
    pub fn enqueue(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
        tx_hash: Option<B256>,
        now: TimestampMs,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.entries.push(Notification {
            id,
            kind,
            title: title.into(),
            message,
            tx_hash,
            created_at_ms: now,
            updated_at_ms: now,
        });
        self.prune_terminal();
        id
    }

    /// Applies a patch to a live record. Terminal records are final: patching
    /// one is a no-op that returns false, as does an unknown id.
    pub fn update(&mut self, id: NotificationId, patch: NotificationPatch, now: TimestampMs) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if entry.kind.is_terminal() {
            return false;
        }
        if let Some(kind) = patch.kind {
            entry.kind = kind;
        }
        if let Some(message) = patch.message {
            entry.message = Some(message);
        }
        if let Some(tx_hash) = patch.tx_hash {
            entry.tx_hash = Some(tx_hash);
        }
        entry.updated_at_ms = now;
        self.prune_terminal();
        true
    }

    /// Removes a record regardless of its state.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    /// Drops settled records older than the TTL. Pending records never
    /// expire; offering a manual dismiss for those is the shell's job.
    pub fn expire(&mut self, now: TimestampMs) -> usize {
        let ttl = self.ttl_ms;
        let before = self.entries.len();
        self.entries.retain(|n| {
            n.kind == NotificationKind::Pending || now.0.saturating_sub(n.updated_at_ms.0) < ttl
        });
        before - self.entries.len()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    // Oldest settled records beyond the cap are dropped to bound memory.
    fn prune_terminal(&mut self) {
        let mut terminal = self
            .entries
            .iter()
            .filter(|n| n.kind.is_terminal())
            .count();
        if terminal <= self.terminal_cap {
            return;
        }
        self.entries.retain(|n| {
            if terminal > self.terminal_cap && n.kind.is_terminal() {
                terminal -= 1;
                false
            } else {
                true
            }
        });
    }
}
