use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimestampMs(pub u64);

/// Snapshot of the wallet connection as last derived from the provider.
///
/// `connected` follows the account and `correct_network` follows the chain id;
/// neither is ever set independently of the value it is derived from. Reads
/// hand out copies, so a dispatch that captured a session is unaffected by
/// later refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub connected: bool,
    pub correct_network: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The only constructor of non-empty sessions; the first exposed account
    /// wins, matching wallet convention.
    pub fn derive(accounts: &[Address], chain_id: u64, expected_chain_id: u64) -> Self {
        let account = accounts.first().copied();
        Self {
            account,
            chain_id: Some(chain_id),
            connected: account.is_some(),
            correct_network: chain_id == expected_chain_id,
        }
    }
}

/// One invocation of a governance contract method, arguments already typed.
/// Immutable once built; encoding is a pure function of this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovCall {
    /// Carries no calldata arguments; the deposit amount rides in the
    /// transaction value.
    Deposit {
        value: U256,
    },
    Withdraw {
        amount: U256,
    },
    CreateProposal {
        title: String,
        description: String,
        recipient: Address,
        amount: U256,
        duration_secs: u64,
    },
    Vote {
        proposal_id: u64,
        support: bool,
    },
    Finalize {
        proposal_id: u64,
    },
    Execute {
        proposal_id: u64,
    },
}

impl GovCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::CreateProposal { .. } => "createProposal",
            Self::Vote { .. } => "vote",
            Self::Finalize { .. } => "finalize",
            Self::Execute { .. } => "execute",
        }
    }
}

/// Deterministically encoded calldata. `data` always starts with `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub selector: [u8; 4],
    pub data: Bytes,
    pub value: Option<U256>,
}

/// `eth_sendTransaction` parameter object, serialized with the provider's
/// hex-quantity conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Pending,
    Success,
    Error,
}

impl NotificationKind {
    /// Success and Error are final; a record never leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Lifecycle record for one dispatched operation. Owned exclusively by the
/// notification queue; callers hold only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub tx_hash: Option<B256>,
    pub created_at_ms: TimestampMs,
    pub updated_at_ms: TimestampMs,
}
