//! Command front door composing the session manager, call encoder,
//! dispatcher and notification queue. This is the whole surface a shell
//! needs: issue commands, read the session snapshot, render the queue.

use alloy::primitives::{Address, B256};
use tracing::{debug, warn};

use crate::dispatch::TxDispatcher;
use crate::domain::{
    EncodedCall, GovCall, Notification, NotificationId, NotificationKind, Session,
};
use crate::encode::{encode_call, parse_address, parse_ankr};
use crate::network::NetworkDescriptor;
use crate::notify::{NotificationPatch, NotificationQueue};
use crate::ports::{ClockPort, ProviderPort, WalletError};
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletCommand {
    Connect,
    Disconnect,
    SwitchNetwork,
    Deposit {
        amount: String,
    },
    Withdraw {
        amount: String,
    },
    CreateProposal {
        title: String,
        description: String,
        recipient: String,
        amount: String,
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

impl WalletCommand {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Connect => "Connect wallet",
            Self::Disconnect => "Disconnect wallet",
            Self::SwitchNetwork => "Switch network",
            Self::Deposit { .. } => "Deposit",
            Self::Withdraw { .. } => "Withdraw",
            Self::CreateProposal { .. } => "Create proposal",
            Self::Vote { .. } => "Vote",
            Self::Finalize { .. } => "Finalize proposal",
            Self::Execute { .. } => "Execute proposal",
        }
    }

    /// True for the commands that submit a transaction.
    pub fn is_dispatch(&self) -> bool {
        !matches!(self, Self::Connect | Self::Disconnect | Self::SwitchNetwork)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub session: Session,
    pub tx_hash: Option<B256>,
    pub notification: Option<NotificationId>,
}

/// A dispatch that passed local validation: session captured, calldata
/// encoded, pending record opened. Submission is the only step left.
#[derive(Debug, Clone)]
pub struct PreparedDispatch {
    pub session: Session,
    pub encoded: EncodedCall,
    pub notification: NotificationId,
}

pub struct Orchestrator<P, C>
where
    P: ProviderPort,
    C: ClockPort,
{
    pub provider: P,
    pub clock: C,
    session: SessionManager,
    dispatcher: TxDispatcher,
    notifications: NotificationQueue,
}

impl<P, C> Orchestrator<P, C>
where
    P: ProviderPort,
    C: ClockPort,
{
    pub fn new(
        provider: P,
        clock: C,
        network: NetworkDescriptor,
        contract: Address,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            provider,
            clock,
            session: SessionManager::new(network),
            dispatcher: TxDispatcher::new(contract),
            notifications,
        }
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    pub fn is_connecting(&self) -> bool {
        self.session.is_connecting()
    }

    pub fn network(&self) -> &NetworkDescriptor {
        self.session.network()
    }

    pub fn contract(&self) -> Address {
        self.dispatcher.contract()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.entries()
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.dismiss(id)
    }

    /// Forces a session re-derivation outside the event flow, for callers
    /// that just changed provider state themselves.
    pub fn refresh_session(&mut self) {
        self.session.refresh(&self.provider);
    }

    /// Drains provider notifications, refreshes the session if any arrived
    /// and expires settled notification records. Intended to be called from
    /// the shell's update loop.
    pub fn pump(&mut self) -> Result<(), WalletError> {
        match self.provider.drain_events() {
            Ok(events) if !events.is_empty() => {
                debug!(count = events.len(), "provider events drained");
                self.session.refresh(&self.provider);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "provider event drain failed"),
        }
        let now = self.clock.now_ms()?;
        self.notifications.expire(now);
        Ok(())
    }

    pub fn handle(&mut self, command: WalletCommand) -> Result<CommandOutcome, WalletError> {
        match command {
            WalletCommand::Connect => self.connect(),
            WalletCommand::Disconnect => {
                self.session.disconnect();
                Ok(self.outcome(None, None))
            }
            WalletCommand::SwitchNetwork => self.switch_network(),
            dispatch => {
                debug_assert!(dispatch.is_dispatch());
                self.dispatch_command(&dispatch)
            }
        }
    }

    /// Opens the pending lifecycle record for a dispatch about to be
    /// submitted.
    pub fn begin_operation(
        &mut self,
        title: impl Into<String>,
    ) -> Result<NotificationId, WalletError> {
        let now = self.clock.now_ms()?;
        Ok(self.notifications.enqueue(
            NotificationKind::Pending,
            title,
            Some("Confirm the transaction in your wallet".to_owned()),
            None,
            now,
        ))
    }

    /// Settles a lifecycle record with the submission result.
    pub fn finish_operation(
        &mut self,
        id: NotificationId,
        result: &Result<B256, WalletError>,
    ) -> Result<(), WalletError> {
        let now = self.clock.now_ms()?;
        let patch = match result {
            Ok(hash) => NotificationPatch::success("Transaction submitted", *hash),
            Err(e) => NotificationPatch::error(e.to_string()),
        };
        self.notifications.update(id, patch, now);
        Ok(())
    }

    /// Records a local failure as a record created directly in its terminal
    /// state; no pending phase is shown for work that never left this layer.
    pub fn report_failure(
        &mut self,
        title: impl Into<String>,
        error: &WalletError,
    ) -> Result<NotificationId, WalletError> {
        let now = self.clock.now_ms()?;
        Ok(self.notifications.enqueue(
            NotificationKind::Error,
            title,
            Some(error.to_string()),
            None,
            now,
        ))
    }

    /// Validates and encodes a dispatch command without touching the
    /// provider. Local rejections (not connected, wrong network, malformed
    /// arguments) are recorded as terminal failures here.
    pub fn preflight(&mut self, command: &WalletCommand) -> Result<PreparedDispatch, WalletError> {
        let title = command.title();
        let session = self.session.session();
        if !session.connected {
            let e = WalletError::NotConnected;
            self.report_failure(title, &e)?;
            return Err(e);
        }
        if !session.correct_network {
            let e = WalletError::NetworkMismatch {
                expected: self.session.network().chain_id,
                actual: session.chain_id.unwrap_or(0),
            };
            self.report_failure(title, &e)?;
            return Err(e);
        }
        let call = match build_call(command) {
            Ok(call) => call,
            Err(e) => {
                self.report_failure(title, &e)?;
                return Err(e);
            }
        };
        let encoded = match encode_call(&call) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.report_failure(title, &e)?;
                return Err(e);
            }
        };
        debug!(method = call.method_name(), "dispatch passed preflight");
        let notification = self.begin_operation(title)?;
        Ok(PreparedDispatch {
            session,
            encoded,
            notification,
        })
    }

    fn connect(&mut self) -> Result<CommandOutcome, WalletError> {
        match self.session.connect(&self.provider) {
            Ok(_) => Ok(self.outcome(None, None)),
            Err(e) => {
                self.report_failure(WalletCommand::Connect.title(), &e)?;
                Err(e)
            }
        }
    }

    fn switch_network(&mut self) -> Result<CommandOutcome, WalletError> {
        match self.session.switch_network(&self.provider) {
            Ok(()) => Ok(self.outcome(None, None)),
            Err(e) => {
                self.report_failure(WalletCommand::SwitchNetwork.title(), &e)?;
                Err(e)
            }
        }
    }

    fn dispatch_command(&mut self, command: &WalletCommand) -> Result<CommandOutcome, WalletError> {
        let prepared = self.preflight(command)?;
        let result = self
            .dispatcher
            .dispatch(&self.provider, &prepared.session, &prepared.encoded);
        self.finish_operation(prepared.notification, &result)?;
        let hash = result?;
        Ok(CommandOutcome {
            session: prepared.session,
            tx_hash: Some(hash),
            notification: Some(prepared.notification),
        })
    }

    fn outcome(
        &self,
        tx_hash: Option<B256>,
        notification: Option<NotificationId>,
    ) -> CommandOutcome {
        CommandOutcome {
            session: self.session.session(),
            tx_hash,
            notification,
        }
    }
}

fn build_call(command: &WalletCommand) -> Result<GovCall, WalletError> {
    match command {
        WalletCommand::Deposit { amount } => Ok(GovCall::Deposit {
            value: parse_ankr(amount)?,
        }),
        WalletCommand::Withdraw { amount } => Ok(GovCall::Withdraw {
            amount: parse_ankr(amount)?,
        }),
        WalletCommand::CreateProposal {
            title,
            description,
            recipient,
            amount,
            duration_secs,
        } => Ok(GovCall::CreateProposal {
            title: title.clone(),
            description: description.clone(),
            recipient: parse_address(recipient)?,
            amount: parse_ankr(amount)?,
            duration_secs: *duration_secs,
        }),
        WalletCommand::Vote {
            proposal_id,
            support,
        } => Ok(GovCall::Vote {
            proposal_id: *proposal_id,
            support: *support,
        }),
        WalletCommand::Finalize { proposal_id } => Ok(GovCall::Finalize {
            proposal_id: *proposal_id,
        }),
        WalletCommand::Execute { proposal_id } => Ok(GovCall::Execute {
            proposal_id: *proposal_id,
        }),
        WalletCommand::Connect | WalletCommand::Disconnect | WalletCommand::SwitchNetwork => Err(
            WalletError::Validation("session command has no calldata".to_owned()),
        ),
    }
}
