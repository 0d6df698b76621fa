//! Facade wiring the runtime adapters into the core orchestrator. This must
//! remain the only shell-facing boundary for wallet operations.

use neura_dao_wallet_core::{
    CommandOutcome, NetworkDescriptor, Notification, NotificationId, NotificationQueue,
    Orchestrator, Session, WalletCommand, WalletError, GOVERNANCE_CONTRACT, NEURA_TESTNET,
};

use crate::clock::SystemClock;
use crate::config::WalletAdapterConfig;
use crate::eip1193::Eip1193Adapter;

type WalletOrchestrator = Orchestrator<Eip1193Adapter, SystemClock>;

pub struct WalletBridge {
    orchestrator: WalletOrchestrator,
}

impl Default for WalletBridge {
    fn default() -> Self {
        Self::with_config(WalletAdapterConfig::from_env())
    }
}

impl WalletBridge {
    pub fn with_config(config: WalletAdapterConfig) -> Self {
        let provider = Eip1193Adapter::with_config(config.clone());
        Self::with_provider(provider, &config)
    }

    /// Composes the bridge around an already-built provider adapter; used by
    /// tests to run against the deterministic wallet.
    pub fn with_provider(provider: Eip1193Adapter, config: &WalletAdapterConfig) -> Self {
        let notifications = NotificationQueue::new(
            config.max_terminal_notifications,
            config.notification_ttl_ms,
        );
        Self {
            orchestrator: WalletOrchestrator::new(
                provider,
                SystemClock,
                NEURA_TESTNET,
                GOVERNANCE_CONTRACT,
                notifications,
            ),
        }
    }

    pub fn connect(&mut self) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::Connect)
    }

    pub fn disconnect(&mut self) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::Disconnect)
    }

    pub fn switch_network(&mut self) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::SwitchNetwork)
    }

    pub fn deposit(&mut self, amount: &str) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::Deposit {
            amount: amount.to_owned(),
        })
    }

    pub fn withdraw(&mut self, amount: &str) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::Withdraw {
            amount: amount.to_owned(),
        })
    }

    pub fn create_proposal(
        &mut self,
        title: &str,
        description: &str,
        recipient: &str,
        amount: &str,
        duration_secs: u64,
    ) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::CreateProposal {
            title: title.to_owned(),
            description: description.to_owned(),
            recipient: recipient.to_owned(),
            amount: amount.to_owned(),
            duration_secs,
        })
    }

    pub fn vote(&mut self, proposal_id: u64, support: bool) -> Result<CommandOutcome, WalletError> {
        self.orchestrator.handle(WalletCommand::Vote {
            proposal_id,
            support,
        })
    }

    pub fn finalize(&mut self, proposal_id: u64) -> Result<CommandOutcome, WalletError> {
        self.orchestrator
            .handle(WalletCommand::Finalize { proposal_id })
    }

    pub fn execute(&mut self, proposal_id: u64) -> Result<CommandOutcome, WalletError> {
        self.orchestrator
            .handle(WalletCommand::Execute { proposal_id })
    }

    /// Shell update-loop hook: provider event drain + session refresh +
    /// notification expiry.
    pub fn pump(&mut self) -> Result<(), WalletError> {
        self.orchestrator.pump()
    }

    pub fn session(&self) -> Session {
        self.orchestrator.session()
    }

    pub fn is_connecting(&self) -> bool {
        self.orchestrator.is_connecting()
    }

    pub fn network(&self) -> &NetworkDescriptor {
        self.orchestrator.network()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.orchestrator.notifications()
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.orchestrator.dismiss(id)
    }

    pub fn provider(&self) -> &Eip1193Adapter {
        &self.orchestrator.provider
    }
}

/// Async variants for the browser runtime, where every interactive provider
/// call must await the wallet prompt. Each one funnels back into the same
/// sync core path once the provider snapshot is populated.
#[cfg(target_arch = "wasm32")]
impl WalletBridge {
    pub async fn connect_async(&mut self) -> Result<CommandOutcome, WalletError> {
        if let Err(e) = self.orchestrator.provider.browser_connect().await {
            self.orchestrator
                .report_failure(WalletCommand::Connect.title(), &e)?;
            return Err(e);
        }
        self.orchestrator.provider.browser_refresh().await?;
        self.orchestrator.handle(WalletCommand::Connect)
    }

    pub async fn switch_network_async(&mut self) -> Result<CommandOutcome, WalletError> {
        let network = *self.orchestrator.network();
        if let Err(e) = self
            .orchestrator
            .provider
            .browser_switch_chain(&network)
            .await
        {
            self.orchestrator
                .report_failure(WalletCommand::SwitchNetwork.title(), &e)?;
            return Err(e);
        }
        self.orchestrator.provider.browser_refresh().await?;
        self.orchestrator.refresh_session();
        Ok(CommandOutcome {
            session: self.orchestrator.session(),
            tx_hash: None,
            notification: None,
        })
    }

    pub async fn dispatch_async(
        &mut self,
        command: WalletCommand,
    ) -> Result<CommandOutcome, WalletError> {
        use neura_dao_wallet_core::{TxParams, RPC_USER_REJECTED};

        let prepared = self.orchestrator.preflight(&command)?;
        let from = prepared.session.account.ok_or(WalletError::NotConnected)?;
        let tx = TxParams {
            from,
            to: self.orchestrator.contract(),
            data: prepared.encoded.data.clone(),
            value: prepared.encoded.value,
        };
        let result = self
            .orchestrator
            .provider
            .browser_send_transaction(&tx)
            .await
            .map_err(|e| match e {
                WalletError::Rpc { code, message } if code == RPC_USER_REJECTED => {
                    WalletError::UserRejected(message)
                }
                other => other,
            });
        self.orchestrator
            .finish_operation(prepared.notification, &result)?;
        let hash = result?;
        Ok(CommandOutcome {
            session: prepared.session,
            tx_hash: Some(hash),
            notification: Some(prepared.notification),
        })
    }
}
