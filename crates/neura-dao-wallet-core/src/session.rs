//! Wallet connection state and the operations that mutate it.

use tracing::{debug, warn};

use crate::domain::Session;
use crate::network::NetworkDescriptor;
use crate::ports::{ProviderPort, WalletError, RPC_UNRECOGNIZED_CHAIN};

/// Owns the session snapshot. Every provider notification or explicit call
/// replaces the snapshot wholesale, so rapid event bursts resolve
/// last-write-wins; each refresh is idempotent and self-consistent.
#[derive(Debug, Clone)]
pub struct SessionManager {
    network: NetworkDescriptor,
    session: Session,
    connecting: bool,
}

impl SessionManager {
    pub fn new(network: NetworkDescriptor) -> Self {
        Self {
            network,
            session: Session::empty(),
            connecting: false,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    /// True while a `connect` call is outstanding, so callers can suppress
    /// repeated attempts.
    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Re-derives the session from the provider. Failures leave the previous
    /// snapshot in place; they are logged, not surfaced.
    pub fn refresh<P: ProviderPort>(&mut self, provider: &P) {
        let accounts = match provider.accounts() {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "session refresh skipped: accounts query failed");
                return;
            }
        };
        let chain_id = match provider.chain_id() {
            Ok(chain_id) => chain_id,
            Err(e) => {
                warn!(error = %e, "session refresh skipped: chain id query failed");
                return;
            }
        };
        self.session = Session::derive(&accounts, chain_id, self.network.chain_id);
        debug!(
            account = ?self.session.account,
            chain_id,
            connected = self.session.connected,
            correct_network = self.session.correct_network,
            "session refreshed"
        );
    }

    /// Requests account access from the provider, then refreshes.
    pub fn connect<P: ProviderPort>(&mut self, provider: &P) -> Result<Session, WalletError> {
        self.connecting = true;
        let result = provider.request_accounts();
        self.connecting = false;
        result?;
        self.refresh(provider);
        Ok(self.session)
    }

    /// Asks the wallet to switch to the target chain, registering it first if
    /// the wallet reports it unknown. The session update itself arrives
    /// through the provider's chain-changed notification.
    pub fn switch_network<P: ProviderPort>(&mut self, provider: &P) -> Result<(), WalletError> {
        match provider.switch_chain(self.network.chain_id_hex) {
            Ok(()) => Ok(()),
            Err(WalletError::Rpc { code, .. }) if code == RPC_UNRECOGNIZED_CHAIN => {
                debug!(chain = self.network.chain_id_hex, "chain unknown to wallet, registering");
                provider.add_chain(&self.network)
            }
            Err(e) => Err(e),
        }
    }

    /// Clears the local session. Provider-side permission stays granted; only
    /// the user can revoke it from the wallet UI.
    pub fn disconnect(&mut self) {
        self.session = Session::empty();
    }
}
