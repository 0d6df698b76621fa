//! Hands encoded calls to the provider as `eth_sendTransaction` requests.

use alloy::primitives::{Address, B256};
use tracing::info;

use crate::domain::{EncodedCall, Session, TxParams};
use crate::ports::{ProviderPort, WalletError, RPC_USER_REJECTED};

#[derive(Debug, Clone, Copy)]
pub struct TxDispatcher {
    contract: Address,
}

impl TxDispatcher {
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Submits the call from the session's account. The account comes from
    /// the snapshot taken at the call site, so a session change after
    /// submission leaves the in-flight transaction untouched. The provider's
    /// verdict is final per attempt: a retry is a new, independently encoded
    /// dispatch.
    pub fn dispatch<P: ProviderPort>(
        &self,
        provider: &P,
        session: &Session,
        encoded: &EncodedCall,
    ) -> Result<B256, WalletError> {
        let Some(from) = session.account else {
            return Err(WalletError::NotConnected);
        };
        let tx = TxParams {
            from,
            to: self.contract,
            data: encoded.data.clone(),
            value: encoded.value,
        };
        match provider.send_transaction(&tx) {
            Ok(hash) => {
                info!(%hash, to = %self.contract, "transaction submitted");
                Ok(hash)
            }
            Err(WalletError::Rpc { code, message }) if code == RPC_USER_REJECTED => {
                Err(WalletError::UserRejected(message))
            }
            Err(e) => Err(e),
        }
    }
}
