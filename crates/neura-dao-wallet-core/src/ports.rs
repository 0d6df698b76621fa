use alloy::primitives::{Address, B256};
use thiserror::Error;

use crate::domain::{TimestampMs, TxParams};
use crate::network::NetworkDescriptor;

/// EIP-1193 error code for a user-rejected request.
pub const RPC_USER_REJECTED: i64 = 4001;
/// EIP-1193 error code for a chain the wallet does not know.
pub const RPC_UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no injected wallet provider available")]
    ProviderAbsent,
    #[error("no connected account")]
    NotConnected,
    #[error("wrong network: expected chain {expected}, connected to {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("user rejected the request: {0}")]
    UserRejected(String),
    #[error("provider rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("provider error: {0}")]
    Provider(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
}

impl WalletError {
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

/// Change notification from the wallet. The payload is deliberately not
/// carried: consumers re-derive state with a full refresh, which makes event
/// bursts collapse to last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub kind: ProviderEventKind,
}

/// Boundary to the injected wallet. Absence of a provider is a first-class
/// condition (`WalletError::ProviderAbsent`) on every method, never a panic.
pub trait ProviderPort {
    /// `eth_accounts`: currently exposed accounts, without prompting the user.
    fn accounts(&self) -> Result<Vec<Address>, WalletError>;
    /// `eth_chainId`.
    fn chain_id(&self) -> Result<u64, WalletError>;
    /// `eth_requestAccounts`: prompts the user to grant account access.
    fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;
    /// `wallet_switchEthereumChain`.
    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), WalletError>;
    /// `wallet_addEthereumChain` with the full descriptor.
    fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError>;
    /// `eth_sendTransaction`; returns the provider-assigned transaction hash.
    fn send_transaction(&self, tx: &TxParams) -> Result<B256, WalletError>;
    /// Takes all change notifications observed since the previous drain, in
    /// provider order.
    fn drain_events(&self) -> Result<Vec<ProviderEvent>, WalletError>;
}

pub trait ClockPort {
    fn now_ms(&self) -> Result<TimestampMs, WalletError>;
}
