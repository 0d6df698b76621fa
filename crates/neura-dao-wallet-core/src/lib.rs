pub mod dispatch;
pub mod domain;
pub mod encode;
pub mod network;
pub mod notify;
pub mod orchestrator;
pub mod ports;
pub mod session;

pub use dispatch::TxDispatcher;
pub use domain::{
    EncodedCall, GovCall, Notification, NotificationId, NotificationKind, Session, TimestampMs,
    TxParams,
};
pub use encode::{
    encode_call, format_ankr, parse_address, parse_ankr, selector, CREATE_PROPOSAL_SIGNATURE,
    SELECTOR_DEPOSIT, SELECTOR_EXECUTE, SELECTOR_FINALIZE, SELECTOR_VOTE, SELECTOR_WITHDRAW,
};
pub use network::{NativeCurrency, NetworkDescriptor, GOVERNANCE_CONTRACT, NEURA_TESTNET};
pub use notify::{NotificationPatch, NotificationQueue};
pub use orchestrator::{CommandOutcome, Orchestrator, PreparedDispatch, WalletCommand};
pub use ports::{
    ClockPort, ProviderEvent, ProviderEventKind, ProviderPort, WalletError,
    RPC_UNRECOGNIZED_CHAIN, RPC_USER_REJECTED,
};
pub use session::SessionManager;
