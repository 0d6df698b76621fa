pub mod bridge;
pub mod clock;
pub mod config;
pub mod eip1193;

pub use bridge::WalletBridge;
pub use clock::SystemClock;
pub use config::{RuntimeProfile, WalletAdapterConfig};
pub use eip1193::Eip1193Adapter;
