#![allow(dead_code)]

use alloy::primitives::Address;

use neura_dao_wallet_adapters::{Eip1193Adapter, WalletAdapterConfig, WalletBridge};

/// Account the deterministic wallet exposes once access is granted.
pub fn deterministic_account() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid deterministic account")
}

pub fn deterministic_bridge() -> WalletBridge {
    WalletBridge::with_provider(
        Eip1193Adapter::deterministic(),
        &WalletAdapterConfig::default(),
    )
}

/// Bridge already connected and switched to the target chain.
pub fn connected_bridge() -> WalletBridge {
    let mut bridge = deterministic_bridge();
    bridge.connect().expect("connect");
    bridge.switch_network().expect("switch network");
    bridge.pump().expect("pump");
    bridge
}
