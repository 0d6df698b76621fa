use alloy::primitives::{address, Address, B256};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Fixed identity and connection parameters of the chain this client targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub chain_id_hex: &'static str,
    pub chain_name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_urls: &'static [&'static str],
    pub block_explorer_urls: &'static [&'static str],
}

pub const NEURA_TESTNET: NetworkDescriptor = NetworkDescriptor {
    chain_id: 267,
    chain_id_hex: "0x10B",
    chain_name: "Neura Testnet",
    native_currency: NativeCurrency {
        name: "ANKR",
        symbol: "ANKR",
        decimals: 18,
    },
    rpc_urls: &["https://rpc.ankr.com/neura_testnet"],
    block_explorer_urls: &["https://explorer.neura-testnet.ankr.com"],
};

/// Treasury governance contract all calls are addressed to.
pub const GOVERNANCE_CONTRACT: Address = address!("730EEAE4920e26A90b96430192c843B8006b9B65");

impl NetworkDescriptor {
    /// Parameter object for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> Value {
        serde_json::json!({
            "chainId": self.chain_id_hex,
            "chainName": self.chain_name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }

    pub fn explorer_tx_url(&self, tx_hash: B256) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{base}/tx/{tx_hash}"))
    }
}
