use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use alloy::primitives::{Address, Bytes};
use serde_json::{json, Value};
use tiny_http::{Response, Server};

use neura_dao_wallet_adapters::{Eip1193Adapter, RuntimeProfile, WalletAdapterConfig};
use neura_dao_wallet_core::{
    ProviderEventKind, ProviderPort, TxParams, WalletError, GOVERNANCE_CONTRACT,
};

#[test]
fn deterministic_wallet_event_sequencing_survives_a_drain_cycle() {
    let adapter = Eip1193Adapter::deterministic();
    let account: Address = "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("account");

    adapter
        .debug_inject_accounts_changed(vec![account])
        .expect("inject accounts");
    adapter.debug_inject_chain_changed(267).expect("inject chain");

    assert_eq!(adapter.accounts().expect("accounts"), vec![account]);
    assert_eq!(adapter.chain_id().expect("chain"), 267);

    let events = adapter.drain_events().expect("drain");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, ProviderEventKind::AccountsChanged);
    assert_eq!(events[1].kind, ProviderEventKind::ChainChanged);
    assert_eq!(events[0].sequence + 1, events[1].sequence);

    assert!(adapter.drain_events().expect("second drain").is_empty());
}

#[test]
fn proxy_runtime_serves_account_and_chain_queries() {
    let calls = Arc::new(Mutex::new(Vec::<String>::new()));
    let (base_url, _join) = spawn_rpc_server(Arc::clone(&calls));

    let adapter = Eip1193Adapter::with_config(WalletAdapterConfig {
        provider_proxy_url: Some(base_url),
        provider_timeout_ms: 5_000,
        ..WalletAdapterConfig::default()
    });

    let expected: Address = "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("account");
    assert_eq!(adapter.request_accounts().expect("accounts"), vec![expected]);
    assert_eq!(adapter.chain_id().expect("chain id"), 267);

    let seen = calls.lock().expect("calls lock");
    assert!(seen.iter().any(|m| m == "eth_requestAccounts"));
    assert!(seen.iter().any(|m| m == "eth_chainId"));
}

#[test]
fn proxy_runtime_passes_rpc_error_codes_through() {
    let calls = Arc::new(Mutex::new(Vec::<String>::new()));
    let (base_url, _join) = spawn_rpc_server(Arc::clone(&calls));

    let adapter = Eip1193Adapter::with_config(WalletAdapterConfig {
        provider_proxy_url: Some(base_url),
        provider_timeout_ms: 5_000,
        ..WalletAdapterConfig::default()
    });

    let tx = TxParams {
        from: "0x2000000000000000000000000000000000000002"
            .parse()
            .expect("from"),
        to: GOVERNANCE_CONTRACT,
        data: Bytes::from(vec![0xd0, 0xe3, 0x0d, 0xb0]),
        value: None,
    };
    let err = adapter.send_transaction(&tx).expect_err("must fail");
    assert_eq!(err.rpc_code(), Some(4001));
    assert!(err.to_string().contains("User rejected the request."));
}

#[test]
fn production_profile_without_proxy_runtime_is_disabled() {
    let adapter = Eip1193Adapter::with_config(WalletAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        provider_proxy_url: None,
        ..WalletAdapterConfig::default()
    });

    let err = adapter.request_accounts().expect_err("runtime required");
    assert_eq!(err, WalletError::ProviderAbsent);
}

fn spawn_rpc_server(calls: Arc<Mutex<Vec<String>>>) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let base_url = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..8 {
            let mut request = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let method = parsed
                .get("method")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            if let Ok(mut seen) = calls.lock() {
                seen.push(method.clone());
            }

            let payload = match method.as_str() {
                "eth_accounts" | "eth_requestAccounts" => json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": ["0x2000000000000000000000000000000000000002"],
                }),
                "eth_chainId" => json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": "0x10B",
                }),
                "wallet_switchEthereumChain" | "wallet_addEthereumChain" => json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": null,
                }),
                "eth_sendTransaction" => json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": 4001, "message": "User rejected the request." },
                }),
                _ => json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32601, "message": "method not found" },
                }),
            };
            let _ = request.respond(Response::from_string(payload.to_string()));
        }
    });

    (base_url, join)
}
