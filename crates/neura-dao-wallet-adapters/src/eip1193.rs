//! EIP-1193 provider adapter: the injected browser wallet on wasm, a JSON-RPC
//! proxy or a deterministic in-memory wallet elsewhere. The deterministic
//! wallet simulates grant/switch/add semantics faithfully enough to drive the
//! whole session and dispatch stack in tests.

use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{address, keccak256, Address, B256};
use serde_json::{json, Value};
use tracing::warn;

use neura_dao_wallet_core::{
    NetworkDescriptor, ProviderEvent, ProviderEventKind, ProviderPort, TxParams, WalletError,
    RPC_UNRECOGNIZED_CHAIN,
};

use crate::config::WalletAdapterConfig;

/// Account exposed by the deterministic wallet once access is granted.
const DETERMINISTIC_ACCOUNT: Address = address!("1000000000000000000000000000000000000001");

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

/// In-memory wallet for the deterministic mode; the other modes reuse it as
/// their snapshot and event store.
#[derive(Debug)]
struct ProviderState {
    accounts: Vec<Address>,
    granted: bool,
    chain_id: u64,
    known_chains: Vec<u64>,
    event_seq: u64,
    events: Vec<ProviderEvent>,
    fail_next: Option<(i64, String)>,
    sent: Vec<TxParams>,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![DETERMINISTIC_ACCOUNT],
            granted: false,
            chain_id: 1,
            known_chains: vec![1],
            event_seq: 0,
            events: Vec::new(),
            fail_next: None,
            sent: Vec::new(),
        }
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(WalletAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: WalletAdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let mode = if browser_provider().is_ok() {
            ProviderMode::Browser
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "no EIP-1193 browser provider in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(base_url) = config.provider_proxy_url.clone() {
            let timeout = std::time::Duration::from_millis(config.provider_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime { base_url, client }),
                Err(e) if config.strict_runtime_required() => ProviderMode::Disabled(format!(
                    "failed to initialize provider proxy client: {e}"
                )),
                Err(_) => ProviderMode::Deterministic,
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "provider proxy url not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        Self::with_mode(mode)
    }

    /// In-memory wallet regardless of environment; test entry point.
    pub fn deterministic() -> Self {
        Self::with_mode(ProviderMode::Deterministic)
    }

    fn with_mode(mode: ProviderMode) -> Self {
        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProviderState>, WalletError> {
        self.state
            .lock()
            .map_err(|e| WalletError::Transport(format!("provider state lock poisoned: {e}")))
    }

    fn check_mode(&self) -> Result<(), WalletError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            warn!(reason = %reason, "provider unavailable");
            return Err(WalletError::ProviderAbsent);
        }
        Ok(())
    }

    fn push_event(g: &mut ProviderState, kind: ProviderEventKind) {
        g.event_seq += 1;
        g.events.push(ProviderEvent {
            sequence: g.event_seq,
            kind,
        });
    }

    // Interactive requests honor an injected failure; the passive
    // accounts/chain reads do not, so a scripted rejection never lands on a
    // background refresh.
    fn take_injected_failure(&self) -> Result<(), WalletError> {
        let mut g = self.lock()?;
        if let Some((code, message)) = g.fail_next.take() {
            return Err(WalletError::Rpc { code, message });
        }
        Ok(())
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), WalletError> {
        let mut g = self.lock()?;
        g.granted = !accounts.is_empty();
        g.accounts = accounts;
        Self::push_event(&mut g, ProviderEventKind::AccountsChanged);
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), WalletError> {
        let mut g = self.lock()?;
        g.chain_id = chain_id;
        if !g.known_chains.contains(&chain_id) {
            g.known_chains.push(chain_id);
        }
        Self::push_event(&mut g, ProviderEventKind::ChainChanged);
        Ok(())
    }

    /// Makes the next interactive request fail with this JSON-RPC error.
    pub fn debug_fail_next_request(
        &self,
        code: i64,
        message: impl Into<String>,
    ) -> Result<(), WalletError> {
        self.lock()?.fail_next = Some((code, message.into()));
        Ok(())
    }

    /// Transactions accepted by the deterministic wallet, in submission order.
    pub fn debug_sent_transactions(&self) -> Result<Vec<TxParams>, WalletError> {
        Ok(self.lock()?.sent.clone())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let ProviderMode::Proxy(proxy) = &self.mode else {
            return Err(WalletError::NotImplemented("provider proxy runtime not enabled"));
        };
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| WalletError::Transport(format!("provider proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| WalletError::Transport(format!("provider proxy json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(WalletError::Transport(format!(
                "provider proxy status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(-32603);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("provider error")
                .to_owned();
            return Err(WalletError::Rpc { code, message });
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| WalletError::Transport("provider proxy response missing result".to_owned()))
    }
}

impl ProviderPort for Eip1193Adapter {
    fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_accounts", json!([]))?;
            let accounts = parse_accounts(&result)?;
            let mut g = self.lock()?;
            g.granted = !accounts.is_empty();
            g.accounts = accounts.clone();
            return Ok(accounts);
        }

        // Browser mode reads the same snapshot the listeners maintain.
        let g = self.lock()?;
        Ok(if g.granted { g.accounts.clone() } else { Vec::new() })
    }

    fn chain_id(&self) -> Result<u64, WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_chainId", json!([]))?;
            let chain_id = parse_chain_id_value(&result)?;
            self.lock()?.chain_id = chain_id;
            return Ok(chain_id);
        }

        Ok(self.lock()?.chain_id)
    }

    fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_requestAccounts", json!([]))?;
            let accounts = parse_accounts(&result)?;
            let mut g = self.lock()?;
            g.granted = !accounts.is_empty();
            g.accounts = accounts.clone();
            return Ok(accounts);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            // The interactive prompt only exists on the async path; by the
            // time the sync port is used the grant must already be cached.
            let g = self.lock()?;
            if !g.granted || g.accounts.is_empty() {
                return Err(WalletError::NotConnected);
            }
            return Ok(g.accounts.clone());
        }

        self.take_injected_failure()?;
        let mut g = self.lock()?;
        if !g.granted {
            g.granted = true;
            Self::push_event(&mut g, ProviderEventKind::AccountsChanged);
        }
        Ok(g.accounts.clone())
    }

    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_call(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id_hex }]),
            )?;
            return Ok(());
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(WalletError::NotImplemented(
                "sync switch_chain is unavailable in the browser; use browser_switch_chain",
            ));
        }

        self.take_injected_failure()?;
        let chain_id = parse_chain_id_str(chain_id_hex)?;
        let mut g = self.lock()?;
        if !g.known_chains.contains(&chain_id) {
            return Err(WalletError::Rpc {
                code: RPC_UNRECOGNIZED_CHAIN,
                message: format!("Unrecognized chain ID {chain_id_hex}"),
            });
        }
        if g.chain_id != chain_id {
            g.chain_id = chain_id;
            Self::push_event(&mut g, ProviderEventKind::ChainChanged);
        }
        Ok(())
    }

    fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_call("wallet_addEthereumChain", json!([network.add_chain_params()]))?;
            return Ok(());
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(WalletError::NotImplemented(
                "sync add_chain is unavailable in the browser; use browser_switch_chain",
            ));
        }

        self.take_injected_failure()?;
        // Wallets switch to a chain right after adding it.
        let mut g = self.lock()?;
        if !g.known_chains.contains(&network.chain_id) {
            g.known_chains.push(network.chain_id);
        }
        if g.chain_id != network.chain_id {
            g.chain_id = network.chain_id;
            Self::push_event(&mut g, ProviderEventKind::ChainChanged);
        }
        Ok(())
    }

    fn send_transaction(&self, tx: &TxParams) -> Result<B256, WalletError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_sendTransaction", json!([tx]))?;
            return parse_tx_hash(&result);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(WalletError::NotImplemented(
                "sync send_transaction is unavailable in the browser; use browser_send_transaction",
            ));
        }

        self.take_injected_failure()?;
        let mut g = self.lock()?;
        if !g.granted || !g.accounts.contains(&tx.from) {
            return Err(WalletError::Provider(format!(
                "unknown from account {}",
                tx.from
            )));
        }
        let canonical = serde_json::to_vec(tx)
            .map_err(|e| WalletError::Validation(format!("tx serialization failed: {e}")))?;
        let hash = keccak256(canonical);
        g.sent.push(tx.clone());
        Ok(hash)
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, WalletError> {
        self.check_mode()?;
        let mut g = self.lock()?;
        Ok(std::mem::take(&mut g.events))
    }
}

fn parse_chain_id_str(raw: &str) -> Result<u64, WalletError> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| WalletError::Validation(format!("invalid hex chain id '{raw}': {e}")))
    } else {
        raw.parse()
            .map_err(|e| WalletError::Validation(format!("invalid chain id '{raw}': {e}")))
    }
}

fn parse_chain_id_value(value: &Value) -> Result<u64, WalletError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let raw = value
        .as_str()
        .ok_or_else(|| WalletError::Validation("chain id must be a string or number".to_owned()))?;
    parse_chain_id_str(raw)
}

fn parse_accounts(value: &Value) -> Result<Vec<Address>, WalletError> {
    let arr = value
        .as_array()
        .ok_or_else(|| WalletError::Transport("accounts response must be an array".to_owned()))?;
    let mut accounts = Vec::with_capacity(arr.len());
    for item in arr {
        let raw = item
            .as_str()
            .ok_or_else(|| WalletError::Transport("account entry must be a string".to_owned()))?;
        let parsed: Address = raw
            .parse()
            .map_err(|e| WalletError::Validation(format!("invalid account address '{raw}': {e}")))?;
        accounts.push(parsed);
    }
    Ok(accounts)
}

fn parse_tx_hash(value: &Value) -> Result<B256, WalletError> {
    let raw = value.as_str().ok_or_else(|| {
        WalletError::Transport("eth_sendTransaction must return a hash string".to_owned())
    })?;
    raw.parse()
        .map_err(|e| WalletError::Validation(format!("invalid transaction hash '{raw}': {e}")))
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

// Listener removal rides on the last adapter clone going away.
#[cfg(target_arch = "wasm32")]
impl Drop for BrowserHooks {
    fn drop(&mut self) {
        use wasm_bindgen::{JsCast, JsValue};

        let Ok(provider) = browser_provider() else {
            return;
        };
        let Some(off) = get_fn(&provider, "removeListener") else {
            return;
        };
        if let Some(cb) = self.accounts_changed.take() {
            let _ = off.call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                cb.as_ref().unchecked_ref(),
            );
        }
        if let Some(cb) = self.chain_changed.take() {
            let _ = off.call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                cb.as_ref().unchecked_ref(),
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Eip1193Adapter {
    /// `eth_requestAccounts` through the injected provider, caching the grant
    /// for the sync port and wiring the change listeners.
    pub async fn browser_connect(&self) -> Result<Vec<Address>, WalletError> {
        self.check_mode()?;
        let result = self.request_js("eth_requestAccounts", json!([])).await?;
        let accounts = parse_accounts(&result)?;
        {
            let mut g = self.lock()?;
            g.granted = !accounts.is_empty();
            g.accounts = accounts.clone();
            Self::push_event(&mut g, ProviderEventKind::AccountsChanged);
        }
        self.register_browser_hooks()?;
        Ok(accounts)
    }

    /// Refreshes the cached accounts/chain snapshot from the provider.
    pub async fn browser_refresh(&self) -> Result<(), WalletError> {
        self.check_mode()?;
        let accounts = parse_accounts(&self.request_js("eth_accounts", json!([])).await?)?;
        let chain_id =
            parse_chain_id_value(&self.request_js("eth_chainId", json!([])).await?)?;
        let mut g = self.lock()?;
        g.granted = !accounts.is_empty();
        g.accounts = accounts;
        g.chain_id = chain_id;
        Ok(())
    }

    /// `wallet_switchEthereumChain`, registering the chain first when the
    /// wallet reports it unknown.
    pub async fn browser_switch_chain(
        &self,
        network: &NetworkDescriptor,
    ) -> Result<(), WalletError> {
        self.check_mode()?;
        match self
            .request_js(
                "wallet_switchEthereumChain",
                json!([{ "chainId": network.chain_id_hex }]),
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(WalletError::Rpc { code, .. }) if code == RPC_UNRECOGNIZED_CHAIN => self
                .request_js("wallet_addEthereumChain", json!([network.add_chain_params()]))
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        }
    }

    pub async fn browser_send_transaction(&self, tx: &TxParams) -> Result<B256, WalletError> {
        self.check_mode()?;
        let result = self.request_js("eth_sendTransaction", json!([tx])).await?;
        parse_tx_hash(&result)
    }

    async fn request_js(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_fn(&provider, "request").ok_or(WalletError::NotImplemented(
            "window.ethereum.request is unavailable",
        ))?;
        let request = json!({ "method": method, "params": params });
        let request_js = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| WalletError::Transport(format!("encode provider request failed: {e}")))?;
        let promise_js = request_fn
            .call1(&provider, &request_js)
            .map_err(js_error_to_wallet_error)?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            WalletError::Transport("provider request did not return a promise".to_owned())
        })?;
        let result = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(js_error_to_wallet_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| WalletError::Transport(format!("decode provider response failed: {e}")))
    }

    fn register_browser_hooks(&self) -> Result<(), WalletError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_fn(&provider, "on")
            .or_else(|| get_fn(&provider, "addListener"))
            .ok_or(WalletError::NotImplemented(
                "provider does not expose on/addListener",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| WalletError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(raw) = item.as_string() {
                        if let Ok(addr) = raw.parse::<Address>() {
                            accounts.push(addr);
                        }
                    }
                }
            }
            if let Ok(mut g) = state_for_accounts.lock() {
                g.granted = !accounts.is_empty();
                g.accounts = accounts;
                Self::push_event(&mut g, ProviderEventKind::AccountsChanged);
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let parsed = value
                .as_string()
                .and_then(|s| parse_chain_id_str(&s).ok())
                .or_else(|| value.as_f64().map(|n| n as u64));
            if let Some(chain_id) = parsed {
                if let Ok(mut g) = state_for_chain.lock() {
                    g.chain_id = chain_id;
                    Self::push_event(&mut g, ProviderEventKind::ChainChanged);
                }
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| {
                WalletError::Transport(format!("register accountsChanged failed: {e:?}"))
            })?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| WalletError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, WalletError> {
    let window =
        web_sys::window().ok_or_else(|| WalletError::Transport("missing window".to_owned()))?;
    let provider =
        js_sys::Reflect::get(&window.into(), &wasm_bindgen::JsValue::from_str("ethereum"))
            .map_err(|e| WalletError::Transport(format!("read window.ethereum failed: {e:?}")))?;
    if provider.is_null() || provider.is_undefined() {
        return Err(WalletError::ProviderAbsent);
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_fn(target: &wasm_bindgen::JsValue, key: &str) -> Option<js_sys::Function> {
    use wasm_bindgen::JsCast;
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .ok()
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
}

#[cfg(target_arch = "wasm32")]
fn js_error_to_wallet_error(e: wasm_bindgen::JsValue) -> WalletError {
    let code = js_sys::Reflect::get(&e, &wasm_bindgen::JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|v| v as i64);
    let message = js_sys::Reflect::get(&e, &wasm_bindgen::JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{e:?}"));
    match code {
        Some(code) => WalletError::Rpc { code, message },
        None => WalletError::Provider(message),
    }
}
