#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    Development,
    Production,
}

/// Runtime knobs for the wallet adapters. `from_env` reads `NEURA_WALLET_*`
/// variables and falls back to defaults suited to local development.
#[derive(Debug, Clone)]
pub struct WalletAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub provider_proxy_url: Option<String>,
    pub provider_timeout_ms: u64,
    pub notification_ttl_ms: u64,
    pub max_terminal_notifications: usize,
}

impl Default for WalletAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            provider_proxy_url: None,
            provider_timeout_ms: 15_000,
            notification_ttl_ms: 8_000,
            max_terminal_notifications: 50,
        }
    }
}

impl WalletAdapterConfig {
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(profile) = std::env::var("NEURA_WALLET_RUNTIME_PROFILE") {
            if profile.eq_ignore_ascii_case("production") {
                cfg.runtime_profile = RuntimeProfile::Production;
            }
        }
        if let Ok(url) = std::env::var("NEURA_WALLET_PROVIDER_PROXY_URL") {
            if !url.is_empty() {
                cfg.provider_proxy_url = Some(url);
            }
        }
        if let Ok(raw) = std::env::var("NEURA_WALLET_PROVIDER_TIMEOUT_MS") {
            if let Ok(ms) = raw.parse() {
                cfg.provider_timeout_ms = ms;
            }
        }
        if let Ok(raw) = std::env::var("NEURA_WALLET_NOTIFICATION_TTL_MS") {
            if let Ok(ms) = raw.parse() {
                cfg.notification_ttl_ms = ms;
            }
        }
        cfg
    }

    /// In the production profile a missing provider runtime is a hard error
    /// instead of a silent fallback to the deterministic wallet.
    pub fn strict_runtime_required(&self) -> bool {
        matches!(self.runtime_profile, RuntimeProfile::Production)
    }
}
