use neura_dao_wallet_core::{ClockPort, TimestampMs, WalletError};

/// Wall-clock time source; `web-time` keeps the same API under wasm.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> Result<TimestampMs, WalletError> {
        #[cfg(target_arch = "wasm32")]
        let elapsed = web_time::SystemTime::now().duration_since(web_time::UNIX_EPOCH);
        #[cfg(not(target_arch = "wasm32"))]
        let elapsed = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH);

        let elapsed =
            elapsed.map_err(|e| WalletError::Transport(format!("system time before epoch: {e}")))?;
        Ok(TimestampMs(elapsed.as_millis() as u64))
    }
}
