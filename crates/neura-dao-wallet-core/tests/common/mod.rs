#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::{keccak256, Address, B256};

use neura_dao_wallet_core::{
    ClockPort, NetworkDescriptor, ProviderEvent, ProviderEventKind, ProviderPort, TimestampMs,
    TxParams, WalletError, RPC_UNRECOGNIZED_CHAIN,
};

#[derive(Debug, Default)]
pub struct TestClock {
    now: AtomicU64,
}

impl ClockPort for TestClock {
    fn now_ms(&self) -> Result<TimestampMs, WalletError> {
        Ok(TimestampMs(
            self.now.fetch_add(1, Ordering::SeqCst) + 1_754_000_000_000,
        ))
    }
}

/// Scriptable wallet stand-in for session and dispatch tests.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub absent: bool,
    pub accounts: Vec<Address>,
    pub chain_id: u64,
    pub known_chains: Vec<u64>,
    pub fail_next: Option<WalletError>,
    pub seq: u64,
    pub events: Vec<ProviderEvent>,
    pub sent: Vec<TxParams>,
}

impl FakeProvider {
    pub fn connected(account: Address, chain_id: u64) -> Self {
        let provider = Self::default();
        {
            let mut g = provider.state.lock().expect("fake provider lock");
            g.accounts = vec![account];
            g.chain_id = chain_id;
            g.known_chains = vec![chain_id];
        }
        provider
    }

    pub fn absent() -> Self {
        let provider = Self::default();
        provider.state.lock().expect("fake provider lock").absent = true;
        provider
    }

    pub fn set_chain(&self, chain_id: u64) {
        let mut g = self.state.lock().expect("fake provider lock");
        g.chain_id = chain_id;
        if !g.known_chains.contains(&chain_id) {
            g.known_chains.push(chain_id);
        }
        g.seq += 1;
        let seq = g.seq;
        g.events.push(ProviderEvent {
            sequence: seq,
            kind: ProviderEventKind::ChainChanged,
        });
    }

    pub fn sent(&self) -> Vec<TxParams> {
        self.state.lock().expect("fake provider lock").sent.clone()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, FakeState>, WalletError> {
        let g = self.state.lock().expect("fake provider lock");
        if g.absent {
            return Err(WalletError::ProviderAbsent);
        }
        Ok(g)
    }

    fn take_failure(g: &mut FakeState) -> Result<(), WalletError> {
        if let Some(e) = g.fail_next.take() {
            return Err(e);
        }
        Ok(())
    }
}

impl ProviderPort for FakeProvider {
    fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.guard()?.accounts.clone())
    }

    fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.guard()?.chain_id)
    }

    fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let mut g = self.guard()?;
        Self::take_failure(&mut g)?;
        Ok(g.accounts.clone())
    }

    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), WalletError> {
        let mut g = self.guard()?;
        Self::take_failure(&mut g)?;
        let trimmed = chain_id_hex.trim_start_matches("0x");
        let chain_id = u64::from_str_radix(trimmed, 16)
            .map_err(|e| WalletError::Validation(format!("bad chain id hex: {e}")))?;
        if !g.known_chains.contains(&chain_id) {
            return Err(WalletError::Rpc {
                code: RPC_UNRECOGNIZED_CHAIN,
                message: format!("Unrecognized chain ID {chain_id_hex}"),
            });
        }
        g.chain_id = chain_id;
        g.seq += 1;
        let seq = g.seq;
        g.events.push(ProviderEvent {
            sequence: seq,
            kind: ProviderEventKind::ChainChanged,
        });
        Ok(())
    }

    fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        let mut g = self.guard()?;
        Self::take_failure(&mut g)?;
        if !g.known_chains.contains(&network.chain_id) {
            g.known_chains.push(network.chain_id);
        }
        g.chain_id = network.chain_id;
        g.seq += 1;
        let seq = g.seq;
        g.events.push(ProviderEvent {
            sequence: seq,
            kind: ProviderEventKind::ChainChanged,
        });
        Ok(())
    }

    fn send_transaction(&self, tx: &TxParams) -> Result<B256, WalletError> {
        let mut g = self.guard()?;
        Self::take_failure(&mut g)?;
        let canonical = serde_json::to_vec(tx).expect("tx serialization");
        g.sent.push(tx.clone());
        Ok(keccak256(canonical))
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, WalletError> {
        let mut g = self.guard()?;
        Ok(std::mem::take(&mut g.events))
    }
}

pub fn member_address() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid member address")
}

pub fn recipient_address() -> Address {
    "0x000000000000000000000000000000000000dEaD"
        .parse()
        .expect("valid recipient address")
}
