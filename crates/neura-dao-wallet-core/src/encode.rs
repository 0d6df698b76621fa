//! Calldata construction for the governance contract. Every argument is a
//! 32-byte big-endian word; strings use the standard offset/length/padded-tail
//! layout. Identical inputs always yield identical bytes.

use alloy::primitives::{
    keccak256,
    utils::{format_ether, parse_ether},
    Address, Bytes, U256,
};

use crate::domain::{EncodedCall, GovCall};
use crate::ports::WalletError;

pub const SELECTOR_DEPOSIT: [u8; 4] = [0xd0, 0xe3, 0x0d, 0xb0];
pub const SELECTOR_WITHDRAW: [u8; 4] = [0x2e, 0x1a, 0x7d, 0x4d];
pub const SELECTOR_VOTE: [u8; 4] = [0xc9, 0xd2, 0x7a, 0xfe];
pub const SELECTOR_FINALIZE: [u8; 4] = [0x4b, 0xb2, 0x78, 0xf3];
pub const SELECTOR_EXECUTE: [u8; 4] = [0xfe, 0x0d, 0x94, 0xc1];

pub const CREATE_PROPOSAL_SIGNATURE: &str = "createProposal(string,string,address,uint256,uint256)";

const WORD: usize = 32;

/// First four bytes of the keccak-256 hash of a method signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.as_slice()[0..4]);
    out
}

pub fn encode_call(call: &GovCall) -> Result<EncodedCall, WalletError> {
    match call {
        GovCall::Deposit { value } => {
            if value.is_zero() {
                return Err(WalletError::Encoding(
                    "deposit value must be non-zero".to_owned(),
                ));
            }
            Ok(EncodedCall {
                selector: SELECTOR_DEPOSIT,
                data: Bytes::from(SELECTOR_DEPOSIT.to_vec()),
                value: Some(*value),
            })
        }
        GovCall::Withdraw { amount } => Ok(static_call(SELECTOR_WITHDRAW, &[*amount])),
        GovCall::Vote {
            proposal_id,
            support,
        } => Ok(static_call(
            SELECTOR_VOTE,
            &[U256::from(*proposal_id), U256::from(u8::from(*support))],
        )),
        GovCall::Finalize { proposal_id } => {
            Ok(static_call(SELECTOR_FINALIZE, &[U256::from(*proposal_id)]))
        }
        GovCall::Execute { proposal_id } => {
            Ok(static_call(SELECTOR_EXECUTE, &[U256::from(*proposal_id)]))
        }
        GovCall::CreateProposal {
            title,
            description,
            recipient,
            amount,
            duration_secs,
        } => encode_create_proposal(title, description, *recipient, *amount, *duration_secs),
    }
}

fn static_call(sel: [u8; 4], words: &[U256]) -> EncodedCall {
    let mut data = Vec::with_capacity(4 + words.len() * WORD);
    data.extend_from_slice(&sel);
    for word in words {
        data.extend_from_slice(&word.to_be_bytes::<32>());
    }
    EncodedCall {
        selector: sel,
        data: Bytes::from(data),
        value: None,
    }
}

/// `createProposal(string,string,address,uint256,uint256)`: a five-word head
/// (two tail offsets, then the static arguments) followed by the string tails.
/// Offsets are relative to the start of the argument block.
fn encode_create_proposal(
    title: &str,
    description: &str,
    recipient: Address,
    amount: U256,
    duration_secs: u64,
) -> Result<EncodedCall, WalletError> {
    if title.trim().is_empty() {
        return Err(WalletError::Encoding(
            "proposal title must not be empty".to_owned(),
        ));
    }

    let sel = selector(CREATE_PROPOSAL_SIGNATURE);
    let title_tail = string_tail(title);
    let description_tail = string_tail(description);
    let head_len = 5 * WORD;
    let title_offset = U256::from(head_len);
    let description_offset = U256::from(head_len + title_tail.len());

    let mut data =
        Vec::with_capacity(4 + head_len + title_tail.len() + description_tail.len());
    data.extend_from_slice(&sel);
    data.extend_from_slice(&title_offset.to_be_bytes::<32>());
    data.extend_from_slice(&description_offset.to_be_bytes::<32>());
    data.extend_from_slice(&address_word(recipient));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(duration_secs).to_be_bytes::<32>());
    data.extend_from_slice(&title_tail);
    data.extend_from_slice(&description_tail);

    Ok(EncodedCall {
        selector: sel,
        data: Bytes::from(data),
        value: None,
    })
}

/// Length word followed by the UTF-8 bytes, right-padded to a word boundary.
fn string_tail(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&U256::from(bytes.len()).to_be_bytes::<32>());
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

fn address_word(addr: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_slice());
    word
}

/// Parses a 20-byte hex address, rejecting anything that does not match the
/// fixed-length shape.
pub fn parse_address(raw: &str) -> Result<Address, WalletError> {
    raw.trim()
        .parse()
        .map_err(|e| WalletError::Encoding(format!("invalid address '{raw}': {e}")))
}

/// Parses a decimal ANKR amount into its smallest-unit representation.
pub fn parse_ankr(amount: &str) -> Result<U256, WalletError> {
    let trimmed = amount.trim();
    if trimmed.starts_with('-') {
        return Err(WalletError::Encoding(format!(
            "ANKR amount must not be negative: '{amount}'"
        )));
    }
    parse_ether(trimmed)
        .map_err(|e| WalletError::Encoding(format!("invalid ANKR amount '{amount}': {e}")))
}

/// Renders a smallest-unit amount as a decimal ANKR string.
pub fn format_ankr(units: U256) -> String {
    format_ether(units)
}
