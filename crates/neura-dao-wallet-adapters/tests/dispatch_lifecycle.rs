mod common;

use alloy::primitives::U256;

use neura_dao_wallet_core::{
    selector, NotificationKind, WalletError, CREATE_PROPOSAL_SIGNATURE, GOVERNANCE_CONTRACT,
    RPC_USER_REJECTED, SELECTOR_VOTE, SELECTOR_WITHDRAW,
};

use common::{connected_bridge, deterministic_account, deterministic_bridge};

#[test]
fn deposit_submits_a_value_carrying_transaction() {
    let mut bridge = connected_bridge();

    let outcome = bridge.deposit("1.0").expect("deposit");
    let hash = outcome.tx_hash.expect("tx hash");

    let sent = bridge.provider().debug_sent_transactions().expect("sent");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, deterministic_account());
    assert_eq!(sent[0].to, GOVERNANCE_CONTRACT);
    assert_eq!(alloy::hex::encode(&sent[0].data), "d0e30db0");
    assert_eq!(
        sent[0].value,
        Some(U256::from(1_000_000_000_000_000_000u64))
    );

    let records = bridge.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, NotificationKind::Success);
    assert_eq!(records[0].title, "Deposit");
    assert_eq!(records[0].tx_hash, Some(hash));
}

#[test]
fn withdraw_encodes_the_amount_as_a_padded_word() {
    let mut bridge = connected_bridge();

    bridge.withdraw("1").expect("withdraw");

    let sent = bridge.provider().debug_sent_transactions().expect("sent");
    let data = alloy::hex::encode(&sent[0].data);
    assert_eq!(&data[0..8], alloy::hex::encode(SELECTOR_WITHDRAW));
    assert_eq!(
        &data[8..],
        "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
    );
    assert_eq!(sent[0].value, None);
}

#[test]
fn vote_encodes_proposal_id_and_support() {
    let mut bridge = connected_bridge();

    bridge.vote(5, true).expect("vote");

    let sent = bridge.provider().debug_sent_transactions().expect("sent");
    let data = sent[0].data.as_ref();
    assert_eq!(&data[0..4], &SELECTOR_VOTE);
    assert_eq!(U256::from_be_slice(&data[4..36]), U256::from(5));
    assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(1));
}

#[test]
fn create_proposal_dispatches_fully_encoded_calldata() {
    let mut bridge = connected_bridge();

    let outcome = bridge
        .create_proposal(
            "Fund dev",
            "Build stuff",
            "0x000000000000000000000000000000000000dEaD",
            "2.5",
            86_400,
        )
        .expect("create proposal");

    let sent = bridge.provider().debug_sent_transactions().expect("sent");
    assert_eq!(sent.len(), 1);
    let data = sent[0].data.as_ref();
    assert_eq!(&data[0..4], &selector(CREATE_PROPOSAL_SIGNATURE));
    assert_eq!(data.len(), 292);
    assert_eq!(sent[0].value, None);
    assert!(outcome.tx_hash.is_some());
}

#[test]
fn dispatch_without_connection_is_rejected_before_the_provider() {
    let mut bridge = deterministic_bridge();

    let err = bridge.deposit("1").expect_err("must fail");
    assert_eq!(err, WalletError::NotConnected);

    assert!(bridge
        .provider()
        .debug_sent_transactions()
        .expect("sent")
        .is_empty());

    // The record is created directly in its terminal state; there was never a
    // pending phase.
    let records = bridge.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, NotificationKind::Error);
    assert_eq!(records[0].tx_hash, None);
}

#[test]
fn dispatch_on_the_wrong_chain_reports_network_mismatch() {
    let mut bridge = deterministic_bridge();
    bridge.connect().expect("connect");

    let err = bridge.vote(1, true).expect_err("must fail");
    assert_eq!(
        err,
        WalletError::NetworkMismatch {
            expected: 267,
            actual: 1
        }
    );
    assert!(bridge
        .provider()
        .debug_sent_transactions()
        .expect("sent")
        .is_empty());
}

#[test]
fn malformed_amount_is_rejected_before_any_provider_call() {
    let mut bridge = connected_bridge();

    let err = bridge.deposit("not-a-number").expect_err("must fail");
    assert!(matches!(err, WalletError::Encoding(_)));

    assert!(bridge
        .provider()
        .debug_sent_transactions()
        .expect("sent")
        .is_empty());
    let records = bridge.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, NotificationKind::Error);
}

#[test]
fn malformed_recipient_is_rejected_before_any_provider_call() {
    let mut bridge = connected_bridge();

    let err = bridge
        .create_proposal("Fund dev", "Build stuff", "0x1234", "1", 3_600)
        .expect_err("must fail");
    assert!(matches!(err, WalletError::Encoding(_)));
    assert!(bridge
        .provider()
        .debug_sent_transactions()
        .expect("sent")
        .is_empty());
}

#[test]
fn wallet_rejection_settles_the_record_and_a_retry_is_a_new_dispatch() {
    let mut bridge = connected_bridge();
    bridge
        .provider()
        .debug_fail_next_request(RPC_USER_REJECTED, "User rejected the request.")
        .expect("inject failure");

    let err = bridge.vote(7, false).expect_err("must fail");
    assert!(matches!(err, WalletError::UserRejected(_)));

    {
        let records = bridge.notifications();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, NotificationKind::Error);
        assert!(records[0]
            .message
            .as_deref()
            .expect("message")
            .contains("User rejected the request."));
    }

    // No automatic retry happened; the user votes again as a fresh dispatch
    // with its own lifecycle record.
    assert!(bridge
        .provider()
        .debug_sent_transactions()
        .expect("sent")
        .is_empty());
    bridge.vote(7, false).expect("retry");

    let records = bridge.notifications();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, NotificationKind::Error);
    assert_eq!(records[1].kind, NotificationKind::Success);
    assert_eq!(
        bridge
            .provider()
            .debug_sent_transactions()
            .expect("sent")
            .len(),
        1
    );
}

#[test]
fn concurrent_dispatches_own_independent_records() {
    let mut bridge = connected_bridge();

    let first = bridge.vote(1, true).expect("first vote");
    let second = bridge.vote(2, false).expect("second vote");

    assert_ne!(first.notification, second.notification);
    assert_ne!(first.tx_hash, second.tx_hash);

    let records = bridge.notifications();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.kind == NotificationKind::Success));
}

#[test]
fn dismiss_clears_settled_records() {
    let mut bridge = connected_bridge();
    let outcome = bridge.finalize(4).expect("finalize");
    let id = outcome.notification.expect("notification id");

    assert!(bridge.dismiss(id));
    assert!(bridge.notifications().is_empty());
    assert!(!bridge.dismiss(id));
}
