//! Full mint lifecycles driven against the scripted client.

use crate::common::{self, MockClient, Scripted};
use alloy_primitives::U256;
use basemint::{MintError, MintMode, MintPhase, ReadQuery};
use similar_asserts::assert_eq;
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn free_mint_confirms_and_refreshes_totals() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    mock.set_total_supply(U256::from(10));
    mock.set_balance(U256::from(1));
    let minter = common::connected_minter(&mock);
    let mut events = minter.subscribe();

    minter.set_quantity(MintMode::Free, 3);
    let summary = minter.mint(MintMode::Free).await?;

    assert_eq!(mock.free_quantities(), vec![U256::from(3)]);
    assert_eq!(summary.block_number, Some(1));

    let track = minter.transaction(MintMode::Free);
    assert!(track.is_confirmed());
    assert!(!track.in_progress());
    assert_eq!(track.hash(), Some(summary.hash));
    assert_eq!(track.last_error(), None);

    // Confirmation refreshed supply and balance exactly once; the price was
    // never touched.
    let counts = mock.counts();
    assert_eq!(counts.total_supply, 1);
    assert_eq!(counts.balance_of, 1);
    assert_eq!(counts.mint_price, 0);

    let reads = minter.reads();
    assert_eq!(reads.total_supply, Some(U256::from(10)));
    assert_eq!(reads.caller_balance, Some(U256::from(1)));
    assert_eq!(reads.mint_price, None);

    assert_eq!(
        common::drain(&mut events),
        vec!["submitting", "submitted", "reads_refreshed", "confirmed"]
    );
    Ok(())
}

#[tokio::test]
async fn paid_mint_attaches_exactly_quantity_times_price()
-> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    mock.set_price(U256::from(2000));
    let minter = common::connected_minter(&mock);

    minter.set_quantity(MintMode::Paid, 4);
    minter.mint(MintMode::Paid).await?;

    assert_eq!(mock.paid_submissions(), vec![(U256::from(4), U256::from(8000))]);

    // One price fetch to gate the submission, none after the confirmation.
    let counts = mock.counts();
    assert_eq!(counts.mint_price, 1);
    assert_eq!(counts.total_supply, 1);
    assert_eq!(counts.balance_of, 1);
    Ok(())
}

#[tokio::test]
async fn paid_mint_reuses_the_cached_price() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    mock.set_price(U256::from(500));
    let minter = common::connected_minter(&mock);

    minter.stats().await;
    assert_eq!(mock.counts().mint_price, 1);

    minter.mint(MintMode::Paid).await?;

    let counts = mock.counts();
    assert_eq!(counts.mint_price, 1);
    // stats plus the post-confirmation refresh
    assert_eq!(counts.total_supply, 2);
    assert_eq!(counts.balance_of, 2);
    Ok(())
}

#[tokio::test]
async fn quantity_edits_in_flight_do_not_change_the_submission()
-> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    let minter = Arc::new(common::connected_minter(&mock));
    let gate = mock.gate(MintMode::Free);

    minter.set_quantity(MintMode::Free, 2);
    let task = tokio::spawn({
        let minter = minter.clone();
        async move { minter.mint(MintMode::Free).await }
    });

    assert!(
        common::wait_for(
            || minter.transaction(MintMode::Free).confirmation_pending(),
            Duration::from_secs(1)
        )
        .await
    );

    // The stepper moves on while the transaction is awaiting its receipt.
    minter.set_quantity(MintMode::Free, 999);
    gate.notify_one();
    task.await??;

    assert_eq!(mock.free_quantities(), vec![U256::from(2)]);
    assert_eq!(minter.quantity(MintMode::Free), 999);
    Ok(())
}

#[test]
fn quantity_steppers_clamp_per_mode() {
    let mock = MockClient::new();
    let minter = common::disconnected_minter(&mock);

    assert_eq!(minter.quantity(MintMode::Free), 1);
    minter.decrement_quantity(MintMode::Free);
    assert_eq!(minter.quantity(MintMode::Free), 1);

    minter.increment_quantity(MintMode::Free);
    assert_eq!(minter.quantity(MintMode::Free), 2);

    minter.set_quantity(MintMode::Free, 5000);
    assert_eq!(minter.quantity(MintMode::Free), 1000);

    // Each mode keeps its own selector.
    assert_eq!(minter.quantity(MintMode::Paid), 1);
}

#[tokio::test]
async fn disconnected_mint_never_reaches_the_client() {
    let mock = MockClient::new();
    let minter = common::disconnected_minter(&mock);
    let mut events = minter.subscribe();

    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(matches!(err, MintError::NotConnected));
    assert!(err.is_precondition());

    let counts = mock.counts();
    assert_eq!(counts.free_mint, 0);
    assert_eq!(counts.mint_price, 0);
    assert_eq!(minter.transaction(MintMode::Free).phase(), MintPhase::Idle);
    assert!(common::drain(&mut events).is_empty());
}

#[tokio::test]
async fn paid_mint_requires_a_known_price() {
    let mock = MockClient::new();
    mock.fail_reads(ReadQuery::MintPrice, u32::MAX);
    let minter = common::connected_minter(&mock);

    let err = minter.mint(MintMode::Paid).await.unwrap_err();
    assert!(matches!(err, MintError::PriceUnknown));

    let counts = mock.counts();
    assert_eq!(counts.paid_mint, 0);
    // one initial attempt plus the three configured retries
    assert_eq!(counts.mint_price, 4);
    assert_eq!(minter.transaction(MintMode::Paid).phase(), MintPhase::Idle);
}

#[tokio::test]
async fn oversized_total_cost_is_rejected_before_submission() {
    let mock = MockClient::new();
    mock.set_price(U256::MAX);
    let minter = common::connected_minter(&mock);

    minter.set_quantity(MintMode::Paid, 2);
    let err = minter.mint(MintMode::Paid).await.unwrap_err();
    assert!(matches!(err, MintError::CostOverflow));
    assert_eq!(mock.counts().paid_mint, 0);
}

#[tokio::test]
async fn rejected_submission_records_the_reason_and_re_enables() {
    let mock = MockClient::new();
    mock.reject_next_submission("user rejected the request");
    let minter = common::connected_minter(&mock);
    let mut events = minter.subscribe();

    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(err.is_submission());

    let track = minter.transaction(MintMode::Free);
    assert_eq!(track.phase(), MintPhase::Idle);
    assert_eq!(track.hash(), None);
    assert!(!track.is_confirmed());
    assert!(track.last_error().is_some_and(|reason| reason.contains("user rejected")));

    // No receipt, so nothing was refreshed.
    assert_eq!(mock.counts().total_supply, 0);
    assert_eq!(common::drain(&mut events), vec!["submitting", "rejected"]);

    // The track is free for another attempt.
    assert!(minter.can_mint(MintMode::Free));
}

#[tokio::test]
async fn reverted_mint_fails_without_refreshing_totals() {
    let mock = MockClient::new();
    mock.script_outcome(MintMode::Free, Scripted::Revert);
    let minter = common::connected_minter(&mock);
    let mut events = minter.subscribe();

    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(matches!(err, MintError::Reverted { .. }));
    assert!(err.is_confirmation());

    let track = minter.transaction(MintMode::Free);
    assert!(!track.is_confirmed());
    assert!(track.hash().is_some());
    assert!(track.last_error().is_some_and(|reason| reason.contains("reverted")));

    let counts = mock.counts();
    assert_eq!(counts.total_supply, 0);
    assert_eq!(counts.balance_of, 0);
    assert_eq!(common::drain(&mut events), vec!["submitting", "submitted", "failed"]);
}

#[tokio::test]
async fn dropped_mint_surfaces_as_dropped() {
    let mock = MockClient::new();
    mock.script_outcome(MintMode::Free, Scripted::Drop);
    let minter = common::connected_minter(&mock);

    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(matches!(err, MintError::Dropped { .. }));
    assert!(
        minter
            .transaction(MintMode::Free)
            .last_error()
            .is_some_and(|reason| reason.contains("dropped"))
    );
}

#[tokio::test]
async fn watcher_failure_maps_to_a_confirmation_error() {
    let mock = MockClient::new();
    mock.script_outcome(MintMode::Free, Scripted::Fail);
    let minter = common::connected_minter(&mock);

    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(matches!(err, MintError::Confirmation { .. }));
    assert!(
        minter
            .transaction(MintMode::Free)
            .last_error()
            .is_some_and(|reason| reason.contains("watcher failed"))
    );
}

#[tokio::test]
async fn a_mode_only_runs_one_lifecycle_at_a_time() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    let minter = Arc::new(common::connected_minter(&mock));
    let gate = mock.gate(MintMode::Free);

    let task = tokio::spawn({
        let minter = minter.clone();
        async move { minter.mint(MintMode::Free).await }
    });
    assert!(
        common::wait_for(
            || minter.transaction(MintMode::Free).confirmation_pending(),
            Duration::from_secs(1)
        )
        .await
    );

    assert!(!minter.can_mint(MintMode::Free));
    let err = minter.mint(MintMode::Free).await.unwrap_err();
    assert!(matches!(err, MintError::InFlight(MintMode::Free)));
    // the guard fired before another submission went out
    assert_eq!(mock.counts().free_mint, 1);

    gate.notify_one();
    task.await??;
    assert!(minter.transaction(MintMode::Free).is_confirmed());
    assert!(minter.can_mint(MintMode::Free));
    Ok(())
}

#[tokio::test]
async fn free_and_paid_lifecycles_run_independently() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    mock.set_price(U256::from(100));
    let minter = Arc::new(common::connected_minter(&mock));
    let free_gate = mock.gate(MintMode::Free);
    let paid_gate = mock.gate(MintMode::Paid);

    minter.set_quantity(MintMode::Free, 1);
    minter.set_quantity(MintMode::Paid, 2);

    let free = tokio::spawn({
        let minter = minter.clone();
        async move { minter.mint(MintMode::Free).await }
    });
    assert!(
        common::wait_for(
            || minter.transaction(MintMode::Free).confirmation_pending(),
            Duration::from_secs(1)
        )
        .await
    );

    // A paid mint starts fine while the free one is still awaiting.
    let paid = tokio::spawn({
        let minter = minter.clone();
        async move { minter.mint(MintMode::Paid).await }
    });
    assert!(
        common::wait_for(
            || minter.transaction(MintMode::Paid).confirmation_pending(),
            Duration::from_secs(1)
        )
        .await
    );
    assert!(minter.transaction(MintMode::Free).confirmation_pending());

    // Confirming the free mint leaves the paid one untouched.
    free_gate.notify_one();
    free.await??;
    assert!(minter.transaction(MintMode::Free).is_confirmed());
    assert!(minter.transaction(MintMode::Paid).confirmation_pending());
    assert!(minter.can_mint(MintMode::Free));
    assert!(!minter.can_mint(MintMode::Paid));

    paid_gate.notify_one();
    paid.await??;
    assert!(minter.transaction(MintMode::Paid).is_confirmed());
    Ok(())
}

#[tokio::test]
async fn can_mint_follows_price_knowledge() {
    let mock = MockClient::new();
    mock.fail_reads(ReadQuery::MintPrice, u32::MAX);
    let minter = common::connected_minter(&mock);

    // Free mints never depend on the price.
    assert!(minter.can_mint(MintMode::Free));
    assert!(!minter.can_mint(MintMode::Paid));

    // A degraded fetch leaves the price unknown.
    minter.stats().await;
    assert!(!minter.can_mint(MintMode::Paid));

    // Once the endpoint recovers, a forced refresh re-enables paid mints.
    mock.fail_reads(ReadQuery::MintPrice, 0);
    mock.set_price(U256::from(500));
    assert_eq!(minter.refresh(ReadQuery::MintPrice).await, Some(U256::from(500)));
    assert!(minter.can_mint(MintMode::Paid));
}

#[tokio::test]
async fn a_new_submission_clears_the_previous_outcome() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockClient::new();
    let minter = common::connected_minter(&mock);

    minter.mint(MintMode::Free).await?;
    assert!(minter.transaction(MintMode::Free).is_confirmed());

    mock.reject_next_submission("nonce too low");
    minter.mint(MintMode::Free).await.unwrap_err();

    let track = minter.transaction(MintMode::Free);
    assert!(!track.is_confirmed());
    assert_eq!(track.hash(), None);
    assert!(track.last_error().is_some_and(|reason| reason.contains("nonce too low")));
    Ok(())
}
