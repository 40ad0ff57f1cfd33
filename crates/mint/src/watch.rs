//! Receipt watching for submitted mints.

use crate::{contract::TxOutcome, error::ClientError};
use alloy_primitives::TxHash;
use alloy_provider::{PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError};
use std::time::Duration;

/// Waits for `hash` to gather `confirmations`, mapping the receipt's status
/// into a [`TxOutcome`].
///
/// When no receipt shows up within `timeout`, the node is asked whether it
/// still knows the transaction at all: an unknown hash means it was dropped
/// from the mempool, a known one is reported as a watch timeout so the caller
/// can decide whether to keep waiting.
pub async fn watch_tx<P: Provider>(
    provider: &P,
    hash: TxHash,
    confirmations: u64,
    timeout: Duration,
) -> Result<TxOutcome, ClientError> {
    debug!(target: "basemint::watch", %hash, confirmations, ?timeout, "watching transaction");
    match PendingTransactionBuilder::new(provider.root().clone(), hash)
        .with_required_confirmations(confirmations)
        .with_timeout(Some(timeout))
        .get_receipt()
        .await
    {
        Ok(receipt) => {
            let outcome = TxOutcome::from(receipt);
            debug!(target: "basemint::watch", %hash, ?outcome, "receipt arrived");
            Ok(outcome)
        }
        Err(PendingTransactionError::TxWatcher(WatchTxError::Timeout)) => {
            resolve_timeout(provider, hash).await
        }
        Err(err) => Err(err.into()),
    }
}

/// The hash may still be queued past the deadline. Only report it dropped
/// when the node has actually forgotten it.
async fn resolve_timeout<P: Provider>(
    provider: &P,
    hash: TxHash,
) -> Result<TxOutcome, ClientError> {
    if provider.get_transaction_by_hash(hash).await?.is_none() {
        warn!(target: "basemint::watch", %hash, "transaction dropped from the mempool");
        Ok(TxOutcome::Dropped)
    } else {
        warn!(target: "basemint::watch", %hash, "no receipt within the timeout");
        Err(ClientError::WatchTimeout(hash))
    }
}
