//! The mint orchestrator.

use crate::{
    config::MintConfig,
    contract::{MintClient, TxOutcome, TxSummary},
    error::MintError,
    events::{Listeners, MintEvent},
    quantity::QuantitySelector,
    reads::{ContractReads, ReadCache, ReadQuery},
    session::{SessionHandle, WalletSession},
    tx::{MintMode, MintRequest, MintTransaction},
};
use alloy_primitives::U256;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Drives free and paid mints from submission to confirmation.
///
/// Each mode owns an independent quantity selector and transaction track, so
/// a free mint never blocks a paid one. All state sits behind short-lived
/// locks; nothing is held across an await point, which keeps concurrent
/// `mint` calls and snapshot reads safe from any task.
pub struct Minter<C> {
    client: C,
    session: SessionHandle,
    reads: ReadCache,
    selectors: [parking_lot::Mutex<QuantitySelector>; MintMode::ALL.len()],
    tracks: [parking_lot::Mutex<MintTransaction>; MintMode::ALL.len()],
    listeners: Listeners,
}

impl<C: MintClient> Minter<C> {
    /// Creates a minter over `client`, observing the wallet through `session`.
    pub fn new(client: C, session: SessionHandle, config: &MintConfig) -> Self {
        Self {
            client,
            session,
            reads: ReadCache::new(Duration::from_secs(config.read_ttl), config.read_retries),
            selectors: Default::default(),
            tracks: Default::default(),
            listeners: Listeners::default(),
        }
    }

    /// Registers a subscriber for lifecycle events.
    pub fn subscribe(&self) -> UnboundedReceiver<MintEvent> {
        self.listeners.subscribe()
    }

    /// A snapshot of the wallet session.
    pub fn session(&self) -> WalletSession {
        self.session.current()
    }

    /// The currently selected quantity for `mode`.
    pub fn quantity(&self, mode: MintMode) -> u32 {
        self.selectors[mode.index()].lock().get()
    }

    /// Overwrites `mode`'s quantity, clamped into bounds.
    pub fn set_quantity(&self, mode: MintMode, quantity: u32) {
        self.selectors[mode.index()].lock().set(quantity);
    }

    /// Steps `mode`'s quantity up by one.
    pub fn increment_quantity(&self, mode: MintMode) {
        self.selectors[mode.index()].lock().increment();
    }

    /// Steps `mode`'s quantity down by one.
    pub fn decrement_quantity(&self, mode: MintMode) {
        self.selectors[mode.index()].lock().decrement();
    }

    /// A snapshot of `mode`'s transaction track.
    pub fn transaction(&self, mode: MintMode) -> MintTransaction {
        self.tracks[mode.index()].lock().clone()
    }

    /// The cached contract reads, without fetching anything.
    pub fn reads(&self) -> ContractReads {
        self.reads.snapshot()
    }

    /// Whether a new `mode` submission would currently be accepted.
    ///
    /// False while disconnected, while `mode` already has a lifecycle in
    /// flight, and for paid mints while the unit price is unknown.
    pub fn can_mint(&self, mode: MintMode) -> bool {
        if !self.session.current().is_connected() {
            return false;
        }
        if self.tracks[mode.index()].lock().in_progress() {
            return false;
        }
        match mode {
            MintMode::Free => true,
            MintMode::Paid => self.reads.snapshot().mint_price.is_some(),
        }
    }

    /// Serves all three drop reads, fetching whatever is stale or unknown.
    pub async fn stats(&self) -> ContractReads {
        let caller = self.session.current().address();
        self.reads.get(&self.client, ReadQuery::MintPrice, None).await;
        self.reads.get(&self.client, ReadQuery::TotalSupply, None).await;
        self.reads.get(&self.client, ReadQuery::CallerBalance, caller).await;
        self.reads.snapshot()
    }

    /// Forces a re-fetch of one read and notifies subscribers.
    pub async fn refresh(&self, query: ReadQuery) -> Option<U256> {
        let caller = self.session.current().address();
        let value = self.reads.refresh(&self.client, query, caller).await;
        self.notify(MintEvent::ReadsRefreshed(self.reads.snapshot()));
        value
    }

    /// Runs one full mint lifecycle for `mode` with the currently selected
    /// quantity: submit, await the receipt, refresh the affected reads.
    ///
    /// The quantity is captured before submission; selector edits made while
    /// the transaction is in flight do not change what was submitted. Paid
    /// mints require a known unit price and attach `quantity * mintPrice` as
    /// value.
    pub async fn mint(&self, mode: MintMode) -> Result<TxSummary, MintError> {
        let Some(caller) = self.session.current().address() else {
            return Err(MintError::NotConnected);
        };

        let request = MintRequest { mode, quantity: self.quantity(mode) };
        let value = match mode {
            MintMode::Free => U256::ZERO,
            MintMode::Paid => {
                let price = self
                    .reads
                    .get(&self.client, ReadQuery::MintPrice, None)
                    .await
                    .ok_or(MintError::PriceUnknown)?;
                price.checked_mul(U256::from(request.quantity)).ok_or(MintError::CostOverflow)?
            }
        };

        // Enter Submitting. Only one lifecycle per mode at a time.
        {
            let mut track = self.tracks[mode.index()].lock();
            if track.in_progress() {
                return Err(MintError::InFlight(mode));
            }
            track.begin();
        }
        debug!(
            target: "basemint::minter",
            %mode,
            quantity = request.quantity,
            %value,
            from = %caller,
            "submitting mint"
        );
        self.notify(MintEvent::Submitting { request, value });

        let quantity = U256::from(request.quantity);
        let submitted = match mode {
            MintMode::Free => self.client.free_mint(quantity).await,
            MintMode::Paid => self.client.paid_mint(quantity, value).await,
        };
        let hash = match submitted {
            Ok(hash) => hash,
            Err(err) => {
                let reason = err.to_string();
                self.tracks[mode.index()].lock().reject(reason.clone());
                self.notify(MintEvent::Rejected { mode, reason });
                return Err(MintError::Submission(err));
            }
        };

        self.tracks[mode.index()].lock().accept(hash);
        debug!(target: "basemint::minter", %mode, %hash, "mint submitted");
        self.notify(MintEvent::Submitted { mode, hash });

        let outcome = match self.client.wait_for_receipt(hash).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let reason = err.to_string();
                self.tracks[mode.index()].lock().fail(reason.clone());
                self.notify(MintEvent::Failed { mode, hash, reason });
                return Err(MintError::Confirmation { hash, source: err });
            }
        };

        match outcome {
            TxOutcome::Confirmed(summary) => {
                // The refreshed totals must land before the pending flag
                // clears: observers never see a confirmed mint against stale
                // counts. The unit price is not re-read, minting cannot
                // change it.
                self.reads.refresh(&self.client, ReadQuery::TotalSupply, None).await;
                self.reads.refresh(&self.client, ReadQuery::CallerBalance, Some(caller)).await;
                self.notify(MintEvent::ReadsRefreshed(self.reads.snapshot()));
                self.tracks[mode.index()].lock().confirm();
                self.notify(MintEvent::Confirmed { mode, summary: summary.clone() });
                info!(target: "basemint::minter", %mode, %hash, "mint confirmed");
                Ok(summary)
            }
            TxOutcome::Reverted(_) => {
                let err = MintError::Reverted { hash };
                let reason = err.to_string();
                self.tracks[mode.index()].lock().fail(reason.clone());
                self.notify(MintEvent::Failed { mode, hash, reason });
                Err(err)
            }
            TxOutcome::Dropped => {
                let err = MintError::Dropped { hash };
                let reason = err.to_string();
                self.tracks[mode.index()].lock().fail(reason.clone());
                self.notify(MintEvent::Failed { mode, hash, reason });
                Err(err)
            }
        }
    }

    fn notify(&self, event: MintEvent) {
        self.listeners.notify(event);
    }
}
