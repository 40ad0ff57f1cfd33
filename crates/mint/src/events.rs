//! Mint lifecycle notifications.

use crate::{contract::TxSummary, reads::ContractReads, tx::{MintMode, MintRequest}};
use alloy_primitives::{TxHash, U256};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Progress notification emitted while a mint moves through its lifecycle.
#[derive(Clone, Debug)]
pub enum MintEvent {
    /// A submission was handed to the wallet. `value` is the wei attached.
    Submitting { request: MintRequest, value: U256 },
    /// The wallet accepted and returned a hash.
    Submitted { mode: MintMode, hash: TxHash },
    /// The wallet or node rejected the submission; no transaction exists.
    Rejected { mode: MintMode, reason: String },
    /// The transaction gathered its required confirmations.
    Confirmed { mode: MintMode, summary: TxSummary },
    /// The transaction reverted, was dropped, or could not be watched.
    Failed { mode: MintMode, hash: TxHash, reason: String },
    /// Cached contract reads changed.
    ReadsRefreshed(ContractReads),
}

/// Fan-out of [`MintEvent`]s to any number of subscribers.
///
/// Subscribers that hung up are pruned on the next notification.
#[derive(Default)]
pub(crate) struct Listeners {
    senders: Mutex<Vec<UnboundedSender<MintEvent>>>,
}

impl Listeners {
    /// Registers a new subscriber.
    pub(crate) fn subscribe(&self) -> UnboundedReceiver<MintEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub(crate) fn notify(&self, event: MintEvent) {
        self.senders.lock().retain(|listener| listener.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.senders.lock().len()
    }
}
