//! Error taxonomy for mint lifecycles.

use crate::tx::MintMode;
use alloy_primitives::TxHash;

/// Failures surfaced by the on-chain client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A contract call or transaction submission failed.
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),

    /// Waiting on a submitted transaction failed.
    #[error(transparent)]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),

    /// A raw RPC request failed.
    #[error(transparent)]
    Transport(#[from] alloy_transport::TransportError),

    /// No receipt arrived within the watcher's timeout, but the node still
    /// knows the transaction.
    #[error("timed out waiting for a receipt for {0}")]
    WatchTimeout(TxHash),

    /// Anything else, e.g. the signer declining to sign.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// A catch-all failure with a custom message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Why a mint did not run or did not complete.
///
/// The first four variants are precondition failures raised before anything
/// reaches the wallet; the rest map to the lifecycle stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// No wallet is connected, so there is no sender.
    #[error("no wallet is connected")]
    NotConnected,

    /// A paid mint was asked for while the unit price is unknown.
    #[error("the mint price is not known yet")]
    PriceUnknown,

    /// The mode already has a lifecycle in flight.
    #[error("a {0} mint is already in progress")]
    InFlight(MintMode),

    /// `quantity * mintPrice` does not fit in a uint256.
    #[error("total cost overflows a uint256")]
    CostOverflow,

    /// The wallet or node rejected the submission; no transaction exists.
    #[error("mint submission failed: {0}")]
    Submission(#[from] ClientError),

    /// The transaction made it on-chain and reverted.
    #[error("transaction {hash} reverted")]
    Reverted { hash: TxHash },

    /// The node no longer knows the transaction.
    #[error("transaction {hash} was dropped from the mempool")]
    Dropped { hash: TxHash },

    /// The watcher could not produce a receipt.
    #[error("failed waiting for transaction {hash}: {source}")]
    Confirmation { hash: TxHash, source: ClientError },
}

impl MintError {
    /// True for failures raised before anything was submitted.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::PriceUnknown | Self::InFlight(_) | Self::CostOverflow
        )
    }

    /// True when the submission itself was rejected.
    pub fn is_submission(&self) -> bool {
        matches!(self, Self::Submission(_))
    }

    /// True when a submitted transaction failed to confirm.
    pub fn is_confirmation(&self) -> bool {
        matches!(self, Self::Reverted { .. } | Self::Dropped { .. } | Self::Confirmation { .. })
    }
}
