//! Per-mode mint transaction lifecycle.
//!
//! Each mint mode owns one transaction track. A track moves through
//! `Idle -> Submitting -> AwaitingConfirmation -> Idle` and keeps its terminal
//! outcome (hash, confirmation flag, error) around until the next submission
//! starts a fresh lifecycle.

use alloy_primitives::TxHash;
use std::fmt;

/// The two ways the drop can be minted.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum MintMode {
    /// `freeMint(uint256)`, no value attached.
    Free,
    /// `paidMint(uint256)`, carrying `quantity * mintPrice` as value.
    Paid,
}

impl MintMode {
    /// Both modes, in track order.
    pub const ALL: [Self; 2] = [Self::Free, Self::Paid];

    /// The track slot this mode occupies.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Free => 0,
            Self::Paid => 1,
        }
    }
}

impl fmt::Display for MintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Paid => f.write_str("paid"),
        }
    }
}

/// What a caller asked to mint.
///
/// Captured when the submission starts, so selector edits made while the
/// transaction is in flight cannot change what was submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintRequest {
    pub mode: MintMode,
    pub quantity: u32,
}

/// Where a transaction track currently is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MintPhase {
    /// No submission is outstanding.
    #[default]
    Idle,
    /// The submission was handed to the wallet, no hash yet.
    Submitting,
    /// The wallet accepted and returned a hash, waiting on the receipt.
    AwaitingConfirmation,
}

/// State of one mode's transaction track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintTransaction {
    hash: Option<TxHash>,
    submission_pending: bool,
    confirmation_pending: bool,
    confirmed: bool,
    last_error: Option<String>,
}

impl MintTransaction {
    /// The phase the track is currently in.
    pub fn phase(&self) -> MintPhase {
        if self.submission_pending {
            MintPhase::Submitting
        } else if self.confirmation_pending {
            MintPhase::AwaitingConfirmation
        } else {
            MintPhase::Idle
        }
    }

    /// True while a submission or confirmation is outstanding.
    pub fn in_progress(&self) -> bool {
        self.submission_pending || self.confirmation_pending
    }

    /// True between the submission starting and the wallet answering.
    pub fn submission_pending(&self) -> bool {
        self.submission_pending
    }

    /// True between the wallet accepting and the receipt arriving.
    pub fn confirmation_pending(&self) -> bool {
        self.confirmation_pending
    }

    /// The submitted transaction's hash, once the wallet accepted it.
    pub fn hash(&self) -> Option<TxHash> {
        self.hash
    }

    /// True once the last lifecycle ended in a confirmed transaction.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// The error that ended the last lifecycle, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a fresh lifecycle, clearing any previous outcome.
    pub fn begin(&mut self) {
        debug_assert!(!self.in_progress());
        *self = Self { submission_pending: true, ..Self::default() };
    }

    /// The wallet accepted the submission and returned a hash.
    pub fn accept(&mut self, hash: TxHash) {
        debug_assert!(self.submission_pending);
        self.hash = Some(hash);
        self.submission_pending = false;
        self.confirmation_pending = true;
    }

    /// The submission was rejected before a transaction existed.
    pub fn reject(&mut self, reason: impl Into<String>) {
        debug_assert!(self.submission_pending);
        self.submission_pending = false;
        self.last_error = Some(reason.into());
    }

    /// The transaction reached the required confirmations.
    pub fn confirm(&mut self) {
        debug_assert!(self.confirmation_pending);
        self.confirmation_pending = false;
        self.confirmed = true;
    }

    /// The transaction failed after submission: reverted, dropped, or lost.
    pub fn fail(&mut self, reason: impl Into<String>) {
        debug_assert!(self.confirmation_pending);
        self.confirmation_pending = false;
        self.last_error = Some(reason.into());
    }
}
