//! # basemint
//!
//! Client for an NFT drop on Base with a free and a paid mint path. It keeps
//! track of the wallet session, serves the drop's on-chain reads through a
//! TTL cache, and drives mint transactions from submission to confirmation.
//!
//! The entry point is [`Minter`], generic over a [`MintClient`] so the
//! lifecycle logic can be exercised without a node. [`MintDropClient`] is the
//! JSON-RPC implementation used by the `basemint` binary.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod minter;
pub mod quantity;
pub mod reads;
pub mod retry;
pub mod session;
pub mod tx;
pub mod watch;

pub use config::MintConfig;
pub use contract::{MintClient, MintDropClient, TxOutcome, TxSummary};
pub use error::{ClientError, MintError};
pub use events::MintEvent;
pub use minter::Minter;
pub use quantity::{MAX_QUANTITY, MIN_QUANTITY, QuantitySelector};
pub use reads::{ContractReads, ReadQuery};
pub use session::{SessionHandle, WalletSession};
pub use tx::{MintMode, MintPhase, MintRequest, MintTransaction};
