//! Wallet session tracking.

use alloy_primitives::{Address, ChainId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Connection state of the minting wallet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalletSession {
    /// No wallet is attached.
    #[default]
    Disconnected,
    /// A connection attempt is underway.
    Connecting,
    /// A wallet is attached and can sign mints.
    Connected { address: Address, chain_id: ChainId },
}

impl WalletSession {
    /// Whether a wallet is attached.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Whether a connection attempt is underway.
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    /// The connected wallet's address, if any.
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Connected { address, .. } => Some(*address),
            _ => None,
        }
    }

    /// The chain the wallet is connected to, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Connected { chain_id, .. } => Some(*chain_id),
            _ => None,
        }
    }
}

/// Shared, cloneable handle to the wallet session.
///
/// The connection side (CLI wiring, a wallet bridge) mutates it; the minter
/// only reads snapshots through [`current`](Self::current).
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<WalletSession>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the current session.
    pub fn current(&self) -> WalletSession {
        *self.inner.lock()
    }

    /// Whether a wallet is currently attached.
    pub fn is_connected(&self) -> bool {
        self.current().is_connected()
    }

    /// Marks a connection attempt as started.
    pub fn connecting(&self) {
        let mut session = self.inner.lock();
        *session = WalletSession::Connecting;
        Self::log(&session);
    }

    /// Attaches a wallet.
    pub fn connect(&self, address: Address, chain_id: ChainId) {
        let mut session = self.inner.lock();
        *session = WalletSession::Connected { address, chain_id };
        Self::log(&session);
    }

    /// Detaches the wallet, if any.
    pub fn disconnect(&self) {
        let mut session = self.inner.lock();
        *session = WalletSession::Disconnected;
        Self::log(&session);
    }

    fn log(session: &WalletSession) {
        debug!(
            target: "basemint::session",
            connected = session.is_connected(),
            connecting = session.is_connecting(),
            address = ?session.address(),
            "connection state changed"
        );
    }
}
