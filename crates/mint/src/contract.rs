//! The drop contract surface and the client trait the minter drives.

use crate::{error::ClientError, watch};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionReceipt;
use alloy_sol_types::sol;
use async_trait::async_trait;
use std::time::Duration;

sol! {
    #[sol(rpc)]
    interface IMintDrop {
        #[derive(Debug)]
        function mintPrice() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function freeMint(uint256 quantity) external;
        function paidMint(uint256 quantity) external payable;
    }
}

/// What happened to a submitted transaction.
#[derive(Clone, Debug)]
pub enum TxOutcome {
    /// Mined with a success status.
    Confirmed(TxSummary),
    /// Mined, but execution reverted.
    Reverted(TxSummary),
    /// The node no longer knows the hash.
    Dropped,
}

/// Receipt fields the minter cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxSummary {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl From<TransactionReceipt> for TxOutcome {
    fn from(receipt: TransactionReceipt) -> Self {
        let summary = TxSummary {
            hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        };
        if receipt.status() { Self::Confirmed(summary) } else { Self::Reverted(summary) }
    }
}

/// On-chain operations the minter needs from the drop contract.
///
/// The live implementation is [`MintDropClient`]; tests substitute a scripted
/// one.
#[async_trait]
pub trait MintClient: Send + Sync {
    /// `mintPrice()`: the unit price of a paid mint, in wei.
    async fn mint_price(&self) -> Result<U256, ClientError>;

    /// `totalSupply()`: how many tokens the drop has minted so far.
    async fn total_supply(&self) -> Result<U256, ClientError>;

    /// `balanceOf(owner)`: how many tokens `owner` holds.
    async fn balance_of(&self, owner: Address) -> Result<U256, ClientError>;

    /// Submits `freeMint(quantity)` and returns the transaction hash.
    async fn free_mint(&self, quantity: U256) -> Result<TxHash, ClientError>;

    /// Submits `paidMint(quantity)` carrying `value` wei and returns the
    /// transaction hash.
    async fn paid_mint(&self, quantity: U256, value: U256) -> Result<TxHash, ClientError>;

    /// Waits until `hash` confirms, reverts, or disappears.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxOutcome, ClientError>;
}

/// [`MintClient`] backed by a JSON-RPC provider.
///
/// Submissions require the provider to carry a signer for the minting wallet.
#[derive(Clone, Debug)]
pub struct MintDropClient<P> {
    provider: P,
    address: Address,
    confirmations: u64,
    timeout: Duration,
}

impl<P: Provider> MintDropClient<P> {
    /// Creates a client for the drop deployed at `address`.
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address, confirmations: 1, timeout: Duration::from_secs(120) }
    }

    /// Sets how many confirmations a receipt needs before it counts.
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Sets how long to wait for a receipt before giving up.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The drop contract's address.
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl<P: Provider> MintClient for MintDropClient<P> {
    async fn mint_price(&self) -> Result<U256, ClientError> {
        Ok(IMintDrop::new(self.address, &self.provider).mintPrice().call().await?)
    }

    async fn total_supply(&self) -> Result<U256, ClientError> {
        Ok(IMintDrop::new(self.address, &self.provider).totalSupply().call().await?)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ClientError> {
        Ok(IMintDrop::new(self.address, &self.provider).balanceOf(owner).call().await?)
    }

    async fn free_mint(&self, quantity: U256) -> Result<TxHash, ClientError> {
        let pending =
            IMintDrop::new(self.address, &self.provider).freeMint(quantity).send().await?;
        Ok(*pending.tx_hash())
    }

    async fn paid_mint(&self, quantity: U256, value: U256) -> Result<TxHash, ClientError> {
        let pending = IMintDrop::new(self.address, &self.provider)
            .paidMint(quantity)
            .value(value)
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxOutcome, ClientError> {
        watch::watch_tx(&self.provider, hash, self.confirmations, self.timeout).await
    }
}
