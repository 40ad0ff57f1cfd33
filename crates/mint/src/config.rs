//! Minter configuration.
//!
//! Values resolve in layers: built-in deployment defaults, then a
//! `basemint.toml` next to the working directory, then `BASEMINT_*`
//! environment variables. CLI flags merge on top of the loaded figment.

use alloy_primitives::{Address, address};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// The drop contract on Base mainnet.
pub const DEFAULT_CONTRACT: Address = address!("0x62b2217c736289d210d17e132561ac8dd2600b48");

/// Base mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// Base's public RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

/// Everything the minter needs to know about its deployment and timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintConfig {
    /// JSON-RPC endpoint to read and submit through.
    pub rpc_url: String,
    /// EIP-155 chain id the drop is deployed on.
    pub chain_id: u64,
    /// Address of the drop contract.
    pub contract: Address,
    /// How long a cached contract read stays fresh, in seconds.
    pub read_ttl: u64,
    /// How many times a failed contract read is retried before it degrades to
    /// unknown.
    pub read_retries: u32,
    /// Confirmations a mint needs before it counts as confirmed.
    pub confirmations: u64,
    /// How long to wait for a mint's receipt, in seconds.
    pub tx_timeout: u64,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            contract: DEFAULT_CONTRACT,
            read_ttl: 60,
            read_retries: 3,
            confirmations: 1,
            tx_timeout: 120,
        }
    }
}

impl MintConfig {
    /// Returns the base figment: defaults, then `basemint.toml`, then
    /// `BASEMINT_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("basemint.toml"))
            .merge(Env::prefixed("BASEMINT_"))
    }

    /// Extracts the configuration from the base figment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
