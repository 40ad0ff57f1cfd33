//! Cached reads of the drop contract.
//!
//! The three reads the minter displays and gates on (`mintPrice`,
//! `totalSupply`, `balanceOf(caller)`) go through one cache. Each slot is
//! served from memory while fresh and re-fetched through the client once its
//! TTL lapses. A slot whose fetch keeps failing degrades to *unknown* rather
//! than poisoning the rest.

use crate::{contract::MintClient, retry::Retry};
use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Which on-chain read a cache slot tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadQuery {
    MintPrice,
    TotalSupply,
    CallerBalance,
}

impl ReadQuery {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Self::MintPrice => 0,
            Self::TotalSupply => 1,
            Self::CallerBalance => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::MintPrice => "mintPrice",
            Self::TotalSupply => "totalSupply",
            Self::CallerBalance => "balanceOf",
        }
    }
}

/// Snapshot of every tracked read. `None` means the value is unknown: never
/// fetched, expired caller, or degraded after failed fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContractReads {
    pub mint_price: Option<U256>,
    pub total_supply: Option<U256>,
    pub caller_balance: Option<U256>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    value: Option<U256>,
    fetched_at: Option<Instant>,
    // Only set for the balance slot: the owner the value belongs to.
    owner: Option<Address>,
}

impl Slot {
    fn fresh(&self, ttl: Duration, owner: Option<Address>) -> bool {
        self.owner == owner && self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }
}

/// Read-through cache over a [`MintClient`]'s view functions.
pub struct ReadCache {
    slots: Mutex<[Slot; ReadQuery::COUNT]>,
    ttl: Duration,
    retries: u32,
}

impl ReadCache {
    /// Creates a cache whose entries stay fresh for `ttl` and whose fetches
    /// retry `retries` times before degrading to unknown.
    pub fn new(ttl: Duration, retries: u32) -> Self {
        Self { slots: Mutex::new([Slot::default(); ReadQuery::COUNT]), ttl, retries }
    }

    /// The current cached values, without fetching anything.
    pub fn snapshot(&self) -> ContractReads {
        let slots = self.slots.lock();
        ContractReads {
            mint_price: slots[ReadQuery::MintPrice.index()].value,
            total_supply: slots[ReadQuery::TotalSupply.index()].value,
            caller_balance: slots[ReadQuery::CallerBalance.index()].value,
        }
    }

    /// Serves `query` from the cache when fresh, fetching through `client`
    /// otherwise. `caller` is only consulted for [`ReadQuery::CallerBalance`].
    pub async fn get<C: MintClient + ?Sized>(
        &self,
        client: &C,
        query: ReadQuery,
        caller: Option<Address>,
    ) -> Option<U256> {
        let owner = Self::owner_for(query, caller);
        {
            let slots = self.slots.lock();
            let slot = &slots[query.index()];
            if slot.fresh(self.ttl, owner) {
                return slot.value;
            }
        }
        self.refresh(client, query, caller).await
    }

    /// Fetches `query` regardless of freshness and stores the result.
    ///
    /// A failed fetch (after the retry budget) stores unknown, so stale data
    /// is never served past its TTL.
    pub async fn refresh<C: MintClient + ?Sized>(
        &self,
        client: &C,
        query: ReadQuery,
        caller: Option<Address>,
    ) -> Option<U256> {
        let owner = Self::owner_for(query, caller);
        let value = self.fetch(client, query, caller).await;
        let mut slots = self.slots.lock();
        slots[query.index()] = Slot { value, fetched_at: Some(Instant::now()), owner };
        value
    }

    /// Drops `query`'s slot back to unknown, forcing the next read to fetch.
    pub fn invalidate(&self, query: ReadQuery) {
        self.slots.lock()[query.index()] = Slot::default();
    }

    async fn fetch<C: MintClient + ?Sized>(
        &self,
        client: &C,
        query: ReadQuery,
        caller: Option<Address>,
    ) -> Option<U256> {
        let result = match query {
            ReadQuery::MintPrice => {
                Retry::new_no_delay(self.retries).run_async(|| client.mint_price()).await
            }
            ReadQuery::TotalSupply => {
                Retry::new_no_delay(self.retries).run_async(|| client.total_supply()).await
            }
            ReadQuery::CallerBalance => {
                // Without a connected wallet there is no owner to ask about.
                let Some(owner) = caller else {
                    trace!(target: "basemint::reads", "no caller address, balance stays unknown");
                    return None;
                };
                Retry::new_no_delay(self.retries).run_async(|| client.balance_of(owner)).await
            }
        };
        match result {
            Ok(value) => {
                trace!(target: "basemint::reads", query = query.name(), %value, "read fetched");
                Some(value)
            }
            Err(err) => {
                warn!(target: "basemint::reads", query = query.name(), %err, "read failed");
                None
            }
        }
    }

    fn owner_for(query: ReadQuery, caller: Option<Address>) -> Option<Address> {
        match query {
            ReadQuery::CallerBalance => caller,
            _ => None,
        }
    }
}
