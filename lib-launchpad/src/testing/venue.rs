//! In-memory AMM venue
//!
//! Pool factory, initializer and position manager. Pool ids are derived from
//! the sorted pair and fee tier, so each `(pair, fee)` has at most one pool.
//!
//! ## Invariant: Initialization Atomicity
//! A pool is either initialized with a non-zero starting price or accepts no
//! positions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::VenueError;
use crate::host::{PositionAmounts, PositionReceipt, StartingPrice};
use crate::types::{Address, PoolId};

const POOL_ID_DOMAIN: &[u8] = b"LAUNCHPAD_MEMORY_POOL_V1";

/// Pool created through the venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPool {
    pub token0: Address,
    pub token1: Address,
    pub fee_tier: u32,
    pub starting_price: Option<StartingPrice>,
    pub positions: Vec<u64>,
}

/// Minted liquidity position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPosition {
    pub pool: PoolId,
    pub owner: Address,
    pub amounts: PositionAmounts,
    pub liquidity: u128,
}

/// Pool and position bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryVenue {
    /// Wrapped-native token paired with launched tokens
    wrapped_native: Address,
    /// Account custodying pooled assets
    custody: Address,
    pools: HashMap<PoolId, MemoryPool>,
    positions: HashMap<u64, MemoryPosition>,
    next_position_id: u64,
}

impl MemoryVenue {
    pub fn new() -> Self {
        Self {
            wrapped_native: Address::derive(POOL_ID_DOMAIN, b"wrapped-native"),
            custody: Address::derive(POOL_ID_DOMAIN, b"position-manager"),
            pools: HashMap::new(),
            positions: HashMap::new(),
            next_position_id: 1,
        }
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    pub fn custody(&self) -> &Address {
        &self.custody
    }

    pub fn pool(&self, pool: &PoolId) -> Option<&MemoryPool> {
        self.pools.get(pool)
    }

    pub fn position(&self, position_id: u64) -> Option<&MemoryPosition> {
        self.positions.get(&position_id)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn create_pool(&mut self, token_a: &Address, token_b: &Address, fee_tier: u32) -> Result<PoolId, VenueError> {
        if token_a == token_b {
            return Err(VenueError::InvalidPair("identical tokens".to_string()));
        }
        if token_a.is_zero() || token_b.is_zero() {
            return Err(VenueError::InvalidPair("zero address".to_string()));
        }

        let (token0, token1) = if token_a < token_b {
            (*token_a, *token_b)
        } else {
            (*token_b, *token_a)
        };
        let pool_id = derive_pool_id(&token0, &token1, fee_tier);
        if self.pools.contains_key(&pool_id) {
            return Err(VenueError::PoolExists);
        }

        self.pools.insert(
            pool_id,
            MemoryPool {
                token0,
                token1,
                fee_tier,
                starting_price: None,
                positions: Vec::new(),
            },
        );
        Ok(pool_id)
    }

    pub fn initialize_pool(&mut self, pool: &PoolId, price: StartingPrice) -> Result<(), VenueError> {
        let entry = self.pools.get_mut(pool).ok_or(VenueError::PoolNotFound)?;
        if entry.starting_price.is_some() {
            return Err(VenueError::AlreadyInitialized);
        }
        if price.wei_per_token == 0 {
            return Err(VenueError::InvalidAmounts);
        }
        entry.starting_price = Some(price);
        Ok(())
    }

    /// Record a position whose assets already sit in custody
    pub fn record_position(
        &mut self,
        pool: &PoolId,
        amounts: PositionAmounts,
        recipient: &Address,
    ) -> Result<PositionReceipt, VenueError> {
        let entry = self.pools.get_mut(pool).ok_or(VenueError::PoolNotFound)?;
        if entry.starting_price.is_none() {
            return Err(VenueError::NotInitialized);
        }
        if amounts.token_amount == 0 || amounts.native_amount == 0 {
            return Err(VenueError::InvalidAmounts);
        }

        let position_id = self.next_position_id;
        let liquidity = isqrt(amounts.token_amount).saturating_mul(isqrt(amounts.native_amount));

        entry.positions.push(position_id);
        self.positions.insert(
            position_id,
            MemoryPosition {
                pool: *pool,
                owner: *recipient,
                amounts,
                liquidity,
            },
        );
        self.next_position_id += 1;

        Ok(PositionReceipt {
            position_id,
            liquidity,
            token_amount: amounts.token_amount,
            native_amount: amounts.native_amount,
        })
    }
}

impl Default for MemoryVenue {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_pool_id(token0: &Address, token1: &Address, fee_tier: u32) -> PoolId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(POOL_ID_DOMAIN);
    hasher.update(token0.as_bytes());
    hasher.update(token1.as_bytes());
    hasher.update(&fee_tier.to_be_bytes());
    PoolId(*hasher.finalize().as_bytes())
}

/// Integer square root (floor)
fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    if n < 4 {
        return 1;
    }
    let mut x = n;
    let mut y = n / 2 + 1;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
