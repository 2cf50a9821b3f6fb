//! Launchpad Ledger
//!
//! Keyed store of every token record plus the global accounting state.
//! All mutation goes through the named operations below; each one updates
//! the token-level and global-level figures together so that
//! `total_escrow == Σ platform_escrow` holds after every call.
//!
//! Operations validate fully before writing anything: a failed call leaves
//! the ledger untouched.

pub mod record;

pub use record::TokenRecord;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::types::{Address, PoolId, SeedingState, Wei};

/// Process-wide configuration and totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    pub owner: Address,
    pub fee_collector: Address,
    pub lp_collector: Address,
    pub creation_fee_wei: Wei,
    /// Sum of every token's platform escrow
    pub total_escrow: Wei,
}

impl GlobalState {
    pub fn new(owner: Address, fee_collector: Address, lp_collector: Address, creation_fee_wei: Wei) -> Self {
        Self {
            owner,
            fee_collector,
            lp_collector,
            creation_fee_wei,
            total_escrow: 0,
        }
    }
}

/// Launchpad accounting store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    global: GlobalState,
    /// All registered tokens by address
    tokens: HashMap<Address, TokenRecord>,
    /// Creator → tokens in creation order
    creators: HashMap<Address, Vec<Address>>,
}

impl Ledger {
    pub fn new(global: GlobalState) -> Self {
        Self {
            global,
            tokens: HashMap::new(),
            creators: HashMap::new(),
        }
    }

    /// Rebuild a ledger from persisted parts
    pub(crate) fn from_parts(
        global: GlobalState,
        tokens: HashMap<Address, TokenRecord>,
        creators: HashMap<Address, Vec<Address>>,
    ) -> Self {
        Self {
            global,
            tokens,
            creators,
        }
    }

    pub fn global(&self) -> &GlobalState {
        &self.global
    }

    /// Look up a token record
    pub fn record(&self, token: &Address) -> LaunchpadResult<&TokenRecord> {
        self.tokens
            .get(token)
            .ok_or(LaunchpadError::UnknownToken(*token))
    }

    fn record_mut(&mut self, token: &Address) -> LaunchpadResult<&mut TokenRecord> {
        self.tokens
            .get_mut(token)
            .ok_or(LaunchpadError::UnknownToken(*token))
    }

    pub fn contains(&self, token: &Address) -> bool {
        self.tokens.contains_key(token)
    }

    pub fn records(&self) -> impl Iterator<Item = &TokenRecord> {
        self.tokens.values()
    }

    pub fn total_count(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens created by `creator`, oldest first
    pub fn user_tokens(&self, creator: &Address) -> &[Address] {
        self.creators
            .get(creator)
            .map(|tokens| tokens.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn creators(&self) -> &HashMap<Address, Vec<Address>> {
        &self.creators
    }

    /// Register a new token; its opening escrow is added to the global total
    pub fn register(&mut self, record: TokenRecord) -> LaunchpadResult<()> {
        if self.tokens.contains_key(&record.token) {
            return Err(LaunchpadError::InvalidParameters(
                "Token already registered".to_string(),
            ));
        }

        let total_escrow = self
            .global
            .total_escrow
            .checked_add(record.platform_escrow)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;

        self.global.total_escrow = total_escrow;
        self.creators
            .entry(record.creator)
            .or_default()
            .push(record.token);
        self.tokens.insert(record.token, record);

        Ok(())
    }

    /// Credit a token's escrow and the global total
    pub fn credit_escrow(&mut self, token: &Address, amount: Wei) -> LaunchpadResult<Wei> {
        let total_escrow = self
            .global
            .total_escrow
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        let record = self.record_mut(token)?;
        let escrow = record
            .platform_escrow
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;

        record.platform_escrow = escrow;
        self.global.total_escrow = total_escrow;
        debug!("escrow credit token={} amount={} escrow={}", token, amount, escrow);
        Ok(escrow)
    }

    /// Debit a token's escrow and the global total
    pub fn debit_escrow(&mut self, token: &Address, amount: Wei) -> LaunchpadResult<Wei> {
        let available = self.record(token)?.platform_escrow;
        let escrow = available
            .checked_sub(amount)
            .ok_or(LaunchpadError::InsufficientEscrow {
                required: amount,
                available,
            })?;
        let total_escrow = self
            .global
            .total_escrow
            .checked_sub(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;

        self.record_mut(token)?.platform_escrow = escrow;
        self.global.total_escrow = total_escrow;
        debug!("escrow debit token={} amount={} escrow={}", token, amount, escrow);
        Ok(escrow)
    }

    /// Zero a token's escrow, returning what it held
    pub fn drain_escrow(&mut self, token: &Address) -> LaunchpadResult<Wei> {
        let amount = self.record(token)?.platform_escrow;
        self.debit_escrow(token, amount)?;
        Ok(amount)
    }

    /// Apply a curve buy: `supply += amount`, `funds += cost`
    pub fn record_buy(&mut self, token: &Address, amount: u64, cost: Wei) -> LaunchpadResult<()> {
        let record = self.record_mut(token)?;
        let supply = record
            .total_supply
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        let funds = record
            .token_funds
            .checked_add(cost)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;

        record.total_supply = supply;
        record.token_funds = funds;
        debug!("ledger buy token={} supply={} funds={}", token, supply, funds);
        Ok(())
    }

    /// Apply a curve sell
    ///
    /// `supply -= amount`, `funds -= revenue`, and `platform_tax` leaves both
    /// the token escrow and the global total.
    pub fn record_sell(
        &mut self,
        token: &Address,
        amount: u64,
        revenue: Wei,
        platform_tax: Wei,
    ) -> LaunchpadResult<()> {
        let record = self.record(token)?;
        let supply = record
            .total_supply
            .checked_sub(amount)
            .ok_or(LaunchpadError::InsufficientSupply {
                requested: amount,
                available: record.total_supply,
            })?;
        let funds = record
            .token_funds
            .checked_sub(revenue)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        if record.platform_escrow < platform_tax {
            return Err(LaunchpadError::InsufficientEscrow {
                required: platform_tax,
                available: record.platform_escrow,
            });
        }

        self.debit_escrow(token, platform_tax)?;
        let record = self.record_mut(token)?;
        record.total_supply = supply;
        record.token_funds = funds;
        debug!("ledger sell token={} supply={} funds={}", token, supply, funds);
        Ok(())
    }

    /// Start liquidity seeding: set `lp_created` and drain the token funds
    pub fn begin_seeding(&mut self, token: &Address) -> LaunchpadResult<Wei> {
        let record = self.record_mut(token)?;
        record.require_curve_active()?;

        let funds = record.token_funds;
        record.token_funds = 0;
        record.lp_created = true;
        debug!("seeding started token={} funds={}", token, funds);
        Ok(funds)
    }

    /// Finish liquidity seeding
    pub fn complete_seeding(&mut self, token: &Address, pool: PoolId) -> LaunchpadResult<()> {
        let record = self.record_mut(token)?;
        if record.seeding_state() != SeedingState::Seeding {
            return Err(LaunchpadError::InvalidParameters(
                "Seeding not in progress".to_string(),
            ));
        }

        record.lp_seeded = true;
        record.v3_pool = Some(pool);
        Ok(())
    }

    pub fn set_owner(&mut self, owner: Address) -> Address {
        std::mem::replace(&mut self.global.owner, owner)
    }

    pub fn set_fee_collector(&mut self, collector: Address) -> Address {
        std::mem::replace(&mut self.global.fee_collector, collector)
    }

    pub fn set_lp_collector(&mut self, collector: Address) -> Address {
        std::mem::replace(&mut self.global.lp_collector, collector)
    }

    pub fn set_creation_fee(&mut self, fee: Wei) -> Wei {
        std::mem::replace(&mut self.global.creation_fee_wei, fee)
    }

    /// Σ platform_escrow across all tokens
    pub fn escrow_sum(&self) -> LaunchpadResult<Wei> {
        self.tokens.values().try_fold(0u128, |acc, r| {
            acc.checked_add(r.platform_escrow)
                .ok_or(LaunchpadError::ArithmeticOverflow)
        })
    }

    /// Σ token_funds across all tokens
    pub fn funds_sum(&self) -> LaunchpadResult<Wei> {
        self.tokens.values().try_fold(0u128, |acc, r| {
            acc.checked_add(r.token_funds)
                .ok_or(LaunchpadError::ArithmeticOverflow)
        })
    }

    /// Registry statistics
    pub fn stats(&self) -> LedgerStats {
        let seeded = self
            .tokens
            .values()
            .filter(|r| r.seeding_state().is_seeded())
            .count() as u64;
        LedgerStats {
            total_tokens: self.tokens.len() as u64,
            curve_active: self.tokens.len() as u64 - seeded,
            seeded,
            total_escrow: self.global.total_escrow,
        }
    }
}

/// Ledger statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_tokens: u64,
    pub curve_active: u64,
    pub seeded: u64,
    pub total_escrow: Wei,
}
