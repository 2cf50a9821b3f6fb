//! Token Record
//!
//! Per-token accounting state, created at token creation and never deleted.
//!
//! # Invariants
//! - `start_price`, `price_step` and `lp_cap` are frozen at creation
//! - Before seeding: `token_funds == cost(0, total_supply)`
//! - After seeding: `token_funds == 0`, both LP flags set, `v3_pool` populated
//! - Seeding is irreversible

use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::pricing::{CurveParams, LinearCurve};
use crate::types::{Address, BlockHeight, PoolId, SeedingState, Wei};

/// Maximum symbol length accepted at creation
pub const MAX_SYMBOL_LEN: usize = 16;

/// Accounting state of one launched token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    // === Identity ===
    /// Deployed token contract
    pub token: Address,
    pub name: String,
    pub symbol: String,
    /// Account that paid the creation fee
    pub creator: Address,

    // === Curve State ===
    /// Curve anchor price
    pub start_price: Wei,
    /// Marginal price increase per unit
    pub price_step: Wei,
    /// Supply that triggers seeding
    pub lp_cap: u64,
    /// Cumulative curve units issued
    pub total_supply: u64,
    /// Native principal backing the curve
    pub token_funds: Wei,

    // === Escrow ===
    /// Protocol safety reserve for this token
    pub platform_escrow: Wei,

    // === Seeding State ===
    pub lp_created: bool,
    pub lp_seeded: bool,
    /// Seeded AMM pool
    pub v3_pool: Option<PoolId>,

    // === Metadata ===
    pub created_at_block: BlockHeight,
    pub created_at_timestamp: u64,
}

impl TokenRecord {
    /// Initialize a freshly deployed token
    ///
    /// Metadata is expected to have passed [`validate_metadata`].
    ///
    /// # Arguments
    /// * `token` - Address returned by the token factory
    /// * `curve` - Parameters frozen into the token
    /// * `creation_fee` - Opening escrow balance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token: Address,
        name: String,
        symbol: String,
        creator: Address,
        curve: &CurveParams,
        creation_fee: Wei,
        created_at_block: BlockHeight,
        created_at_timestamp: u64,
    ) -> Self {
        Self {
            token,
            name,
            symbol,
            creator,
            start_price: curve.initial_price_wei as Wei,
            price_step: curve.price_step_wei as Wei,
            lp_cap: curve.lp_cap,
            total_supply: 0,
            token_funds: 0,
            platform_escrow: creation_fee,
            lp_created: false,
            lp_seeded: false,
            v3_pool: None,
            created_at_block,
            created_at_timestamp,
        }
    }

    /// The token's own price curve
    pub fn curve(&self) -> LinearCurve {
        LinearCurve {
            start_price: self.start_price,
            price_step: self.price_step,
        }
    }

    pub fn seeding_state(&self) -> SeedingState {
        match (self.lp_created, self.lp_seeded) {
            (_, true) => SeedingState::Seeded,
            (true, false) => SeedingState::Seeding,
            (false, false) => SeedingState::NotSeeded,
        }
    }

    /// Fail once liquidity seeding has begun
    pub fn require_curve_active(&self) -> LaunchpadResult<()> {
        if !self.seeding_state().can_trade_curve() {
            return Err(LaunchpadError::CurveRetired);
        }
        Ok(())
    }

    /// Whether supply has reached the token's cap while the curve is live
    pub fn should_seed(&self) -> bool {
        self.total_supply >= self.lp_cap && self.seeding_state().can_trade_curve()
    }

    /// Fail unless seeding completed
    pub fn require_seeded(&self) -> LaunchpadResult<()> {
        if !self.seeding_state().is_seeded() {
            return Err(LaunchpadError::LpNotSeeded);
        }
        Ok(())
    }
}

/// Validate token name and symbol
pub fn validate_metadata(name: &str, symbol: &str) -> LaunchpadResult<()> {
    if name.trim().is_empty() {
        return Err(LaunchpadError::InvalidParameters(
            "Name cannot be empty".to_string(),
        ));
    }
    if symbol.trim().is_empty() {
        return Err(LaunchpadError::InvalidParameters(
            "Symbol cannot be empty".to_string(),
        ));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(LaunchpadError::InvalidParameters(format!(
            "Symbol too long (max {})",
            MAX_SYMBOL_LEN
        )));
    }
    Ok(())
}
