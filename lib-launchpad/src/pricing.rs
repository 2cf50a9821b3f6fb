//! Pricing Engine
//!
//! Pure functions mapping `(start price, current supply, amount)` to native
//! currency amounts. Nothing in here touches state.
//!
//! # Curve
//!
//! Marginal price of the unit at 0-based index `i`:
//!
//! ```text
//!   price(i) = start_price + step × i
//!
//!   cost(S, n)    = Σ price(i) for i in S..S+n
//!                 = n × start_price + step × n × (2S + n − 1) / 2
//!   revenue(S, n) = cost(S − n, n)          (top n units of supply)
//! ```
//!
//! `n × (2S + n − 1)` is always even, so the integral is exact. Buying `n`
//! units and selling them back returns exactly the curve cost, which keeps
//! `funds == cost(0, supply)` for every token before seeding.
//!
//! # Fees (basis points of 10_000)
//!
//! | Fee           | Base     | Rounding | Paid by / to                    |
//! |---------------|----------|----------|---------------------------------|
//! | buy tax       | cost     | up       | buyer → fee collector           |
//! | sell tax      | revenue  | up       | deducted from seller payout     |
//! | platform tax  | revenue  | down     | token escrow → fee collector    |
//!
//! Start price and slope are frozen into each token at creation, so quotes
//! take the token's own [`LinearCurve`] rather than the current config.

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::types::{Amount, Wei};
use serde::{Deserialize, Serialize};

/// One curve unit in token base units (18 decimals)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Token decimals for every launched token
pub const TOKEN_DECIMALS: u8 = 18;

/// Basis point denominator
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Price of the first curve unit
pub const INITIAL_PRICE_WEI: u64 = 1_000_000_000_000;

/// Marginal price increase per issued unit
pub const PRICE_STEP_WEI: u64 = 10_000_000;

/// Supply at which liquidity seeding triggers
pub const LP_CAP_INITIAL: u64 = 1_000_000;

pub const BUY_TAX_BPS: u16 = 100;
pub const SELL_TAX_BPS: u16 = 100;
pub const PLATFORM_TAX_BPS: u16 = 50;

const _: () = assert!(BUY_TAX_BPS as u128 <= BPS_DENOMINATOR);
const _: () = assert!(SELL_TAX_BPS as u128 <= BPS_DENOMINATOR);
const _: () = assert!(PLATFORM_TAX_BPS as u128 <= BPS_DENOMINATOR);
const _: () = assert!(WAD == 10u128.pow(TOKEN_DECIMALS as u32));

/// Curve shape and seeding threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Anchor price frozen into each token at creation
    pub initial_price_wei: u64,
    /// Linear slope of the marginal price
    pub price_step_wei: u64,
    /// Cumulative supply that triggers liquidity seeding
    pub lp_cap: u64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            initial_price_wei: INITIAL_PRICE_WEI,
            price_step_wei: PRICE_STEP_WEI,
            lp_cap: LP_CAP_INITIAL,
        }
    }
}

impl CurveParams {
    /// Curve frozen into tokens created under these parameters
    pub fn token_curve(&self) -> LinearCurve {
        LinearCurve {
            start_price: self.initial_price_wei as Wei,
            price_step: self.price_step_wei as Wei,
        }
    }

    pub fn validate(&self) -> LaunchpadResult<()> {
        if self.initial_price_wei == 0 {
            return Err(LaunchpadError::InvalidParameters(
                "initial price must be non-zero".to_string(),
            ));
        }
        if self.lp_cap == 0 {
            return Err(LaunchpadError::InvalidParameters(
                "LP cap must be non-zero".to_string(),
            ));
        }
        // The whole pre-seeding curve and the seeding it ends in must be representable
        let curve = self.token_curve();
        let funds = curve.cost(0, self.lp_cap)?;
        let price = curve.price_at(self.lp_cap)?;
        seeding_token_amount(funds, price)?;
        Ok(())
    }
}

/// Linear price curve of one token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearCurve {
    pub start_price: Wei,
    pub price_step: Wei,
}

impl LinearCurve {
    /// Marginal price of the unit at `index`
    pub fn price_at(&self, index: u64) -> LaunchpadResult<Wei> {
        marginal_price(self.start_price, self.price_step, index)
    }

    /// Cost of units `from..from + amount`
    pub fn cost(&self, from: u64, amount: u64) -> LaunchpadResult<Wei> {
        curve_integral(self.start_price, self.price_step, from, amount)
    }
}

/// Trading taxes in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub buy_tax_bps: u16,
    pub sell_tax_bps: u16,
    pub platform_tax_bps: u16,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            buy_tax_bps: BUY_TAX_BPS,
            sell_tax_bps: SELL_TAX_BPS,
            platform_tax_bps: PLATFORM_TAX_BPS,
        }
    }
}

impl FeeSchedule {
    pub fn validate(&self) -> LaunchpadResult<()> {
        for (name, bps) in [
            ("buy_tax_bps", self.buy_tax_bps),
            ("sell_tax_bps", self.sell_tax_bps),
            ("platform_tax_bps", self.platform_tax_bps),
        ] {
            if bps as u128 >= BPS_DENOMINATOR {
                return Err(LaunchpadError::InvalidParameters(format!(
                    "{} must be below {}, got {}",
                    name, BPS_DENOMINATOR, bps
                )));
            }
        }
        Ok(())
    }
}

/// Result of pricing a buy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyQuote {
    /// Curve integral, retained as token funds
    pub cost: Wei,
    /// Routed to the fee collector
    pub buy_tax: Wei,
    /// `cost + buy_tax`, the minimum payment
    pub total_cost: Wei,
}

/// Result of pricing a sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellQuote {
    /// Curve integral over the top `amount` units
    pub revenue: Wei,
    /// Deducted from the seller's payout
    pub tax: Wei,
    /// Drawn from the token's escrow
    pub platform_tax: Wei,
}

impl SellQuote {
    /// Native currency paid to the seller
    pub fn seller_payout(&self) -> Wei {
        self.revenue - self.tax
    }

    /// Native currency paid to the fee collector
    pub fn fee_collector_payout(&self) -> LaunchpadResult<Wei> {
        self.tax
            .checked_add(self.platform_tax)
            .ok_or(LaunchpadError::ArithmeticOverflow)
    }
}

/// Marginal price of the unit at `index`
pub fn marginal_price(start_price: Wei, step: Wei, index: u64) -> LaunchpadResult<Wei> {
    step.checked_mul(index as u128)
        .and_then(|rise| rise.checked_add(start_price))
        .ok_or(LaunchpadError::ArithmeticOverflow)
}

/// Exact sum of marginal prices for units `from..from + amount`
pub fn curve_integral(start_price: Wei, step: Wei, from: u64, amount: u64) -> LaunchpadResult<Wei> {
    let n = amount as u128;
    let s = from as u128;

    let base = n
        .checked_mul(start_price)
        .ok_or(LaunchpadError::ArithmeticOverflow)?;

    if n == 0 {
        return Ok(0);
    }

    // n × (2S + n − 1) is even for every n
    let span = s
        .checked_mul(2)
        .and_then(|v| v.checked_add(n - 1))
        .and_then(|v| v.checked_mul(n))
        .ok_or(LaunchpadError::ArithmeticOverflow)?;

    let rise = step
        .checked_mul(span / 2)
        .ok_or(LaunchpadError::ArithmeticOverflow)?;

    base.checked_add(rise).ok_or(LaunchpadError::ArithmeticOverflow)
}

/// `floor(value × mul / div)` with a 256-bit intermediate product
///
/// Fails only when the quotient itself does not fit in a `u128`.
pub fn mul_div_floor(value: u128, mul: u128, div: u128) -> LaunchpadResult<u128> {
    if div == 0 {
        return Err(LaunchpadError::ArithmeticOverflow);
    }
    let (hi, lo) = widening_mul(value, mul);
    if hi >= div {
        return Err(LaunchpadError::ArithmeticOverflow);
    }

    // Restoring long division of hi:lo by div, one bit at a time
    let mut rem = hi;
    let mut quotient = 0u128;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= div {
            rem = rem.wrapping_sub(div);
            quotient |= 1;
        }
    }
    Ok(quotient)
}

/// Full 256-bit product as `(high, low)` words
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let cross = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let low = (cross << 64) | (lo_lo & MASK);
    let high = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);
    (high, low)
}

/// Token base units paired with `funds` when seeding at `price` per unit
pub fn seeding_token_amount(funds: Wei, price: Wei) -> LaunchpadResult<Amount> {
    mul_div_floor(funds, WAD, price)
}

fn bps_floor(value: Wei, bps: u16) -> LaunchpadResult<Wei> {
    value
        .checked_mul(bps as u128)
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(LaunchpadError::ArithmeticOverflow)
}

fn bps_ceil(value: Wei, bps: u16) -> LaunchpadResult<Wei> {
    value
        .checked_mul(bps as u128)
        .map(|v| v.div_ceil(BPS_DENOMINATOR))
        .ok_or(LaunchpadError::ArithmeticOverflow)
}

/// Stateless curve and fee calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    fees: FeeSchedule,
}

impl PricingEngine {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Price of the next unit minted at `supply`
    pub fn current_price(&self, curve: &LinearCurve, supply: u64) -> LaunchpadResult<Wei> {
        curve.price_at(supply)
    }

    /// Price `amount` more units starting at `supply`
    pub fn quote_buy(&self, curve: &LinearCurve, supply: u64, amount: u64) -> LaunchpadResult<BuyQuote> {
        if amount == 0 {
            return Err(LaunchpadError::InvalidAmount);
        }

        let cost = curve.cost(supply, amount)?;
        let buy_tax = bps_ceil(cost, self.fees.buy_tax_bps)?;
        let total_cost = cost
            .checked_add(buy_tax)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;

        Ok(BuyQuote {
            cost,
            buy_tax,
            total_cost,
        })
    }

    /// Price removing the top `amount` units of `supply`
    pub fn quote_sell(&self, curve: &LinearCurve, supply: u64, amount: u64) -> LaunchpadResult<SellQuote> {
        if amount == 0 {
            return Err(LaunchpadError::InvalidAmount);
        }
        if amount > supply {
            return Err(LaunchpadError::InsufficientSupply {
                requested: amount,
                available: supply,
            });
        }

        let revenue = curve.cost(supply - amount, amount)?;
        let tax = bps_ceil(revenue, self.fees.sell_tax_bps)?;
        let platform_tax = bps_floor(revenue, self.fees.platform_tax_bps)?;

        Ok(SellQuote {
            revenue,
            tax,
            platform_tax,
        })
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(FeeSchedule::default())
    }
}
