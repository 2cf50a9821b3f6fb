//! Collaborator Capability Traits
//!
//! The launchpad never talks to a concrete runtime. Native currency, token
//! contracts and the AMM are reached through these narrow interfaces, and a
//! `Journal` lets collaborator side effects join the launchpad's
//! all-or-nothing transactions.

use crate::errors::{TokenError, TransferError, VenueError};
use crate::types::{Address, Amount, PoolId, Wei};
use serde::{Deserialize, Serialize};

/// Native currency ledger
pub trait NativeBank {
    /// Native balance held by `account`
    fn native_balance(&self, account: &Address) -> Wei;

    /// Move `amount` from `from` to `to`
    ///
    /// A zero amount succeeds without touching balances. The receiver may
    /// reject the transfer.
    fn transfer_native(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), TransferError>;
}

/// Token deployment and ERC20-style token operations
pub trait TokenFactory {
    /// Deploy a new token whose only minter is `minter`
    fn deploy_token(&mut self, name: &str, symbol: &str, minter: &Address) -> Result<Address, TokenError>;

    /// Mint `amount` base units to `to` (caller must be the minter)
    fn mint(&mut self, token: &Address, minter: &Address, to: &Address, amount: Amount) -> Result<(), TokenError>;

    /// Burn `amount` base units from `holder` using `spender`'s allowance
    fn burn_from(
        &mut self,
        token: &Address,
        spender: &Address,
        holder: &Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    fn token_balance(&self, token: &Address, holder: &Address) -> Result<Amount, TokenError>;

    fn decimals(&self, token: &Address) -> Result<u8, TokenError>;
}

/// Initial pool price: native currency per whole token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingPrice {
    pub wei_per_token: Wei,
}

/// Liquidity supplied to a new position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAmounts {
    /// Launched token base units
    pub token_amount: Amount,
    /// Native currency, wrapped by the venue
    pub native_amount: Wei,
}

/// Minted position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionReceipt {
    pub position_id: u64,
    pub liquidity: u128,
    pub token_amount: Amount,
    pub native_amount: Wei,
}

/// AMM factory, pool and position manager
pub trait LiquidityVenue {
    /// Wrapped-native token the venue pairs launched tokens against
    fn wrapped_native(&self) -> Address;

    fn create_pool(&mut self, token_a: &Address, token_b: &Address, fee_tier: u32) -> Result<PoolId, VenueError>;

    fn initialize_pool(&mut self, pool: &PoolId, price: StartingPrice) -> Result<(), VenueError>;

    /// Pull `amounts` from `provider` into a new position owned by `recipient`
    fn mint_position(
        &mut self,
        pool: &PoolId,
        provider: &Address,
        amounts: PositionAmounts,
        recipient: &Address,
    ) -> Result<PositionReceipt, VenueError>;
}

/// Checkpoint/rollback of collaborator state
pub trait Journal {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

/// Everything the launchpad needs from its execution environment
pub trait Host: NativeBank + TokenFactory + LiquidityVenue + Journal {}

impl<T> Host for T where T: NativeBank + TokenFactory + LiquidityVenue + Journal {}
