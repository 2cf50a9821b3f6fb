//! In-memory host for tests and simulations
//!
//! `MemoryHost` implements every collaborator trait without a chain: a native
//! balance book, one `MemoryToken` per deployed token, and a `MemoryVenue`.
//! Checkpoints are full clones.

pub mod bank;
pub mod token;
pub mod venue;

pub use bank::MemoryBank;
pub use token::MemoryToken;
pub use venue::{MemoryPool, MemoryPosition, MemoryVenue};

use std::collections::HashMap;

use crate::errors::{TokenError, TransferError, VenueError};
use crate::host::{
    Journal, LiquidityVenue, NativeBank, PositionAmounts, PositionReceipt, StartingPrice, TokenFactory,
};
use crate::types::{Address, Amount, PoolId, Wei};

const TOKEN_DOMAIN: &[u8] = b"LAUNCHPAD_MEMORY_TOKEN_V1";

/// Chain-free implementation of every collaborator
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    bank: MemoryBank,
    tokens: HashMap<Address, MemoryToken>,
    venue: MemoryVenue,
    deploy_nonce: u64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit native currency to `account`
    pub fn fund(&mut self, account: &Address, amount: Wei) -> Result<(), TransferError> {
        self.bank.fund(account, amount)
    }

    /// Approve `spender` to pull `amount` base units of `token` from `owner`
    pub fn approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError> {
        self.token_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }

    /// Make every native transfer to `account` fail
    pub fn reject_native_to(&mut self, account: Address) {
        self.bank.reject_incoming(account);
    }

    pub fn accept_native_to(&mut self, account: &Address) {
        self.bank.accept_incoming(account);
    }

    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    pub fn token(&self, token: &Address) -> Option<&MemoryToken> {
        self.tokens.get(token)
    }

    pub fn venue(&self) -> &MemoryVenue {
        &self.venue
    }

    fn token_mut(&mut self, token: &Address) -> Result<&mut MemoryToken, TokenError> {
        self.tokens
            .get_mut(token)
            .ok_or(TokenError::TokenNotFound(*token))
    }
}

impl NativeBank for MemoryHost {
    fn native_balance(&self, account: &Address) -> Wei {
        self.bank.balance_of(account)
    }

    fn transfer_native(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), TransferError> {
        self.bank.transfer(from, to, amount)
    }
}

impl TokenFactory for MemoryHost {
    fn deploy_token(&mut self, name: &str, symbol: &str, minter: &Address) -> Result<Address, TokenError> {
        let token = MemoryToken::new(name, symbol, *minter)?;
        let address = Address::derive(TOKEN_DOMAIN, &self.deploy_nonce.to_be_bytes());
        self.deploy_nonce += 1;
        self.tokens.insert(address, token);
        Ok(address)
    }

    fn mint(&mut self, token: &Address, minter: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.token_mut(token)?.mint(minter, to, amount)
    }

    fn burn_from(
        &mut self,
        token: &Address,
        spender: &Address,
        holder: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.token_mut(token)?.burn_from(spender, holder, amount)
    }

    fn token_balance(&self, token: &Address, holder: &Address) -> Result<Amount, TokenError> {
        self.tokens
            .get(token)
            .map(|t| t.balance_of(holder))
            .ok_or(TokenError::TokenNotFound(*token))
    }

    fn decimals(&self, token: &Address) -> Result<u8, TokenError> {
        self.tokens
            .get(token)
            .map(|t| t.decimals)
            .ok_or(TokenError::TokenNotFound(*token))
    }
}

impl LiquidityVenue for MemoryHost {
    fn wrapped_native(&self) -> Address {
        self.venue.wrapped_native()
    }

    fn create_pool(&mut self, token_a: &Address, token_b: &Address, fee_tier: u32) -> Result<PoolId, VenueError> {
        self.venue.create_pool(token_a, token_b, fee_tier)
    }

    fn initialize_pool(&mut self, pool: &PoolId, price: StartingPrice) -> Result<(), VenueError> {
        self.venue.initialize_pool(pool, price)
    }

    fn mint_position(
        &mut self,
        pool: &PoolId,
        provider: &Address,
        amounts: PositionAmounts,
        recipient: &Address,
    ) -> Result<PositionReceipt, VenueError> {
        let launched = {
            let entry = self.venue.pool(pool).ok_or(VenueError::PoolNotFound)?;
            let wrapped = self.venue.wrapped_native();
            if entry.token0 == wrapped {
                entry.token1
            } else {
                entry.token0
            }
        };
        let custody = *self.venue.custody();

        self.bank
            .transfer(provider, &custody, amounts.native_amount)
            .map_err(|e| VenueError::Funding(e.to_string()))?;
        self.token_mut(&launched)
            .and_then(|t| t.transfer(provider, &custody, amounts.token_amount))
            .map_err(|e| VenueError::Funding(e.to_string()))?;

        self.venue.record_position(pool, amounts, recipient)
    }
}

impl Journal for MemoryHost {
    type Checkpoint = MemoryHost;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.clone()
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        *self = checkpoint;
    }
}
