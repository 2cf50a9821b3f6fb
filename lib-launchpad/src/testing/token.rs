//! In-memory ERC20-style token
//!
//! Balances, allowances, minter-gated minting and allowance-checked burns.
//! Supply conservation: `total_supply == Σ balances` after every operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::TokenError;
use crate::pricing::TOKEN_DECIMALS;
use crate::types::{Address, Amount};

/// Deployed token instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Only account allowed to mint
    minter: Address,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    /// (owner, spender) → remaining allowance
    allowances: HashMap<(Address, Address), Amount>,
}

impl MemoryToken {
    pub fn new(name: &str, symbol: &str, minter: Address) -> Result<Self, TokenError> {
        if name.is_empty() || symbol.is_empty() {
            return Err(TokenError::InvalidMetadata(
                "name and symbol are required".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: TOKEN_DECIMALS,
            minter,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        })
    }

    pub fn minter(&self) -> &Address {
        &self.minter
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Set `spender`'s allowance over `owner`'s balance
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances.insert((*owner, *spender), amount);
    }

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if caller != &self.minter {
            return Err(TokenError::Unauthorized(format!(
                "{} is not the minter",
                caller
            )));
        }

        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.total_supply = total_supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let have = self.balance_of(from);
        let from_balance = have
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance { have, need: amount })?;

        if from == to {
            return Ok(());
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, from_balance);
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    /// Burn `amount` from `holder`, spending `spender`'s allowance
    pub fn burn_from(&mut self, spender: &Address, holder: &Address, amount: Amount) -> Result<(), TokenError> {
        let allowed = self.allowance(holder, spender);
        if allowed < amount {
            return Err(TokenError::AllowanceExceeded {
                allowed,
                requested: amount,
            });
        }

        let have = self.balance_of(holder);
        let balance = have
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance { have, need: amount })?;

        self.allowances.insert((*holder, *spender), allowed - amount);
        self.balances.insert(*holder, balance);
        self.total_supply -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(id: u8) -> Address {
        Address::new([id; 32])
    }

    #[test]
    fn test_mint_requires_minter() {
        let mut token = MemoryToken::new("Moon", "MOON", addr(1)).unwrap();
        assert!(matches!(
            token.mint(&addr(2), &addr(2), 10),
            Err(TokenError::Unauthorized(_))
        ));

        token.mint(&addr(1), &addr(2), 10).unwrap();
        assert_eq!(token.balance_of(&addr(2)), 10);
        assert_eq!(token.total_supply(), 10);
        assert_eq!(token.decimals, 18);
    }

    #[test]
    fn test_burn_from_spends_allowance() {
        let mut token = MemoryToken::new("Moon", "MOON", addr(1)).unwrap();
        token.mint(&addr(1), &addr(2), 100).unwrap();

        assert_eq!(
            token.burn_from(&addr(1), &addr(2), 10),
            Err(TokenError::AllowanceExceeded {
                allowed: 0,
                requested: 10
            })
        );

        token.approve(&addr(2), &addr(1), 30);
        token.burn_from(&addr(1), &addr(2), 25).unwrap();
        assert_eq!(token.balance_of(&addr(2)), 75);
        assert_eq!(token.allowance(&addr(2), &addr(1)), 5);
        assert_eq!(token.total_supply(), 75);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut token = MemoryToken::new("Moon", "MOON", addr(1)).unwrap();
        token.mint(&addr(1), &addr(2), 5).unwrap();

        assert_eq!(
            token.transfer(&addr(2), &addr(3), 6),
            Err(TokenError::InsufficientBalance { have: 5, need: 6 })
        );
        token.transfer(&addr(2), &addr(3), 5).unwrap();
        assert_eq!(token.balance_of(&addr(3)), 5);
    }
}
