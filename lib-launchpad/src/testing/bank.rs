//! In-memory native currency ledger

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::errors::TransferError;
use crate::types::{Address, Wei};

/// Native balances with per-account receive rejection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBank {
    balances: HashMap<Address, Wei>,
    /// Accounts whose incoming transfers revert
    rejecting: HashSet<Address>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Create `amount` out of thin air for `account`
    pub fn fund(&mut self, account: &Address, amount: Wei) -> Result<(), TransferError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert(*account, balance);
        Ok(())
    }

    pub fn reject_incoming(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    pub fn accept_incoming(&mut self, account: &Address) {
        self.rejecting.remove(account);
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }
        if self.rejecting.contains(to) {
            return Err(TransferError::Rejected(*to));
        }

        let have = self.balance_of(from);
        let from_balance = have.checked_sub(amount).ok_or(TransferError::InsufficientFunds {
            account: *from,
            have,
            need: amount,
        })?;

        if from == to {
            return Ok(());
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.balances.insert(*from, from_balance);
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    /// Sum of all balances
    pub fn total(&self) -> Wei {
        self.balances.values().sum()
    }
}
