//! Call Context
//!
//! Immutable environment passed to every state-changing launchpad call.
//! Authority is derived from `caller`, never from user-supplied parameters.

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::types::{Address, BlockHeight, Wei};
use serde::{Deserialize, Serialize};

/// Launchpad call environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Account initiating the call
    pub caller: Address,
    /// Native currency attached to the call
    pub value: Wei,
    /// Block height at execution time
    pub block_height: BlockHeight,
    /// Current block timestamp
    pub timestamp: u64,
}

impl CallContext {
    /// Create a context carrying no native value
    pub fn new(caller: Address, block_height: BlockHeight, timestamp: u64) -> Self {
        Self {
            caller,
            value: 0,
            block_height,
            timestamp,
        }
    }

    /// Same context with `value` attached
    pub fn with_value(mut self, value: Wei) -> Self {
        self.value = value;
        self
    }

    /// Fail unless the call carries no native value
    pub fn require_non_payable(&self) -> LaunchpadResult<()> {
        if self.value != 0 {
            return Err(LaunchpadError::NonPayable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_payable_check() {
        let ctx = CallContext::new(Address::new([1u8; 32]), 10, 1_700_000_000);
        assert!(ctx.require_non_payable().is_ok());

        let paid = ctx.with_value(5);
        assert_eq!(paid.value, 5);
        assert_eq!(paid.require_non_payable(), Err(LaunchpadError::NonPayable));
    }
}
