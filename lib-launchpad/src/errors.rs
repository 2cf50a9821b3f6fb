//! Launchpad Errors

use crate::types::{Address, Amount, Wei};
use thiserror::Error;

/// Error aborting a launchpad transaction
///
/// Every variant is a synchronous, non-retryable failure. The transaction that
/// produced it is rolled back in full before the error reaches the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    #[error("Wrong creation fee: expected {expected}, sent {sent}")]
    WrongCreationFee { expected: Wei, sent: Wei },

    #[error("Unknown token: {0}")]
    UnknownToken(Address),

    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply { requested: u64, available: u64 },

    #[error("Insufficient payment: required {required}, sent {sent}")]
    InsufficientPayment { required: Wei, sent: Wei },

    #[error("Insufficient escrow: required {required}, available {available}")]
    InsufficientEscrow { required: Wei, available: Wei },

    #[error("Allowance exceeded: allowed {allowed}, requested {requested}")]
    AllowanceExceeded { allowed: Amount, requested: Amount },

    #[error("Liquidity not seeded")]
    LpNotSeeded,

    #[error("Caller is not the owner")]
    NotOwner,

    #[error("Bonding curve retired after liquidity seeding")]
    CurveRetired,

    #[error("Operation does not accept native value")]
    NonPayable,

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Native transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Token collaborator failed: {0}")]
    Token(TokenError),

    #[error("Liquidity venue failed: {0}")]
    Venue(#[from] VenueError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<TokenError> for LaunchpadError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::AllowanceExceeded { allowed, requested } => {
                LaunchpadError::AllowanceExceeded { allowed, requested }
            }
            other => LaunchpadError::Token(other),
        }
    }
}

impl From<StorageError> for LaunchpadError {
    fn from(err: StorageError) -> Self {
        LaunchpadError::Storage(err.to_string())
    }
}

/// Result type for launchpad operations
pub type LaunchpadResult<T> = Result<T, LaunchpadError>;

/// Native currency transfer failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds in {account}: have {have}, need {need}")]
    InsufficientFunds { account: Address, have: Wei, need: Wei },

    #[error("Receiver {0} rejected the transfer")]
    Rejected(Address),

    #[error("Balance overflow")]
    Overflow,
}

/// Token collaborator failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token not found: {0}")]
    TokenNotFound(Address),

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Allowance exceeded: allowed {allowed}, requested {requested}")]
    AllowanceExceeded { allowed: Amount, requested: Amount },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Liquidity venue failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("Pool already exists")]
    PoolExists,

    #[error("Pool not found")]
    PoolNotFound,

    #[error("Pool already initialized")]
    AlreadyInitialized,

    #[error("Pool not initialized")]
    NotInitialized,

    #[error("Invalid pool pair: {0}")]
    InvalidPair(String),

    #[error("Invalid liquidity amounts")]
    InvalidAmounts,

    #[error("Provider funding failed: {0}")]
    Funding(String),
}

/// Configuration loading or validation failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Persistent store failure
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Corrupted entry: {0}")]
    Corrupted(String),
}

/// Result type for persistence operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowance_error_surfaces_top_level() {
        let err: LaunchpadError = TokenError::AllowanceExceeded {
            allowed: 0,
            requested: 10,
        }
        .into();
        assert_eq!(
            err,
            LaunchpadError::AllowanceExceeded {
                allowed: 0,
                requested: 10
            }
        );
    }

    #[test]
    fn test_other_token_errors_wrapped() {
        let err: LaunchpadError = TokenError::Overflow.into();
        assert!(matches!(err, LaunchpadError::Token(TokenError::Overflow)));
    }

    #[test]
    fn test_error_display() {
        let err = LaunchpadError::WrongCreationFee {
            expected: 10,
            sent: 11,
        };
        assert_eq!(err.to_string(), "Wrong creation fee: expected 10, sent 11");
    }
}
