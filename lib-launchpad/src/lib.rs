//! Bonding-Curve Token Launchpad
//!
//! Anyone can launch a token priced by a linear bonding curve. Buyers and
//! sellers trade directly against the curve; once cumulative supply reaches
//! the LP cap, the accumulated principal is migrated into a permanent AMM
//! liquidity position and the curve retires.
//!
//! # Architecture
//!
//! ```text
//!   CallContext ──▶ Launchpad (trade controller, admin, seeder)
//!                     │
//!                     ├── PricingEngine   pure cost / revenue / fees
//!                     ├── Ledger          token records + global totals
//!                     ├── Host            native bank, token factory, AMM venue
//!                     └── events          committed log → EventIndexer
//! ```
//!
//! Every public operation is all-or-nothing: on error the ledger, the event
//! log and the host are restored to their state before the call.

pub mod admin;
pub mod config;
pub mod context;
pub mod errors;
pub mod event_indexer;
pub mod events;
pub mod host;
pub mod invariants;
pub mod launchpad;
pub mod ledger;
pub mod pricing;
pub mod seeder;
pub mod storage;
pub mod testing;
pub mod types;

pub use config::LaunchpadConfig;
pub use context::CallContext;
pub use errors::{
    ConfigError, LaunchpadError, LaunchpadResult, StorageError, TokenError, TransferError, VenueError,
};
pub use event_indexer::SledEventIndexer;
pub use events::{EventIndexer, EventRecord, InMemoryEventIndexer, LaunchpadEvent};
pub use host::{
    Host, Journal, LiquidityVenue, NativeBank, PositionAmounts, PositionReceipt, StartingPrice, TokenFactory,
};
pub use invariants::{InvariantViolation, LedgerInvariant};
pub use launchpad::{AccountingSnapshot, Launchpad};
pub use ledger::{GlobalState, Ledger, LedgerStats, TokenRecord};
pub use pricing::{BuyQuote, CurveParams, FeeSchedule, LinearCurve, PricingEngine, SellQuote, WAD};
pub use storage::SledLedgerStore;
pub use types::{Address, Amount, PoolId, SeedingState, Wei};
