//! Launchpad Events
//!
//! Every committed state change emits an event. Events from a rolled-back
//! transaction are discarded with it.

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, BlockHeight, PoolId, Wei};

/// Launchpad events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LaunchpadEvent {
    /// New token deployed and registered
    TokenCreated {
        creator: Address,
        token: Address,
    },

    /// Units bought from the curve
    TokensPurchased {
        buyer: Address,
        token: Address,
        /// Curve units minted
        amount: u64,
        /// Curve integral retained as funds
        cost: Wei,
        /// Buy tax sent to the fee collector
        tax: Wei,
    },

    /// Units sold back to the curve
    TokensSold {
        seller: Address,
        token: Address,
        amount: u64,
        revenue: Wei,
        tax: Wei,
        /// Drawn from escrow
        platform_tax: Wei,
    },

    /// Escrow topped up
    EscrowTopped {
        token: Address,
        from: Address,
        amount: Wei,
    },

    /// Residual escrow withdrawn after seeding
    EscrowWithdrawn {
        token: Address,
        to: Address,
        amount: Wei,
    },

    /// Funds migrated into an AMM position
    LiquiditySeeded {
        token: Address,
        pool: PoolId,
        native_amount: Wei,
        token_amount: Amount,
        position_id: u64,
    },

    CreationFeeUpdated {
        old: Wei,
        new: Wei,
    },

    OwnershipTransferred {
        old: Address,
        new: Address,
    },

    FeeCollectorUpdated {
        old: Address,
        new: Address,
    },

    LpCollectorUpdated {
        old: Address,
        new: Address,
    },
}

impl LaunchpadEvent {
    /// Token this event concerns, if any
    pub fn token(&self) -> Option<&Address> {
        match self {
            LaunchpadEvent::TokenCreated { token, .. } => Some(token),
            LaunchpadEvent::TokensPurchased { token, .. } => Some(token),
            LaunchpadEvent::TokensSold { token, .. } => Some(token),
            LaunchpadEvent::EscrowTopped { token, .. } => Some(token),
            LaunchpadEvent::EscrowWithdrawn { token, .. } => Some(token),
            LaunchpadEvent::LiquiditySeeded { token, .. } => Some(token),
            LaunchpadEvent::CreationFeeUpdated { .. }
            | LaunchpadEvent::OwnershipTransferred { .. }
            | LaunchpadEvent::FeeCollectorUpdated { .. }
            | LaunchpadEvent::LpCollectorUpdated { .. } => None,
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            LaunchpadEvent::TokenCreated { .. } => "token_created",
            LaunchpadEvent::TokensPurchased { .. } => "tokens_purchased",
            LaunchpadEvent::TokensSold { .. } => "tokens_sold",
            LaunchpadEvent::EscrowTopped { .. } => "escrow_topped",
            LaunchpadEvent::EscrowWithdrawn { .. } => "escrow_withdrawn",
            LaunchpadEvent::LiquiditySeeded { .. } => "liquidity_seeded",
            LaunchpadEvent::CreationFeeUpdated { .. } => "creation_fee_updated",
            LaunchpadEvent::OwnershipTransferred { .. } => "ownership_transferred",
            LaunchpadEvent::FeeCollectorUpdated { .. } => "fee_collector_updated",
            LaunchpadEvent::LpCollectorUpdated { .. } => "lp_collector_updated",
        }
    }
}

/// Event stamped with the block that committed it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub block_height: BlockHeight,
    pub timestamp: u64,
    pub event: LaunchpadEvent,
}

impl EventRecord {
    pub fn token(&self) -> Option<&Address> {
        self.event.token()
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

/// Event indexer interface
///
/// Implement this to index launchpad events for queries.
pub trait EventIndexer {
    /// Index a new event
    fn index_event(&mut self, record: EventRecord);

    /// Get all events for a token in commit order
    fn get_token_events(&self, token: &Address) -> Vec<EventRecord>;

    /// Get events of one type for a token
    fn get_token_events_by_type(&self, token: &Address, event_type: &str) -> Vec<EventRecord>;

    /// Get events in an inclusive block range
    fn get_events_in_range(&self, start_block: BlockHeight, end_block: BlockHeight) -> Vec<EventRecord>;

    /// Get latest event for a token
    fn get_latest_event(&self, token: &Address) -> Option<EventRecord> {
        self.get_token_events(token).pop()
    }

    fn get_purchase_events(&self, token: &Address) -> Vec<EventRecord> {
        self.get_token_events_by_type(token, "tokens_purchased")
    }

    fn get_sale_events(&self, token: &Address) -> Vec<EventRecord> {
        self.get_token_events_by_type(token, "tokens_sold")
    }
}

/// In-memory event indexer for testing
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventIndexer {
    events: Vec<EventRecord>,
}

impl InMemoryEventIndexer {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventIndexer for InMemoryEventIndexer {
    fn index_event(&mut self, record: EventRecord) {
        self.events.push(record);
    }

    fn get_token_events(&self, token: &Address) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|e| e.token() == Some(token))
            .cloned()
            .collect()
    }

    fn get_token_events_by_type(&self, token: &Address, event_type: &str) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|e| e.token() == Some(token) && e.event_type() == event_type)
            .cloned()
            .collect()
    }

    fn get_events_in_range(&self, start_block: BlockHeight, end_block: BlockHeight) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|e| e.block_height >= start_block && e.block_height <= end_block)
            .cloned()
            .collect()
    }
}
