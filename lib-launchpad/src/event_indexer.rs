//! Sled-backed Persistent Event Indexer
//!
//! Key layout:
//!
//! ```text
//!   events       <seq:be64>                                → bincode(EventRecord)
//!   token_idx    <token:32><seq:be64>                      → <seq:be64>
//!   block_idx    <height:be64><seq:be64>                   → <seq:be64>
//!   type_idx     <event_type>/<seq:be64>                   → <seq:be64>
//!   meta         "counter"                                 → <next seq:be64>
//! ```
//!
//! Big-endian sequence and height prefixes keep sled's lexicographic order
//! equal to commit order, so range scans are exact.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::StorageResult;
use crate::events::{EventIndexer, EventRecord};
use crate::types::{Address, BlockHeight};

const TREE_EVENTS: &str = "launchpad_events";
const TREE_TOKEN_INDEX: &str = "lp_events_token_idx";
const TREE_BLOCK_INDEX: &str = "lp_events_block_idx";
const TREE_TYPE_INDEX: &str = "lp_events_type_idx";
const TREE_META: &str = "lp_events_meta";
const KEY_COUNTER: &str = "counter";

/// Sled-backed persistent event indexer
#[derive(Debug)]
pub struct SledEventIndexer {
    events: sled::Tree,
    token_index: sled::Tree,
    block_index: sled::Tree,
    type_index: sled::Tree,
    meta: sled::Tree,
    event_counter: AtomicU64,
}

impl SledEventIndexer {
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> StorageResult<Self> {
        let events = db.open_tree(TREE_EVENTS)?;
        let token_index = db.open_tree(TREE_TOKEN_INDEX)?;
        let block_index = db.open_tree(TREE_BLOCK_INDEX)?;
        let type_index = db.open_tree(TREE_TYPE_INDEX)?;
        let meta = db.open_tree(TREE_META)?;

        let counter = meta
            .get(KEY_COUNTER)?
            .map(|v| {
                let bytes: [u8; 8] = v.as_ref().try_into().unwrap_or([0u8; 8]);
                u64::from_be_bytes(bytes)
            })
            .unwrap_or(0);

        Ok(Self {
            events,
            token_index,
            block_index,
            type_index,
            meta,
            event_counter: AtomicU64::new(counter),
        })
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn flush(&self) -> StorageResult<()> {
        self.events.flush()?;
        self.token_index.flush()?;
        self.block_index.flush()?;
        self.type_index.flush()?;
        self.meta.flush()?;
        Ok(())
    }

    /// Persist one event and its index entries
    pub fn try_index(&self, record: &EventRecord) -> StorageResult<u64> {
        let serialized = bincode::serialize(record)?;
        let seq = self.event_counter.fetch_add(1, Ordering::SeqCst);
        let seq_key = seq.to_be_bytes();

        self.events.insert(seq_key, serialized)?;
        self.meta.insert(KEY_COUNTER, &(seq + 1).to_be_bytes()[..])?;

        if let Some(token) = record.token() {
            self.token_index.insert(token_key(token, seq), &seq_key[..])?;
        }

        let mut block_key = Vec::with_capacity(16);
        block_key.extend_from_slice(&record.block_height.to_be_bytes());
        block_key.extend_from_slice(&seq_key);
        self.block_index.insert(block_key, &seq_key[..])?;

        let mut type_key = format!("{}/", record.event_type()).into_bytes();
        type_key.extend_from_slice(&seq_key);
        self.type_index.insert(type_key, &seq_key[..])?;

        Ok(seq)
    }

    fn load(&self, seq_key: &[u8]) -> Option<EventRecord> {
        match self.events.get(seq_key) {
            Ok(Some(data)) => match bincode::deserialize::<EventRecord>(&data) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::error!("Failed to decode event {}: {}", hex::encode(seq_key), e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Failed to read event {}: {}", hex::encode(seq_key), e);
                None
            }
        }
    }

    fn collect<I>(&self, iter: I, what: &str) -> Vec<EventRecord>
    where
        I: Iterator<Item = sled::Result<(sled::IVec, sled::IVec)>>,
    {
        let mut events = Vec::new();
        for result in iter {
            match result {
                Ok((_, seq_key)) => {
                    if let Some(record) = self.load(&seq_key) {
                        events.push(record);
                    }
                }
                Err(e) => {
                    tracing::error!("Error reading {} index: {}", what, e);
                }
            }
        }
        events
    }
}

fn token_key(token: &Address, seq: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(40);
    key.extend_from_slice(token.as_bytes());
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

impl EventIndexer for SledEventIndexer {
    fn index_event(&mut self, record: EventRecord) {
        if let Err(e) = self.try_index(&record) {
            tracing::error!("Failed to index {} event: {}", record.event_type(), e);
        }
    }

    fn get_token_events(&self, token: &Address) -> Vec<EventRecord> {
        self.collect(self.token_index.scan_prefix(token.as_bytes()), "token")
    }

    fn get_token_events_by_type(&self, token: &Address, event_type: &str) -> Vec<EventRecord> {
        let prefix = format!("{}/", event_type);
        self.collect(self.type_index.scan_prefix(prefix.as_bytes()), "type")
            .into_iter()
            .filter(|e| e.token() == Some(token))
            .collect()
    }

    fn get_events_in_range(&self, start_block: BlockHeight, end_block: BlockHeight) -> Vec<EventRecord> {
        if start_block > end_block {
            return Vec::new();
        }
        let start = start_block.to_be_bytes();
        let mut end = end_block.to_be_bytes().to_vec();
        end.extend_from_slice(&u64::MAX.to_be_bytes());
        self.collect(self.block_index.range(start.to_vec()..=end), "block")
    }
}
