//! Sled-based Ledger Store
//!
//! Durable snapshot of the launchpad ledger: one global record, a token
//! record per launched token, and the creator index.

use std::collections::HashMap;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::TransactionError;
use sled::{Batch, Db, Transactional, Tree};
use tracing::{debug, info};

use crate::errors::{StorageError, StorageResult};
use crate::ledger::{GlobalState, Ledger, TokenRecord};
use crate::types::Address;

// =============================================================================
// TREE NAMES
// =============================================================================
// Changing these orphans existing data.
// =============================================================================

const TREE_GLOBAL: &str = "launchpad_global";
const TREE_RECORDS: &str = "launchpad_records";
const TREE_CREATORS: &str = "launchpad_creators";

const KEY_GLOBAL: &[u8] = b"global";
const KEY_SCHEMA_VERSION: &[u8] = b"schema_version";

/// Current on-disk layout version
///
/// 2: token records carry their own price step and LP cap.
pub const SCHEMA_VERSION: u32 = 2;

/// Sled-backed ledger persistence
pub struct SledLedgerStore {
    db: Db,
    global: Tree,
    records: Tree,
    creators: Tree,
}

impl std::fmt::Debug for SledLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledLedgerStore")
            .field("records", &self.records.len())
            .field("creators", &self.creators.len())
            .finish()
    }
}

impl SledLedgerStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// In-memory store for tests
    pub fn open_temporary() -> StorageResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StorageResult<Self> {
        let global = db.open_tree(TREE_GLOBAL)?;
        let records = db.open_tree(TREE_RECORDS)?;
        let creators = db.open_tree(TREE_CREATORS)?;

        if let Some(version) = global.get(KEY_SCHEMA_VERSION)? {
            let bytes: [u8; 4] = version
                .as_ref()
                .try_into()
                .map_err(|_| StorageError::Corrupted("schema version".to_string()))?;
            let version = u32::from_be_bytes(bytes);
            if version != SCHEMA_VERSION {
                return Err(StorageError::Corrupted(format!(
                    "unsupported schema version {}",
                    version
                )));
            }
        }

        Ok(Self {
            db,
            global,
            records,
            creators,
        })
    }

    pub fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn serialize<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn address_key(bytes: &[u8]) -> StorageResult<Address> {
        let raw: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::Corrupted(format!("bad key length {}", bytes.len())))?;
        Ok(Address::new(raw))
    }

    /// Write the whole ledger in one atomic multi-tree transaction
    pub fn save_ledger(&self, ledger: &Ledger) -> StorageResult<()> {
        let mut global_batch = Batch::default();
        global_batch.insert(KEY_GLOBAL, Self::serialize(ledger.global())?);
        global_batch.insert(KEY_SCHEMA_VERSION, &SCHEMA_VERSION.to_be_bytes()[..]);

        let mut record_batch = Batch::default();
        for record in ledger.records() {
            record_batch.insert(&record.token.as_bytes()[..], Self::serialize(record)?);
        }

        let mut creator_batch = Batch::default();
        for (creator, tokens) in ledger.creators() {
            creator_batch.insert(&creator.as_bytes()[..], Self::serialize(tokens)?);
        }

        (&self.global, &self.records, &self.creators)
            .transaction(|(global, records, creators)| {
                global.apply_batch(&global_batch)?;
                records.apply_batch(&record_batch)?;
                creators.apply_batch(&creator_batch)?;
                Ok(())
            })
            .map_err(|e: TransactionError<()>| match e {
                TransactionError::Storage(e) => StorageError::Database(e),
                TransactionError::Abort(()) => StorageError::Corrupted("save aborted".to_string()),
            })?;

        self.flush()?;
        debug!("saved ledger with {} tokens", ledger.total_count());
        Ok(())
    }

    /// Load the persisted ledger, or `None` if nothing was saved yet
    pub fn load_ledger(&self) -> StorageResult<Option<Ledger>> {
        let global: GlobalState = match self.global.get(KEY_GLOBAL)? {
            Some(bytes) => Self::deserialize(&bytes)?,
            None => return Ok(None),
        };

        let mut tokens = HashMap::new();
        for entry in self.records.iter() {
            let (key, value) = entry?;
            let token = Self::address_key(&key)?;
            let record: TokenRecord = Self::deserialize(&value)?;
            if record.token != token {
                return Err(StorageError::Corrupted(format!(
                    "record under {} belongs to {}",
                    token, record.token
                )));
            }
            tokens.insert(token, record);
        }

        let mut creators = HashMap::new();
        for entry in self.creators.iter() {
            let (key, value) = entry?;
            let creator = Self::address_key(&key)?;
            let list: Vec<Address> = Self::deserialize(&value)?;
            creators.insert(creator, list);
        }

        info!("Loaded ledger: {} tokens, {} creators", tokens.len(), creators.len());
        Ok(Some(Ledger::from_parts(global, tokens, creators)))
    }
}
