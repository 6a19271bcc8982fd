// MarketStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - The market ledger snapshot
// - Individual asset records
// - Royalty vault and creator balances

use crate::market::{AccountId, AssetId, AssetRecord, MarketError, MarketLedger};
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const LEDGER_STATE: &[u8] = b"market:ledger_state";
    pub const ASSET_PREFIX: &[u8] = b"market:asset:";
    pub const VAULT_PREFIX: &[u8] = b"market:vault:";
    pub const CREATOR_PREFIX: &[u8] = b"market:creator:";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent key-value store for market data
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct MarketStore {
    db: sled::Db,
}

impl MarketStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // RAW KEY-VALUE OPERATIONS
    // ========================================================================

    /// Put raw bytes
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Get raw bytes
    pub fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    /// Delete a key
    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    /// List all keys with a given prefix
    pub fn list_keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut keys = Vec::new();
        for result in self.db.scan_prefix(prefix) {
            let (key, _) = result?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    // ========================================================================
    // LEDGER SNAPSHOT PERSISTENCE
    // ========================================================================

    /// Save the full ledger state
    pub fn save_ledger(&self, ledger: &MarketLedger) -> Result<(), StoreError> {
        let bytes = ledger.to_bytes();
        self.put_raw(keys::LEDGER_STATE, &bytes)
    }

    /// Load the full ledger state
    pub fn load_ledger(&self) -> Result<Option<MarketLedger>, StoreError> {
        match self.get_raw(keys::LEDGER_STATE)? {
            Some(bytes) => {
                let ledger = MarketLedger::from_bytes(&bytes)
                    .map_err(|e: MarketError| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(ledger))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // PER-ASSET PERSISTENCE
    // ========================================================================

    /// Save one asset record under its own key
    pub fn save_asset(&self, asset_id: AssetId, record: &AssetRecord) -> Result<(), StoreError> {
        let key = [keys::ASSET_PREFIX, &asset_id.value().to_be_bytes()].concat();
        let bytes = postcard::to_allocvec(record)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.put_raw(&key, &bytes)
    }

    /// Load one asset record
    pub fn load_asset(&self, asset_id: AssetId) -> Result<Option<AssetRecord>, StoreError> {
        let key = [keys::ASSET_PREFIX, &asset_id.value().to_be_bytes()].concat();
        match self.get_raw(&key)? {
            Some(bytes) => {
                let record = postcard::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Save the royalty vault balance for an asset
    pub fn save_vault_balance(&self, asset_id: AssetId, balance: u64) -> Result<(), StoreError> {
        let key = [keys::VAULT_PREFIX, &asset_id.value().to_be_bytes()].concat();
        self.put_raw(&key, &balance.to_be_bytes())
    }

    /// Load the royalty vault balance for an asset
    pub fn load_vault_balance(&self, asset_id: AssetId) -> Result<Option<u64>, StoreError> {
        let key = [keys::VAULT_PREFIX, &asset_id.value().to_be_bytes()].concat();
        match self.get_raw(&key)? {
            Some(bytes) => {
                if bytes.len() != 8 {
                    return Err(StoreError::DeserializationFailed(
                        "Invalid balance length".to_string(),
                    ));
                }
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(Some(u64::from_be_bytes(arr)))
            }
            None => Ok(None),
        }
    }

    /// Save a creator's accumulated earnings
    pub fn save_creator_balance(&self, creator: &AccountId, balance: u64) -> Result<(), StoreError> {
        let key = [keys::CREATOR_PREFIX, creator.as_bytes().as_slice()].concat();
        self.put_raw(&key, &balance.to_be_bytes())
    }

    /// Load a creator's accumulated earnings
    pub fn load_creator_balance(&self, creator: &AccountId) -> Result<Option<u64>, StoreError> {
        let key = [keys::CREATOR_PREFIX, creator.as_bytes().as_slice()].concat();
        match self.get_raw(&key)? {
            Some(bytes) => {
                if bytes.len() != 8 {
                    return Err(StoreError::DeserializationFailed(
                        "Invalid balance length".to_string(),
                    ));
                }
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(Some(u64::from_be_bytes(arr)))
            }
            None => Ok(None),
        }
    }
}
