//! Ledger key-value collaborator.
//!
//! The surrounding host owns persistence, ordering, and retry policy; the
//! contract core only reads and writes opaque bytes under fixed keys, one
//! synchronous call at a time.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors propagated from the storage collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("no value stored under key '{0}'")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Synchronous key-value access to the host ledger.
pub trait Ledger {
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}

/// In-memory ledger used by tests and the stdin drivers.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
