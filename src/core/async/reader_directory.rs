//! Thread-safe reader directory
//!
//! Concurrent twin of [`crate::core::ReaderDirectory`], reduced to what
//! the concurrent pipeline needs: seeding and existence checks. Open-loan
//! counts live in the ledger, never here.

use crate::types::{CirculationError, Reader, ReaderId};
use dashmap::DashMap;

/// Concurrent reader directory
#[derive(Debug, Default)]
pub struct AsyncReaderDirectory {
    /// Concurrent map of reader IDs to reader records
    readers: DashMap<ReaderId, Reader>,
}

impl AsyncReaderDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reader and return the created record
    ///
    /// An email already carried by a different reader is rejected.
    pub fn add_reader(&self, reader: Reader) -> Result<Reader, CirculationError> {
        let taken = self
            .readers
            .iter()
            .any(|entry| entry.id != reader.id && entry.email == reader.email);
        if taken {
            return Err(CirculationError::duplicate_email(&reader.email));
        }
        self.readers.insert(reader.id, reader.clone());
        Ok(reader)
    }

    /// Whether a reader ID is registered
    pub fn contains(&self, id: ReaderId) -> bool {
        self.readers.contains_key(&id)
    }
}
