//! Registered reader store
//!
//! Plain record management for readers. A reader's open-loan count is not
//! kept here; it is derived from the loan ledger at the point of use.

use crate::types::{CirculationError, Reader, ReaderId};
use std::collections::HashMap;

/// In-memory reader directory
pub struct ReaderDirectory {
    /// Map of reader IDs to reader records
    readers: HashMap<ReaderId, Reader>,
}

impl ReaderDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        ReaderDirectory {
            readers: HashMap::new(),
        }
    }

    /// Add a reader and return the created record
    ///
    /// An email already carried by a different reader is rejected.
    pub fn add_reader(&mut self, reader: Reader) -> Result<Reader, CirculationError> {
        self.check_email(&reader)?;
        self.readers.insert(reader.id, reader.clone());
        Ok(reader)
    }

    /// Get a reader by ID
    pub fn reader(&self, id: ReaderId) -> Option<&Reader> {
        self.readers.get(&id)
    }

    /// Get all readers sorted by ID
    pub fn readers(&self) -> Vec<&Reader> {
        let mut readers: Vec<&Reader> = self.readers.values().collect();
        readers.sort_by_key(|reader| reader.id);
        readers
    }

    /// Replace an existing reader record
    pub fn update_reader(&mut self, reader: Reader) -> Result<Reader, CirculationError> {
        if !self.readers.contains_key(&reader.id) {
            return Err(CirculationError::reader_not_found(reader.id));
        }
        self.check_email(&reader)?;
        self.readers.insert(reader.id, reader.clone());
        Ok(reader)
    }

    /// Remove a reader from the directory
    pub fn remove_reader(&mut self, id: ReaderId) -> Result<Reader, CirculationError> {
        self.readers
            .remove(&id)
            .ok_or_else(|| CirculationError::reader_not_found(id))
    }

    fn check_email(&self, reader: &Reader) -> Result<(), CirculationError> {
        let taken = self
            .readers
            .values()
            .any(|other| other.id != reader.id && other.email == reader.email);
        if taken {
            return Err(CirculationError::duplicate_email(&reader.email));
        }
        Ok(())
    }
}

impl Default for ReaderDirectory {
    fn default() -> Self {
        Self::new()
    }
}
