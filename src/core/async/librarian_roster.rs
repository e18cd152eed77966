//! Thread-safe librarian roster
//!
//! Concurrent twin of [`crate::core::LibrarianRoster`]; the identity gate
//! consulted by the concurrent engine before every lending operation.

use crate::types::{CirculationError, Librarian, LibrarianId};
use dashmap::DashMap;

/// Concurrent librarian roster
#[derive(Debug, Default)]
pub struct AsyncLibrarianRoster {
    /// Concurrent map of librarian IDs to librarian records
    librarians: DashMap<LibrarianId, Librarian>,
}

impl AsyncLibrarianRoster {
    /// Create a new empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a librarian and return the created record
    ///
    /// An email already carried by a different librarian is rejected.
    pub fn register(&self, librarian: Librarian) -> Result<Librarian, CirculationError> {
        let taken = self
            .librarians
            .iter()
            .any(|entry| entry.id != librarian.id && entry.email == librarian.email);
        if taken {
            return Err(CirculationError::duplicate_email(&librarian.email));
        }
        self.librarians.insert(librarian.id, librarian.clone());
        Ok(librarian)
    }

    /// Whether a librarian ID is on the roster
    pub fn contains(&self, id: LibrarianId) -> bool {
        self.librarians.contains_key(&id)
    }
}
