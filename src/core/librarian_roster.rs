//! Registered librarian roster
//!
//! The roster is the identity gate for circulation processing: before a
//! circulation record reaches the lending operations, the acting librarian
//! named by the record must be on the roster. The lending operations
//! themselves take the librarian ID on trust.

use crate::types::{CirculationError, Librarian, LibrarianId};
use std::collections::HashMap;

/// In-memory librarian roster
pub struct LibrarianRoster {
    /// Map of librarian IDs to librarian records
    librarians: HashMap<LibrarianId, Librarian>,
}

impl LibrarianRoster {
    /// Create a new empty roster
    pub fn new() -> Self {
        LibrarianRoster {
            librarians: HashMap::new(),
        }
    }

    /// Register a librarian and return the created record
    ///
    /// An email already carried by a different librarian is rejected.
    pub fn register(&mut self, librarian: Librarian) -> Result<Librarian, CirculationError> {
        let taken = self
            .librarians
            .values()
            .any(|other| other.id != librarian.id && other.email == librarian.email);
        if taken {
            return Err(CirculationError::duplicate_email(&librarian.email));
        }
        self.librarians.insert(librarian.id, librarian.clone());
        Ok(librarian)
    }

    /// Get a librarian by ID
    pub fn librarian(&self, id: LibrarianId) -> Option<&Librarian> {
        self.librarians.get(&id)
    }

    /// Whether a librarian ID is on the roster
    pub fn contains(&self, id: LibrarianId) -> bool {
        self.librarians.contains_key(&id)
    }
}

impl Default for LibrarianRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut roster = LibrarianRoster::new();

        let created = roster
            .register(Librarian {
                id: 1,
                email: "desk@lib.org".to_string(),
            })
            .unwrap();
        assert_eq!(created.id, 1);
        assert!(roster.contains(1));
        assert_eq!(roster.librarian(1).unwrap().email, "desk@lib.org");
        assert!(!roster.contains(2));
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let mut roster = LibrarianRoster::new();
        roster
            .register(Librarian {
                id: 1,
                email: "desk@lib.org".to_string(),
            })
            .unwrap();

        let result = roster.register(Librarian {
            id: 2,
            email: "desk@lib.org".to_string(),
        });
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::DuplicateEmail { .. }
        ));
    }
}
