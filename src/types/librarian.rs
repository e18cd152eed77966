//! Librarian types for the circulation engine
//!
//! Librarians are the authenticated actors who perform circulation
//! operations. The roster of registered librarians acts as the identity
//! gate: a circulation record naming an unregistered librarian is rejected
//! before the lending engine is invoked, and the engine itself takes the
//! acting librarian ID on trust.

use serde::Deserialize;

/// Librarian identifier
///
/// Supports librarian IDs from 0 to 4,294,967,295
pub type LibrarianId = u32;

/// A registered librarian
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Librarian {
    /// The librarian ID (u32: 0-4,294,967,295)
    pub id: LibrarianId,

    /// Login email, unique across the roster
    pub email: String,
}
