//! Reader types for the circulation engine
//!
//! Readers are the people books are lent to. A reader carries no
//! lending-relevant mutable state of its own: the open-loan count is always
//! derived from the loan ledger, never stored here, so it cannot drift.

use serde::Deserialize;

/// Reader identifier
///
/// Supports reader IDs from 0 to 4,294,967,295
pub type ReaderId = u32;

/// A registered reader
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reader {
    /// The reader ID (u32: 0-4,294,967,295)
    pub id: ReaderId,

    /// Full name of the reader
    pub name: String,

    /// Contact email, unique across the directory
    pub email: String,
}
