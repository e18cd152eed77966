//! Catalog book types for the circulation engine
//!
//! This module defines the Book structure held by the catalog and the
//! BookStatus summary row used for final output.

use serde::Deserialize;

/// Book identifier
///
/// Supports book IDs from 0 to 4,294,967,295
pub type BookId = u32;

/// A catalog entry for a physical book title
///
/// The `copies` field counts the physical units currently on the shelf,
/// i.e. not lent out. It is decremented exactly once per issue and
/// incremented exactly once per return; catalog edits aside, nothing else
/// touches it. Being unsigned, it can never go negative.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    /// The book ID (u32: 0-4,294,967,295)
    pub id: BookId,

    /// Title of the book
    pub title: String,

    /// Author of the book
    pub author: String,

    /// Publication year, when known
    pub year: Option<i32>,

    /// ISBN, unique across the catalog when present
    pub isbn: Option<String>,

    /// Physical units currently on the shelf (not on loan)
    pub copies: u32,
}

/// Final per-book summary row for output
///
/// Pairs the shelf count with the number of open loans so the
/// conservation of units (`copies + loaned` constant per book) is visible
/// in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct BookStatus {
    /// The book ID
    pub book: BookId,

    /// Title of the book
    pub title: String,

    /// Physical units currently on the shelf
    pub copies: u32,

    /// Number of open loans referencing this book
    pub loaned: usize,
}
