//! Thread-safe book catalog
//!
//! This module provides the `AsyncCatalog`, the concurrent twin of
//! [`crate::core::Catalog`]. It carries what the concurrent pipeline
//! needs: seeding, lookup, the shelf-count write, and a snapshot for
//! output.
//!
//! # Thread Safety
//!
//! DashMap serializes access per entry. Cross-store consistency during
//! lending (shelf count vs. ledger state) is the engine's job, via the
//! lock table; reads here return snapshots that may lag concurrent
//! writers, exactly like the synchronous store's values would between two
//! calls.

use crate::types::{Book, BookId, CirculationError};
use dashmap::DashMap;

/// Concurrent book catalog
#[derive(Debug, Default)]
pub struct AsyncCatalog {
    /// Concurrent map of book IDs to book records
    books: DashMap<BookId, Book>,
}

impl AsyncCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book to the catalog
    ///
    /// An ISBN already carried by a different book is rejected. Seeding
    /// happens before concurrent processing starts, so the uniqueness scan
    /// does not race lending operations.
    pub fn add_book(&self, book: Book) -> Result<Book, CirculationError> {
        if let Some(isbn) = book.isbn.as_deref() {
            let taken = self
                .books
                .iter()
                .any(|entry| entry.id != book.id && entry.isbn.as_deref() == Some(isbn));
            if taken {
                return Err(CirculationError::duplicate_isbn(isbn));
            }
        }
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    /// Get a snapshot of a book by ID
    ///
    /// The returned value is a clone taken at the time of the call;
    /// concurrent modifications are not reflected in it.
    pub fn book(&self, id: BookId) -> Option<Book> {
        self.books.get(&id).map(|entry| entry.value().clone())
    }

    /// Write a book's shelf count
    ///
    /// Only called by the engine inside a critical section for this book.
    pub fn set_copies(&self, id: BookId, copies: u32) -> Result<(), CirculationError> {
        let mut book = self
            .books
            .get_mut(&id)
            .ok_or_else(|| CirculationError::book_not_found(id))?;
        book.copies = copies;
        Ok(())
    }

    /// Snapshot of all books, in arbitrary order
    ///
    /// Output sorting is the writer's concern.
    pub fn books(&self) -> Vec<Book> {
        self.books.iter().map(|entry| entry.value().clone()).collect()
    }
}
