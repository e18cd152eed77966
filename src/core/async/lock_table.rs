//! Per-book and per-reader critical sections
//!
//! The lending rules gate on counts read from one store and written to
//! another (shelf copies, a reader's open loans). Checking and writing must
//! happen as one unit with respect to every other operation touching the
//! same book or reader, otherwise two concurrent issues can both pass the
//! same precondition.
//!
//! The `LockTable` hands out one mutex per book ID and one per reader ID,
//! created on demand, and runs callers' closures while holding them. Lock
//! order is fixed (book first, then reader), so nested acquisition cannot
//! deadlock.

use crate::types::{BookId, CirculationError, ReaderId};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

/// On-demand mutex table keyed by book and reader IDs
///
/// A poisoned mutex (a thread panicked inside a critical section) is
/// surfaced as `StorageFailure`; the operation fails as a unit.
#[derive(Debug, Default)]
pub struct LockTable {
    /// One cell per book ID, created on first use
    books: DashMap<BookId, Arc<Mutex<()>>>,
    /// One cell per reader ID, created on first use
    readers: DashMap<ReaderId, Arc<Mutex<()>>>,
}

impl LockTable {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the book's mutex
    ///
    /// Serializes the closure against every other `with_book` call for the
    /// same ID. Closures for different books proceed in parallel.
    pub fn with_book<T>(
        &self,
        id: BookId,
        f: impl FnOnce() -> Result<T, CirculationError>,
    ) -> Result<T, CirculationError> {
        let cell = self.books.entry(id).or_default().value().clone();
        let _guard = cell
            .lock()
            .map_err(|_| CirculationError::storage_failure("book lock"))?;
        f()
    }

    /// Run `f` while holding the reader's mutex
    ///
    /// Only ever called from inside a `with_book` closure, preserving the
    /// book-then-reader order.
    pub fn with_reader<T>(
        &self,
        id: ReaderId,
        f: impl FnOnce() -> Result<T, CirculationError>,
    ) -> Result<T, CirculationError> {
        let cell = self.readers.entry(id).or_default().value().clone();
        let _guard = cell
            .lock()
            .map_err(|_| CirculationError::storage_failure("reader lock"))?;
        f()
    }
}
