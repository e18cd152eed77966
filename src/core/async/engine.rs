//! Lending orchestration for concurrent processing
//!
//! This module provides the `AsyncCirculationEngine`, the thread-safe twin
//! of [`crate::core::CirculationEngine`]. It coordinates the concurrent
//! stores and scopes every issue/return/discard inside the lock table's
//! per-book (and, for issue, per-reader) critical sections.
//!
//! # Architecture
//!
//! ```text
//! AsyncCirculationEngine
//!     ├── Arc<AsyncCatalog>          (shelf counts)
//!     ├── Arc<AsyncReaderDirectory>  (reader existence)
//!     ├── Arc<AsyncLibrarianRoster>  (identity gate)
//!     ├── Arc<AsyncLoanLedger>       (loan records, derived counts)
//!     └── Arc<LockTable>             (critical sections)
//! ```
//!
//! # Correctness
//!
//! The two count-gated preconditions (shelf copies, a reader's open
//! loans) are read, decided on and written inside a mutex held for the
//! whole sequence, keyed on the book and on the reader. Two concurrent
//! issues against a book with one copy left therefore resolve to exactly
//! one success and one out-of-stock rejection, and a reader's open loans
//! can never be driven past the cap by racing issues. All writes happen
//! after every check has passed, so a failed operation leaves no trace.

use std::sync::Arc;

use chrono::Utc;

use super::{
    AsyncCatalog, AsyncLibrarianRoster, AsyncLoanLedger, AsyncReaderDirectory, LockTable,
};
use crate::core::engine::MAX_OPEN_LOANS;
use crate::types::{
    BookId, BookStatus, CirculationError, CirculationRecord, LibrarianId, Loan, LoanId,
    OperationType, ReaderId,
};

/// Thread-safe lending orchestrator
///
/// Cloneable and safe to share across threads and tasks; all internal
/// state is behind `Arc` and mutated only inside critical sections.
#[derive(Debug, Clone)]
pub struct AsyncCirculationEngine {
    /// Shelf counts and book records
    catalog: Arc<AsyncCatalog>,
    /// Registered readers
    readers: Arc<AsyncReaderDirectory>,
    /// Registered librarians (identity gate)
    roster: Arc<AsyncLibrarianRoster>,
    /// Loan records and derived open-loan counts
    ledger: Arc<AsyncLoanLedger>,
    /// Per-book / per-reader critical sections
    locks: Arc<LockTable>,
}

impl AsyncCirculationEngine {
    /// Create a new engine over shared store components
    pub fn new(
        catalog: Arc<AsyncCatalog>,
        readers: Arc<AsyncReaderDirectory>,
        roster: Arc<AsyncLibrarianRoster>,
        ledger: Arc<AsyncLoanLedger>,
    ) -> Self {
        Self {
            catalog,
            readers,
            roster,
            ledger,
            locks: Arc::new(LockTable::new()),
        }
    }

    /// Process a single circulation record
    ///
    /// Resolves the acting librarian against the roster, then routes to
    /// the issue or return path.
    pub fn process(&self, record: CirculationRecord) -> Result<Loan, CirculationError> {
        if !self.roster.contains(record.librarian) {
            return Err(CirculationError::unknown_librarian(record.librarian));
        }

        match record.op {
            OperationType::Borrow => {
                self.issue(record.loan, record.book, record.reader, record.librarian)
            }
            OperationType::Return => {
                let loan = record.loan.ok_or_else(|| {
                    CirculationError::missing_loan_id(record.book, record.reader)
                })?;
                self.process_return(loan, record.book, record.reader)
            }
        }
    }

    /// Issue a copy of a book to a reader
    ///
    /// Runs the whole precondition-and-effect sequence while holding the
    /// book's mutex and then the reader's mutex, so the shelf count and
    /// the reader's open-loan count cannot change under the decision.
    pub fn issue(
        &self,
        loan: Option<LoanId>,
        book: BookId,
        reader: ReaderId,
        librarian: LibrarianId,
    ) -> Result<Loan, CirculationError> {
        self.locks.with_book(book, || {
            self.locks.with_reader(reader, || {
                if let Some(id) = loan {
                    if self.ledger.contains(id) {
                        return Err(CirculationError::duplicate_loan(id));
                    }
                }

                let copies = self
                    .catalog
                    .book(book)
                    .map(|b| b.copies)
                    .ok_or_else(|| CirculationError::book_not_found(book))?;
                if copies == 0 {
                    return Err(CirculationError::out_of_stock(book));
                }

                if !self.readers.contains(reader) {
                    return Err(CirculationError::reader_not_found(reader));
                }

                let open = self.ledger.open_loan_count(reader);
                if open >= MAX_OPEN_LOANS {
                    return Err(CirculationError::borrow_limit_exceeded(reader, open));
                }

                // all checks passed; effects only from here on
                let created = self.ledger.insert(loan, book, reader, librarian, Utc::now())?;
                self.catalog.set_copies(book, copies - 1)?;
                Ok(created)
            })
        })
    }

    /// Close an open loan and put the copy back on the shelf
    ///
    /// The loan is re-read inside the book's critical section so that two
    /// racing returns of the same loan resolve to one success and one
    /// already-returned rejection, with the shelf count incremented
    /// exactly once.
    pub fn process_return(
        &self,
        loan: LoanId,
        book: BookId,
        reader: ReaderId,
    ) -> Result<Loan, CirculationError> {
        // resolve which book's section to enter; rechecked under the lock
        let stored = self
            .ledger
            .loan(loan)
            .ok_or_else(|| CirculationError::loan_not_found(loan))?;

        self.locks.with_book(stored.book, || {
            let stored = self
                .ledger
                .loan(loan)
                .ok_or_else(|| CirculationError::loan_not_found(loan))?;

            if stored.book != book || stored.reader != reader {
                return Err(CirculationError::loan_mismatch(loan, book, reader));
            }

            if !stored.is_open() {
                return Err(CirculationError::already_returned(loan));
            }

            let copies = self
                .catalog
                .book(book)
                .map(|b| b.copies)
                .ok_or_else(|| CirculationError::book_not_found(book))?;

            let closed = self.ledger.close(loan, Utc::now())?;
            self.catalog.set_copies(book, copies + 1)?;
            Ok(closed)
        })
    }

    /// Remove a closed loan from the ledger
    ///
    /// Serialized against returns of the same loan through the book's
    /// critical section; open loans are refused with `LoanStillOpen`.
    pub fn discard_loan(&self, loan: LoanId) -> Result<Loan, CirculationError> {
        let stored = self
            .ledger
            .loan(loan)
            .ok_or_else(|| CirculationError::loan_not_found(loan))?;

        self.locks.with_book(stored.book, || self.ledger.remove(loan))
    }

    /// Get a snapshot of a loan by ID
    pub fn loan(&self, id: LoanId) -> Option<Loan> {
        self.ledger.loan(id)
    }

    /// All open loans, sorted by loan ID
    pub fn open_loans(&self) -> Vec<Loan> {
        self.ledger.open_loans()
    }

    /// Open loans currently held by a reader
    pub fn open_loans_for_reader(&self, reader: ReaderId) -> Vec<Loan> {
        self.ledger.open_loans_for_reader(reader)
    }

    /// Full loan history of a reader, open and closed
    pub fn loans_for_reader(&self, reader: ReaderId) -> Vec<Loan> {
        self.ledger.loans_for_reader(reader)
    }

    /// Final per-book states, sorted by book ID
    ///
    /// A snapshot: taken while workers are still lending it may interleave
    /// with in-flight operations. The pipeline only calls it after all
    /// processing has completed.
    pub fn catalog_snapshot(&self) -> Vec<BookStatus> {
        let mut snapshot: Vec<BookStatus> = self
            .catalog
            .books()
            .into_iter()
            .map(|book| BookStatus {
                book: book.id,
                title: book.title.clone(),
                copies: book.copies,
                loaned: self.ledger.open_loan_count_for_book(book.id),
            })
            .collect();
        snapshot.sort_by_key(|status| status.book);
        snapshot
    }
}
