//! Thread-safe loan ledger
//!
//! Concurrent twin of [`crate::core::LoanLedger`]. Entries are
//! individually consistent through DashMap's per-entry locking; the
//! check-then-write sequences that span the ledger and the catalog are
//! serialized by the engine's lock table, not here.
//!
//! # ID Assignment
//!
//! Ledger-assigned IDs come from an atomic counter; caller-assigned IDs
//! reconcile the counter with `fetch_max` so the two can never collide.

use crate::types::{BookId, CirculationError, LibrarianId, Loan, LoanId, ReaderId};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent loan record store with derived open-loan queries
#[derive(Debug)]
pub struct AsyncLoanLedger {
    /// Concurrent map of loan IDs to loan records
    loans: DashMap<LoanId, Loan>,
    /// Next ID to hand out when the caller does not assign one
    next_id: AtomicU64,
}

impl AsyncLoanLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        AsyncLoanLedger {
            loans: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether a loan ID exists in the ledger
    pub fn contains(&self, id: LoanId) -> bool {
        self.loans.contains_key(&id)
    }

    /// Get a snapshot of a loan by ID
    pub fn loan(&self, id: LoanId) -> Option<Loan> {
        self.loans.get(&id).map(|entry| entry.value().clone())
    }

    /// Append a new open loan
    ///
    /// The occupancy check and insert for a caller-assigned ID happen as
    /// one entry operation, so two racing inserts of the same ID cannot
    /// both succeed.
    pub fn insert(
        &self,
        id: Option<LoanId>,
        book: BookId,
        reader: ReaderId,
        librarian: LibrarianId,
        borrowed_at: DateTime<Utc>,
    ) -> Result<Loan, CirculationError> {
        let id = match id {
            Some(id) => {
                // keep generated IDs ahead of explicit ones
                self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                id
            }
            None => self.next_id.fetch_add(1, Ordering::SeqCst),
        };

        let loan = Loan {
            id,
            book,
            reader,
            librarian,
            borrowed_at,
            returned_at: None,
        };

        match self.loans.entry(id) {
            Entry::Occupied(_) => Err(CirculationError::duplicate_loan(id)),
            Entry::Vacant(vacant) => {
                vacant.insert(loan.clone());
                Ok(loan)
            }
        }
    }

    /// Close an open loan by setting its return timestamp
    pub fn close(
        &self,
        id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<Loan, CirculationError> {
        let mut loan = self
            .loans
            .get_mut(&id)
            .ok_or_else(|| CirculationError::loan_not_found(id))?;
        if loan.returned_at.is_some() {
            return Err(CirculationError::already_returned(id));
        }
        loan.returned_at = Some(returned_at);
        Ok(loan.value().clone())
    }

    /// Remove a closed loan from the ledger
    ///
    /// Open loans are refused; the record is the only evidence that a copy
    /// is checked out.
    pub fn remove(&self, id: LoanId) -> Result<Loan, CirculationError> {
        match self.loans.entry(id) {
            Entry::Vacant(_) => Err(CirculationError::loan_not_found(id)),
            Entry::Occupied(occupied) => {
                if occupied.get().is_open() {
                    return Err(CirculationError::loan_still_open(id));
                }
                Ok(occupied.remove())
            }
        }
    }

    /// All open loans, sorted by loan ID
    pub fn open_loans(&self) -> Vec<Loan> {
        self.collect_sorted(|loan| loan.is_open())
    }

    /// Open loans held by a reader, sorted by loan ID
    pub fn open_loans_for_reader(&self, reader: ReaderId) -> Vec<Loan> {
        self.collect_sorted(|loan| loan.reader == reader && loan.is_open())
    }

    /// Full loan history of a reader (open and closed), sorted by loan ID
    pub fn loans_for_reader(&self, reader: ReaderId) -> Vec<Loan> {
        self.collect_sorted(|loan| loan.reader == reader)
    }

    /// Number of open loans held by a reader
    ///
    /// Derived by scan; meaningful as a precondition only while the
    /// reader's lock is held, since inserts for this reader happen under
    /// that lock.
    pub fn open_loan_count(&self, reader: ReaderId) -> usize {
        self.loans
            .iter()
            .filter(|loan| loan.reader == reader && loan.is_open())
            .count()
    }

    /// Number of open loans referencing a book
    pub fn open_loan_count_for_book(&self, book: BookId) -> usize {
        self.loans
            .iter()
            .filter(|loan| loan.book == book && loan.is_open())
            .count()
    }

    fn collect_sorted(&self, keep: impl Fn(&Loan) -> bool) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self
            .loans
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        loans.sort_by_key(|loan| loan.id);
        loans
    }
}

impl Default for AsyncLoanLedger {
    fn default() -> Self {
        Self::new()
    }
}
