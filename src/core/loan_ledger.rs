//! Loan ledger
//!
//! This module provides the `LoanLedger` component that holds every loan
//! record and answers the derived queries the lending engine and reporting
//! surface depend on.
//!
//! # Derived Counts
//!
//! A reader's open-loan count is always computed by scanning the ledger,
//! never kept as a running counter that could drift from the records. The
//! scan is bounded in practice: the borrow cap keeps the relevant row count
//! per reader tiny.
//!
//! # ID Assignment
//!
//! Loan IDs may be caller-assigned (circulation files name the loans they
//! create so later rows can reference them) or ledger-assigned when the
//! caller passes none. The internal counter is reconciled past any explicit
//! ID so assigned and generated IDs never collide.

use crate::types::{BookId, CirculationError, LibrarianId, Loan, LoanId, ReaderId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Loan record store with derived open-loan queries
pub struct LoanLedger {
    /// Map of loan IDs to loan records
    loans: HashMap<LoanId, Loan>,
    /// Next ID to hand out when the caller does not assign one
    next_id: LoanId,
}

impl LoanLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        LoanLedger {
            loans: HashMap::new(),
            next_id: 1,
        }
    }

    /// Whether a loan ID exists in the ledger
    pub fn contains(&self, id: LoanId) -> bool {
        self.loans.contains_key(&id)
    }

    /// Get a loan by ID
    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    /// Append a new open loan
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-assigned loan ID, or `None` for the next free ID
    /// * `book`, `reader`, `librarian` - The parties to the loan
    /// * `borrowed_at` - Issue timestamp
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The created record
    /// * `Err(CirculationError::DuplicateLoan)` - If a caller-assigned ID
    ///   already exists
    pub fn insert(
        &mut self,
        id: Option<LoanId>,
        book: BookId,
        reader: ReaderId,
        librarian: LibrarianId,
        borrowed_at: DateTime<Utc>,
    ) -> Result<Loan, CirculationError> {
        let id = match id {
            Some(id) => {
                if self.loans.contains_key(&id) {
                    return Err(CirculationError::duplicate_loan(id));
                }
                // keep generated IDs ahead of explicit ones
                self.next_id = self.next_id.max(id.saturating_add(1));
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };

        let loan = Loan {
            id,
            book,
            reader,
            librarian,
            borrowed_at,
            returned_at: None,
        };
        self.loans.insert(id, loan.clone());
        Ok(loan)
    }

    /// Close an open loan by setting its return timestamp
    ///
    /// The timestamp is set exactly once; closing an already-closed loan
    /// fails and leaves the record untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The closed record
    /// * `Err(CirculationError::LoanNotFound)` - If the ID is unknown
    /// * `Err(CirculationError::AlreadyReturned)` - If the loan is closed
    pub fn close(
        &mut self,
        id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<Loan, CirculationError> {
        let loan = self
            .loans
            .get_mut(&id)
            .ok_or_else(|| CirculationError::loan_not_found(id))?;
        if loan.returned_at.is_some() {
            return Err(CirculationError::already_returned(id));
        }
        loan.returned_at = Some(returned_at);
        Ok(loan.clone())
    }

    /// Remove a closed loan from the ledger
    ///
    /// Open loans cannot be removed: the record is the only evidence that a
    /// copy is checked out, and no compensating shelf-count adjustment
    /// exists for deletion.
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The removed record
    /// * `Err(CirculationError::LoanNotFound)` - If the ID is unknown
    /// * `Err(CirculationError::LoanStillOpen)` - If the loan is open
    pub fn remove(&mut self, id: LoanId) -> Result<Loan, CirculationError> {
        let loan = self
            .loans
            .get(&id)
            .ok_or_else(|| CirculationError::loan_not_found(id))?;
        if loan.is_open() {
            return Err(CirculationError::loan_still_open(id));
        }
        self.loans
            .remove(&id)
            .ok_or_else(|| CirculationError::loan_not_found(id))
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
    pub fn open_loan_count(&self, reader: ReaderId) -> usize {
        self.loans
            .values()
            .filter(|loan| loan.reader == reader && loan.is_open())
            .count()
    }

    /// Number of open loans referencing a book
    pub fn open_loan_count_for_book(&self, book: BookId) -> usize {
        self.loans
            .values()
            .filter(|loan| loan.book == book && loan.is_open())
            .count()
    }

    fn collect_sorted(&self, keep: impl Fn(&Loan) -> bool) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self.loans.values().filter(|l| keep(l)).cloned().collect();
        loans.sort_by_key(|loan| loan.id);
        loans
    }
}

impl Default for LoanLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_loan(ledger: &mut LoanLedger, id: Option<LoanId>, reader: ReaderId) -> Loan {
        ledger.insert(id, 1, reader, 1, Utc::now()).unwrap()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut ledger = LoanLedger::new();

        let first = insert_loan(&mut ledger, None, 1);
        let second = insert_loan(&mut ledger, None, 1);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.is_open());
    }

    #[test]
    fn test_insert_honors_explicit_id() {
        let mut ledger = LoanLedger::new();

        let loan = insert_loan(&mut ledger, Some(10), 1);
        assert_eq!(loan.id, 10);

        // generated IDs continue past the explicit one
        let next = insert_loan(&mut ledger, None, 1);
        assert_eq!(next.id, 11);
    }

    #[test]
    fn test_insert_rejects_duplicate_explicit_id() {
        let mut ledger = LoanLedger::new();
        insert_loan(&mut ledger, Some(10), 1);

        let result = ledger.insert(Some(10), 2, 2, 1, Utc::now());
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::DuplicateLoan { loan: 10 }
        ));
    }

    #[test]
    fn test_close_sets_return_timestamp_once() {
        let mut ledger = LoanLedger::new();
        let loan = insert_loan(&mut ledger, None, 1);

        let closed = ledger.close(loan.id, Utc::now()).unwrap();
        assert!(!closed.is_open());

        let result = ledger.close(loan.id, Utc::now());
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::AlreadyReturned { .. }
        ));
    }

    #[test]
    fn test_close_unknown_loan_fails() {
        let mut ledger = LoanLedger::new();
        let result = ledger.close(99, Utc::now());
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanNotFound { loan: 99 }
        ));
    }

    #[test]
    fn test_remove_refuses_open_loan() {
        let mut ledger = LoanLedger::new();
        let loan = insert_loan(&mut ledger, None, 1);

        let result = ledger.remove(loan.id);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanStillOpen { .. }
        ));
        assert!(ledger.contains(loan.id));
    }

    #[test]
    fn test_remove_closed_loan_succeeds() {
        let mut ledger = LoanLedger::new();
        let loan = insert_loan(&mut ledger, None, 1);
        ledger.close(loan.id, Utc::now()).unwrap();

        let removed = ledger.remove(loan.id).unwrap();
        assert_eq!(removed.id, loan.id);
        assert!(!ledger.contains(loan.id));
    }

    #[test]
    fn test_open_loan_count_is_derived() {
        let mut ledger = LoanLedger::new();
        let first = insert_loan(&mut ledger, None, 7);
        insert_loan(&mut ledger, None, 7);
        insert_loan(&mut ledger, None, 8);

        assert_eq!(ledger.open_loan_count(7), 2);

        ledger.close(first.id, Utc::now()).unwrap();
        assert_eq!(ledger.open_loan_count(7), 1);
        assert_eq!(ledger.open_loan_count(8), 1);
    }

    #[test]
    fn test_reader_queries_split_open_and_history() {
        let mut ledger = LoanLedger::new();
        let first = insert_loan(&mut ledger, None, 7);
        insert_loan(&mut ledger, None, 7);
        ledger.close(first.id, Utc::now()).unwrap();

        let open = ledger.open_loans_for_reader(7);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, 2);

        let history = ledger.loans_for_reader(7);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 1);
    }

    #[test]
    fn test_open_loan_count_for_book() {
        let mut ledger = LoanLedger::new();
        ledger.insert(None, 5, 1, 1, Utc::now()).unwrap();
        let second = ledger.insert(None, 5, 2, 1, Utc::now()).unwrap();
        ledger.insert(None, 6, 1, 1, Utc::now()).unwrap();

        assert_eq!(ledger.open_loan_count_for_book(5), 2);
        ledger.close(second.id, Utc::now()).unwrap();
        assert_eq!(ledger.open_loan_count_for_book(5), 1);
    }
}
