//! Lending engine
//!
//! This module provides the `CirculationEngine` that orchestrates lending
//! by coordinating the catalog, reader directory, librarian roster and loan
//! ledger.
//!
//! The engine enforces the circulation rules:
//! - A copy can only be issued while the shelf count is positive
//! - A reader can hold at most [`MAX_OPEN_LOANS`] open loans at once, with
//!   the count derived from the ledger at the instant of the check
//! - A return must name the book/reader pair the loan was issued for and
//!   closes the loan exactly once
//! - Shelf counts change only through issue (-1) and return (+1)
//!
//! The engine owns its stores and takes `&mut self` for every mutating
//! operation, so a single engine instance is serialized by the borrow
//! checker. The thread-safe twin for concurrent callers lives in
//! [`crate::core::r#async`].

use chrono::Utc;

use crate::core::catalog::Catalog;
use crate::core::librarian_roster::LibrarianRoster;
use crate::core::loan_ledger::LoanLedger;
use crate::core::reader_directory::ReaderDirectory;
use crate::types::{
    Book, BookId, BookStatus, CirculationError, CirculationRecord, Librarian, LibrarianId, Loan,
    LoanId, OperationType, Reader, ReaderId,
};

/// Maximum number of open loans a reader may hold at once
pub const MAX_OPEN_LOANS: usize = 3;

/// Lending orchestration over the catalog, readers, roster and ledger
///
/// All lending-relevant mutation of books and loans flows through this
/// type; the stores are not exposed mutably, so callers cannot bypass the
/// issue/return rules.
pub struct CirculationEngine {
    catalog: Catalog,
    readers: ReaderDirectory,
    roster: LibrarianRoster,
    ledger: LoanLedger,
}

impl CirculationEngine {
    /// Create a new engine with empty stores
    pub fn new() -> Self {
        CirculationEngine {
            catalog: Catalog::new(),
            readers: ReaderDirectory::new(),
            roster: LibrarianRoster::new(),
            ledger: LoanLedger::new(),
        }
    }

    /// Process a single circulation record
    ///
    /// Resolves the acting librarian against the roster (the identity
    /// gate), then routes the record to the issue or return path. The
    /// lending paths themselves trust the librarian ID they are given.
    ///
    /// # Arguments
    ///
    /// * `record` - The circulation record to process
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The loan the operation created or closed
    /// * `Err(CirculationError)` - If the gate or any precondition failed
    pub fn apply(&mut self, record: CirculationRecord) -> Result<Loan, CirculationError> {
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
    /// Preconditions are checked in order and the first failure wins:
    /// an explicit loan ID must be unused, the book must exist, a copy
    /// must be on the shelf, the reader must exist, and the reader's
    /// open-loan count (derived from the ledger) must be below the cap.
    /// Only after every check passes is the shelf count decremented and
    /// the open loan appended; a failed issue leaves no trace.
    ///
    /// # Arguments
    ///
    /// * `loan` - Caller-assigned loan ID, or `None` to let the ledger pick
    /// * `book` - The book to issue
    /// * `reader` - The reader receiving the copy
    /// * `librarian` - The acting librarian (taken on trust)
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The created open loan
    /// * `Err(CirculationError)` - If a precondition failed
    pub fn issue(
        &mut self,
        loan: Option<LoanId>,
        book: BookId,
        reader: ReaderId,
        librarian: LibrarianId,
    ) -> Result<Loan, CirculationError> {
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

        if self.readers.reader(reader).is_none() {
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
    }

    /// Close an open loan and put the copy back on the shelf
    ///
    /// The supplied book and reader must match the loan record (guarding
    /// against closing the wrong loan by ID collision or typo), the loan
    /// must still be open, and the book must still exist in the catalog.
    ///
    /// # Arguments
    ///
    /// * `loan` - The loan to close
    /// * `book` - The book the caller believes the loan is for
    /// * `reader` - The reader the caller believes holds the copy
    ///
    /// # Returns
    ///
    /// * `Ok(Loan)` - The closed loan
    /// * `Err(CirculationError)` - If a precondition failed
    pub fn process_return(
        &mut self,
        loan: LoanId,
        book: BookId,
        reader: ReaderId,
    ) -> Result<Loan, CirculationError> {
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

        // Defensive: the catalog may have dropped the book while the loan
        // was open. Never silently succeed against a missing book.
        let copies = self
            .catalog
            .book(book)
            .map(|b| b.copies)
            .ok_or_else(|| CirculationError::book_not_found(book))?;

        let closed = self.ledger.close(loan, Utc::now())?;
        self.catalog.set_copies(book, copies + 1)?;
        Ok(closed)
    }

    /// Remove a closed loan from the ledger
    ///
    /// Administrative cleanup only; open loans are refused with
    /// `LoanStillOpen` because no compensating shelf adjustment exists for
    /// deletion.
    pub fn discard_loan(&mut self, loan: LoanId) -> Result<Loan, CirculationError> {
        self.ledger.remove(loan)
    }

    /// Get a loan by ID
    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
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

    /// Final per-book states for output, sorted by book ID
    ///
    /// Each row pairs the shelf count with the book's open-loan count, so
    /// unit conservation is visible in the output.
    pub fn catalog_snapshot(&self) -> Vec<BookStatus> {
        self.catalog
            .books()
            .into_iter()
            .map(|book| BookStatus {
                book: book.id,
                title: book.title.clone(),
                copies: book.copies,
                loaned: self.ledger.open_loan_count_for_book(book.id),
            })
            .collect()
    }

    // Catalog, directory and roster management. Record CRUD only; shelf
    // counts move exclusively through issue/return above.

    /// Add a book to the catalog and return the created record
    pub fn add_book(&mut self, book: Book) -> Result<Book, CirculationError> {
        self.catalog.add_book(book)
    }

    /// Get a book by ID
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.catalog.book(id)
    }

    /// Replace an existing book record
    pub fn update_book(&mut self, book: Book) -> Result<Book, CirculationError> {
        self.catalog.update_book(book)
    }

    /// Remove a book from the catalog
    pub fn remove_book(&mut self, id: BookId) -> Result<Book, CirculationError> {
        self.catalog.remove_book(id)
    }

    /// Add a reader and return the created record
    pub fn add_reader(&mut self, reader: Reader) -> Result<Reader, CirculationError> {
        self.readers.add_reader(reader)
    }

    /// Get a reader by ID
    pub fn reader(&self, id: ReaderId) -> Option<&Reader> {
        self.readers.reader(id)
    }

    /// Replace an existing reader record
    pub fn update_reader(&mut self, reader: Reader) -> Result<Reader, CirculationError> {
        self.readers.update_reader(reader)
    }

    /// Remove a reader from the directory
    pub fn remove_reader(&mut self, id: ReaderId) -> Result<Reader, CirculationError> {
        self.readers.remove_reader(id)
    }

    /// Register a librarian and return the created record
    pub fn register_librarian(
        &mut self,
        librarian: Librarian,
    ) -> Result<Librarian, CirculationError> {
        self.roster.register(librarian)
    }
}

impl Default for CirculationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESK: LibrarianId = 1;

    fn engine_with(books: &[(BookId, u32)], readers: &[ReaderId]) -> CirculationEngine {
        let mut engine = CirculationEngine::new();
        engine
            .register_librarian(Librarian {
                id: DESK,
                email: "desk@lib.org".to_string(),
            })
            .unwrap();
        for &(id, copies) in books {
            engine
                .add_book(Book {
                    id,
                    title: format!("Title {}", id),
                    author: "Author".to_string(),
                    year: None,
                    isbn: None,
                    copies,
                })
                .unwrap();
        }
        for &id in readers {
            engine
                .add_reader(Reader {
                    id,
                    name: format!("Reader {}", id),
                    email: format!("r{}@lib.org", id),
                })
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_issue_decrements_copies_and_opens_loan() {
        let mut engine = engine_with(&[(1, 2)], &[10]);

        let loan = engine.issue(None, 1, 10, DESK).unwrap();
        assert!(loan.is_open());
        assert_eq!(loan.book, 1);
        assert_eq!(loan.reader, 10);
        assert_eq!(loan.librarian, DESK);
        assert_eq!(engine.book(1).unwrap().copies, 1);
        assert_eq!(engine.open_loans_for_reader(10).len(), 1);
    }

    #[test]
    fn test_issue_unknown_book_fails_first() {
        // both book and reader are missing; the book check wins
        let mut engine = engine_with(&[], &[]);

        let result = engine.issue(None, 9, 9, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::BookNotFound { book: 9 }
        ));
    }

    #[test]
    fn test_issue_out_of_stock_checked_before_reader() {
        // empty shelf and unknown reader; out-of-stock wins
        let mut engine = engine_with(&[(1, 0)], &[]);

        let result = engine.issue(None, 1, 9, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::OutOfStock { book: 1 }
        ));
        assert_eq!(engine.book(1).unwrap().copies, 0);
        assert!(engine.open_loans().is_empty());
    }

    #[test]
    fn test_issue_unknown_reader_fails() {
        let mut engine = engine_with(&[(1, 1)], &[]);

        let result = engine.issue(None, 1, 9, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::ReaderNotFound { reader: 9 }
        ));
        // no partial effect
        assert_eq!(engine.book(1).unwrap().copies, 1);
    }

    #[test]
    fn test_issue_enforces_borrow_cap() {
        let mut engine = engine_with(&[(1, 5)], &[10]);

        for _ in 0..MAX_OPEN_LOANS {
            engine.issue(None, 1, 10, DESK).unwrap();
        }

        let result = engine.issue(None, 1, 10, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::BorrowLimitExceeded { reader: 10, open: 3 }
        ));
        assert_eq!(engine.book(1).unwrap().copies, 2);
    }

    #[test]
    fn test_issue_duplicate_loan_id_has_no_effect() {
        let mut engine = engine_with(&[(1, 2)], &[10, 11]);
        engine.issue(Some(5), 1, 10, DESK).unwrap();

        let result = engine.issue(Some(5), 1, 11, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::DuplicateLoan { loan: 5 }
        ));
        assert_eq!(engine.book(1).unwrap().copies, 1);
        assert!(engine.open_loans_for_reader(11).is_empty());
    }

    #[test]
    fn test_return_closes_loan_and_restores_copy() {
        let mut engine = engine_with(&[(1, 1)], &[10]);
        let loan = engine.issue(None, 1, 10, DESK).unwrap();
        assert_eq!(engine.book(1).unwrap().copies, 0);

        let closed = engine.process_return(loan.id, 1, 10).unwrap();
        assert!(!closed.is_open());
        assert_eq!(engine.book(1).unwrap().copies, 1);
        assert!(engine.open_loans_for_reader(10).is_empty());
        assert_eq!(engine.loans_for_reader(10).len(), 1);
    }

    #[test]
    fn test_return_unknown_loan_fails() {
        let mut engine = engine_with(&[(1, 1)], &[10]);

        let result = engine.process_return(99, 1, 10);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanNotFound { loan: 99 }
        ));
    }

    #[test]
    fn test_return_with_wrong_pair_fails() {
        let mut engine = engine_with(&[(1, 1), (2, 1)], &[10, 11]);
        let loan = engine.issue(None, 1, 10, DESK).unwrap();

        // wrong book
        let result = engine.process_return(loan.id, 2, 10);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanMismatch { .. }
        ));

        // wrong reader
        let result = engine.process_return(loan.id, 1, 11);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanMismatch { .. }
        ));

        // loan untouched, shelf untouched
        assert!(engine.loan(loan.id).unwrap().is_open());
        assert_eq!(engine.book(1).unwrap().copies, 0);
    }

    #[test]
    fn test_second_return_fails_and_copies_increment_once() {
        let mut engine = engine_with(&[(1, 1)], &[10]);
        let loan = engine.issue(None, 1, 10, DESK).unwrap();

        engine.process_return(loan.id, 1, 10).unwrap();
        let result = engine.process_return(loan.id, 1, 10);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::AlreadyReturned { .. }
        ));
        assert_eq!(engine.book(1).unwrap().copies, 1);
    }

    #[test]
    fn test_return_against_removed_book_fails() {
        let mut engine = engine_with(&[(1, 1)], &[10]);
        let loan = engine.issue(None, 1, 10, DESK).unwrap();

        engine.remove_book(1).unwrap();

        let result = engine.process_return(loan.id, 1, 10);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::BookNotFound { book: 1 }
        ));
        // the loan stays open; nothing was silently closed
        assert!(engine.loan(loan.id).unwrap().is_open());
    }

    #[test]
    fn test_discard_guards_open_loans() {
        let mut engine = engine_with(&[(1, 1)], &[10]);
        let loan = engine.issue(None, 1, 10, DESK).unwrap();

        let result = engine.discard_loan(loan.id);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::LoanStillOpen { .. }
        ));

        engine.process_return(loan.id, 1, 10).unwrap();
        assert!(engine.discard_loan(loan.id).is_ok());
        assert!(engine.loan(loan.id).is_none());
    }

    #[test]
    fn test_apply_rejects_unregistered_librarian() {
        let mut engine = engine_with(&[(1, 1)], &[10]);

        let result = engine.apply(CirculationRecord {
            op: OperationType::Borrow,
            book: 1,
            reader: 10,
            loan: None,
            librarian: 99,
        });
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::UnknownLibrarian { librarian: 99 }
        ));
        assert_eq!(engine.book(1).unwrap().copies, 1);
    }

    #[test]
    fn test_apply_routes_borrow_and_return() {
        let mut engine = engine_with(&[(1, 1)], &[10]);

        let loan = engine
            .apply(CirculationRecord {
                op: OperationType::Borrow,
                book: 1,
                reader: 10,
                loan: Some(7),
                librarian: DESK,
            })
            .unwrap();
        assert_eq!(loan.id, 7);

        let closed = engine
            .apply(CirculationRecord {
                op: OperationType::Return,
                book: 1,
                reader: 10,
                loan: Some(7),
                librarian: DESK,
            })
            .unwrap();
        assert!(!closed.is_open());
    }

    #[test]
    fn test_apply_return_without_loan_id_fails() {
        let mut engine = engine_with(&[(1, 1)], &[10]);

        let result = engine.apply(CirculationRecord {
            op: OperationType::Return,
            book: 1,
            reader: 10,
            loan: None,
            librarian: DESK,
        });
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::MissingLoanId { .. }
        ));
    }

    #[test]
    fn test_record_management_through_the_facade() {
        let mut engine = engine_with(&[(1, 2)], &[10]);

        // book edits are record management, not lending
        let mut second_edition = engine.book(1).unwrap().clone();
        second_edition.title = "Second edition".to_string();
        engine.update_book(second_edition).unwrap();
        assert_eq!(engine.book(1).unwrap().title, "Second edition");

        let mut renamed = engine.reader(10).unwrap().clone();
        renamed.email = "new@lib.org".to_string();
        engine.update_reader(renamed).unwrap();
        assert_eq!(engine.reader(10).unwrap().email, "new@lib.org");

        engine.remove_reader(10).unwrap();
        assert!(engine.reader(10).is_none());
    }

    #[test]
    fn test_copies_conserved_across_sequence() {
        let mut engine = engine_with(&[(1, 4)], &[10, 11]);

        let a = engine.issue(None, 1, 10, DESK).unwrap();
        let b = engine.issue(None, 1, 11, DESK).unwrap();
        engine.process_return(a.id, 1, 10).unwrap();
        let c = engine.issue(None, 1, 10, DESK).unwrap();

        let snapshot = engine.catalog_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].copies as usize + snapshot[0].loaned, 4);
        assert_eq!(snapshot[0].loaned, 2);

        engine.process_return(b.id, 1, 11).unwrap();
        engine.process_return(c.id, 1, 10).unwrap();
        let snapshot = engine.catalog_snapshot();
        assert_eq!(snapshot[0].copies, 4);
        assert_eq!(snapshot[0].loaned, 0);
    }

    #[test]
    fn test_borrow_cap_scenario() {
        // Book with 5 copies: three issues take the reader to the cap,
        // the fourth is rejected, a return reopens capacity.
        let mut engine = engine_with(&[(1, 5)], &[10]);

        let loans: Vec<Loan> = (0..3)
            .map(|_| engine.issue(None, 1, 10, DESK).unwrap())
            .collect();
        assert_eq!(engine.book(1).unwrap().copies, 2);
        assert_eq!(engine.open_loans_for_reader(10).len(), 3);

        let result = engine.issue(None, 1, 10, DESK);
        assert!(matches!(
            result.unwrap_err(),
            CirculationError::BorrowLimitExceeded { .. }
        ));

        engine.process_return(loans[0].id, 1, 10).unwrap();
        assert_eq!(engine.book(1).unwrap().copies, 3);
        assert_eq!(engine.open_loans_for_reader(10).len(), 2);

        engine.issue(None, 1, 10, DESK).unwrap();
        assert_eq!(engine.book(1).unwrap().copies, 2);
    }
}
