//! Error types for the circulation engine
//!
//! This module defines all error types that can occur while processing
//! circulation operations. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: referenced book, reader, loan or librarian missing
//! - **Lending Errors**: no copies on the shelf, borrow cap reached,
//!   wrong loan reference, double return
//! - **Registry Errors**: duplicate loan IDs, ISBNs or emails
//! - **Storage Errors**: the underlying store could not complete an
//!   operation (e.g. a poisoned lock); the operation fails as a unit

use thiserror::Error;

use super::book::BookId;
use super::librarian::LibrarianId;
use super::loan::LoanId;
use super::reader::ReaderId;

/// Main error type for the circulation engine
///
/// This enum represents all possible errors that can occur during
/// circulation processing. Each variant includes the identifiers needed
/// to diagnose the rejected operation. All variants are expected,
/// recoverable-by-caller conditions; none are process-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CirculationError {
    /// Referenced book does not exist in the catalog
    ///
    /// Raised on issue, and defensively on return when the catalog entry
    /// was deleted while the loan was open.
    #[error("Book {book} not found")]
    BookNotFound {
        /// The book ID that was not found
        book: BookId,
    },

    /// Referenced reader does not exist in the directory
    #[error("Reader {reader} not found")]
    ReaderNotFound {
        /// The reader ID that was not found
        reader: ReaderId,
    },

    /// Referenced loan does not exist in the ledger
    #[error("Loan {loan} not found")]
    LoanNotFound {
        /// The loan ID that was not found
        loan: LoanId,
    },

    /// The acting librarian is not on the roster
    ///
    /// Raised by the identity gate before the lending operation runs;
    /// the lending operations themselves trust the ID they are given.
    #[error("Librarian {librarian} is not registered")]
    UnknownLibrarian {
        /// The unregistered librarian ID
        librarian: LibrarianId,
    },

    /// Issue attempted with zero copies on the shelf
    ///
    /// This is a recoverable error - the issue is rejected, no loan is
    /// created and the shelf count is unchanged.
    #[error("No copies of book {book} available")]
    OutOfStock {
        /// The book with an empty shelf
        book: BookId,
    },

    /// Issue attempted while the reader holds the maximum open loans
    ///
    /// This is a recoverable error - the issue is rejected. The count is
    /// derived from the ledger at the instant of the check, never cached.
    #[error("Reader {reader} already has {open} books on loan")]
    BorrowLimitExceeded {
        /// The reader at the cap
        reader: ReaderId,
        /// The reader's open-loan count at the time of the check
        open: usize,
    },

    /// Return named a book/reader pair the loan was not issued for
    ///
    /// Guards against closing the wrong loan record through an ID
    /// collision or typo. The return is rejected and the loan unchanged.
    #[error("Loan {loan} was not issued for book {book} to reader {reader}")]
    LoanMismatch {
        /// The loan ID supplied
        loan: LoanId,
        /// The book ID supplied with the return
        book: BookId,
        /// The reader ID supplied with the return
        reader: ReaderId,
    },

    /// Return attempted on a loan that is already closed
    ///
    /// This is a recoverable error - the second return is rejected and the
    /// shelf count is not incremented again.
    #[error("Loan {loan} has already been returned")]
    AlreadyReturned {
        /// The closed loan ID
        loan: LoanId,
    },

    /// Discard attempted on a loan that is still open
    ///
    /// Deleting an open loan would lose the only record that a copy is
    /// checked out, so the ledger refuses until the loan is closed.
    #[error("Loan {loan} is still open")]
    LoanStillOpen {
        /// The open loan ID
        loan: LoanId,
    },

    /// Return record is missing the loan ID it should close
    ///
    /// Return operations reference an existing loan. This is a recoverable
    /// error - the record is rejected.
    #[error("Return for book {book} and reader {reader} requires a loan ID")]
    MissingLoanId {
        /// The book ID supplied with the return
        book: BookId,
        /// The reader ID supplied with the return
        reader: ReaderId,
    },

    /// Borrow supplied a loan ID that already exists in the ledger
    ///
    /// Caller-assigned loan IDs must be unique. This is a recoverable
    /// error - the borrow is rejected before any effect.
    #[error("Duplicate loan ID {loan}")]
    DuplicateLoan {
        /// The loan ID that is duplicated
        loan: LoanId,
    },

    /// Book added or updated with an ISBN already in the catalog
    #[error("ISBN '{isbn}' is already in the catalog")]
    DuplicateIsbn {
        /// The conflicting ISBN
        isbn: String,
    },

    /// Reader or librarian registered with an email already in use
    #[error("Email '{email}' is already registered")]
    DuplicateEmail {
        /// The conflicting email address
        email: String,
    },

    /// The underlying store could not complete the operation
    ///
    /// Propagated as-is; the whole operation fails as a unit and no
    /// partial write survives. Re-checking preconditions afterwards is the
    /// caller's responsibility, since state may have changed.
    #[error("Storage failure during {operation}")]
    StorageFailure {
        /// Operation that could not complete
        operation: String,
    },
}

// Helper functions for creating common errors

impl CirculationError {
    /// Create a BookNotFound error
    pub fn book_not_found(book: BookId) -> Self {
        CirculationError::BookNotFound { book }
    }

    /// Create a ReaderNotFound error
    pub fn reader_not_found(reader: ReaderId) -> Self {
        CirculationError::ReaderNotFound { reader }
    }

    /// Create a LoanNotFound error
    pub fn loan_not_found(loan: LoanId) -> Self {
        CirculationError::LoanNotFound { loan }
    }

    /// Create an UnknownLibrarian error
    pub fn unknown_librarian(librarian: LibrarianId) -> Self {
        CirculationError::UnknownLibrarian { librarian }
    }

    /// Create an OutOfStock error
    pub fn out_of_stock(book: BookId) -> Self {
        CirculationError::OutOfStock { book }
    }

    /// Create a BorrowLimitExceeded error
    pub fn borrow_limit_exceeded(reader: ReaderId, open: usize) -> Self {
        CirculationError::BorrowLimitExceeded { reader, open }
    }

    /// Create a LoanMismatch error
    pub fn loan_mismatch(loan: LoanId, book: BookId, reader: ReaderId) -> Self {
        CirculationError::LoanMismatch { loan, book, reader }
    }

    /// Create an AlreadyReturned error
    pub fn already_returned(loan: LoanId) -> Self {
        CirculationError::AlreadyReturned { loan }
    }

    /// Create a LoanStillOpen error
    pub fn loan_still_open(loan: LoanId) -> Self {
        CirculationError::LoanStillOpen { loan }
    }

    /// Create a MissingLoanId error
    pub fn missing_loan_id(book: BookId, reader: ReaderId) -> Self {
        CirculationError::MissingLoanId { book, reader }
    }

    /// Create a DuplicateLoan error
    pub fn duplicate_loan(loan: LoanId) -> Self {
        CirculationError::DuplicateLoan { loan }
    }

    /// Create a DuplicateIsbn error
    pub fn duplicate_isbn(isbn: &str) -> Self {
        CirculationError::DuplicateIsbn {
            isbn: isbn.to_string(),
        }
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email(email: &str) -> Self {
        CirculationError::DuplicateEmail {
            email: email.to_string(),
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(operation: &str) -> Self {
        CirculationError::StorageFailure {
            operation: operation.to_string(),
        }
    }
}
