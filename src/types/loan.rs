//! Loan types for the circulation engine
//!
//! A loan is the ledger record binding a book, a reader and the librarian
//! who issued it. Loans are created only by issue, mutated exactly once by
//! return, and removed only by the administrative discard path (which is
//! restricted to closed loans).

use chrono::{DateTime, Utc};

use super::book::BookId;
use super::librarian::LibrarianId;
use super::reader::ReaderId;

/// Loan identifier
///
/// Supports loan IDs from 0 to 18,446,744,073,709,551,615
pub type LoanId = u64;

/// A loan ledger record
///
/// `returned_at` is absent while the loan is open. It is set exactly once,
/// by return, and never unset or changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    /// The loan ID (u64)
    pub id: LoanId,

    /// The book this loan was issued for
    pub book: BookId,

    /// The reader holding the copy
    pub reader: ReaderId,

    /// The librarian who performed the issue
    pub librarian: LibrarianId,

    /// When the copy left the shelf
    pub borrowed_at: DateTime<Utc>,

    /// When the copy came back; `None` while the loan is open
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// Whether the loan is still open (the copy has not come back)
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}
