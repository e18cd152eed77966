//! Circulation log records read from CSV input
//!
//! Each row of the circulation log describes one operation performed at the
//! lending desk. Rows are converted from their raw CSV form by the
//! `io::csv_format` module before reaching the engine.

use serde::{Deserialize, Serialize};

use super::book::BookId;
use super::librarian::LibrarianId;
use super::loan::LoanId;
use super::reader::ReaderId;

/// Circulation operations supported by the engine
///
/// Catalog and registry edits are seed-file concerns; the circulation log
/// itself only moves copies between the shelf and readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Issue a copy of a book to a reader, creating an open loan
    ///
    /// Fails when the book has no copies on the shelf or the reader has
    /// reached the concurrent-loan cap.
    Borrow,

    /// Close an open loan, putting the copy back on the shelf
    ///
    /// References an existing loan and must name the same book and reader
    /// the loan was issued for.
    Return,
}

/// A parsed circulation log record
///
/// The `loan` field is optional on borrow rows: when present it names the
/// loan being created (so later rows in the same file can reference it);
/// when absent the ledger assigns the next free ID. Return rows always
/// carry the loan ID being closed.
#[derive(Debug, Clone)]
pub struct CirculationRecord {
    /// The operation performed (borrow or return)
    pub op: OperationType,

    /// The book the operation concerns
    pub book: BookId,

    /// The reader the operation concerns
    pub reader: ReaderId,

    /// Loan ID: the ID to create (optional, borrow) or close (return)
    pub loan: Option<LoanId>,

    /// The librarian performing the operation
    pub librarian: LibrarianId,
}
