//! Library Circulation Engine
//! # Overview
//!
//! This library tracks the lending lifecycle of a book catalog: issuing
//! copies to readers, taking returns, and keeping the shelf counts and the
//! loan ledger consistent under concurrent access.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Book, Reader, Loan, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Lending orchestration (issue/return/discard)
//!   - [`core::catalog`] - Book records and shelf counts
//!   - [`core::reader_directory`] - Registered readers
//!   - [`core::librarian_roster`] - Registered librarians (identity gate)
//!   - [`core::loan_ledger`] - Loan records and derived open-loan queries
//! - [`io`] - Seed loading, circulation-log parsing, catalog output
//! - [`strategy`] - Pluggable sync/async processing pipelines
//!
//! # Circulation Rules
//!
//! The engine enforces three invariants:
//!
//! - **Conservation**: for every book, shelf copies plus open loans is
//!   constant between catalog edits; issue moves a unit one way, return
//!   moves it back
//! - **Borrow cap**: a reader holds at most three open loans, counted from
//!   the ledger at the instant of the check
//! - **Exactly-once return**: a loan's return timestamp is set once and
//!   never changes; a second return is rejected
//!
//! Every failed operation leaves no trace: preconditions are checked in
//! order inside a critical section and effects happen only after all of
//! them pass.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{
    AsyncCirculationEngine, CirculationEngine, LoanLedger, MAX_OPEN_LOANS,
};
pub use io::write_catalog_csv;
pub use types::{
    Book, BookId, BookStatus, CirculationError, CirculationRecord, Librarian, LibrarianId, Loan,
    LoanId, OperationType, Reader, ReaderId,
};
