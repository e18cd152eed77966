//! Core business logic module
//!
//! This module contains the core circulation components:
//! - `catalog` - Book catalog store
//! - `reader_directory` - Registered reader store
//! - `librarian_roster` - Registered librarians (the identity gate)
//! - `loan_ledger` - Loan records and derived open-loan queries
//! - `engine` - Lending orchestration (issue/return/discard)
//! - `async` - Thread-safe implementations for concurrent processing

pub mod r#async;
pub mod catalog;
pub mod engine;
pub mod librarian_roster;
pub mod loan_ledger;
pub mod reader_directory;

pub use catalog::Catalog;
pub use engine::{CirculationEngine, MAX_OPEN_LOANS};
pub use librarian_roster::LibrarianRoster;
pub use loan_ledger::LoanLedger;
pub use r#async::{
    AsyncCatalog, AsyncCirculationEngine, AsyncLibrarianRoster, AsyncLoanLedger,
    AsyncReaderDirectory, BatchProcessor,
};
pub use reader_directory::ReaderDirectory;
