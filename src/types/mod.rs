//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `book`: Catalog entries and shelf state
//! - `reader`: Registered readers
//! - `librarian`: The authenticated actors who perform circulation operations
//! - `loan`: Loan records and their lifecycle
//! - `record`: Circulation log records read from CSV input
//! - `error`: Error types for the circulation engine

pub mod book;
pub mod error;
pub mod librarian;
pub mod loan;
pub mod reader;
pub mod record;

pub use book::{Book, BookId, BookStatus};
pub use error::CirculationError;
pub use librarian::{Librarian, LibrarianId};
pub use loan::{Loan, LoanId};
pub use reader::{Reader, ReaderId};
pub use record::{CirculationRecord, OperationType};
