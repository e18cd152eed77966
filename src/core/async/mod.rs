//! Thread-safe implementations of the core components
//!
//! This module provides concurrent implementations of the circulation
//! stores and engine for multi-worker processing.
//!
//! # Architecture
//!
//! The stores mirror their synchronous counterparts but use concurrent
//! data structures:
//!
//! - **AsyncCatalog / AsyncReaderDirectory / AsyncLibrarianRoster /
//!   AsyncLoanLedger**: DashMap-backed stores with per-entry locking
//! - **LockTable**: per-book and per-reader mutexes scoping the
//!   read-check-write critical sections that span more than one store
//! - **AsyncCirculationEngine**: orchestrates lending inside those
//!   critical sections
//! - **BatchProcessor**: reader-partitioned parallel batch processing
//!
//! # Thread Safety
//!
//! DashMap alone serializes access to a single entry; the lending rules
//! check one store and write another, so the engine additionally holds the
//! book's (and, for issue, the reader's) mutex across the whole check-and-
//! write sequence. Locks are always taken book first, then reader, so no
//! cycle of waiting threads can form.

pub mod batch_processor;
pub mod catalog;
pub mod engine;
pub mod librarian_roster;
pub mod loan_ledger;
pub mod lock_table;
pub mod reader_directory;

pub use batch_processor::BatchProcessor;
pub use catalog::AsyncCatalog;
pub use engine::AsyncCirculationEngine;
pub use librarian_roster::AsyncLibrarianRoster;
pub use loan_ledger::AsyncLoanLedger;
pub use lock_table::LockTable;
pub use reader_directory::AsyncReaderDirectory;
