//! Batch processing with reader-based partitioning
//!
//! This module provides the `BatchProcessor`, which fans a batch of
//! circulation records out across tokio tasks while keeping each reader's
//! records in their original order.
//!
//! # Design
//!
//! The reader is the actor whose operation order matters: the borrow cap
//! is per reader, and a borrow followed by its return names the same
//! reader. Partitioning by reader ID lets different readers' records run
//! in parallel while each reader's own sequence stays intact. Records for
//! the same book from different readers may interleave; the engine's
//! per-book critical sections resolve those races safely.
//!
//! # Thread Safety
//!
//! The processor is cloneable and shares the engine through `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use super::AsyncCirculationEngine;
use crate::types::{CirculationError, CirculationRecord, Loan, ReaderId};

/// Result of processing a single circulation record
///
/// Contains the original record and the outcome of processing it.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The circulation record that was processed
    pub record: CirculationRecord,

    /// The result of processing (the created/closed loan, or the error)
    pub result: Result<Loan, CirculationError>,
}

/// Batch processor with reader-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Thread-safe lending engine shared across tasks
    engine: Arc<AsyncCirculationEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared engine
    pub fn new(engine: Arc<AsyncCirculationEngine>) -> Self {
        Self { engine }
    }

    /// Partition a batch of records by reader ID
    ///
    /// Every record lands in exactly one sub-batch and each sub-batch
    /// preserves the original relative order of that reader's records.
    pub fn partition_by_reader(
        &self,
        batch: Vec<CirculationRecord>,
    ) -> HashMap<ReaderId, Vec<CirculationRecord>> {
        let mut reader_batches: HashMap<ReaderId, Vec<CirculationRecord>> = HashMap::new();

        for record in batch {
            reader_batches
                .entry(record.reader)
                .or_default()
                .push(record);
        }

        reader_batches
    }

    /// Process one reader's records sequentially, in order
    ///
    /// All records are processed even when some fail; failures are
    /// captured in the results rather than stopping the sequence.
    pub async fn process_reader_records(
        &self,
        records: Vec<CirculationRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let result = self.engine.process(record.clone());
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch of records with reader-based partitioning
    ///
    /// Spawns one tokio task per reader present in the batch and waits for
    /// all of them. Results may come back in a different order than the
    /// input; each reader's own results stay in order.
    pub async fn process_batch(&self, batch: Vec<CirculationRecord>) -> Vec<ProcessingResult> {
        let reader_batches = self.partition_by_reader(batch);

        let mut tasks = Vec::new();
        for (_reader_id, records) in reader_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_reader_records(records).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(reader_results) => results.extend(reader_results),
                Err(e) => {
                    tracing::error!(error = ?e, "batch task panicked");
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::r#async::{
        AsyncCatalog, AsyncLibrarianRoster, AsyncLoanLedger, AsyncReaderDirectory,
    };
    use crate::types::{Book, Librarian, LibrarianId, OperationType, Reader};

    const DESK: LibrarianId = 1;

    fn processor_with(copies: u32, readers: &[ReaderId]) -> BatchProcessor {
        let catalog = Arc::new(AsyncCatalog::new());
        let directory = Arc::new(AsyncReaderDirectory::new());
        let roster = Arc::new(AsyncLibrarianRoster::new());
        let ledger = Arc::new(AsyncLoanLedger::new());

        roster
            .register(Librarian {
                id: DESK,
                email: "desk@lib.org".to_string(),
            })
            .unwrap();
        catalog
            .add_book(Book {
                id: 1,
                title: "Title 1".to_string(),
                author: "Author".to_string(),
                year: None,
                isbn: None,
                copies,
            })
            .unwrap();
        for &id in readers {
            directory
                .add_reader(Reader {
                    id,
                    name: format!("Reader {}", id),
                    email: format!("r{}@lib.org", id),
                })
                .unwrap();
        }

        let engine = Arc::new(AsyncCirculationEngine::new(
            catalog, directory, roster, ledger,
        ));
        BatchProcessor::new(engine)
    }

    fn borrow(reader: ReaderId, loan: u64) -> CirculationRecord {
        CirculationRecord {
            op: OperationType::Borrow,
            book: 1,
            reader,
            loan: Some(loan),
            librarian: DESK,
        }
    }

    fn return_of(reader: ReaderId, loan: u64) -> CirculationRecord {
        CirculationRecord {
            op: OperationType::Return,
            book: 1,
            reader,
            loan: Some(loan),
            librarian: DESK,
        }
    }

    #[test]
    fn test_partition_keeps_per_reader_order() {
        let processor = processor_with(5, &[10, 11]);

        let batch = vec![
            borrow(10, 1),
            borrow(11, 2),
            return_of(10, 1),
            borrow(10, 3),
        ];
        let partitions = processor.partition_by_reader(batch);

        assert_eq!(partitions.len(), 2);
        let for_ten = &partitions[&10];
        assert_eq!(for_ten.len(), 3);
        assert_eq!(for_ten[0].op, OperationType::Borrow);
        assert_eq!(for_ten[1].op, OperationType::Return);
        assert_eq!(for_ten[2].op, OperationType::Borrow);
        assert_eq!(partitions[&11].len(), 1);
    }

    #[tokio::test]
    async fn test_process_batch_runs_every_record() {
        let processor = processor_with(5, &[10, 11]);

        let batch = vec![
            borrow(10, 1),
            borrow(11, 2),
            return_of(10, 1),
            borrow(10, 3),
        ];
        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.result.is_ok()));
    }

    #[tokio::test]
    async fn test_failures_are_captured_not_fatal() {
        let processor = processor_with(5, &[10]);

        // the second record returns a loan that was never issued
        let batch = vec![borrow(10, 1), return_of(10, 99), return_of(10, 1)];
        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 3);
        let failures: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].result,
            Err(CirculationError::LoanNotFound { loan: 99 })
        ));
    }

    #[tokio::test]
    async fn test_borrow_cap_holds_within_one_reader_partition() {
        let processor = processor_with(5, &[10]);

        let batch = vec![borrow(10, 1), borrow(10, 2), borrow(10, 3), borrow(10, 4)];
        let results = processor.process_batch(batch).await;

        let rejected: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
        assert_eq!(rejected.len(), 1);
        assert!(matches!(
            rejected[0].result,
            Err(CirculationError::BorrowLimitExceeded { .. })
        ));
        // the rejected record is the reader's fourth, in file order
        assert_eq!(rejected[0].record.loan, Some(4));
    }
}
