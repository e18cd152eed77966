//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It processes circulation records in batches
//! using thread-based parallelism with reader-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (reader partitioning + tasks)
//!     └── AsyncCirculationEngine (thread-safe lending)
//!         ├── AsyncCatalog / AsyncReaderDirectory
//!         ├── AsyncLibrarianRoster / AsyncLoanLedger
//!         └── LockTable (per-book / per-reader critical sections)
//! ```
//!
//! # Ordering
//!
//! Batches are processed sequentially so that one reader's records never
//! span two in-flight batches; within a batch, different readers proceed
//! in parallel while each reader's own records stay ordered.

use crate::core::r#async::{
    AsyncCatalog, AsyncCirculationEngine, AsyncLibrarianRoster, AsyncLoanLedger,
    AsyncReaderDirectory, BatchProcessor,
};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_catalog_csv;
use crate::io::seed::SeedData;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how circulation records are batched and the number of worker
/// threads processing each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Maximum number of worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults, with a logged warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "invalid batch_size (0), using default ({})",
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "invalid max_concurrent_batches (0), using default ({})",
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Records are read in batches and each batch is fanned out across tokio
/// tasks by reader ID. The engine's critical sections keep the lending
/// invariants intact no matter how the tasks interleave.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Seed the concurrent stores from the loaded seed records
    ///
    /// Runs before any worker task exists, so the uniqueness scans in the
    /// stores cannot race lending operations.
    fn seed_stores(
        seed: &SeedData,
        catalog: &AsyncCatalog,
        readers: &AsyncReaderDirectory,
        roster: &AsyncLibrarianRoster,
    ) -> Result<(), String> {
        for librarian in &seed.librarians {
            roster
                .register(librarian.clone())
                .map_err(|e| format!("Invalid librarian seed: {}", e))?;
        }
        for book in &seed.books {
            catalog
                .add_book(book.clone())
                .map_err(|e| format!("Invalid book seed: {}", e))?;
        }
        for reader in &seed.readers {
            readers
                .add_reader(reader.clone())
                .map_err(|e| format!("Invalid reader seed: {}", e))?;
        }
        Ok(())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process the circulation log and write the final catalog state
    ///
    /// Pipeline:
    /// 1. Build the thread-safe stores and seed them
    /// 2. Create a tokio multi-threaded runtime
    /// 3. Read the log in batches via AsyncReader
    /// 4. Process each batch through the BatchProcessor, waiting for it
    ///    to complete before reading the next (cross-batch ordering)
    /// 5. Log rejected records, then write the final catalog snapshot
    fn process(
        &self,
        seed: &SeedData,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let catalog = Arc::new(AsyncCatalog::new());
            let readers = Arc::new(AsyncReaderDirectory::new());
            let roster = Arc::new(AsyncLibrarianRoster::new());
            let ledger = Arc::new(AsyncLoanLedger::new());

            Self::seed_stores(seed, &catalog, &readers, &roster)?;

            let engine = Arc::new(AsyncCirculationEngine::new(
                Arc::clone(&catalog),
                Arc::clone(&readers),
                Arc::clone(&roster),
                Arc::clone(&ledger),
            ));
            let processor = BatchProcessor::new(Arc::clone(&engine));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch so a reader's records never
                // span two in-flight batches
                let results = processor.process_batch(batch).await;
                for outcome in results {
                    if let Err(e) = outcome.result {
                        tracing::warn!(error = %e, "circulation record rejected");
                    }
                }
            }

            write_catalog_csv(&engine.catalog_snapshot(), output)?;

            Ok(())
        })
    }
}
