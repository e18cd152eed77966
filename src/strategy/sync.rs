//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of
//! the ProcessingStrategy trait. It orchestrates circulation processing by
//! coordinating the SyncReader (for CSV input) and CirculationEngine (for
//! the lending rules).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Lending decisions to `CirculationEngine`
//! - CSV output to `csv_format::write_catalog_csv`
//!
//! # Memory Efficiency
//!
//! Circulation records stream one at a time; memory usage is
//! O(catalog + loans), not O(log size).

use crate::core::CirculationEngine;
use crate::io::csv_format::write_catalog_csv;
use crate::io::seed::SeedData;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// Implements the ProcessingStrategy trait using single-threaded,
/// synchronous processing. The engine takes `&mut self` per operation, so
/// the borrow checker provides all the serialization this pipeline needs.
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl SyncProcessingStrategy {
    /// Seed an engine from the loaded seed records
    ///
    /// Conflicting seed rows (duplicate ISBNs or emails) are fatal:
    /// seeds are configuration, not a stream to skip through.
    fn seed_engine(seed: &SeedData) -> Result<CirculationEngine, String> {
        let mut engine = CirculationEngine::new();

        for librarian in &seed.librarians {
            engine
                .register_librarian(librarian.clone())
                .map_err(|e| format!("Invalid librarian seed: {}", e))?;
        }
        for book in &seed.books {
            engine
                .add_book(book.clone())
                .map_err(|e| format!("Invalid book seed: {}", e))?;
        }
        for reader in &seed.readers {
            engine
                .add_reader(reader.clone())
                .map_err(|e| format!("Invalid reader seed: {}", e))?;
        }

        Ok(engine)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process the circulation log and write the final catalog state
    ///
    /// Pipeline:
    /// 1. Seed a CirculationEngine from the seed records
    /// 2. Stream circulation records through the engine one at a time
    /// 3. Write the final catalog snapshot as CSV
    ///
    /// Fatal errors (unreadable log, conflicting seeds) are returned.
    /// Individual record rejections are logged and processing continues.
    fn process(
        &self,
        seed: &SeedData,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let mut engine = Self::seed_engine(seed)?;

        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(record) => {
                    if let Err(e) = engine.apply(record) {
                        tracing::warn!(error = %e, "circulation record rejected");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "circulation log parse error");
                }
            }
        }

        write_catalog_csv(&engine.catalog_snapshot(), output)?;

        Ok(())
    }
}
