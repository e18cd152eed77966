//! Processing strategy module for circulation processing
//!
//! This module defines the Strategy pattern for complete circulation
//! pipelines, encompassing seed loading into the engine, circulation-log
//! parsing and lending processing. This allows different processing
//! implementations (synchronous, asynchronous batch) to be selected at
//! runtime.

use crate::cli::StrategyType;
use crate::io::seed::SeedData;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete circulation pipelines
///
/// Each strategy seeds an engine from the provided seed data, reads
/// circulation records from the log file, processes them through the
/// engine, and writes the final catalog state to the output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process a circulation log and write the final catalog state
    ///
    /// # Arguments
    ///
    /// * `seed` - Catalog, reader and librarian records to seed the engine
    /// * `input_path` - Path to the circulation-log CSV file
    /// * `output` - Mutable reference to a writer for the catalog CSV
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed (possibly with recoverable,
    ///   logged per-record rejections)
    /// * `Err(String)` if a fatal error occurred (unreadable log file,
    ///   conflicting seed rows, I/O failure)
    ///
    /// Individual record rejections are logged and never abort the run;
    /// processing continues with the next record.
    fn process(
        &self,
        seed: &SeedData,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// Factory selecting the concrete pipeline at runtime from the CLI
/// strategy flag and optional batch configuration.
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create
/// * `config` - Optional configuration for async batch processing
///   (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
