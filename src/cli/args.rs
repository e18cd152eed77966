use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Process a library circulation log against seeded catalog state
#[derive(Parser, Debug)]
#[command(name = "circulation-engine")]
#[command(
    about = "Process a library circulation log against seeded catalog state",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file containing circulation records (borrow/return)
    #[arg(value_name = "INPUT", help = "Path to the circulation log CSV file")]
    pub input_file: PathBuf,

    /// Book catalog seed file
    #[arg(
        long = "books",
        value_name = "FILE",
        help = "Path to the book catalog CSV (id,title,author,year,isbn,copies)"
    )]
    pub books_file: PathBuf,

    /// Reader directory seed file
    #[arg(
        long = "readers",
        value_name = "FILE",
        help = "Path to the reader directory CSV (id,name,email)"
    )]
    pub readers_file: PathBuf,

    /// Librarian roster seed file
    #[arg(
        long = "librarians",
        value_name = "FILE",
        help = "Path to the librarian roster CSV (id,email)"
    )]
    pub librarians_file: PathBuf,

    /// Processing strategy to use for the circulation log
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of circulation records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent batches (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies for the circulation log
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the CLI values when provided and falls back to defaults
    /// otherwise; zero values are corrected by `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}
