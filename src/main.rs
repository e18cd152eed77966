//! Library Circulation Engine CLI
//!
//! Command-line interface for processing a library circulation log.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --books books.csv --readers readers.csv \
//!     --librarians librarians.csv circulation.csv > catalog.csv
//! cargo run -- --strategy sync --books books.csv --readers readers.csv \
//!     --librarians librarians.csv circulation.csv > catalog.csv
//! ```
//!
//! The program seeds the engine from the three seed files, streams the
//! circulation log through the selected processing strategy, and writes
//! the final catalog state (book, title, copies, loaned) to stdout.
//! Rejected records are logged to stderr and never abort the run.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, malformed seed data, I/O failure, etc.)

use circulation_engine::cli;
use circulation_engine::io::seed;
use circulation_engine::strategy;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Log to stderr; RUST_LOG overrides the default level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    // Seed records are shared by both strategies; load them up front
    let seed_data = match seed::load_seed_data(
        &args.books_file,
        &args.readers_file,
        &args.librarians_file,
    ) {
        Ok(seed_data) => seed_data,
        Err(e) => {
            tracing::error!(error = %e, "failed to load seed files");
            process::exit(1);
        }
    };

    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    // Process the circulation log; output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&seed_data, &args.input_file, &mut output) {
        tracing::error!(error = %e, "processing failed");
        process::exit(1);
    }
}
