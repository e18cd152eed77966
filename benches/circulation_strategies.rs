//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the performance of the synchronous and
//! asynchronous circulation pipelines using the divan benchmarking
//! framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Fixtures
//!
//! Two representative circulation logs are used:
//! - `circulation_small.csv` - 100 records (50 borrow/return pairs)
//! - `circulation_medium.csv` - 1,000 records (500 borrow/return pairs)
//!
//! Both run against a seeded catalog of 10 books and 20 readers.

use circulation_engine::cli::StrategyType;
use circulation_engine::io::seed::{load_seed_data, SeedData};
use circulation_engine::strategy::{create_strategy, BatchConfig};
use std::path::Path;

fn main() {
    divan::main();
}

fn bench_seed() -> SeedData {
    load_seed_data(
        Path::new("benches/fixtures/books.csv"),
        Path::new("benches/fixtures/readers.csv"),
        Path::new("benches/fixtures/librarians.csv"),
    )
    .expect("Failed to load bench seed files")
}

fn run(strategy_type: StrategyType, fixture: &str) {
    let config = matches!(strategy_type, StrategyType::Async).then(BatchConfig::default);
    let strategy = create_strategy(strategy_type, config);
    let seed = bench_seed();
    let path = format!("benches/fixtures/{}", fixture);
    let mut output = Vec::new();

    strategy
        .process(&seed, Path::new(&path), &mut output)
        .expect("Processing failed");
}

/// Benchmark synchronous pipeline with the small log (100 records)
#[divan::bench]
fn sync_strategy_small() {
    run(StrategyType::Sync, "circulation_small.csv");
}

/// Benchmark asynchronous pipeline with the small log (100 records)
#[divan::bench]
fn async_strategy_small() {
    run(StrategyType::Async, "circulation_small.csv");
}

/// Benchmark synchronous pipeline with the medium log (1,000 records)
#[divan::bench]
fn sync_strategy_medium() {
    run(StrategyType::Sync, "circulation_medium.csv");
}

/// Benchmark asynchronous pipeline with the medium log (1,000 records)
#[divan::bench]
fn async_strategy_medium() {
    run(StrategyType::Async, "circulation_medium.csv");
}
