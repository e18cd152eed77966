//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Synchronous circulation-log reader with iterator interface
//! - `async_reader` - Asynchronous circulation-log reader with batch interface
//! - `seed` - Loading of the catalog/reader/librarian seed files

pub mod async_reader;
pub mod csv_format;
pub mod seed;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_catalog_csv, CsvRecord};
pub use seed::{load_seed_data, SeedData};
pub use sync_reader::SyncReader;
