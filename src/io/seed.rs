//! Seed-file loading
//!
//! The CLI seeds the engine from three CSV files before the circulation
//! log is processed: the book catalog, the reader directory and the
//! librarian roster. Seed files are trusted configuration; unlike
//! circulation rows, a malformed seed row is a fatal error rather than a
//! skip-and-continue condition.
//!
//! Expected columns:
//! - books: `id, title, author, year, isbn, copies` (year and isbn may be
//!   empty)
//! - readers: `id, name, email`
//! - librarians: `id, email`

use crate::types::{Book, Librarian, Reader};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::path::Path;

/// The three record sets the engine is seeded from
#[derive(Debug, Clone)]
pub struct SeedData {
    /// Catalog entries
    pub books: Vec<Book>,
    /// Registered readers
    pub readers: Vec<Reader>,
    /// Registered librarians
    pub librarians: Vec<Librarian>,
}

/// Load all three seed files
///
/// # Arguments
///
/// * `books_path` - Path to the book catalog CSV
/// * `readers_path` - Path to the reader directory CSV
/// * `librarians_path` - Path to the librarian roster CSV
///
/// # Returns
///
/// * `Ok(SeedData)` if every file parsed cleanly
/// * `Err(String)` naming the file and row of the first failure
pub fn load_seed_data(
    books_path: &Path,
    readers_path: &Path,
    librarians_path: &Path,
) -> Result<SeedData, String> {
    Ok(SeedData {
        books: load_records(books_path, "books")?,
        readers: load_records(readers_path, "readers")?,
        librarians: load_records(librarians_path, "librarians")?,
    })
}

/// Load one seed file into typed records
///
/// The CSV reader trims whitespace in all fields; every row must
/// deserialize, and the first failure aborts the load with the row number
/// in the message.
fn load_records<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>, String> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to open {} file '{}': {}", what, path.display(), e))?;

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        let record = result.map_err(|e| {
            format!(
                "{} file '{}' line {}: {}",
                what,
                path.display(),
                index + 2, // header occupies line 1
                e
            )
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_load_books_with_optional_fields() {
        let file = create_temp_csv(
            "id,title,author,year,isbn,copies\n\
             1,Dune,Frank Herbert,1965,978-0441172719,3\n\
             2,Untitled,Anonymous,,,1\n",
        );

        let books: Vec<Book> = load_records(file.path(), "books").unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].year, Some(1965));
        assert_eq!(books[0].isbn.as_deref(), Some("978-0441172719"));
        assert_eq!(books[1].year, None);
        assert_eq!(books[1].isbn, None);
        assert_eq!(books[1].copies, 1);
    }

    #[test]
    fn test_load_readers() {
        let file = create_temp_csv("id,name,email\n10,Ada,ada@lib.org\n");

        let readers: Vec<Reader> = load_records(file.path(), "readers").unwrap();
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].name, "Ada");
    }

    #[test]
    fn test_load_reports_bad_row_with_line_number() {
        let file = create_temp_csv(
            "id,name,email\n\
             10,Ada,ada@lib.org\n\
             not_an_id,Bob,bob@lib.org\n",
        );

        let result: Result<Vec<Reader>, String> = load_records(file.path(), "readers");
        let error = result.unwrap_err();
        assert!(error.contains("line 3"));
        assert!(error.contains("readers"));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result: Result<Vec<Book>, String> =
            load_records(Path::new("nonexistent.csv"), "books");
        assert!(result.unwrap_err().contains("Failed to open books file"));
    }

    #[test]
    fn test_load_seed_data_combines_all_files() {
        let books = create_temp_csv("id,title,author,year,isbn,copies\n1,Dune,Herbert,,,2\n");
        let readers = create_temp_csv("id,name,email\n10,Ada,ada@lib.org\n");
        let librarians = create_temp_csv("id,email\n1,desk@lib.org\n");

        let seed = load_seed_data(books.path(), readers.path(), librarians.path()).unwrap();
        assert_eq!(seed.books.len(), 1);
        assert_eq!(seed.readers.len(), 1);
        assert_eq!(seed.librarians.len(), 1);
    }
}
