//! CSV format handling for circulation records and catalog output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Catalog state output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BookId, BookStatus, CirculationRecord, LibrarianId, LoanId, OperationType, ReaderId};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the circulation-log format with columns:
/// `op, book, reader, loan, librarian`.
/// The loan field is optional because borrow rows may leave ID assignment
/// to the ledger; return rows must fill it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub book: BookId,
    pub reader: ReaderId,
    pub loan: Option<String>,
    pub librarian: LibrarianId,
}

/// Convert a CsvRecord to a CirculationRecord
///
/// This function:
/// - Parses the operation string into an OperationType enum
/// - Parses the loan column into a LoanId (if present)
/// - Validates that return rows carry a loan ID
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(CirculationRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<CirculationRecord, String> {
    let op = match csv_record.op.to_lowercase().as_str() {
        "borrow" => OperationType::Borrow,
        "return" => OperationType::Return,
        _ => {
            return Err(format!(
                "Invalid operation: '{}' for book {}",
                csv_record.op, csv_record.book
            ))
        }
    };

    // Parse loan ID if present
    let loan = match csv_record.loan {
        Some(loan_str) if !loan_str.trim().is_empty() => match loan_str.trim().parse::<LoanId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return Err(format!(
                    "Invalid loan ID '{}' for book {}",
                    loan_str, csv_record.book
                ))
            }
        },
        _ => None,
    };

    // Return rows close an existing loan and must name it
    if op == OperationType::Return && loan.is_none() {
        return Err(format!(
            "Return of book {} by reader {} requires a loan ID",
            csv_record.book, csv_record.reader
        ));
    }

    Ok(CirculationRecord {
        op,
        book: csv_record.book,
        reader: csv_record.reader,
        loan,
        librarian: csv_record.librarian,
    })
}

/// Write final catalog states to CSV format
///
/// Writes one row per book with columns: book, title, copies, loaned.
/// Rows are sorted by book ID for deterministic output.
///
/// # Arguments
///
/// * `catalog` - Slice of per-book states to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_catalog_csv(catalog: &[BookStatus], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["book", "title", "copies", "loaned"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    // Sort by book ID for deterministic output
    let mut sorted: Vec<&BookStatus> = catalog.iter().collect();
    sorted.sort_by_key(|status| status.book);

    for status in sorted {
        writer
            .write_record(&[
                status.book.to_string(),
                status.title.clone(),
                status.copies.to_string(),
                status.loaned.to_string(),
            ])
            .map_err(|e| format!("Failed to write catalog record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn csv_record(op: &str, loan: Option<&str>) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            book: 1,
            reader: 2,
            loan: loan.map(|s| s.to_string()),
            librarian: 3,
        }
    }

    #[rstest]
    #[case("borrow", OperationType::Borrow, None)]
    #[case("borrow", OperationType::Borrow, Some("7"))]
    #[case("BORROW", OperationType::Borrow, Some("7"))] // case insensitive
    #[case("Return", OperationType::Return, Some("7"))]
    fn test_convert_csv_record_valid(
        #[case] op: &str,
        #[case] expected_op: OperationType,
        #[case] loan: Option<&str>,
    ) {
        let result = convert_csv_record(csv_record(op, loan));
        assert!(result.is_ok());

        let record = result.unwrap();
        assert_eq!(record.op, expected_op);
        assert_eq!(record.book, 1);
        assert_eq!(record.reader, 2);
        assert_eq!(record.librarian, 3);
        assert_eq!(record.loan, loan.map(|s| s.parse().unwrap()));
    }

    #[test]
    fn test_convert_borrow_with_empty_loan_column() {
        let result = convert_csv_record(csv_record("borrow", Some("  ")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().loan, None);
    }

    #[rstest]
    #[case::invalid_op("renew", Some("7"), "Invalid operation")]
    #[case::return_missing_loan("return", None, "requires a loan ID")]
    #[case::return_empty_loan("return", Some(""), "requires a loan ID")]
    #[case::invalid_loan_id("borrow", Some("not_a_number"), "Invalid loan ID")]
    #[case::negative_loan_id("return", Some("-4"), "Invalid loan ID")]
    fn test_convert_csv_record_errors(
        #[case] op: &str,
        #[case] loan: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let result = convert_csv_record(csv_record(op, loan));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[test]
    fn test_convert_trims_loan_whitespace() {
        let result = convert_csv_record(csv_record("return", Some("  42  ")));
        assert_eq!(result.unwrap().loan, Some(42));
    }

    #[rstest]
    #[case::single_book(
        vec![BookStatus { book: 1, title: "Dune".to_string(), copies: 2, loaned: 1 }],
        "book,title,copies,loaned\n1,Dune,2,1\n"
    )]
    #[case::sorted_by_book_id(
        vec![
            BookStatus { book: 3, title: "C".to_string(), copies: 0, loaned: 0 },
            BookStatus { book: 1, title: "A".to_string(), copies: 1, loaned: 0 },
            BookStatus { book: 2, title: "B".to_string(), copies: 2, loaned: 2 },
        ],
        "book,title,copies,loaned\n1,A,1,0\n2,B,2,2\n3,C,0,0\n"
    )]
    #[case::empty_catalog(
        vec![],
        "book,title,copies,loaned\n"
    )]
    fn test_write_catalog_csv(#[case] catalog: Vec<BookStatus>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        let result = write_catalog_csv(&catalog, &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, expected_output);
    }
}
