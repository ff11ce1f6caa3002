//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over statement commands from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use statement_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("statements.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Applying: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as `Err` items carrying the line
//!   number, and iteration continues with the next row

use crate::io::csv_format::{convert_csv_record, CsvRecord, StatementCommand};
use crate::types::LedgerError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// Fields are trimmed and rows may have a variable field count (a
    /// missing amount is reported per row rather than failing the file).
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| {
            LedgerError::io_error(&format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<StatementCommand, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let next = deserializer.next()?;
        // Header is line 1
        self.line_num += 1;

        let line = Some(self.line_num);
        Some(match next {
            Ok(csv_record) => convert_csv_record(csv_record)
                .map_err(|e| LedgerError::parse_error(line, &e.to_string())),
            Err(e) => Err(LedgerError::parse_error(line, &e.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatementType;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const A: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.unwrap_err().to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_records() {
        let csv_content = format!("type,account,amount\ndeposit,{A},100.0\nwithdrawal,{A},50\n");
        let file = create_temp_csv(&csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.account.to_string(), A);
        assert_eq!(first.input.statement_type, StatementType::Deposit);
        assert_eq!(first.input.amount, dec!(100.0));
        let second = records[1].as_ref().unwrap();
        assert_eq!(second.input.statement_type, StatementType::Withdrawal);
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let csv_content = format!(
            "type,account,amount\ndeposit,{A},1\ndeposit,{A},invalid\ndeposit,{A},2\n"
        );
        let file = create_temp_csv(&csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err();
        assert!(matches!(error, LedgerError::ParseError { line: Some(3), .. }));
        assert!(error.to_string().contains("Invalid amount"));
    }

    #[test]
    fn test_sync_reader_handles_whitespace_and_missing_amount() {
        let csv_content = format!("type,account,amount\n  deposit  , {A} ,  7.5  \nwithdrawal,{A}\n");
        let file = create_temp_csv(&csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().input.amount, dec!(7.5));
        assert!(records[1].is_err());
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("type,account,amount\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert!(records.is_empty());
    }

    #[test]
    fn test_sync_reader_filter_map_pattern() {
        let csv_content = format!(
            "type,account,amount\ndeposit,{A},1\ntransfer,{A},2\ndeposit,not-an-id,3\nwithdrawal,{A},4\n"
        );
        let file = create_temp_csv(&csv_content);

        let valid: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].input.amount, dec!(1));
        assert_eq!(valid[1].input.amount, dec!(4));
    }
}
