//! I/O module
//!
//! Formats used by the CLI around the core. Nothing in here is needed to
//! drive the ledger programmatically.
//!
//! # Components
//!
//! - `csv_format` - Statement command parsing and CSV output
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `fixture` - JSON seed accounts

pub mod async_reader;
pub mod csv_format;
pub mod fixture;
pub mod sync_reader;

pub use async_reader::{AsyncReader, CommandBatch};
pub use csv_format::{
    convert_csv_record, write_accounts_csv, write_statement_listing_csv, CsvRecord,
    StatementCommand,
};
pub use fixture::{load_fixture, parse_fixture, DEMO_FIXTURE};
pub use sync_reader::SyncReader;
