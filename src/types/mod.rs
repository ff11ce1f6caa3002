//! Types module
//!
//! Value types shared by the core and the CLI layer:
//! - `account`: Account snapshots, identifiers and creation data
//! - `statement`: Statements and caller statement input
//! - `page`: Pagination requests and results
//! - `error`: Error type for the ledger

pub mod account;
pub mod error;
pub mod page;
pub mod statement;

pub use account::{Account, AccountId, AccountType, NewAccount};
pub use error::LedgerError;
pub use page::{PageRequest, Sort, SortDirection, SortKey, StatementListing, StatementPage};
pub use statement::{Statement, StatementInput, StatementType};
