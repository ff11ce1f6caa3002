//! JSON seed fixtures
//!
//! The ledger starts empty apart from whatever fixture it is seeded with.
//! A fixture is either a single account object or an array of them, using
//! the same field names and date format as the account JSON:
//!
//! ```json
//! {
//!   "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!   "type": "CHECKING",
//!   "balance": 10,
//!   "statements": [{ "date": "01/01/2022 09:00:00", "type": "DEPOSIT", "amount": 10 }]
//! }
//! ```

use crate::types::{LedgerError, NewAccount};
use serde::Deserialize;
use std::path::Path;

/// Bundled demo account
pub const DEMO_FIXTURE: &str = include_str!("../../fixtures/account_demo.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureDocument {
    Many(Vec<NewAccount>),
    One(NewAccount),
}

/// Decode fixture JSON into account creation data
pub fn parse_fixture(json: &str) -> Result<Vec<NewAccount>, LedgerError> {
    let document: FixtureDocument = serde_json::from_str(json)?;

    Ok(match document {
        FixtureDocument::Many(accounts) => accounts,
        FixtureDocument::One(account) => vec![account],
    })
}

/// Read and decode a fixture file
pub fn load_fixture(path: &Path) -> Result<Vec<NewAccount>, LedgerError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        LedgerError::io_error(&format!(
            "Failed to read fixture '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_fixture(&json)
}
