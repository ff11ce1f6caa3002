//! Statement Ledger Library
//! # Overview
//!
//! An in-memory ledger of bank accounts. Each account carries a balance and
//! an append-only history of deposit and withdrawal statements. Statements
//! are applied atomically per account and a balance never goes negative,
//! however many threads write to the same account at once.
//!
//! # Architecture
//!
//! - [`types`] - Value types (Account, Statement, PageRequest, LedgerError)
//! - [`core`] - Business logic components:
//!   - [`core::processor`] - Pure statement application
//!   - [`core::pager`] - Stable sort and slicing of a statement history
//!   - [`core::account_store`] - Concurrent per-account atomic storage
//!   - [`core::ledger`] - The four ledger operations
//! - [`io`] - CSV commands, CSV output and JSON fixtures
//! - [`strategy`] - Sync and async replay of command files
//! - [`cli`] - CLI arguments parsing and the replay pipeline
//! - [`observability`] - Tracing initialization
//!
//! # Operations
//!
//! - **CreateAccount**: open an account with an initial balance
//! - **GetAccount**: snapshot of balance and history
//! - **ApplyStatement**: deposit or withdraw, stamped with the current time
//! - **ListStatements**: one page of the history plus the current balance

pub mod cli;
pub mod core;
pub mod io;
pub mod observability;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, Ledger, StatementPager, StatementProcessor, StoreConfig, WriteStrategy};
pub use io::{write_accounts_csv, write_statement_listing_csv};
pub use types::{
    Account, AccountId, AccountType, LedgerError, NewAccount, PageRequest, Sort, SortDirection,
    Statement, StatementInput, StatementListing, StatementPage, StatementType,
};
