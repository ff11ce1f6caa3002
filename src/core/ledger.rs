//! Ledger facade
//!
//! [`Ledger`] is the surface the outer layers (CLI, replay strategies, an
//! eventual HTTP adapter) talk to. It exposes exactly four operations:
//!
//! - [`create_account`](Ledger::create_account)
//! - [`get_account`](Ledger::get_account)
//! - [`apply_statement`](Ledger::apply_statement)
//! - [`list_statements`](Ledger::list_statements)
//!
//! # Architecture
//!
//! ```text
//! Ledger (Clone)
//!     └── Arc<AccountStore>
//!             ├── StatementProcessor  (apply_statement)
//!             └── snapshot ──> StatementPager (list_statements)
//! ```

use super::account_store::{AccountStore, StoreConfig};
use super::pager::StatementPager;
use crate::types::{
    Account, AccountId, LedgerError, NewAccount, PageRequest, StatementInput, StatementListing,
};
use std::sync::Arc;

/// Entry point to the account ledger
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: Arc<AccountStore>,
}

impl Ledger {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// Ledger over a fresh store using the system clock and random ids
    pub fn with_config(config: StoreConfig) -> Self {
        Self::new(Arc::new(AccountStore::with_config(config)))
    }

    /// Load fixture accounts into the store
    ///
    /// Stops at the first account the store refuses.
    pub fn seed(&self, accounts: Vec<NewAccount>) -> Result<Vec<Account>, LedgerError> {
        let seeded = accounts
            .into_iter()
            .map(|account| self.store.create(account))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(accounts = seeded.len(), "Ledger seeded");
        Ok(seeded)
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Open a new account
    pub fn create_account(&self, new_account: NewAccount) -> Result<Account, LedgerError> {
        self.store.create(new_account)
    }

    /// Look up an account
    pub fn get_account(&self, id: &AccountId) -> Result<Account, LedgerError> {
        self.store.get(id)
    }

    /// Deposit into or withdraw from an account
    pub fn apply_statement(
        &self,
        id: &AccountId,
        input: StatementInput,
    ) -> Result<Account, LedgerError> {
        let result = self.store.apply_statement(id, input);

        if let Err(e) = &result {
            if e.is_business_rejection() {
                tracing::debug!(account = %id, error = %e, "Statement rejected");
            } else {
                tracing::warn!(account = %id, error = %e, "Statement failed");
            }
        }

        result
    }

    /// One page of an account's statements plus its balance
    ///
    /// Page and balance come from the same point-in-time snapshot.
    pub fn list_statements(
        &self,
        id: &AccountId,
        request: &PageRequest,
    ) -> Result<StatementListing, LedgerError> {
        let snapshot = self.store.snapshot(id)?;
        let page = StatementPager::paginate(&snapshot.statements, request)?;

        Ok(StatementListing::new(page, snapshot.balance))
    }

    /// All accounts, sorted by id
    pub fn accounts(&self) -> Vec<Account> {
        self.store.accounts()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Arc::new(AccountStore::default()))
    }
}
