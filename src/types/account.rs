//! Account-related types for the statement ledger
//!
//! This module defines the Account snapshot, its identifier and the
//! caller-supplied data used to open a new account.

use super::statement::Statement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier
///
/// Opaque UUID assigned by the store when the caller does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random (v4) identifier
    pub fn new_v4() -> Self {
        AccountId(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(AccountId)
    }
}

/// Account categories
///
/// Informational only; the balance logic never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Checking,
    Savings,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Checking => f.write_str("CHECKING"),
            AccountType::Savings => f.write_str("SAVINGS"),
        }
    }
}

/// Immutable account snapshot
///
/// The store never mutates an Account in place. Applying a statement builds
/// a new snapshot (previous history plus one entry, recomputed balance) and
/// installs it in place of the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Running balance, never negative once the account is stored
    pub balance: Decimal,

    /// Statements in application order
    ///
    /// Insertion order is the commit order, which is not necessarily the
    /// chronological order of caller-seeded entries.
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Account {
    /// Create an empty account with a zero balance
    pub fn new(id: AccountId, account_type: AccountType) -> Self {
        Account {
            id,
            account_type,
            balance: Decimal::ZERO,
            statements: Vec::new(),
        }
    }
}

/// Caller-supplied data for opening an account
///
/// The identifier is optional; the store generates one when absent.
/// Seeded statements and balance are trusted as-is, apart from the
/// non-negative balance check performed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub id: Option<AccountId>,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    #[serde(default)]
    pub balance: Decimal,

    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl NewAccount {
    /// Data for an empty account of the given type
    pub fn new(account_type: AccountType) -> Self {
        NewAccount {
            id: None,
            account_type,
            balance: Decimal::ZERO,
            statements: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }

    /// Turn the data into a stored snapshot under the given identifier
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            account_type: self.account_type,
            balance: self.balance,
            statements: self.statements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_account_is_empty() {
        let id = AccountId::new_v4();
        let account = Account::new(id, AccountType::Checking);

        assert_eq!(account.id, id);
        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.statements.is_empty());
    }

    #[test]
    fn test_account_id_parses_and_displays() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: AccountId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!("not-a-uuid".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_new_account_into_account_keeps_caller_state() {
        let id = AccountId::new_v4();
        let account = NewAccount::new(AccountType::Savings)
            .with_balance(dec!(42.50))
            .into_account(id);

        assert_eq!(account.id, id);
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(account.balance, dec!(42.50));
    }

    #[test]
    fn test_account_type_serializes_upper_case() {
        let json = serde_json::to_string(&AccountType::Checking).unwrap();
        assert_eq!(json, "\"CHECKING\"");
        let parsed: AccountType = serde_json::from_str("\"SAVINGS\"").unwrap();
        assert_eq!(parsed, AccountType::Savings);
    }
}
