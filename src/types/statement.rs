//! Statement types for the statement ledger
//!
//! A statement is a single deposit or withdrawal applied to one account.
//! Statements have no identity of their own: they only exist inside the
//! history of the account that owns them and are never edited or removed.

use super::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of statements an account accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementType {
    /// Credit the account: balance + amount
    Deposit,

    /// Debit the account: balance - amount, rejected if the result is negative
    Withdrawal,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementType::Deposit => f.write_str("DEPOSIT"),
            StatementType::Withdrawal => f.write_str("WITHDRAWAL"),
        }
    }
}

impl FromStr for StatementType {
    type Err = LedgerError;

    /// Case-insensitive parse of `deposit` / `withdrawal`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(StatementType::Deposit),
            "withdrawal" => Ok(StatementType::Withdrawal),
            _ => Err(LedgerError::invalid_statement_type(s)),
        }
    }
}

/// A statement accepted into an account's history
///
/// `date` is stamped by the store's clock at commit time; callers never
/// supply it when applying a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(with = "date_format")]
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    pub statement_type: StatementType,

    /// Strictly positive amount
    pub amount: Decimal,
}

impl Statement {
    pub fn new(date: DateTime<Utc>, statement_type: StatementType, amount: Decimal) -> Self {
        Statement {
            date,
            statement_type,
            amount,
        }
    }
}

/// Caller input for a balance-affecting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInput {
    #[serde(rename = "type")]
    pub statement_type: StatementType,
    pub amount: Decimal,
}

impl StatementInput {
    pub fn deposit(amount: Decimal) -> Self {
        StatementInput {
            statement_type: StatementType::Deposit,
            amount,
        }
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        StatementInput {
            statement_type: StatementType::Withdrawal,
            amount,
        }
    }

    /// Stamp the input with its commit date
    pub fn at(self, date: DateTime<Utc>) -> Statement {
        Statement::new(date, self.statement_type, self.amount)
    }
}

/// Wire format for statement dates: `dd/MM/yyyy HH:mm:ss`
pub mod date_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y %H:%M:%S";

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
