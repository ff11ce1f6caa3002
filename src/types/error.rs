//! Error types for the statement ledger
//!
//! Every failure the ledger can report is a variant of [`LedgerError`].
//! The variants fall into a few groups:
//!
//! - **Business rejections**: the account does not exist, or a withdrawal
//!   would drive the balance negative. Expected outcomes, store unchanged.
//! - **Transient failures**: optimistic writes that kept losing the race.
//!   The caller may retry the whole operation.
//! - **Invariant violations**: data that upstream validation should have
//!   stopped reached the core. These indicate a defect, not a user error.
//! - **Input/output errors**: CSV, JSON and file handling in the CLI layer.

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the statement ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No account is stored under the identifier
    #[error("Could not find account {id}")]
    AccountNotFound {
        /// The identifier that was looked up
        id: AccountId,
    },

    /// A withdrawal would make the balance negative
    ///
    /// The statement is discarded; balance and history stay as they were.
    #[error("Account {id} has no sufficient balance to do the statement: balance {balance}, requested {requested}")]
    InsufficientBalance {
        id: AccountId,
        /// Balance at the time the statement was evaluated
        balance: Decimal,
        /// Withdrawal amount
        requested: Decimal,
    },

    /// Data reached the core that upstream validation should have rejected
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Decimal arithmetic would overflow
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },

    /// An optimistic write lost every attempt to a concurrent writer
    ///
    /// Transient: nothing was committed, the caller may retry.
    #[error("Gave up applying statement to account {id} after {attempts} conflicting attempts")]
    WriteContention { id: AccountId, attempts: usize },

    /// An account was opened with a negative balance
    #[error("Initial balance {balance} is negative")]
    NegativeBalance { balance: Decimal },

    /// An account was opened with an identifier that is already taken
    #[error("Account {id} already exists")]
    DuplicateAccount { id: AccountId },

    /// Unrecognised statement type in caller input
    #[error("Invalid statement type '{value}'")]
    InvalidStatementType { value: String },

    /// Statement amount missing, malformed or not strictly positive
    #[error("Invalid amount '{amount}'")]
    InvalidAmount { amount: String },

    /// Page size of zero, unknown sort property, etc.
    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// Seed fixture could not be decoded
    #[error("Invalid fixture: {message}")]
    InvalidFixture { message: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::InvalidFixture {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn account_not_found(id: AccountId) -> Self {
        LedgerError::AccountNotFound { id }
    }

    pub fn insufficient_balance(id: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            id,
            balance,
            requested,
        }
    }

    pub fn invariant_violation(message: &str) -> Self {
        LedgerError::InvariantViolation {
            message: message.to_string(),
        }
    }

    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    pub fn write_contention(id: AccountId, attempts: usize) -> Self {
        LedgerError::WriteContention { id, attempts }
    }

    pub fn negative_balance(balance: Decimal) -> Self {
        LedgerError::NegativeBalance { balance }
    }

    pub fn duplicate_account(id: AccountId) -> Self {
        LedgerError::DuplicateAccount { id }
    }

    pub fn invalid_statement_type(value: &str) -> Self {
        LedgerError::InvalidStatementType {
            value: value.to_string(),
        }
    }

    pub fn invalid_amount(amount: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    pub fn invalid_page_request(message: &str) -> Self {
        LedgerError::InvalidPageRequest {
            message: message.to_string(),
        }
    }

    pub fn io_error(message: &str) -> Self {
        LedgerError::IoError {
            message: message.to_string(),
        }
    }

    pub fn parse_error(line: Option<u64>, message: &str) -> Self {
        LedgerError::ParseError {
            line,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::AccountNotFound { .. })
    }

    /// Expected outcomes of a well-formed request (not found, insufficient balance)
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountNotFound { .. } | LedgerError::InsufficientBalance { .. }
        )
    }

    /// Failures worth retrying unchanged
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::WriteContention { .. })
    }
}
