//! Statement processing
//!
//! [`StatementProcessor`] computes the effect of one statement on an account
//! snapshot. It has no side effects, so the store can call it speculatively
//! while racing other writers and simply throw the result away on conflict.

use crate::types::{Account, LedgerError, StatementInput, StatementType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Pure balance/history computation
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementProcessor;

impl StatementProcessor {
    /// Compute the balance after applying `input` to the account's balance
    ///
    /// Only `account.balance` takes part in the computation; the id is used
    /// for error reporting.
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance` if a withdrawal would leave a negative balance
    /// - `InvariantViolation` if the amount is not strictly positive
    /// - `ArithmeticOverflow` if the result does not fit in a `Decimal`
    pub fn next_balance(account: &Account, input: &StatementInput) -> Result<Decimal, LedgerError> {
        let balance = account.balance;

        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::invariant_violation(&format!(
                "{} amount must be strictly positive, got {}",
                input.statement_type, input.amount
            )));
        }

        match input.statement_type {
            StatementType::Deposit => balance
                .checked_add(input.amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit")),
            StatementType::Withdrawal => {
                let next = balance
                    .checked_sub(input.amount)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("withdrawal"))?;

                if next < Decimal::ZERO {
                    return Err(LedgerError::insufficient_balance(
                        account.id,
                        balance,
                        input.amount,
                    ));
                }

                Ok(next)
            }
        }
    }

    /// Build the snapshot that results from applying `input` at `date`
    ///
    /// The returned account carries the previous history plus exactly one
    /// new statement and the recomputed balance. `account` is left untouched.
    pub fn apply(
        account: &Account,
        input: StatementInput,
        date: DateTime<Utc>,
    ) -> Result<Account, LedgerError> {
        let balance = Self::next_balance(account, &input)?;

        let mut statements = Vec::with_capacity(account.statements.len() + 1);
        statements.extend_from_slice(&account.statements);
        statements.push(input.at(date));

        Ok(Account {
            id: account.id,
            account_type: account.account_type,
            balance,
            statements,
        })
    }
}
