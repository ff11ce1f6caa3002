//! CSV format handling for statement commands and ledger output
//!
//! This module centralizes all CSV format concerns:
//! - CsvRecord structure for deserializing statement commands
//! - Conversion from CSV records to domain commands (with input validation)
//! - Account and statement page serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    statement::date_format, Account, AccountId, LedgerError, StatementInput, StatementListing,
    StatementType,
};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, amount
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub statement_type: String,
    pub account: String,
    pub amount: Option<String>,
}

/// A statement to apply to a given account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementCommand {
    pub account: AccountId,
    pub input: StatementInput,
}

/// Convert a CsvRecord to a StatementCommand
///
/// This is the input validation boundary in front of the core:
/// - The type must be `deposit` or `withdrawal` (case-insensitive)
/// - The account must be a UUID
/// - The amount must be present, a valid decimal and strictly positive
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<StatementCommand, LedgerError> {
    let statement_type = StatementType::from_str(&csv_record.statement_type)?;

    let account = AccountId::from_str(&csv_record.account).map_err(|e| {
        LedgerError::parse_error(
            None,
            &format!("invalid account id '{}': {}", csv_record.account, e),
        )
    })?;

    let amount = match csv_record.amount {
        Some(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
            .map_err(|_| LedgerError::invalid_amount(&raw))
            .and_then(|amount| {
                if amount > Decimal::ZERO {
                    Ok(amount)
                } else {
                    Err(LedgerError::invalid_amount(&raw))
                }
            })?,
        _ => return Err(LedgerError::invalid_amount("")),
    };

    Ok(StatementCommand {
        account,
        input: StatementInput {
            statement_type,
            amount,
        },
    })
}

/// Write account states to CSV
///
/// Columns: id, type, balance, statements (count). Rows are sorted by id.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "type", "balance", "statements"])
        .map_err(|e| LedgerError::io_error(&format!("Failed to write CSV header: {}", e)))?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.account_type.to_string(),
                account.balance.to_string(),
                account.statements.len().to_string(),
            ])
            .map_err(|e| LedgerError::io_error(&format!("Failed to write account record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| LedgerError::io_error(&format!("Failed to flush output: {}", e)))?;

    Ok(())
}

/// Write one page of statements to CSV
///
/// Columns: date, type, amount; followed by a summary comment line
/// `# page=<i> total_pages=<n> total_items=<n> balance=<b>`.
pub fn write_statement_listing_csv(
    listing: &StatementListing,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    {
        let mut writer = Writer::from_writer(&mut *output);

        writer
            .write_record(["date", "type", "amount"])
            .map_err(|e| LedgerError::io_error(&format!("Failed to write CSV header: {}", e)))?;

        for statement in &listing.items {
            writer
                .write_record(&[
                    statement.date.format(date_format::FORMAT).to_string(),
                    statement.statement_type.to_string(),
                    statement.amount.to_string(),
                ])
                .map_err(|e| {
                    LedgerError::io_error(&format!("Failed to write statement record: {}", e))
                })?;
        }

        writer
            .flush()
            .map_err(|e| LedgerError::io_error(&format!("Failed to flush output: {}", e)))?;
    }

    writeln!(
        output,
        "# page={} total_pages={} total_items={} balance={}",
        listing.page_index, listing.total_pages, listing.total_items, listing.account_balance
    )?;

    Ok(())
}
