//! Pagination types for statement listings

use super::error::LedgerError;
use super::statement::Statement;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Properties a statement listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Requested ordering of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn by_date(direction: SortDirection) -> Self {
        Sort {
            key: SortKey::Date,
            direction,
        }
    }
}

impl FromStr for Sort {
    type Err = LedgerError;

    /// Parse `property[,direction]`, e.g. `date,desc`
    ///
    /// The direction defaults to ascending and is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);

        let key = match parts.next().map(str::to_lowercase).as_deref() {
            Some("date") => SortKey::Date,
            _ => {
                return Err(LedgerError::invalid_page_request(&format!(
                    "unsupported sort property in '{}'",
                    s
                )))
            }
        };

        let direction = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(LedgerError::invalid_page_request(&format!(
                    "unsupported sort direction '{}'",
                    other
                )))
            }
        };

        if parts.next().is_some() {
            return Err(LedgerError::invalid_page_request(&format!(
                "malformed sort '{}'",
                s
            )));
        }

        Ok(Sort { key, direction })
    }
}

/// A request for one page of an account's statement history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub index: usize,

    /// Items per page, must be greater than zero
    pub size: usize,

    /// Insertion order when absent
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        PageRequest {
            index,
            size,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(0, 20)
    }
}

/// One page of statements
#[derive(Debug, Clone, PartialEq)]
pub struct StatementPage {
    pub items: Vec<Statement>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// A page of statements together with the balance of the account it came from
///
/// Balance and page are taken from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementListing {
    pub items: Vec<Statement>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub account_balance: Decimal,
}

impl StatementListing {
    pub fn new(page: StatementPage, account_balance: Decimal) -> Self {
        StatementListing {
            items: page.items,
            page_index: page.page_index,
            total_pages: page.total_pages,
            total_items: page.total_items,
            account_balance,
        }
    }
}
