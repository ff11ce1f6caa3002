//! Replay strategy module
//!
//! A replay strategy reads statement commands from a CSV file and applies
//! them to a [`Ledger`]. Two strategies can be selected at runtime:
//!
//! - **sync**: one thread, file order
//! - **async**: batches fanned out over a tokio multi-threaded runtime, with
//!   writes to the same account racing each other through the store

use crate::cli::StrategyType;
use crate::core::Ledger;
use crate::types::{Account, LedgerError};
use std::ops::AddAssign;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncReplayStrategy, BatchConfig};
pub use sync::SyncReplayStrategy;

/// Outcome counts of a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Statements committed
    pub applied: usize,
    /// Business rejections (unknown account, insufficient balance)
    pub rejected: usize,
    /// Other failures (contention, invariant violations)
    pub failed: usize,
    /// Rows that never reached the ledger
    pub malformed: usize,
}

impl ReplaySummary {
    /// Count the outcome of one `apply_statement` call
    ///
    /// The ledger already logs failures, so this only counts.
    pub fn record(&mut self, result: &Result<Account, LedgerError>) {
        match result {
            Ok(_) => self.applied += 1,
            Err(e) if e.is_business_rejection() => self.rejected += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.applied + self.rejected + self.failed + self.malformed
    }
}

impl AddAssign for ReplaySummary {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.malformed += other.malformed;
    }
}

/// Replay strategy trait
///
/// Individual statement errors are counted and logged, never returned.
/// `Err` is reserved for fatal problems such as an unreadable input file.
pub trait ReplayStrategy: Send + Sync {
    fn replay(&self, ledger: &Ledger, input_path: &Path) -> Result<ReplaySummary, LedgerError>;
}

/// Create a replay strategy based on the specified strategy type
///
/// `config` is only used by the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ReplayStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncReplayStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncReplayStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_record_classifies_outcomes() {
        let id = AccountId::new_v4();
        let mut summary = ReplaySummary::default();

        summary.record(&Err(LedgerError::account_not_found(id)));
        summary.record(&Err(LedgerError::insufficient_balance(id, dec!(1), dec!(2))));
        summary.record(&Err(LedgerError::write_contention(id, 4)));

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 0,
                rejected: 2,
                failed: 1,
                malformed: 0,
            }
        );
    }

    #[test]
    fn test_summary_add_assign() {
        let mut total = ReplaySummary {
            applied: 1,
            rejected: 2,
            failed: 0,
            malformed: 1,
        };
        total += ReplaySummary {
            applied: 3,
            rejected: 0,
            failed: 1,
            malformed: 0,
        };

        assert_eq!(total.applied, 4);
        assert_eq!(total.total(), 8);
    }
}
