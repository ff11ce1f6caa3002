//! Asynchronous batch replay strategy
//!
//! Reads commands in batches and fans each batch out over a tokio
//! multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncReplayStrategy
//!     ├── BatchConfig (batch_size, workers)
//!     ├── AsyncReader (batch CSV reading)
//!     └── one tokio task per account in the batch
//!         └── Ledger::apply_statement (per-account atomic)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another
//! - Within a batch, commands are partitioned by account and each account's
//!   commands are applied in file order by a single task
//! - Different accounts are replayed in parallel
//!
//! The result is therefore the same as the sync strategy's for any input.

use crate::core::Ledger;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::StatementCommand;
use crate::strategy::{ReplayStrategy, ReplaySummary};
use crate::types::{AccountId, LedgerError};
use futures::future::join_all;
use std::collections::HashMap;
use std::path::Path;

/// Configuration for batch replay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Runtime worker threads
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            workers: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let workers = if workers == 0 {
            tracing::warn!(
                workers,
                default = default.workers,
                "Invalid workers, using default"
            );
            default.workers
        } else {
            workers
        };

        Self {
            batch_size,
            workers,
        }
    }
}

/// Asynchronous batch replay strategy
#[derive(Debug, Clone)]
pub struct AsyncReplayStrategy {
    config: BatchConfig,
}

impl AsyncReplayStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Partition a batch by account, keeping file order within each account
    fn partition_by_account(
        commands: Vec<StatementCommand>,
    ) -> HashMap<AccountId, Vec<StatementCommand>> {
        let mut account_batches: HashMap<AccountId, Vec<StatementCommand>> = HashMap::new();

        for command in commands {
            account_batches
                .entry(command.account)
                .or_default()
                .push(command);
        }

        account_batches
    }

    async fn replay_batch(&self, ledger: &Ledger, commands: Vec<StatementCommand>) -> ReplaySummary {
        let tasks = Self::partition_by_account(commands)
            .into_values()
            .map(|account_commands| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    let mut summary = ReplaySummary::default();
                    for command in account_commands {
                        summary.record(&ledger.apply_statement(&command.account, command.input));
                    }
                    summary
                })
            });

        let mut summary = ReplaySummary::default();
        for result in join_all(tasks).await {
            match result {
                Ok(account_summary) => summary += account_summary,
                Err(e) => tracing::error!(error = %e, "Replay task failed"),
            }
        }
        summary
    }
}

impl ReplayStrategy for AsyncReplayStrategy {
    fn replay(&self, ledger: &Ledger, input_path: &Path) -> Result<ReplaySummary, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .build()
            .map_err(|e| LedgerError::io_error(&format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path).await.map_err(|e| {
                LedgerError::io_error(&format!(
                    "Failed to open file '{}': {}",
                    input_path.display(),
                    e
                ))
            })?;

            // csv-async reads futures::io, tokio::fs::File implements tokio::io
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut summary = ReplaySummary::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                summary.malformed += batch.malformed;

                if batch.is_empty() {
                    break;
                }

                tracing::debug!(size = batch.commands.len(), "Replaying batch");
                summary += self.replay_batch(ledger, batch.commands).await;
            }

            tracing::info!(
                applied = summary.applied,
                rejected = summary.rejected,
                failed = summary.failed,
                malformed = summary.malformed,
                "Async replay finished"
            );
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StoreConfig, WriteStrategy};
    use crate::types::{AccountId, AccountType, NewAccount};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const A: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const B: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn open(ledger: &Ledger, id: &str, balance: Decimal) -> AccountId {
        let id: AccountId = id.parse().unwrap();
        ledger
            .create_account(
                NewAccount::new(AccountType::Checking)
                    .with_id(id)
                    .with_balance(balance),
            )
            .unwrap();
        id
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_partition_by_account_keeps_file_order() {
        let a: AccountId = A.parse().unwrap();
        let b: AccountId = B.parse().unwrap();
        let batch = [(a, 1), (b, 2), (a, 3), (a, 4), (b, 5)]
            .into_iter()
            .map(|(account, amount)| StatementCommand {
                account,
                input: crate::types::StatementInput::deposit(Decimal::from(amount)),
            })
            .collect();

        let partitions = AsyncReplayStrategy::partition_by_account(batch);

        let amounts = |id: &AccountId| -> Vec<Decimal> {
            partitions[id].iter().map(|c| c.input.amount).collect()
        };
        assert_eq!(partitions.len(), 2);
        assert_eq!(amounts(&a), vec![dec!(1), dec!(3), dec!(4)]);
        assert_eq!(amounts(&b), vec![dec!(2), dec!(5)]);
    }

    #[rstest]
    fn test_async_replay_concurrent_deposits_all_commit(
        #[values(WriteStrategy::Locked, WriteStrategy::Optimistic)] write_strategy: WriteStrategy,
    ) {
        let ledger = Ledger::with_config(StoreConfig::new(write_strategy, 1_000));
        let a = open(&ledger, A, dec!(0));
        let b = open(&ledger, B, dec!(0));
        let mut csv = String::from("type,account,amount\n");
        for n in 1..=50 {
            csv.push_str(&format!("deposit,{A},{n}\ndeposit,{B},1\n"));
        }
        let file = create_temp_csv(&csv);

        let strategy = AsyncReplayStrategy::new(BatchConfig::new(16, 4));
        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary.applied, 100);
        assert_eq!(ledger.get_account(&a).unwrap().balance, dec!(1275));
        assert_eq!(ledger.get_account(&b).unwrap().balance, dec!(50));
        assert_eq!(ledger.get_account(&a).unwrap().statements.len(), 50);
    }

    #[test]
    fn test_async_replay_never_overdraws() {
        let ledger = Ledger::default();
        let a = open(&ledger, A, dec!(10));
        let mut csv = String::from("type,account,amount\n");
        for _ in 0..40 {
            csv.push_str(&format!("withdrawal,{A},1\n"));
        }
        let file = create_temp_csv(&csv);

        let strategy = AsyncReplayStrategy::new(BatchConfig::new(40, 8));
        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary.applied, 10);
        assert_eq!(summary.rejected, 30);
        assert_eq!(ledger.get_account(&a).unwrap().balance, dec!(0));
    }

    #[test]
    fn test_async_replay_batches_keep_relative_order() {
        // Batch size 1 means every command waits for the previous one
        let ledger = Ledger::default();
        let a = open(&ledger, A, dec!(0));
        let file = create_temp_csv(&format!(
            "type,account,amount\ndeposit,{A},100\nwithdrawal,{A},30\nwithdrawal,{A},20\n"
        ));

        let strategy = AsyncReplayStrategy::new(BatchConfig::new(1, 4));
        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary.applied, 3);
        assert_eq!(ledger.get_account(&a).unwrap().balance, dec!(50));
    }

    #[rstest]
    fn test_async_replay_keeps_file_order_within_a_batch(
        #[values(WriteStrategy::Locked, WriteStrategy::Optimistic)] write_strategy: WriteStrategy,
    ) {
        // Every withdrawal only succeeds if the deposit before it committed first
        let mut csv = String::from("type,account,amount\n");
        for _ in 0..20 {
            csv.push_str(&format!("deposit,{A},100\nwithdrawal,{A},100\ndeposit,{B},1\n"));
        }
        let file = create_temp_csv(&csv);
        let strategy = AsyncReplayStrategy::new(BatchConfig::new(1000, 4));

        for _ in 0..25 {
            let ledger = Ledger::with_config(StoreConfig::new(write_strategy, 1_000));
            let a = open(&ledger, A, dec!(0));
            open(&ledger, B, dec!(0));

            let summary = strategy.replay(&ledger, file.path()).unwrap();

            assert_eq!(summary.applied, 60);
            assert_eq!(summary.rejected, 0);
            assert_eq!(ledger.get_account(&a).unwrap().balance, dec!(0));
        }
    }

    #[test]
    fn test_async_replay_counts_malformed_rows() {
        let ledger = Ledger::default();
        open(&ledger, A, dec!(0));
        let file = create_temp_csv(&format!(
            "type,account,amount\ntransfer,{A},1\ndeposit,not-a-uuid,1\ndeposit,{A},2\n"
        ));

        let strategy = AsyncReplayStrategy::new(BatchConfig::default());
        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.malformed, 2);
    }

    #[test]
    fn test_async_replay_missing_file() {
        let strategy = AsyncReplayStrategy::new(BatchConfig::default());

        let result = strategy.replay(&Ledger::default(), Path::new("nonexistent.csv"));

        assert!(result.unwrap_err().to_string().contains("Failed to open file"));
    }
}
