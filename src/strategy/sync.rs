//! Synchronous replay strategy
//!
//! Streams commands from the CSV file with [`SyncReader`] and applies them
//! one by one, in file order, on the calling thread. Given the same fixture
//! and input it always produces the same balances and histories.

use crate::core::Ledger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ReplayStrategy, ReplaySummary};
use crate::types::LedgerError;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct SyncReplayStrategy;

impl ReplayStrategy for SyncReplayStrategy {
    fn replay(&self, ledger: &Ledger, input_path: &Path) -> Result<ReplaySummary, LedgerError> {
        let reader = SyncReader::new(input_path)?;
        let mut summary = ReplaySummary::default();

        for result in reader {
            match result {
                Ok(command) => {
                    summary.record(&ledger.apply_statement(&command.account, command.input))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid statement record");
                    summary.malformed += 1;
                }
            }
        }

        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected,
            failed = summary.failed,
            malformed = summary.malformed,
            "Sync replay finished"
        );
        Ok(summary)
    }
}
