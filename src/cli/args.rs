use crate::core::{StoreConfig, WriteStrategy};
use crate::strategy::BatchConfig;
use crate::types::{AccountId, PageRequest, Sort};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay deposit and withdrawal statements against in-memory accounts
#[derive(Parser, Debug)]
#[command(name = "statement-ledger")]
#[command(about = "Replay deposit and withdrawal statements against in-memory accounts", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing statement commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// JSON file with the accounts to open before replaying
    #[arg(
        long = "fixture",
        value_name = "PATH",
        help = "Seed accounts from a JSON fixture (default: bundled demo account)"
    )]
    pub fixture: Option<PathBuf>,

    /// Replay strategy to use for applying statements
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Replay strategy: 'sync' for file order or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// How concurrent writes to one account are serialized
    #[arg(
        long = "write-strategy",
        value_name = "MODE",
        default_value = "locked",
        help = "Write strategy: 'locked' or 'optimistic'"
    )]
    pub write_strategy: WriteMode,

    /// Optimistic write attempts before giving up
    #[arg(
        long = "max-attempts",
        value_name = "COUNT",
        help = "Attempts per optimistic write (default: 64)"
    )]
    pub max_attempts: Option<usize>,

    /// Number of statements per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of statements per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Worker threads applying statements (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Print one page of this account's statements instead of all accounts
    #[arg(long = "statements", value_name = "ACCOUNT_ID")]
    pub statements: Option<AccountId>,

    /// Zero-based page index for --statements
    #[arg(long = "page", value_name = "INDEX", default_value_t = 0)]
    pub page: usize,

    /// Page size for --statements
    #[arg(long = "page-size", value_name = "SIZE", default_value_t = 20)]
    pub page_size: usize,

    /// Sort order for --statements, e.g. 'date,desc'
    #[arg(long = "sort", value_name = "SORT")]
    pub sort: Option<Sort>,

    /// Emit logs as JSON lines
    #[arg(long = "log-json")]
    pub log_json: bool,
}

/// Available replay strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Write strategies selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WriteMode {
    Locked,
    Optimistic,
}

impl From<WriteMode> for WriteStrategy {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::Locked => WriteStrategy::Locked,
            WriteMode::Optimistic => WriteStrategy::Optimistic,
        }
    }
}

impl CliArgs {
    /// Create a StoreConfig from CLI arguments
    pub fn to_store_config(&self) -> StoreConfig {
        let default = StoreConfig::default();
        StoreConfig::new(
            self.write_strategy.into(),
            self.max_attempts.unwrap_or(default.max_attempts()),
        )
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to defaults; zero values are replaced with
    /// defaults and a warning is logged.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.workers),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Page request for `--statements`
    pub fn to_page_request(&self) -> PageRequest {
        let request = PageRequest::new(self.page, self.page_size);
        match self.sort {
            Some(sort) => request.sorted(sort),
            None => request,
        }
    }
}
