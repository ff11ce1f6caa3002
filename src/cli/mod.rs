// CLI module
// Command-line interface, argument parsing and the replay pipeline

mod args;

pub use args::{CliArgs, StrategyType, WriteMode};

use crate::core::Ledger;
use crate::io::{
    load_fixture, parse_fixture, write_accounts_csv, write_statement_listing_csv, DEMO_FIXTURE,
};
use crate::strategy::{self, ReplaySummary};
use crate::types::LedgerError;
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help` clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Seed a ledger, replay the input file and write the result to `output`
///
/// Writes the account CSV, or one statement page when `--statements` is set.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<ReplaySummary, LedgerError> {
    let ledger = Ledger::with_config(args.to_store_config());

    let seed = match &args.fixture {
        Some(path) => load_fixture(path)?,
        None => parse_fixture(DEMO_FIXTURE)?,
    };
    ledger.seed(seed)?;

    let config = if matches!(args.strategy, StrategyType::Async) {
        Some(args.to_batch_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy.clone(), config);
    let summary = strategy.replay(&ledger, &args.input_file)?;

    match &args.statements {
        Some(id) => {
            let listing = ledger.list_statements(id, &args.to_page_request())?;
            write_statement_listing_csv(&listing, output)?;
        }
        None => write_accounts_csv(&ledger.accounts(), output)?,
    }

    Ok(summary)
}
