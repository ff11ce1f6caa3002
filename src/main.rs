//! Statement ledger CLI
//!
//! Seeds an in-memory ledger from a JSON fixture, replays statement commands
//! from a CSV file and writes the resulting accounts to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statements.csv > accounts.csv
//! cargo run -- --strategy sync statements.csv > accounts.csv
//! cargo run -- --fixture accounts.json --write-strategy optimistic --workers 8 statements.csv
//! cargo run -- --statements 3fa85f64-5717-4562-b3fc-2c963f66afa6 --sort date,desc statements.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid fixture, unknown account for --statements, etc.)

use statement_ledger::{cli, observability};
use std::process;

fn main() {
    let args = cli::parse_args();
    observability::init(args.log_json);

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        tracing::error!(error = %e, "Replay aborted");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
