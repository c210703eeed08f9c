//! Soda Machine CLI
//!
//! Each invocation performs one action against a machine stored in flat files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- init --price 0.75
//! cargo run -- restock-product Coke 1 --count 5
//! cargo run -- restock-coins Quarter 0.25 --count 10
//! cargo run -- --user ann deposit 1.00
//! cargo run -- --user ann buy Coke
//! cargo run -- replay script.csv > outcomes.csv
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=info` to see every transaction.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (store not initialized, corrupt store file, unknown user, etc.)
//! - 2: Purchase turned down (insufficient funds, out of stock, no change)

use soda_machine::cli;
use soda_machine::types::ReportStatus;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    match cli::run(&args, &mut output) {
        Ok(ReportStatus::Rejected) => process::exit(2),
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
