// CLI module
// Command-line interface, argument parsing and dispatch

mod args;

pub use args::{Action, CliArgs};

use crate::core::dispatch::money;
use crate::core::SodaMachine;
use crate::replay::replay_file;
use crate::store::TextFileStore;
use crate::types::{MachineError, ReportStatus};
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints a message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Carry out the parsed action against the configured store
///
/// Human-readable results go to `output`; for `replay` that is the outcome
/// CSV.
///
/// # Returns
///
/// The status of the action: `Rejected` when a purchase was turned down,
/// `Ok` otherwise.
///
/// # Errors
///
/// Any `MachineError` raised while opening the store or running the action.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<ReportStatus, MachineError> {
    let config = args.store_config();

    match &args.action {
        Action::Init { price, force } => {
            TextFileStore::initialize(config, *price, *force)?;
            writeln!(output, "Initialized machine at unit price {}", money(*price))?;
            Ok(ReportStatus::Ok)
        }
        Action::Replay { script } => {
            let mut machine = SodaMachine::new(TextFileStore::open(config)?);
            replay_file(&mut machine, script, output)?;
            Ok(ReportStatus::Ok)
        }
        action => {
            let command = action.to_command(&args.user)?;
            let mut machine = SodaMachine::new(TextFileStore::open(config)?);
            let report = machine.execute(&command)?;
            writeln!(output, "{}", report.detail)?;
            Ok(report.status)
        }
    }
}
