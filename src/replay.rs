//! Scripted replay
//!
//! Streams a CSV script through a machine and writes one outcome row per line.
//!
//! # Design
//!
//! `replay_script` only orchestrates:
//! - parsing goes through `ScriptReader` (iterator interface)
//! - each command runs through `SodaMachine::execute`
//! - output goes through `script_format::write_outcomes_csv`
//!
//! # Error Handling
//!
//! Malformed lines and recoverable machine errors (unknown user, negative
//! amount) become `error` rows and processing continues. Fatal errors
//! (storage corruption, I/O) abort the replay.

use crate::core::{DataStore, SodaMachine};
use crate::io::script_format::{write_outcomes_csv, OutcomeRow};
use crate::io::script_reader::ScriptReader;
use crate::types::{CommandReport, MachineError};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Run every line of `reader` against `machine`
///
/// # Returns
///
/// * `Ok(rows)` - One outcome row per script line, in order
///
/// # Errors
///
/// The first fatal `MachineError`. Rows produced before it are discarded.
pub fn replay_script<S, R>(
    machine: &mut SodaMachine<S>,
    reader: ScriptReader<R>,
) -> Result<Vec<OutcomeRow>, MachineError>
where
    S: DataStore,
    R: Read,
{
    let mut rows = Vec::new();

    for entry in reader {
        let result = entry.command.and_then(|command| {
            debug!(line = entry.line, action = command.action(), "replaying");
            machine.execute(&command)
        });

        let report = match result {
            Ok(report) => report,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(line = entry.line, action = %entry.action, reason = %e, "script line skipped");
                CommandReport::error(e.to_string())
            }
        };

        rows.push(OutcomeRow::new(
            entry.line,
            &entry.action,
            entry.user.as_deref(),
            &report,
        ));
    }

    Ok(rows)
}

/// Replay the script at `path` and write outcome rows to `output`
pub fn replay_file<S: DataStore>(
    machine: &mut SodaMachine<S>,
    path: &Path,
    output: &mut dyn Write,
) -> Result<(), MachineError> {
    let reader = ScriptReader::from_path(path)?;
    let rows = replay_script(machine, reader)?;
    write_outcomes_csv(&rows, output).map_err(|message| MachineError::IoError { message })
}
