//! I/O module
//!
//! Handles the flat-file store records and replay scripts.
//!
//! # Components
//!
//! - `store_format` - Record files behind the text-file store
//! - `script_format` - Replay script lines and outcome rows
//! - `script_reader` - Streaming reader over replay scripts

pub mod script_format;
pub mod script_reader;
pub mod store_format;

pub use script_format::{convert_script_record, write_outcomes_csv, OutcomeRow, ScriptRecord};
pub use script_reader::{ScriptEntry, ScriptReader};
