//! Streaming reader over replay scripts
//!
//! # Design
//!
//! `ScriptReader` pulls one CSV record at a time and converts it with
//! `script_format::convert_script_record`. Every line yields an entry, even
//! a malformed one, so a replay can report it and move on.
//!
//! # Error Handling
//!
//! - Failing to open the script is returned from `from_path()`
//! - A line that is not a valid command carries `MachineError::InvalidCommand`
//!   with its line number
//! - An I/O failure mid-stream carries `MachineError::IoError`, which is fatal

use crate::io::script_format::{convert_script_record, ScriptRecord};
use crate::types::{Command, MachineError};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One script line, parsed or not
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    /// Line number in the script (the header is line 1)
    pub line: u64,

    /// Action as written, empty if the line could not be read at all
    pub action: String,

    pub user: Option<String>,

    pub command: Result<Command, MachineError>,
}

/// Script reader
pub struct ScriptReader<R: Read> {
    headers: StringRecord,
    records: StringRecordsIntoIter<R>,
    line_num: u64,
}

impl ScriptReader<File> {
    /// Open a script file
    ///
    /// # Errors
    ///
    /// `MachineError::IoError` if the file cannot be opened or has no header.
    pub fn from_path(path: &Path) -> Result<Self, MachineError> {
        let file = File::open(path).map_err(|e| MachineError::IoError {
            message: format!("Failed to open script '{}': {}", path.display(), e),
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read> ScriptReader<R> {
    /// Read a script from any source
    pub fn from_reader(source: R) -> Result<Self, MachineError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();

        Ok(Self {
            headers,
            records: reader.into_records(),
            line_num: 1,
        })
    }

    fn entry(&self, record: &StringRecord) -> ScriptEntry {
        let line = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(self.line_num);

        match record.deserialize::<ScriptRecord>(Some(&self.headers)) {
            Ok(script_record) => {
                let action = script_record.action.clone();
                let user = script_record
                    .user
                    .clone()
                    .filter(|user| !user.is_empty());
                let command = convert_script_record(script_record)
                    .map_err(|message| MachineError::invalid_command(Some(line), message));
                ScriptEntry {
                    line,
                    action,
                    user,
                    command,
                }
            }
            Err(e) => ScriptEntry {
                line,
                action: record.get(0).unwrap_or_default().to_string(),
                user: None,
                command: Err(MachineError::invalid_command(
                    Some(line),
                    format!("CSV parse error: {}", e),
                )),
            },
        }
    }
}

impl<R: Read> Iterator for ScriptReader<R> {
    type Item = ScriptEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        self.line_num += 1;

        match result {
            Ok(record) => Some(self.entry(&record)),
            Err(e) => {
                let command = match MachineError::from(e) {
                    fatal @ MachineError::IoError { .. } => Err(fatal),
                    other => Err(MachineError::invalid_command(
                        Some(self.line_num),
                        other.to_string(),
                    )),
                };
                Some(ScriptEntry {
                    line: self.line_num,
                    action: String::new(),
                    user: None,
                    command,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader(content: &str) -> ScriptReader<&[u8]> {
        ScriptReader::from_reader(content.as_bytes()).expect("Failed to read header")
    }

    #[test]
    fn test_from_path_opens_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"action,user,argument\nprice,,\n").unwrap();
        file.flush().unwrap();

        let entries: Vec<_> = ScriptReader::from_path(file.path()).unwrap().collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, Ok(Command::ShowPrice));
    }

    #[test]
    fn test_from_path_fails_on_missing_file() {
        let result = ScriptReader::from_path(Path::new("nonexistent.csv"));

        assert!(matches!(result, Err(MachineError::IoError { ref message }) if message.contains("Failed to open script")));
    }

    #[test]
    fn test_entries_carry_line_numbers() {
        let entries: Vec<_> = reader(
            "action,user,argument\n\
             deposit, ann , 0.50\n\
             dance,ann,\n\
             report\n",
        )
        .collect();

        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].line, 2);
        assert_eq!(entries[0].user.as_deref(), Some("ann"));
        assert_eq!(
            entries[0].command,
            Ok(Command::Deposit {
                user: "ann".to_string(),
                amount: Decimal::new(50, 2),
            })
        );

        assert_eq!(entries[1].line, 3);
        assert_eq!(entries[1].action, "dance");
        assert_eq!(
            entries[1].command,
            Err(MachineError::invalid_command(Some(3), "unknown action 'dance'"))
        );

        // Short rows are fine, missing columns read as empty
        assert_eq!(entries[2].line, 4);
        assert_eq!(entries[2].command, Ok(Command::Report));
    }

    #[test]
    fn test_blank_user_is_none() {
        let entries: Vec<_> = reader("action,user,argument\nprice,,\n").collect();

        assert_eq!(entries[0].user, None);
    }

    #[test]
    fn test_empty_script_yields_nothing() {
        assert_eq!(reader("action,user,argument\n").count(), 0);
    }
}
