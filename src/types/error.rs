//! Error types for the soda machine
//!
//! Business-rule failures of a purchase (insufficient funds, out of stock,
//! insufficient change) are not errors; they are returned as
//! [`Rejection`](super::Rejection) values. `MachineError` covers everything the
//! transaction logic cannot recover from locally.
//!
//! # Error Categories
//!
//! - **Storage Errors**: corrupt or incomplete persisted records, I/O failures
//! - **Caller Errors**: unknown users, invalid amounts, overflowing balances, malformed commands

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the soda machine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// A persisted record holds a value that cannot be parsed
    ///
    /// Fatal: the store cannot be trusted until the data is repaired.
    #[error("Corrupt {record} data{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    StorageCorrupt {
        /// Which record set was being read (coins, products, ...)
        record: String,
        /// Line in the backing file (if available)
        line: Option<u64>,
        /// Description of the bad value
        message: String,
    },

    /// A persisted record is missing a required field
    ///
    /// Fatal, like `StorageCorrupt`.
    #[error("Missing {field} in {record} data{}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    StorageMissingField {
        /// Which record set was being read
        record: String,
        /// Line in the backing file (if available)
        line: Option<u64>,
        /// Name of the absent field
        field: String,
    },

    /// I/O error while reading or writing the store
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Refund or finalize requested for a user with no credit on record
    #[error("User '{user}' has no credit on record")]
    UnknownUser {
        /// The user identifier
        user: String,
    },

    /// A negative amount was handed to the machine
    #[error("Invalid amount {amount}: amounts must not be negative")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A balance would exceed what `Decimal` can hold
    ///
    /// Recoverable: the operation is refused and nothing is recorded.
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// A scripted command could not be understood
    ///
    /// Recoverable: the line is reported and processing continues.
    #[error("Invalid command{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    InvalidCommand {
        /// Line in the script (if available)
        line: Option<u64>,
        /// What was wrong with the command
        message: String,
    },
}

impl From<std::io::Error> for MachineError {
    fn from(error: std::io::Error) -> Self {
        MachineError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for MachineError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return MachineError::IoError {
                message: error.to_string(),
            };
        }

        MachineError::StorageCorrupt {
            record: "csv".to_string(),
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }
}

impl MachineError {
    /// Create a StorageCorrupt error
    pub fn storage_corrupt(record: &str, line: Option<u64>, message: impl Into<String>) -> Self {
        MachineError::StorageCorrupt {
            record: record.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Create a StorageMissingField error
    pub fn storage_missing_field(record: &str, line: Option<u64>, field: &str) -> Self {
        MachineError::StorageMissingField {
            record: record.to_string(),
            line,
            field: field.to_string(),
        }
    }

    /// Create an UnknownUser error
    pub fn unknown_user(user: &str) -> Self {
        MachineError::UnknownUser {
            user: user.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        MachineError::InvalidAmount { amount }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        MachineError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidCommand error
    pub fn invalid_command(line: Option<u64>, message: impl Into<String>) -> Self {
        MachineError::InvalidCommand {
            line,
            message: message.into(),
        }
    }

    /// Whether the caller should stop using the store
    ///
    /// Storage and I/O errors are fatal; caller errors only affect the
    /// request that produced them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MachineError::StorageCorrupt { .. }
                | MachineError::StorageMissingField { .. }
                | MachineError::IoError { .. }
        )
    }
}
