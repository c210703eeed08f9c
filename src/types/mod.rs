//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `product`: stocked product units
//! - `coin`: coin units and common denominations
//! - `financials`: machine price, cash on hand and income
//! - `outcome`: purchase results and rejection reasons
//! - `command`: machine commands and their reports
//! - `error`: Error types for the soda machine

pub mod coin;
pub mod command;
pub mod error;
pub mod financials;
pub mod outcome;
pub mod product;

pub use coin::Coin;
pub use command::{Command, CommandReport, ReportStatus, UserId};
pub use error::MachineError;
pub use financials::MachineFinancials;
pub use outcome::{Purchase, PurchaseOutcome, Rejection};
pub use product::Product;
