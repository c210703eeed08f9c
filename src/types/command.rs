//! Machine commands and their reports
//!
//! A `Command` is one request a front end (CLI subcommand or scripted replay
//! line) can make of the machine. Executing it yields a `CommandReport`.

use super::coin::Coin;
use super::product::Product;
use rust_decimal::Decimal;
use std::fmt;

/// User identifier
///
/// Opaque, caller-supplied; the machine does not manage its lifecycle.
pub type UserId = String;

/// A single request against the machine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the unit price
    ShowPrice,

    /// List one entry per product name in stock
    ListProducts,

    /// Show the credit a user has deposited
    ShowCredit { user: UserId },

    /// Add money to a user's credit
    Deposit { user: UserId, amount: Decimal },

    /// Report and clear a user's credit
    Refund { user: UserId },

    /// Buy one unit of the named product
    Buy { user: UserId, product: String },

    /// Stock `count` units of a product
    RestockProduct { product: Product, count: usize },

    /// Stock `count` coins of a denomination
    RestockCoins { coin: Coin, count: usize },

    /// Empty the cash box
    EmptyCash,

    /// Show cash on hand and total income
    Report,

    /// Summarize product and coin inventory
    ShowInventory,
}

impl Command {
    /// Short action name, as used in replay scripts and outcome rows
    pub fn action(&self) -> &'static str {
        match self {
            Command::ShowPrice => "price",
            Command::ListProducts => "products",
            Command::ShowCredit { .. } => "credit",
            Command::Deposit { .. } => "deposit",
            Command::Refund { .. } => "refund",
            Command::Buy { .. } => "buy",
            Command::RestockProduct { .. } => "restock-product",
            Command::RestockCoins { .. } => "restock-coins",
            Command::EmptyCash => "empty-cash",
            Command::Report => "report",
            Command::ShowInventory => "inventory",
        }
    }

    /// The user the command acts for, if it is user-scoped
    pub fn user(&self) -> Option<&str> {
        match self {
            Command::ShowCredit { user }
            | Command::Deposit { user, .. }
            | Command::Refund { user }
            | Command::Buy { user, .. } => Some(user.as_str()),
            _ => None,
        }
    }
}

/// Whether a command went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Command completed
    Ok,
    /// Purchase turned down for a business reason
    Rejected,
    /// Command failed with a recoverable error
    Error,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            ReportStatus::Ok => "ok",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Error => "error",
        };
        f.write_str(status)
    }
}

/// Outcome of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub status: ReportStatus,

    /// Human-readable description of what happened
    pub detail: String,
}

impl CommandReport {
    pub fn ok(detail: impl Into<String>) -> Self {
        CommandReport {
            status: ReportStatus::Ok,
            detail: detail.into(),
        }
    }

    pub fn rejected(detail: impl Into<String>) -> Self {
        CommandReport {
            status: ReportStatus::Rejected,
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        CommandReport {
            status: ReportStatus::Error,
            detail: detail.into(),
        }
    }
}
