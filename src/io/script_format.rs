//! CSV format for replay scripts and their outcome rows
//!
//! A script has a header row followed by one command per line:
//!
//! ```text
//! action,user,argument
//! deposit,ann,1.00
//! buy,ann,Coke
//! restock-coins,,Quarter:0.25:10
//! report,,
//! ```
//!
//! `argument` depends on the action:
//!
//! | action            | user     | argument                 |
//! |-------------------|----------|--------------------------|
//! | `deposit`         | required | amount                   |
//! | `buy`             | required | product name             |
//! | `credit`/`refund` | required | -                        |
//! | `restock-product` | -        | `name:slot[:count]`      |
//! | `restock-coins`   | -        | `name:value[:count]`     |
//! | `price`, `products`, `inventory`, `report`, `empty-cash` | - | - |
//!
//! Outcome rows are written as `line,action,user,status,detail`.
//!
//! All functions except `write_outcomes_csv` are pure.

use crate::types::{Coin, Command, CommandReport, Product, ReportStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// One raw script line
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ScriptRecord {
    pub action: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub argument: Option<String>,
}

/// Convert a script line into a command
///
/// # Returns
///
/// * `Ok(Command)` - The command the line asks for
/// * `Err(String)` - Why the line is not a valid command
pub fn convert_script_record(record: ScriptRecord) -> Result<Command, String> {
    let action = record.action.to_lowercase();
    let user = record.user.filter(|user| !user.trim().is_empty());
    let argument = record.argument.filter(|argument| !argument.trim().is_empty());

    let require_user = || {
        user.clone()
            .ok_or_else(|| format!("'{}' requires a user", action))
    };
    let require_argument = |what: &str| {
        argument
            .clone()
            .ok_or_else(|| format!("'{}' requires {}", action, what))
    };

    let command = match action.as_str() {
        "price" => Command::ShowPrice,
        "products" => Command::ListProducts,
        "inventory" => Command::ShowInventory,
        "report" => Command::Report,
        "empty-cash" => Command::EmptyCash,
        "credit" => Command::ShowCredit {
            user: require_user()?,
        },
        "refund" => Command::Refund {
            user: require_user()?,
        },
        "deposit" => {
            let user = require_user()?;
            let amount = parse_amount(&require_argument("an amount")?)?;
            Command::Deposit { user, amount }
        }
        "buy" => Command::Buy {
            user: require_user()?,
            product: require_argument("a product name")?,
        },
        "restock-product" => {
            let argument = require_argument("'name:slot[:count]'")?;
            let (name, slot, count) = parse_restock(&argument)?;
            Command::RestockProduct {
                product: Product::new(name, slot),
                count,
            }
        }
        "restock-coins" => {
            let argument = require_argument("'name:value[:count]'")?;
            let (name, value, count) = parse_restock(&argument)?;
            Command::RestockCoins {
                coin: Coin::new(name, parse_amount(value)?),
                count,
            }
        }
        _ => return Err(format!("unknown action '{}'", record.action)),
    };

    Ok(command)
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("invalid amount '{}'", raw))
}

/// Split `name:second[:count]`, count defaulting to one
fn parse_restock(argument: &str) -> Result<(&str, &str, usize), String> {
    let parts: Vec<&str> = argument.split(':').map(str::trim).collect();
    let (name, second, count) = match parts.as_slice() {
        [name, second] => (*name, *second, 1),
        [name, second, count] => {
            let count = count
                .parse::<usize>()
                .map_err(|_| format!("invalid count '{}'", count))?;
            (*name, *second, count)
        }
        _ => return Err(format!("malformed restock argument '{}'", argument)),
    };

    if name.is_empty() {
        return Err(format!("malformed restock argument '{}'", argument));
    }
    Ok((name, second, count))
}

/// One outcome row
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OutcomeRow {
    pub line: u64,
    pub action: String,
    pub user: String,
    pub status: String,
    pub detail: String,
}

impl OutcomeRow {
    pub fn new(line: u64, action: &str, user: Option<&str>, report: &CommandReport) -> Self {
        OutcomeRow {
            line,
            action: action.to_string(),
            user: user.unwrap_or_default().to_string(),
            status: report.status.to_string(),
            detail: report.detail.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ReportStatus::Error.to_string()
    }
}

/// Write outcome rows as CSV with a header
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_outcomes_csv(rows: &[OutcomeRow], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| format!("Failed to write outcome row: {}", e))?;
    }

    // serialize() only emits the header with the first row
    if rows.is_empty() {
        writer
            .write_record(["line", "action", "user", "status", "detail"])
            .map_err(|e| format!("Failed to write CSV header: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
