//! Soda Machine Library
//! # Overview
//!
//! This library implements the transaction logic of a soda vending machine:
//! users deposit money, buy products at a single unit price and receive exact
//! change drawn from the machine's coin inventory.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Product, Coin, MachineFinancials, outcomes, errors)
//! - [`core`] - Business logic:
//!   - [`core::traits`] - The `DataStore` seam
//!   - [`core::change`] - Greedy change planning
//!   - [`core::machine`] - Deposits, refunds and the purchase state machine
//!   - [`core::dispatch`] - Command execution
//! - [`store`] - `DataStore` implementations (in-memory, shared, text files)
//! - [`io`] - Flat-file records and replay scripts
//! - [`config`] - Store file locations
//! - [`replay`] - Running a CSV script of commands
//! - [`cli`] - CLI arguments parsing and dispatch
//!
//! # Purchases
//!
//! A purchase succeeds only when all of these hold:
//!
//! - The user's credit covers the unit price
//! - A product with the requested name is in stock
//! - The surplus can be paid back exactly from the coin inventory
//!
//! Otherwise it is rejected with the first failing reason and nothing changes.
//! On success the full credit is added to cash on hand and total income, one
//! unit leaves stock, the change coins leave the coin inventory and the
//! user's credit is cleared.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod replay;
pub mod store;
pub mod types;

pub use config::StoreConfig;
pub use crate::core::{DataStore, SodaMachine};
pub use store::{InMemoryStore, SharedStore, TextFileStore};
pub use types::{
    Coin, Command, CommandReport, MachineError, MachineFinancials, Product, Purchase,
    PurchaseOutcome, Rejection, UserId,
};
