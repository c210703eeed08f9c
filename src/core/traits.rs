//! Data store contract
//!
//! This module defines the trait the transaction logic uses to reach persisted
//! machine state. Implementations may be in-memory, shared across threads, or
//! backed by flat files; the logic in [`SodaMachine`](super::SodaMachine) does
//! not care which.

use crate::types::{Coin, MachineError, Product};
use rust_decimal::Decimal;

/// Atomic accessors over soda inventory, coin inventory, machine financials
/// and per-user credit
///
/// Each method is atomic on its own. The transaction logic never relies on
/// two calls being atomic together; it rolls back instead.
pub trait DataStore {
    /// One product per distinct name, first-seen instance
    fn product_types(&self) -> Result<Vec<Product>, MachineError>;

    /// Whether a unit of the same kind (name match) is stocked
    fn is_product_in_stock(&self, product: &Product) -> Result<bool, MachineError>;

    /// Remove one unit of the same kind and record `amount_credited` as income
    ///
    /// Returns `None`, recording nothing, when no unit is stocked.
    fn sell_product(
        &mut self,
        product: &Product,
        amount_credited: Decimal,
    ) -> Result<Option<Product>, MachineError>;

    /// Add units to product stock
    fn add_products(&mut self, products: Vec<Product>) -> Result<(), MachineError>;

    /// Every stocked product unit
    fn all_products(&self) -> Result<Vec<Product>, MachineError>;

    /// Add `amount` to the user's credit, creating the entry at zero if absent
    fn insert_user_credit(&mut self, user: &str, amount: Decimal) -> Result<(), MachineError>;

    /// Set the user's credit to zero
    ///
    /// # Errors
    ///
    /// `MachineError::UnknownUser` if the user has no credit entry.
    fn clear_user_credit(&mut self, user: &str) -> Result<(), MachineError>;

    /// The user's credit, zero if none recorded
    fn user_credit(&self, user: &str) -> Result<Decimal, MachineError>;

    /// Move the user's credit into cash on hand and total income, removing the entry
    ///
    /// # Errors
    ///
    /// `MachineError::UnknownUser` if the user has no credit entry.
    fn finalize_user_credit(&mut self, user: &str) -> Result<(), MachineError>;

    fn unit_price(&self) -> Result<Decimal, MachineError>;

    /// Reset cash on hand to zero, returning the prior value
    fn empty_cash(&mut self) -> Result<Decimal, MachineError>;

    fn cash_on_hand(&self) -> Result<Decimal, MachineError>;

    fn total_income(&self) -> Result<Decimal, MachineError>;

    /// Remove and return up to `count` coins whose face value equals `value`
    ///
    /// Returns fewer coins when stock is short.
    fn withdraw_coins(&mut self, value: Decimal, count: usize) -> Result<Vec<Coin>, MachineError>;

    /// Every stocked coin
    fn all_coins(&self) -> Result<Vec<Coin>, MachineError>;

    /// Add coins to coin stock
    fn add_coins(&mut self, coins: Vec<Coin>) -> Result<(), MachineError>;
}
