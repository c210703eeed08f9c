//! In-memory data store
//!
//! Plain collections owned by a single caller. Suited to tests and to
//! short-lived sessions where persistence is not required.

use crate::core::DataStore;
use crate::store::inventory::{add_credit, Inventory};
use crate::types::{Coin, MachineError, MachineFinancials, Product};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Single-owner in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inventory: Inventory,
    credits: HashMap<String, Decimal>,
}

impl InMemoryStore {
    /// Create an empty store charging `unit_price`
    pub fn new(unit_price: Decimal) -> Self {
        Self::with_financials(MachineFinancials::new(unit_price))
    }

    /// Create an empty store with existing financials
    pub fn with_financials(financials: MachineFinancials) -> Self {
        InMemoryStore {
            inventory: Inventory::new(financials),
            credits: HashMap::new(),
        }
    }

    /// Builder: stock products
    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.inventory.products.extend(products);
        self
    }

    /// Builder: stock coins
    pub fn with_coins(mut self, coins: impl IntoIterator<Item = Coin>) -> Self {
        self.inventory.coins.extend(coins);
        self
    }

    /// Current financial record
    pub fn financials(&self) -> MachineFinancials {
        self.inventory.financials
    }

    /// Whether the user has a credit entry (zero or not)
    pub fn has_credit_entry(&self, user: &str) -> bool {
        self.credits.contains_key(user)
    }
}

impl DataStore for InMemoryStore {
    fn product_types(&self) -> Result<Vec<Product>, MachineError> {
        Ok(self.inventory.product_types())
    }

    fn is_product_in_stock(&self, product: &Product) -> Result<bool, MachineError> {
        Ok(self.inventory.is_in_stock(product))
    }

    fn sell_product(
        &mut self,
        product: &Product,
        amount_credited: Decimal,
    ) -> Result<Option<Product>, MachineError> {
        self.inventory.sell(product, amount_credited)
    }

    fn add_products(&mut self, products: Vec<Product>) -> Result<(), MachineError> {
        self.inventory.products.extend(products);
        Ok(())
    }

    fn all_products(&self) -> Result<Vec<Product>, MachineError> {
        Ok(self.inventory.products.clone())
    }

    fn insert_user_credit(&mut self, user: &str, amount: Decimal) -> Result<(), MachineError> {
        add_credit(self.credits.entry(user.to_string()).or_default(), amount)
    }

    fn clear_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let credit = self
            .credits
            .get_mut(user)
            .ok_or_else(|| MachineError::unknown_user(user))?;
        *credit = Decimal::ZERO;
        Ok(())
    }

    fn user_credit(&self, user: &str) -> Result<Decimal, MachineError> {
        Ok(self.credits.get(user).copied().unwrap_or(Decimal::ZERO))
    }

    fn finalize_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let credit = self
            .credits
            .get(user)
            .copied()
            .ok_or_else(|| MachineError::unknown_user(user))?;
        self.inventory.financials.record_income(credit)?;
        self.credits.remove(user);
        Ok(())
    }

    fn unit_price(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory.financials.unit_price)
    }

    fn empty_cash(&mut self) -> Result<Decimal, MachineError> {
        Ok(self.inventory.financials.empty_cash())
    }

    fn cash_on_hand(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory.financials.cash_on_hand)
    }

    fn total_income(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory.financials.total_income)
    }

    fn withdraw_coins(&mut self, value: Decimal, count: usize) -> Result<Vec<Coin>, MachineError> {
        Ok(self.inventory.withdraw_coins(value, count))
    }

    fn all_coins(&self) -> Result<Vec<Coin>, MachineError> {
        Ok(self.inventory.coins.clone())
    }

    fn add_coins(&mut self, coins: Vec<Coin>) -> Result<(), MachineError> {
        self.inventory.coins.extend(coins);
        Ok(())
    }
}
