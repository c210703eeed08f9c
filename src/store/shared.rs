//! Thread-safe shared data store
//!
//! `SharedStore` is a cheap-to-clone handle onto one machine's state. Every
//! clone sees the same inventory, so several sessions can run purchases from
//! different threads.
//!
//! # Thread Safety
//!
//! Products, coins and financials sit behind a single mutex, which serializes
//! coin withdrawals against sales. User credit lives in a `DashMap`: each user
//! has their own entry and operations on different users do not contend.

use crate::core::DataStore;
use crate::store::inventory::{add_credit, Inventory};
use crate::types::{Coin, MachineError, MachineFinancials, Product};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct SharedState {
    inventory: Mutex<Inventory>,
    credits: DashMap<String, Decimal>,
}

/// Cloneable, thread-safe store handle
#[derive(Debug, Clone)]
pub struct SharedStore {
    state: Arc<SharedState>,
}

impl SharedStore {
    /// Create an empty store charging `unit_price`
    pub fn new(unit_price: Decimal) -> Self {
        Self::from_inventory(Inventory::new(MachineFinancials::new(unit_price)))
    }

    /// Wrap an existing inventory
    pub fn from_inventory(inventory: Inventory) -> Self {
        SharedStore {
            state: Arc::new(SharedState {
                inventory: Mutex::new(inventory),
                credits: DashMap::new(),
            }),
        }
    }

    /// Snapshot of the inventory
    pub fn snapshot(&self) -> Inventory {
        self.inventory().clone()
    }

    // Mutations below are single Vec or field operations, so a poisoned
    // lock still guards consistent data.
    fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.state
            .inventory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DataStore for SharedStore {
    fn product_types(&self) -> Result<Vec<Product>, MachineError> {
        Ok(self.inventory().product_types())
    }

    fn is_product_in_stock(&self, product: &Product) -> Result<bool, MachineError> {
        Ok(self.inventory().is_in_stock(product))
    }

    fn sell_product(
        &mut self,
        product: &Product,
        amount_credited: Decimal,
    ) -> Result<Option<Product>, MachineError> {
        self.inventory().sell(product, amount_credited)
    }

    fn add_products(&mut self, products: Vec<Product>) -> Result<(), MachineError> {
        self.inventory().products.extend(products);
        Ok(())
    }

    fn all_products(&self) -> Result<Vec<Product>, MachineError> {
        Ok(self.inventory().products.clone())
    }

    fn insert_user_credit(&mut self, user: &str, amount: Decimal) -> Result<(), MachineError> {
        let mut credit = self.state.credits.entry(user.to_string()).or_default();
        add_credit(&mut credit, amount)
    }

    fn clear_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let mut credit = self
            .state
            .credits
            .get_mut(user)
            .ok_or_else(|| MachineError::unknown_user(user))?;
        *credit = Decimal::ZERO;
        Ok(())
    }

    fn user_credit(&self, user: &str) -> Result<Decimal, MachineError> {
        Ok(self
            .state
            .credits
            .get(user)
            .map(|credit| *credit)
            .unwrap_or(Decimal::ZERO))
    }

    fn finalize_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let (_, credit) = self
            .state
            .credits
            .remove(user)
            .ok_or_else(|| MachineError::unknown_user(user))?;
        if let Err(e) = self.inventory().financials.record_income(credit) {
            self.state.credits.insert(user.to_string(), credit);
            return Err(e);
        }
        Ok(())
    }

    fn unit_price(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory().financials.unit_price)
    }

    fn empty_cash(&mut self) -> Result<Decimal, MachineError> {
        Ok(self.inventory().financials.empty_cash())
    }

    fn cash_on_hand(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory().financials.cash_on_hand)
    }

    fn total_income(&self) -> Result<Decimal, MachineError> {
        Ok(self.inventory().financials.total_income)
    }

    fn withdraw_coins(&mut self, value: Decimal, count: usize) -> Result<Vec<Coin>, MachineError> {
        Ok(self.inventory().withdraw_coins(value, count))
    }

    fn all_coins(&self) -> Result<Vec<Coin>, MachineError> {
        Ok(self.inventory().coins.clone())
    }

    fn add_coins(&mut self, coins: Vec<Coin>) -> Result<(), MachineError> {
        self.inventory().coins.extend(coins);
        Ok(())
    }
}
