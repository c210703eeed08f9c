//! Inventory state shared by the store implementations
//!
//! The free functions operate on plain collections so the flat-file store can
//! apply them to freshly loaded records; `Inventory` bundles them for the
//! in-memory stores.

use crate::types::{Coin, MachineError, MachineFinancials, Product};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// One product per distinct name, keeping the first-seen instance and order
pub fn distinct_by_name(products: &[Product]) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|product| seen.insert(product.name.as_str()))
        .cloned()
        .collect()
}

/// Remove the first unit of the same kind as `product`
pub fn take_product(products: &mut Vec<Product>, product: &Product) -> Option<Product> {
    let index = products.iter().position(|stocked| stocked.same_kind(product))?;
    Some(products.remove(index))
}

/// Remove up to `count` coins with face value `value`, preserving the order of the rest
pub fn take_coins(coins: &mut Vec<Coin>, value: Decimal, count: usize) -> Vec<Coin> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(coins.len());

    for coin in coins.drain(..) {
        if taken.len() < count && coin.value == value {
            taken.push(coin);
        } else {
            kept.push(coin);
        }
    }

    *coins = kept;
    taken
}

/// Add `amount` to a user's credit balance
pub fn add_credit(credit: &mut Decimal, amount: Decimal) -> Result<(), MachineError> {
    *credit = credit
        .checked_add(amount)
        .ok_or_else(|| MachineError::arithmetic_overflow("deposit"))?;
    Ok(())
}

/// Products, coins and financials held together
///
/// Kept as one unit so a single lock can cover a sale and a coin withdrawal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub products: Vec<Product>,
    pub coins: Vec<Coin>,
    pub financials: MachineFinancials,
}

impl Inventory {
    pub fn new(financials: MachineFinancials) -> Self {
        Inventory {
            products: Vec::new(),
            coins: Vec::new(),
            financials,
        }
    }

    pub fn product_types(&self) -> Vec<Product> {
        distinct_by_name(&self.products)
    }

    pub fn is_in_stock(&self, product: &Product) -> bool {
        self.products.iter().any(|stocked| stocked.same_kind(product))
    }

    /// Remove one unit and record the credited amount as income
    ///
    /// Stock is untouched if the income cannot be recorded.
    pub fn sell(
        &mut self,
        product: &Product,
        amount_credited: Decimal,
    ) -> Result<Option<Product>, MachineError> {
        if !self.is_in_stock(product) {
            return Ok(None);
        }
        self.financials.record_income(amount_credited)?;
        Ok(take_product(&mut self.products, product))
    }

    pub fn withdraw_coins(&mut self, value: Decimal, count: usize) -> Vec<Coin> {
        take_coins(&mut self.coins, value, count)
    }
}
