//! Soda machine transaction logic
//!
//! This module provides the `SodaMachine` that orchestrates deposits, refunds
//! and purchases against a [`DataStore`].
//!
//! The machine enforces business rules such as:
//! - A purchase needs credit of at least the unit price
//! - The product must be in stock (matched by name)
//! - Change must be exact, drawn from the coin inventory
//! - A turned-down purchase leaves every record untouched

use crate::core::change::{plan_change, ChangePlan};
use crate::core::traits::DataStore;
use crate::types::{Coin, MachineError, Product, Purchase, PurchaseOutcome, Rejection};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Vending machine transaction logic over a data store
///
/// Holds no state of its own; everything lives in the store. User ids are
/// trimmed of surrounding whitespace before they reach the store.
pub struct SodaMachine<S: DataStore> {
    store: S,
}

impl<S: DataStore> SodaMachine<S> {
    /// Create a machine over `store`
    pub fn new(store: S) -> Self {
        SodaMachine { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the machine, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// One product per name in stock, first-seen instance
    pub fn list_product_types(&self) -> Result<Vec<Product>, MachineError> {
        self.store.product_types()
    }

    /// Add money to a user's credit
    ///
    /// # Arguments
    ///
    /// * `user` - The depositing user
    /// * `amount` - The amount handed over; zero is accepted and changes nothing
    ///
    /// # Returns
    ///
    /// The user's credit after the deposit
    ///
    /// # Errors
    ///
    /// Returns `MachineError::InvalidAmount` for a negative amount,
    /// `MachineError::ArithmeticOverflow` if the credit would overflow, or any
    /// storage error from the store.
    pub fn deposit(&mut self, user: &str, amount: Decimal) -> Result<Decimal, MachineError> {
        let user = user.trim();
        if amount < Decimal::ZERO {
            warn!(user, %amount, "negative deposit refused");
            return Err(MachineError::invalid_amount(amount));
        }

        self.store.insert_user_credit(user, amount)?;
        let total = self.store.user_credit(user)?;

        info!(user, %amount, %total, "deposit accepted");
        Ok(total)
    }

    /// Credit on record for `user`, zero if none
    pub fn deposited_total(&self, user: &str) -> Result<Decimal, MachineError> {
        self.store.user_credit(user.trim())
    }

    /// Clear a user's credit
    ///
    /// Coins are not handed back here; callers that need the refunded amount
    /// read [`deposited_total`](Self::deposited_total) first.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::UnknownUser` if the user never deposited.
    pub fn issue_refund(&mut self, user: &str) -> Result<(), MachineError> {
        let user = user.trim();
        self.store.clear_user_credit(user)?;
        info!(user, "credit refunded");
        Ok(())
    }

    /// Keep a user's credit as income without a sale
    ///
    /// Moves the whole credit into cash on hand and total income and drops
    /// the user's entry.
    pub fn finalize_deposit(&mut self, user: &str) -> Result<(), MachineError> {
        let user = user.trim();
        self.store.finalize_user_credit(user)?;
        info!(user, "credit finalized into cash");
        Ok(())
    }

    /// Sell one unit of `product` to `user`
    ///
    /// Runs the purchase state machine:
    /// 1. Read the user's credit and the unit price
    /// 2. Turn down the sale if credit is short or the product is out of stock
    /// 3. Plan exact change for `credit - price` on a snapshot of the coins
    /// 4. Clear the user's credit, withdraw the planned coins and sell the
    ///    unit crediting the full credit
    ///
    /// If stock or coins disappear between planning and commit (another
    /// session got there first), withdrawn coins and the credit go back into
    /// the store and the sale is turned down. A storage error during the
    /// commit puts them back the same way before it is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(PurchaseOutcome::Dispensed)` with the product and change coins
    /// * `Ok(PurchaseOutcome::Rejected)` with the business reason; nothing changed
    ///
    /// # Errors
    ///
    /// Storage errors from the store, passed through unchanged.
    pub fn request_product(
        &mut self,
        product: &Product,
        user: &str,
    ) -> Result<PurchaseOutcome, MachineError> {
        let user = user.trim();
        let credit = self.store.user_credit(user)?;
        let price = self.store.unit_price()?;

        let outcome = self.try_purchase(product, user, credit, price)?;
        Self::log_outcome(user, product, credit, &outcome);
        Ok(outcome)
    }

    pub fn add_to_product_inventory(&mut self, products: Vec<Product>) -> Result<(), MachineError> {
        self.store.add_products(products)
    }

    pub fn add_to_coin_inventory(&mut self, coins: Vec<Coin>) -> Result<(), MachineError> {
        self.store.add_coins(coins)
    }

    pub fn product_inventory(&self) -> Result<Vec<Product>, MachineError> {
        self.store.all_products()
    }

    pub fn coin_inventory(&self) -> Result<Vec<Coin>, MachineError> {
        self.store.all_coins()
    }

    /// Empty the cash box, returning what it held
    ///
    /// Total income is not affected.
    pub fn empty_cash_on_hand(&mut self) -> Result<Decimal, MachineError> {
        let emptied = self.store.empty_cash()?;
        info!(%emptied, "cash box emptied");
        Ok(emptied)
    }

    pub fn current_cash_on_hand(&self) -> Result<Decimal, MachineError> {
        self.store.cash_on_hand()
    }

    pub fn total_income(&self) -> Result<Decimal, MachineError> {
        self.store.total_income()
    }

    pub fn unit_price(&self) -> Result<Decimal, MachineError> {
        self.store.unit_price()
    }
}

/// Private API
impl<S: DataStore> SodaMachine<S> {
    fn try_purchase(
        &mut self,
        product: &Product,
        user: &str,
        credit: Decimal,
        price: Decimal,
    ) -> Result<PurchaseOutcome, MachineError> {
        if credit < price {
            return Ok(PurchaseOutcome::Rejected(Rejection::InsufficientFunds {
                credit,
                price,
            }));
        }

        let out_of_stock = || {
            PurchaseOutcome::Rejected(Rejection::OutOfStock {
                product: product.name.clone(),
            })
        };

        if !self.store.is_product_in_stock(product)? {
            return Ok(out_of_stock());
        }

        let owed = credit - price;
        let insufficient_change = PurchaseOutcome::Rejected(Rejection::InsufficientChange { owed });

        let snapshot = self.store.all_coins()?;
        let Some(plan) = plan_change(owed, &snapshot) else {
            return Ok(insufficient_change);
        };

        // Credit leaves the user before stock or coins move
        self.take_credit(user, credit)?;

        let change = match self.withdraw_planned(&plan) {
            Ok(Some(change)) => change,
            Ok(None) => {
                self.return_credit(user, credit)?;
                return Ok(insufficient_change);
            }
            Err(e) => {
                self.return_credit_after_error(user, credit);
                return Err(e);
            }
        };

        let sold = match self.store.sell_product(product, credit) {
            Ok(Some(sold)) => sold,
            Ok(None) => {
                self.restore_coins(change)?;
                self.return_credit(user, credit)?;
                return Ok(out_of_stock());
            }
            Err(e) => {
                self.restore_coins_after_error(change);
                self.return_credit_after_error(user, credit);
                return Err(e);
            }
        };

        Ok(PurchaseOutcome::Dispensed(Purchase {
            product: sold,
            change,
        }))
    }

    /// Withdraw every planned coin, or none
    ///
    /// Returns `Ok(None)` after putting coins back if the store came up short.
    fn withdraw_planned(&mut self, plan: &ChangePlan) -> Result<Option<Vec<Coin>>, MachineError> {
        let mut change = Vec::new();

        for draw in plan.draws() {
            let coins = match self.store.withdraw_coins(draw.value, draw.count) {
                Ok(coins) => coins,
                Err(e) => {
                    self.restore_coins_after_error(change);
                    return Err(e);
                }
            };

            let short = coins.len() < draw.count;
            change.extend(coins);

            if short {
                warn!(value = %draw.value, wanted = draw.count, "coin stock changed during purchase");
                self.restore_coins(change)?;
                return Ok(None);
            }
        }

        Ok(Some(change))
    }

    // Nothing to move when a free product is bought without depositing
    fn take_credit(&mut self, user: &str, credit: Decimal) -> Result<(), MachineError> {
        if credit.is_zero() {
            return Ok(());
        }
        self.store.clear_user_credit(user)
    }

    fn return_credit(&mut self, user: &str, credit: Decimal) -> Result<(), MachineError> {
        if credit.is_zero() {
            return Ok(());
        }
        self.store.insert_user_credit(user, credit)
    }

    fn return_credit_after_error(&mut self, user: &str, credit: Decimal) {
        if let Err(e) = self.return_credit(user, credit) {
            warn!(user, %credit, reason = %e, "could not return credit after failed purchase");
        }
    }

    fn restore_coins(&mut self, coins: Vec<Coin>) -> Result<(), MachineError> {
        if coins.is_empty() {
            return Ok(());
        }
        self.store.add_coins(coins)
    }

    /// Best-effort rollback while another error is already being reported
    fn restore_coins_after_error(&mut self, coins: Vec<Coin>) {
        let lost = Coin::total(&coins);
        if let Err(e) = self.restore_coins(coins) {
            warn!(%lost, reason = %e, "could not return withdrawn coins to inventory");
        }
    }

    fn log_outcome(user: &str, product: &Product, credit: Decimal, outcome: &PurchaseOutcome) {
        match outcome {
            PurchaseOutcome::Dispensed(purchase) => {
                info!(
                    user,
                    product = %purchase.product.name,
                    credit = %credit,
                    change = %purchase.change_total(),
                    coins = purchase.change.len(),
                    "product dispensed"
                );
            }
            PurchaseOutcome::Rejected(rejection) => {
                info!(
                    user,
                    product = %product.name,
                    credit = %credit,
                    reason = %rejection,
                    "purchase rejected"
                );
            }
        }
    }
}
