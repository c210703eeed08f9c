//! Flat-file data store
//!
//! Every operation reads the record files it needs, applies the change and
//! writes them back, so the files are always the source of truth and several
//! processes can take turns on the same data directory.
//!
//! # Atomicity
//!
//! There is no cross-process locking. Each operation is atomic only with
//! respect to callers in the same process that go through `&mut self`.

use crate::config::StoreConfig;
use crate::core::DataStore;
use crate::io::store_format::{
    read_coins, read_credits, read_financials, read_products, write_coins, write_credits,
    write_financials, write_products,
};
use crate::store::inventory::{add_credit, distinct_by_name, take_coins, take_product};
use crate::types::{Coin, MachineError, MachineFinancials, Product};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Store backed by four text files
#[derive(Debug, Clone)]
pub struct TextFileStore {
    config: StoreConfig,
}

impl TextFileStore {
    /// Open an existing store
    ///
    /// # Errors
    ///
    /// Returns `MachineError::IoError` if any configured file does not exist.
    pub fn open(config: StoreConfig) -> Result<Self, MachineError> {
        if let Some(missing) = config.paths().into_iter().find(|path| !path.is_file()) {
            return Err(MachineError::IoError {
                message: format!(
                    "Store file '{}' not found (run `init` first)",
                    missing.display()
                ),
            });
        }
        Ok(TextFileStore { config })
    }

    /// Create the store files for a new machine charging `unit_price`
    ///
    /// Existing files are kept unless `force` is set, in which case every
    /// file is reset to an empty machine.
    pub fn initialize(
        config: StoreConfig,
        unit_price: Decimal,
        force: bool,
    ) -> Result<Self, MachineError> {
        for path in config.paths() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let fresh = |path: &Path| force || !path.exists();
        if fresh(config.coins.as_path()) {
            write_coins(&config.coins, &[])?;
        }
        if fresh(config.products.as_path()) {
            write_products(&config.products, &[])?;
        }
        if fresh(config.machine_info.as_path()) {
            write_financials(&config.machine_info, &MachineFinancials::new(unit_price))?;
        }
        if fresh(config.user_credit.as_path()) {
            write_credits(&config.user_credit, &BTreeMap::new())?;
        }

        debug!(?config, %unit_price, force, "store initialized");
        Ok(TextFileStore { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read, modify and rewrite the machine info; nothing is written if `f` fails
    fn update_financials<R>(
        &self,
        f: impl FnOnce(&mut MachineFinancials) -> Result<R, MachineError>,
    ) -> Result<R, MachineError> {
        let mut financials = read_financials(&self.config.machine_info)?;
        let result = f(&mut financials)?;
        write_financials(&self.config.machine_info, &financials)?;
        Ok(result)
    }
}

impl DataStore for TextFileStore {
    fn product_types(&self) -> Result<Vec<Product>, MachineError> {
        Ok(distinct_by_name(&read_products(&self.config.products)?))
    }

    fn is_product_in_stock(&self, product: &Product) -> Result<bool, MachineError> {
        Ok(read_products(&self.config.products)?
            .iter()
            .any(|stocked| stocked.same_kind(product)))
    }

    fn sell_product(
        &mut self,
        product: &Product,
        amount_credited: Decimal,
    ) -> Result<Option<Product>, MachineError> {
        let mut products = read_products(&self.config.products)?;
        // Validate the financials before touching stock
        let mut financials = read_financials(&self.config.machine_info)?;

        let Some(sold) = take_product(&mut products, product) else {
            return Ok(None);
        };

        financials.record_income(amount_credited)?;
        write_products(&self.config.products, &products)?;
        write_financials(&self.config.machine_info, &financials)?;
        Ok(Some(sold))
    }

    fn add_products(&mut self, products: Vec<Product>) -> Result<(), MachineError> {
        let mut stocked = read_products(&self.config.products)?;
        stocked.extend(products);
        write_products(&self.config.products, &stocked)
    }

    fn all_products(&self) -> Result<Vec<Product>, MachineError> {
        read_products(&self.config.products)
    }

    fn insert_user_credit(&mut self, user: &str, amount: Decimal) -> Result<(), MachineError> {
        let mut credits = read_credits(&self.config.user_credit)?;
        add_credit(credits.entry(user.to_string()).or_default(), amount)?;
        write_credits(&self.config.user_credit, &credits)
    }

    fn clear_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let mut credits = read_credits(&self.config.user_credit)?;
        let credit = credits
            .get_mut(user)
            .ok_or_else(|| MachineError::unknown_user(user))?;
        *credit = Decimal::ZERO;
        write_credits(&self.config.user_credit, &credits)
    }

    fn user_credit(&self, user: &str) -> Result<Decimal, MachineError> {
        Ok(read_credits(&self.config.user_credit)?
            .get(user)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    fn finalize_user_credit(&mut self, user: &str) -> Result<(), MachineError> {
        let mut credits = read_credits(&self.config.user_credit)?;
        let credit = credits
            .remove(user)
            .ok_or_else(|| MachineError::unknown_user(user))?;

        self.update_financials(|financials| financials.record_income(credit))?;
        write_credits(&self.config.user_credit, &credits)
    }

    fn unit_price(&self) -> Result<Decimal, MachineError> {
        Ok(read_financials(&self.config.machine_info)?.unit_price)
    }

    fn empty_cash(&mut self) -> Result<Decimal, MachineError> {
        self.update_financials(|financials| Ok(financials.empty_cash()))
    }

    fn cash_on_hand(&self) -> Result<Decimal, MachineError> {
        Ok(read_financials(&self.config.machine_info)?.cash_on_hand)
    }

    fn total_income(&self) -> Result<Decimal, MachineError> {
        Ok(read_financials(&self.config.machine_info)?.total_income)
    }

    fn withdraw_coins(&mut self, value: Decimal, count: usize) -> Result<Vec<Coin>, MachineError> {
        let mut coins = read_coins(&self.config.coins)?;
        let taken = take_coins(&mut coins, value, count);
        if !taken.is_empty() {
            write_coins(&self.config.coins, &coins)?;
        }
        Ok(taken)
    }

    fn all_coins(&self) -> Result<Vec<Coin>, MachineError> {
        read_coins(&self.config.coins)
    }

    fn add_coins(&mut self, coins: Vec<Coin>) -> Result<(), MachineError> {
        let mut stocked = read_coins(&self.config.coins)?;
        stocked.extend(coins);
        write_coins(&self.config.coins, &stocked)
    }
}
