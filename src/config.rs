//! Storage configuration
//!
//! Locates the four flat files backing a [`TextFileStore`](crate::store::TextFileStore).
//! By default they live side by side in one data directory; each path can be
//! overridden individually from the command line.

use std::path::{Path, PathBuf};

/// Default file name for the coin inventory
pub const COINS_FILE: &str = "coins.txt";
/// Default file name for the product inventory
pub const PRODUCTS_FILE: &str = "products.txt";
/// Default file name for price, cash on hand and total income
pub const MACHINE_INFO_FILE: &str = "machine_info.txt";
/// Default file name for per-user credit
pub const USER_CREDIT_FILE: &str = "user_credit.txt";

/// Paths of the files backing a text-file store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub coins: PathBuf,
    pub products: PathBuf,
    pub machine_info: PathBuf,
    pub user_credit: PathBuf,
}

impl StoreConfig {
    /// All four files under `dir` with their default names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        StoreConfig {
            coins: dir.join(COINS_FILE),
            products: dir.join(PRODUCTS_FILE),
            machine_info: dir.join(MACHINE_INFO_FILE),
            user_credit: dir.join(USER_CREDIT_FILE),
        }
    }

    /// Replace individual paths where an override is given
    pub fn with_overrides(
        mut self,
        coins: Option<PathBuf>,
        products: Option<PathBuf>,
        machine_info: Option<PathBuf>,
        user_credit: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = coins {
            self.coins = path;
        }
        if let Some(path) = products {
            self.products = path;
        }
        if let Some(path) = machine_info {
            self.machine_info = path;
        }
        if let Some(path) = user_credit {
            self.user_credit = path;
        }
        self
    }

    /// Every configured path, in a fixed order
    pub fn paths(&self) -> [&Path; 4] {
        [
            self.coins.as_path(),
            self.products.as_path(),
            self.machine_info.as_path(),
            self.user_credit.as_path(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_uses_default_names() {
        let config = StoreConfig::in_dir("data");

        assert_eq!(config.coins, Path::new("data/coins.txt"));
        assert_eq!(config.products, Path::new("data/products.txt"));
        assert_eq!(config.machine_info, Path::new("data/machine_info.txt"));
        assert_eq!(config.user_credit, Path::new("data/user_credit.txt"));
    }

    #[test]
    fn test_overrides_replace_only_given_paths() {
        let config = StoreConfig::in_dir("data").with_overrides(
            Some(PathBuf::from("/tmp/my_coins.txt")),
            None,
            None,
            Some(PathBuf::from("credit.txt")),
        );

        assert_eq!(config.coins, Path::new("/tmp/my_coins.txt"));
        assert_eq!(config.products, Path::new("data/products.txt"));
        assert_eq!(config.machine_info, Path::new("data/machine_info.txt"));
        assert_eq!(config.user_credit, Path::new("credit.txt"));
    }
}
