use crate::config::StoreConfig;
use crate::types::{Coin, Command, MachineError, Product};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Run a soda vending machine backed by flat files
#[derive(Parser, Debug)]
#[command(name = "soda-machine")]
#[command(about = "Run a soda vending machine backed by flat files", long_about = None)]
pub struct CliArgs {
    /// Directory holding the store files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "data",
        global = true,
        help = "Directory holding coins.txt, products.txt, machine_info.txt and user_credit.txt"
    )]
    pub data_dir: PathBuf,

    #[arg(long = "coins-file", value_name = "PATH", global = true, help = "Override the coin inventory file")]
    pub coins_file: Option<PathBuf>,

    #[arg(long = "products-file", value_name = "PATH", global = true, help = "Override the product inventory file")]
    pub products_file: Option<PathBuf>,

    #[arg(
        long = "machine-info-file",
        value_name = "PATH",
        global = true,
        help = "Override the price and cash file"
    )]
    pub machine_info_file: Option<PathBuf>,

    #[arg(long = "user-credit-file", value_name = "PATH", global = true, help = "Override the user credit file")]
    pub user_credit_file: Option<PathBuf>,

    /// Who is at the machine
    #[arg(long = "user", value_name = "USER", default_value = "guest", global = true)]
    pub user: String,

    #[command(subcommand)]
    pub action: Action,
}

/// What to do
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Create the store files for a new machine
    Init {
        #[arg(long = "price", value_name = "AMOUNT", default_value = "0.75")]
        price: Decimal,

        /// Reset files that already exist
        #[arg(long = "force")]
        force: bool,
    },

    /// Show the unit price
    Price,

    /// List the products in stock
    Products,

    /// Summarize product and coin inventory
    Inventory,

    /// Show the current user's credit
    Credit,

    /// Deposit money for the current user
    Deposit {
        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Refund the current user's credit
    Refund,

    /// Buy a product with the current user's credit
    Buy {
        #[arg(value_name = "PRODUCT")]
        product: String,
    },

    /// Add product units to the inventory
    RestockProduct {
        name: String,
        slot: String,
        #[arg(long = "count", default_value_t = 1)]
        count: usize,
    },

    /// Add coins to the inventory
    RestockCoins {
        name: String,
        value: Decimal,
        #[arg(long = "count", default_value_t = 1)]
        count: usize,
    },

    /// Empty the cash box
    EmptyCash,

    /// Show cash on hand and total income
    Report,

    /// Run a CSV script of commands, writing outcome rows to stdout
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
}

impl CliArgs {
    /// Resolve the store file locations
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::in_dir(&self.data_dir).with_overrides(
            self.coins_file.clone(),
            self.products_file.clone(),
            self.machine_info_file.clone(),
            self.user_credit_file.clone(),
        )
    }
}

impl Action {
    /// The machine command for this action, acting as `user`
    ///
    /// # Errors
    ///
    /// `MachineError::InvalidCommand` for `init` and `replay`, which work on
    /// the store or a script rather than the machine.
    pub fn to_command(&self, user: &str) -> Result<Command, MachineError> {
        let user = user.to_string();
        let command = match self {
            Action::Price => Command::ShowPrice,
            Action::Products => Command::ListProducts,
            Action::Inventory => Command::ShowInventory,
            Action::Credit => Command::ShowCredit { user },
            Action::Deposit { amount } => Command::Deposit {
                user,
                amount: *amount,
            },
            Action::Refund => Command::Refund { user },
            Action::Buy { product } => Command::Buy {
                user,
                product: product.clone(),
            },
            Action::RestockProduct { name, slot, count } => Command::RestockProduct {
                product: Product::new(name.as_str(), slot.as_str()),
                count: *count,
            },
            Action::RestockCoins { name, value, count } => Command::RestockCoins {
                coin: Coin::new(name.as_str(), *value),
                count: *count,
            },
            Action::EmptyCash => Command::EmptyCash,
            Action::Report => Command::Report,
            Action::Init { .. } | Action::Replay { .. } => {
                return Err(MachineError::invalid_command(
                    None,
                    "init and replay are not machine commands",
                ))
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case::init_defaults(&["program", "init"], Action::Init { price: Decimal::new(75, 2), force: false })]
    #[case::init_custom(&["program", "init", "--price", "1.25", "--force"], Action::Init { price: Decimal::new(125, 2), force: true })]
    #[case::deposit(&["program", "deposit", "0.50"], Action::Deposit { amount: Decimal::new(50, 2) })]
    #[case::negative_deposit(&["program", "deposit", "-0.50"], Action::Deposit { amount: Decimal::new(-50, 2) })]
    #[case::buy(&["program", "buy", "Diet Coke"], Action::Buy { product: "Diet Coke".to_string() })]
    #[case::restock_product(
        &["program", "restock-product", "Coke", "1", "--count", "5"],
        Action::RestockProduct { name: "Coke".to_string(), slot: "1".to_string(), count: 5 }
    )]
    #[case::restock_coins(
        &["program", "restock-coins", "Quarter", "0.25"],
        Action::RestockCoins { name: "Quarter".to_string(), value: Decimal::new(25, 2), count: 1 }
    )]
    #[case::empty_cash(&["program", "empty-cash"], Action::EmptyCash)]
    #[case::replay(&["program", "replay", "script.csv"], Action::Replay { script: PathBuf::from("script.csv") })]
    fn test_action_parsing(#[case] args: &[&str], #[case] expected: Action) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.action, expected);
    }

    #[test]
    fn test_global_options_default() {
        let parsed = CliArgs::try_parse_from(["program", "credit"]).unwrap();

        assert_eq!(parsed.user, "guest");
        assert_eq!(parsed.store_config(), StoreConfig::in_dir("data"));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "credit",
            "--user",
            "ann",
            "--data-dir",
            "/srv/soda",
            "--user-credit-file",
            "/tmp/credit.txt",
        ])
        .unwrap();

        let config = parsed.store_config();
        assert_eq!(parsed.user, "ann");
        assert_eq!(config.coins, Path::new("/srv/soda/coins.txt"));
        assert_eq!(config.user_credit, Path::new("/tmp/credit.txt"));
    }

    #[rstest]
    #[case::deposit(Action::Deposit { amount: Decimal::ONE }, Command::Deposit { user: "ann".to_string(), amount: Decimal::ONE })]
    #[case::credit(Action::Credit, Command::ShowCredit { user: "ann".to_string() })]
    #[case::restock_coins(
        Action::RestockCoins { name: "Dime".to_string(), value: Decimal::new(10, 2), count: 3 },
        Command::RestockCoins { coin: Coin::dime(), count: 3 }
    )]
    #[case::report(Action::Report, Command::Report)]
    fn test_to_command(#[case] action: Action, #[case] expected: Command) {
        assert_eq!(action.to_command("ann"), Ok(expected));
    }

    #[test]
    fn test_init_is_not_a_machine_command() {
        let action = Action::Init {
            price: Decimal::ONE,
            force: false,
        };
        assert!(action.to_command("ann").is_err());
    }

    #[rstest]
    #[case::missing_subcommand(&["program"])]
    #[case::bad_amount(&["program", "deposit", "lots"])]
    #[case::missing_product(&["program", "buy"])]
    #[case::bad_count(&["program", "restock-product", "Coke", "1", "--count", "-1"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
