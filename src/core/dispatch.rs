//! Command execution
//!
//! Maps each [`Command`] onto the matching `SodaMachine` operation and renders
//! a one-line report. Front ends (the CLI and script replay) share this so a
//! command reads the same whichever way it arrives.

use crate::core::machine::SodaMachine;
use crate::core::traits::DataStore;
use crate::types::{Coin, Command, CommandReport, MachineError, Product, PurchaseOutcome};
use rust_decimal::Decimal;

/// Money with two decimal places
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

impl<S: DataStore> SodaMachine<S> {
    /// Run one command
    ///
    /// # Returns
    ///
    /// * `Ok(report)` with status `ok`, or `rejected` for a turned-down purchase
    ///
    /// # Errors
    ///
    /// Any `MachineError` from the operation. Use [`MachineError::is_fatal`]
    /// to tell caller mistakes from storage failures.
    pub fn execute(&mut self, command: &Command) -> Result<CommandReport, MachineError> {
        let report = match command {
            Command::ShowPrice => CommandReport::ok(format!("Unit price {}", money(self.unit_price()?))),
            Command::ListProducts => {
                let names: Vec<String> = self
                    .list_product_types()?
                    .into_iter()
                    .map(|product| product.name)
                    .collect();
                if names.is_empty() {
                    CommandReport::ok("No products in stock")
                } else {
                    CommandReport::ok(names.join("; "))
                }
            }
            Command::ShowCredit { user } => {
                CommandReport::ok(format!("Credit {}", money(self.deposited_total(user)?)))
            }
            Command::Deposit { user, amount } => {
                let total = self.deposit(user, *amount)?;
                CommandReport::ok(format!("Deposited {}; credit {}", money(*amount), money(total)))
            }
            Command::Refund { user } => {
                let refunded = self.deposited_total(user)?;
                self.issue_refund(user)?;
                CommandReport::ok(format!("Refunded {}", money(refunded)))
            }
            Command::Buy { user, product } => {
                match self.request_product(&Product::named(product.as_str()), user)? {
                    PurchaseOutcome::Dispensed(purchase) => CommandReport::ok(format!(
                        "Dispensed {}; {}",
                        purchase.product.name,
                        describe_change(&purchase.change)
                    )),
                    PurchaseOutcome::Rejected(rejection) => {
                        CommandReport::rejected(rejection.to_string())
                    }
                }
            }
            Command::RestockProduct { product, count } => {
                self.add_to_product_inventory(vec![product.clone(); *count])?;
                CommandReport::ok(format!("Added {} x {}", count, product.name))
            }
            Command::RestockCoins { coin, count } => {
                self.add_to_coin_inventory(vec![coin.clone(); *count])?;
                CommandReport::ok(format!("Added {} x {}", count, coin.name))
            }
            Command::EmptyCash => {
                CommandReport::ok(format!("Emptied {}", money(self.empty_cash_on_hand()?)))
            }
            Command::Report => CommandReport::ok(format!(
                "Cash on hand {}; total income {}",
                money(self.current_cash_on_hand()?),
                money(self.total_income()?)
            )),
            Command::ShowInventory => {
                let products = tally(self.product_inventory()?.iter().map(|p| p.name.as_str()));
                let coins = tally(self.coin_inventory()?.iter().map(|c| c.name.as_str()));
                CommandReport::ok(format!("Products: {} | Coins: {}", products, coins))
            }
        };
        Ok(report)
    }
}

fn describe_change(change: &[Coin]) -> String {
    if change.is_empty() {
        return "no change".to_string();
    }
    let names: Vec<&str> = change.iter().map(|coin| coin.name.as_str()).collect();
    format!("change {} ({})", money(Coin::total(change)), names.join(" + "))
}

/// Count items by name, in first-seen order
fn tally<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for name in names {
        match counts.iter_mut().find(|(seen, _)| *seen == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(name, count)| format!("{} x{}", name, count))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::ReportStatus;
    use rstest::{fixture, rstest};

    fn user_command(make: fn(String) -> Command) -> Command {
        make("ann".to_string())
    }

    #[fixture]
    fn machine() -> SodaMachine<InMemoryStore> {
        let store = InMemoryStore::new(Decimal::new(75, 2))
            .with_products(vec![Product::new("Coke", "1"); 2])
            .with_products([Product::new("Sprite", "3")])
            .with_coins(vec![Coin::quarter(); 2])
            .with_coins([Coin::dime()]);
        SodaMachine::new(store)
    }

    #[rstest]
    #[case::price(Command::ShowPrice, "Unit price 0.75")]
    #[case::products(Command::ListProducts, "Coke; Sprite")]
    #[case::credit(user_command(|user| Command::ShowCredit { user }), "Credit 0.00")]
    #[case::report(Command::Report, "Cash on hand 0.00; total income 0.00")]
    #[case::inventory(Command::ShowInventory, "Products: Coke x2; Sprite x1 | Coins: Quarter x2; Dime x1")]
    fn test_queries(
        mut machine: SodaMachine<InMemoryStore>,
        #[case] command: Command,
        #[case] detail: &str,
    ) {
        assert_eq!(machine.execute(&command).unwrap(), CommandReport::ok(detail));
    }

    #[rstest]
    fn test_deposit_buy_and_report(mut machine: SodaMachine<InMemoryStore>) {
        let deposit = Command::Deposit {
            user: "ann".to_string(),
            amount: Decimal::ONE,
        };
        let buy = Command::Buy {
            user: "ann".to_string(),
            product: "Coke".to_string(),
        };

        assert_eq!(
            machine.execute(&deposit).unwrap(),
            CommandReport::ok("Deposited 1.00; credit 1.00")
        );
        assert_eq!(
            machine.execute(&buy).unwrap(),
            CommandReport::ok("Dispensed Coke; change 0.25 (Quarter)")
        );
        assert_eq!(
            machine.execute(&Command::Report).unwrap(),
            CommandReport::ok("Cash on hand 1.00; total income 1.00")
        );
        assert_eq!(
            machine.execute(&Command::EmptyCash).unwrap(),
            CommandReport::ok("Emptied 1.00")
        );
    }

    #[rstest]
    fn test_buy_rejected(mut machine: SodaMachine<InMemoryStore>) {
        let buy = Command::Buy {
            user: "ann".to_string(),
            product: "Fanta".to_string(),
        };
        machine
            .execute(&Command::Deposit {
                user: "ann".to_string(),
                amount: Decimal::new(75, 2),
            })
            .unwrap();

        let report = machine.execute(&buy).unwrap();

        assert_eq!(report.status, ReportStatus::Rejected);
        assert_eq!(report.detail, "Fanta is out of stock");
    }

    #[rstest]
    fn test_refund_reports_amount_before_clearing(mut machine: SodaMachine<InMemoryStore>) {
        machine.deposit("ann", Decimal::new(60, 2)).unwrap();

        let report = machine.execute(&user_command(|user| Command::Refund { user })).unwrap();

        assert_eq!(report, CommandReport::ok("Refunded 0.60"));
        assert_eq!(machine.deposited_total("ann").unwrap(), Decimal::ZERO);
    }

    #[rstest]
    fn test_refund_unknown_user_is_recoverable(mut machine: SodaMachine<InMemoryStore>) {
        let error = machine
            .execute(&user_command(|user| Command::Refund { user }))
            .unwrap_err();

        assert!(!error.is_fatal());
    }

    #[rstest]
    fn test_restock(mut machine: SodaMachine<InMemoryStore>) {
        let report = machine
            .execute(&Command::RestockCoins {
                coin: Coin::nickel(),
                count: 3,
            })
            .unwrap();
        assert_eq!(report, CommandReport::ok("Added 3 x Nickel"));

        machine
            .execute(&Command::RestockProduct {
                product: Product::new("Fanta", "4"),
                count: 2,
            })
            .unwrap();
        assert_eq!(
            machine.execute(&Command::ShowInventory).unwrap().detail,
            "Products: Coke x2; Sprite x1; Fanta x2 | Coins: Quarter x2; Dime x1; Nickel x3"
        );
    }

    #[test]
    fn test_empty_machine_descriptions() {
        let mut machine = SodaMachine::new(InMemoryStore::new(Decimal::ZERO));

        assert_eq!(
            machine.execute(&Command::ListProducts).unwrap().detail,
            "No products in stock"
        );
        assert_eq!(
            machine.execute(&Command::ShowInventory).unwrap().detail,
            "Products: none | Coins: none"
        );
    }

    #[rstest]
    #[case(Decimal::new(5, 1), "0.50")]
    #[case(Decimal::new(2565, 2), "25.65")]
    #[case(Decimal::from(3), "3.00")]
    fn test_money(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(money(amount), expected);
    }
}
