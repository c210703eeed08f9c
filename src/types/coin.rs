//! Coin-related types for the soda machine

use rust_decimal::Decimal;

/// A single coin unit
///
/// The coin inventory is a multiset of these; the change algorithm groups
/// them by `value` to find the available denominations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    /// Denomination name, e.g. "Quarter"
    pub name: String,

    /// Face value with exact decimal precision
    pub value: Decimal,
}

impl Coin {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Coin {
            name: name.into(),
            value,
        }
    }

    pub fn quarter() -> Self {
        Coin::new("Quarter", Decimal::new(25, 2))
    }

    pub fn dime() -> Self {
        Coin::new("Dime", Decimal::new(10, 2))
    }

    pub fn nickel() -> Self {
        Coin::new("Nickel", Decimal::new(5, 2))
    }

    /// Sum of the face values of `coins`
    pub fn total(coins: &[Coin]) -> Decimal {
        coins.iter().map(|coin| coin.value).sum()
    }
}
