//! Purchase result types
//!
//! A purchase either dispenses a product with change, or is rejected for a
//! business reason. Rejections are ordinary values, not errors: the machine
//! stays usable and nothing was mutated.

use super::coin::Coin;
use super::product::Product;
use rust_decimal::Decimal;
use thiserror::Error;

/// A completed sale
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    /// The unit removed from stock
    pub product: Product,

    /// Change coins, highest denomination first
    pub change: Vec<Coin>,
}

impl Purchase {
    /// Total value of the change handed back
    pub fn change_total(&self) -> Decimal {
        Coin::total(&self.change)
    }
}

/// Business reasons a purchase can be turned down
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The user has not deposited enough to cover the unit price
    #[error("Insufficient funds: deposited {credit:.2}, price is {price:.2}")]
    InsufficientFunds {
        /// Credit on record for the user
        credit: Decimal,
        /// Machine unit price
        price: Decimal,
    },

    /// No unit of the requested product is stocked
    #[error("{product} is out of stock")]
    OutOfStock {
        /// Name of the requested product
        product: String,
    },

    /// The coin inventory cannot produce the exact change owed
    #[error("Not enough coins to return {owed:.2} in change")]
    InsufficientChange {
        /// Change that would have been owed
        owed: Decimal,
    },
}

/// Result of a purchase request
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Dispensed(Purchase),
    Rejected(Rejection),
}

impl PurchaseOutcome {
    /// The completed purchase, if any
    pub fn purchase(&self) -> Option<&Purchase> {
        match self {
            PurchaseOutcome::Dispensed(purchase) => Some(purchase),
            PurchaseOutcome::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            PurchaseOutcome::Dispensed(_) => None,
            PurchaseOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    /// The dispensed product, if any
    pub fn product(&self) -> Option<&Product> {
        self.purchase().map(|purchase| &purchase.product)
    }

    /// Change coins; empty when rejected
    pub fn change(&self) -> &[Coin] {
        self.purchase()
            .map(|purchase| purchase.change.as_slice())
            .unwrap_or(&[])
    }
}
