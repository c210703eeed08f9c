//! Greedy change planning
//!
//! Change is planned against a snapshot of the coin inventory before any coin
//! leaves the store. The plan walks the stocked denominations from highest to
//! lowest, taking as many coins of each as fit into what is still owed.
//!
//! This is a single greedy pass with no backtracking. It can fail to find
//! change that exists: owing 0.30 with one quarter and three dimes takes the
//! quarter first and is then stuck at 0.05.

use crate::types::Coin;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Coins of one denomination to withdraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinDraw {
    /// Face value of the denomination
    pub value: Decimal,
    /// Number of coins to take
    pub count: usize,
}

/// Coins to withdraw for one purchase, highest denomination first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangePlan {
    draws: Vec<CoinDraw>,
}

impl ChangePlan {
    pub fn draws(&self) -> &[CoinDraw] {
        &self.draws
    }

    /// Total value the plan hands back
    pub fn total(&self) -> Decimal {
        self.draws
            .iter()
            .map(|draw| draw.value * Decimal::from(draw.count))
            .sum()
    }

    /// Whether no coins are needed (exact payment)
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Stocked denominations with their coin counts, highest value first
///
/// Coins with a non-positive value are ignored; they can never make change.
pub fn denominations(coins: &[Coin]) -> Vec<(Decimal, usize)> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for coin in coins.iter().filter(|coin| coin.value > Decimal::ZERO) {
        *counts.entry(coin.value).or_insert(0) += 1;
    }
    counts.into_iter().rev().collect()
}

/// Plan exact change for `owed` from the `available` coins
///
/// # Returns
///
/// * `Some(ChangePlan)` whose total equals `owed` exactly (empty when `owed` is zero)
/// * `None` if the greedy pass leaves a remainder
pub fn plan_change(owed: Decimal, available: &[Coin]) -> Option<ChangePlan> {
    let mut plan = ChangePlan::default();
    if owed <= Decimal::ZERO {
        return Some(plan);
    }

    let mut remaining = owed;
    for (value, stocked) in denominations(available) {
        let desired = (remaining / value)
            .floor()
            .to_usize()
            .unwrap_or(usize::MAX);
        let count = desired.min(stocked);
        if count == 0 {
            continue;
        }

        remaining -= value * Decimal::from(count);
        plan.draws.push(CoinDraw { value, count });
    }

    if remaining > Decimal::ZERO {
        None
    } else {
        Some(plan)
    }
}
