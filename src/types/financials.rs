//! Machine-wide financial record

use crate::types::MachineError;
use rust_decimal::Decimal;

/// Singleton financial state of the machine
///
/// `total_income` only ever grows. `cash_on_hand` grows with every sale or
/// finalized deposit and drops back to zero when the cash box is emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineFinancials {
    /// Single price charged for any product
    pub unit_price: Decimal,

    /// Cash collected since the cash box was last emptied
    pub cash_on_hand: Decimal,

    /// Cash collected over the lifetime of the machine
    pub total_income: Decimal,
}

impl MachineFinancials {
    /// Fresh financials with the given price and no income yet
    pub fn new(unit_price: Decimal) -> Self {
        MachineFinancials {
            unit_price,
            cash_on_hand: Decimal::ZERO,
            total_income: Decimal::ZERO,
        }
    }

    /// Record money taken in by the machine
    ///
    /// Both counters move by the full amount handed over; change returned
    /// from the coin reserve is not deducted.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ArithmeticOverflow` if either counter would
    /// overflow; neither is changed in that case.
    pub fn record_income(&mut self, amount: Decimal) -> Result<(), MachineError> {
        let overflow = || MachineError::arithmetic_overflow("income");
        let cash_on_hand = self.cash_on_hand.checked_add(amount).ok_or_else(overflow)?;
        let total_income = self.total_income.checked_add(amount).ok_or_else(overflow)?;

        self.cash_on_hand = cash_on_hand;
        self.total_income = total_income;
        Ok(())
    }

    /// Reset cash on hand, returning what was there
    pub fn empty_cash(&mut self) -> Decimal {
        std::mem::replace(&mut self.cash_on_hand, Decimal::ZERO)
    }
}
