//! Budget domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of one budget item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// Budget item id.
    pub item_id: i64,
    /// Account the budget covers.
    pub account_id: i64,
    /// Ceiling for the fiscal year.
    pub budgeted_amount: Decimal,
    /// Spend recorded so far.
    pub actual_amount: Decimal,
}

impl BudgetSnapshot {
    /// Headroom left under the ceiling. Can go negative when actuals
    /// were recorded outside the guard.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.budgeted_amount - self.actual_amount
    }

    /// Variance after a further `delta` of spend, as stored alongside
    /// the actuals.
    #[must_use]
    pub fn variance_after(&self, delta: Decimal) -> Decimal {
        self.budgeted_amount - (self.actual_amount + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_remaining_and_variance() {
        let snapshot = BudgetSnapshot {
            item_id: 1,
            account_id: 54,
            budgeted_amount: dec!(10000),
            actual_amount: dec!(7500),
        };
        assert_eq!(snapshot.remaining(), dec!(2500));
        assert_eq!(snapshot.variance_after(dec!(500)), dec!(2000));
    }
}
