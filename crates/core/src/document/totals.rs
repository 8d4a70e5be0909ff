//! Document total computation.
//!
//! Two entry paths exist: itemized documents (bills with line items,
//! invoices) compute tax on top of the item subtotal, while simple bills
//! capture a tax-inclusive grand total and back the subtotal out of it.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{DocumentTotals, LineItemInput};

/// Rounds to 2 decimal places with banker's rounding.
///
/// All monetary rounding in the posting core goes through this one
/// function so the residual-absorption law in the allocator stays
/// consistent with total computation.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Computes totals for an itemized document.
///
/// The subtotal is the sum of `quantity * unit_price` over all items and
/// tax is applied on top: `tax = round2(subtotal * rate / 100)`.
#[must_use]
pub fn totals_from_items(items: &[LineItemInput], tax_rate: Decimal) -> DocumentTotals {
    let subtotal = round2(items.iter().map(LineItemInput::line_total).sum());
    let tax_amount = round2(subtotal * tax_rate / Decimal::ONE_HUNDRED);
    DocumentTotals {
        subtotal,
        tax_rate,
        tax_amount,
        total_amount: subtotal + tax_amount,
    }
}

/// Computes totals for a simple document entered as a tax-inclusive amount.
///
/// The subtotal is backed out of the total: `subtotal = round2(total /
/// (1 + rate/100))`, and the tax amount is the difference so the three
/// figures always reconcile exactly.
#[must_use]
pub fn totals_from_inclusive_amount(total_amount: Decimal, tax_rate: Decimal) -> DocumentTotals {
    let divisor = Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED;
    let subtotal = round2(total_amount / divisor);
    DocumentTotals {
        subtotal,
        tax_rate,
        tax_amount: total_amount - subtotal,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: Decimal, price: Decimal) -> LineItemInput {
        LineItemInput {
            description: "item".to_string(),
            quantity: qty,
            unit_price: price,
            account_id: None,
        }
    }

    #[test]
    fn test_itemized_totals() {
        let items = vec![item(dec!(2), dec!(150.00)), item(dec!(1), dec!(700.00))];
        let totals = totals_from_items(&items, dec!(12));
        assert_eq!(totals.subtotal, dec!(1000.00));
        assert_eq!(totals.tax_amount, dec!(120.00));
        assert_eq!(totals.total_amount, dec!(1120.00));
    }

    #[test]
    fn test_itemized_totals_zero_tax() {
        let items = vec![item(dec!(4), dec!(25.25))];
        let totals = totals_from_items(&items, Decimal::ZERO);
        assert_eq!(totals.subtotal, dec!(101.00));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec!(101.00));
    }

    #[test]
    fn test_inclusive_total_backs_out_tax() {
        let totals = totals_from_inclusive_amount(dec!(1120.00), dec!(12));
        assert_eq!(totals.subtotal, dec!(1000.00));
        assert_eq!(totals.tax_amount, dec!(120.00));
        assert_eq!(totals.total_amount, dec!(1120.00));
    }

    #[test]
    fn test_inclusive_total_reconciles_on_awkward_amounts() {
        // 999.99 / 1.12 = 892.848..., rounds to 892.85.
        let totals = totals_from_inclusive_amount(dec!(999.99), dec!(12));
        assert_eq!(totals.subtotal, dec!(892.85));
        assert_eq!(totals.subtotal + totals.tax_amount, totals.total_amount);
    }

    #[test]
    fn test_round2_bankers() {
        assert_eq!(round2(dec!(2.675)), dec!(2.68));
        assert_eq!(round2(dec!(2.665)), dec!(2.66));
        assert_eq!(round2(dec!(2.125)), dec!(2.12));
    }
}
