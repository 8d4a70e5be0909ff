//! Balance deltas and status recomputation.
//!
//! Adjustments and payments move a document's open balance. Every move is
//! expressed as a signed delta so the same function applies an effect and,
//! negated, reverses it exactly.

use rust_decimal::Decimal;

use super::types::{AdjustmentType, DocumentStatus};

/// Signed balance delta for an adjustment of the given amount.
///
/// A debit memo raises the balance owed; every other adjustment type
/// lowers it. Pass `reverse = true` to undo a previously applied
/// adjustment, which negates the delta.
#[must_use]
pub fn balance_delta(adjustment_type: AdjustmentType, amount: Decimal, reverse: bool) -> Decimal {
    let delta = match adjustment_type {
        AdjustmentType::DebitMemo => amount,
        AdjustmentType::CreditMemo | AdjustmentType::WriteOff | AdjustmentType::Discount => {
            -amount
        }
    };
    if reverse { -delta } else { delta }
}

/// Signed balance delta for a payment of the given amount.
///
/// Payments always lower the balance; reversing a payment restores it.
#[must_use]
pub fn payment_delta(amount: Decimal, reverse: bool) -> Decimal {
    if reverse { amount } else { -amount }
}

/// Recomputes a document's status after its balance moved.
///
/// A balance at or below zero means fully settled. A document that was
/// `paid` but whose balance rose back above zero regresses to `partial`;
/// any other status is left untouched.
#[must_use]
pub fn next_status(balance: Decimal, current: DocumentStatus) -> DocumentStatus {
    if balance <= Decimal::ZERO {
        DocumentStatus::Paid
    } else if current == DocumentStatus::Paid {
        DocumentStatus::Partial
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AdjustmentType::DebitMemo, dec!(500), dec!(500))]
    #[case(AdjustmentType::CreditMemo, dec!(500), dec!(-500))]
    #[case(AdjustmentType::WriteOff, dec!(120.50), dec!(-120.50))]
    #[case(AdjustmentType::Discount, dec!(75), dec!(-75))]
    fn test_balance_delta(
        #[case] kind: AdjustmentType,
        #[case] amount: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(balance_delta(kind, amount, false), expected);
        assert_eq!(balance_delta(kind, amount, true), -expected);
    }

    #[test]
    fn test_apply_then_reverse_is_identity() {
        let start = dec!(1000);
        for kind in [
            AdjustmentType::DebitMemo,
            AdjustmentType::CreditMemo,
            AdjustmentType::WriteOff,
            AdjustmentType::Discount,
        ] {
            let moved = start + balance_delta(kind, dec!(333.33), false);
            let restored = moved + balance_delta(kind, dec!(333.33), true);
            assert_eq!(restored, start);
        }
    }

    #[test]
    fn test_payment_delta() {
        assert_eq!(payment_delta(dec!(200), false), dec!(-200));
        assert_eq!(payment_delta(dec!(200), true), dec!(200));
    }

    #[rstest]
    #[case(dec!(0), DocumentStatus::Sent, DocumentStatus::Paid)]
    #[case(dec!(-10), DocumentStatus::Partial, DocumentStatus::Paid)]
    #[case(dec!(500), DocumentStatus::Paid, DocumentStatus::Partial)]
    #[case(dec!(500), DocumentStatus::Approved, DocumentStatus::Approved)]
    #[case(dec!(500), DocumentStatus::Overdue, DocumentStatus::Overdue)]
    fn test_next_status(
        #[case] balance: Decimal,
        #[case] current: DocumentStatus,
        #[case] expected: DocumentStatus,
    ) {
        assert_eq!(next_status(balance, current), expected);
    }

    #[test]
    fn test_credit_memo_settles_bill() {
        let balance = dec!(500) + balance_delta(AdjustmentType::CreditMemo, dec!(500), false);
        assert_eq!(balance, Decimal::ZERO);
        assert_eq!(
            next_status(balance, DocumentStatus::Partial),
            DocumentStatus::Paid
        );
    }
}
