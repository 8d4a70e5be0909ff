//! Budget ceiling checks.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::lines::JournalLine;

use super::error::BudgetError;
use super::types::BudgetSnapshot;

/// Checks a spend amount against a budget snapshot.
///
/// `None` means the account carries no budget item for the active fiscal
/// year, which passes unconditionally.
pub fn check_against_budget(
    snapshot: Option<&BudgetSnapshot>,
    amount: Decimal,
) -> Result<(), BudgetError> {
    let Some(snapshot) = snapshot else {
        return Ok(());
    };
    let remaining = snapshot.remaining();
    if amount > remaining {
        return Err(BudgetError::Exceeded {
            account_id: snapshot.account_id,
            requested: amount,
            remaining,
        });
    }
    Ok(())
}

/// Sums the debit side of journal lines per account.
///
/// The guard runs once per distinct expense account, over the summed
/// allocation, not once per line. Ordered map so enforcement order is
/// deterministic.
#[must_use]
pub fn expense_totals_by_account(lines: &[JournalLine]) -> BTreeMap<i64, Decimal> {
    let mut totals = BTreeMap::new();
    for line in lines {
        if line.debit > Decimal::ZERO {
            *totals.entry(line.account_id).or_insert(Decimal::ZERO) += line.debit;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(budgeted: Decimal, actual: Decimal) -> BudgetSnapshot {
        BudgetSnapshot {
            item_id: 1,
            account_id: 54,
            budgeted_amount: budgeted,
            actual_amount: actual,
        }
    }

    #[test]
    fn test_no_budget_item_passes() {
        assert!(check_against_budget(None, dec!(1_000_000)).is_ok());
    }

    #[test]
    fn test_within_budget_passes() {
        let s = snapshot(dec!(10000), dec!(7500));
        assert!(check_against_budget(Some(&s), dec!(2500)).is_ok());
    }

    #[test]
    fn test_exceeding_budget_fails() {
        let s = snapshot(dec!(10000), dec!(7500));
        assert_eq!(
            check_against_budget(Some(&s), dec!(2500.01)),
            Err(BudgetError::Exceeded {
                account_id: 54,
                requested: dec!(2500.01),
                remaining: dec!(2500),
            })
        );
    }

    #[test]
    fn test_expense_totals_group_by_account() {
        let lines = vec![
            JournalLine::debit(54, dec!(600), ""),
            JournalLine::debit(54, dec!(120), ""),
            JournalLine::debit(55, dec!(400), ""),
            JournalLine::credit(20, dec!(1120), ""),
        ];
        let totals = expense_totals_by_account(&lines);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&54], dec!(720));
        assert_eq!(totals[&55], dec!(400));
    }
}
