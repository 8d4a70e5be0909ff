//! Debit/credit line patterns per source document type.
//!
//! Each builder turns a document's resolved amounts into a balanced set of
//! journal lines. Account resolution happens upstream: the caller passes an
//! `AccountRefs` of already-resolved control and fallback account ids, so
//! the builders stay pure and a missing account fails before any line is
//! constructed.

use rust_decimal::Decimal;

use crate::document::types::{AdjustmentSide, AdjustmentType, DocumentTotals};

use super::allocation::{SourceLine, allocate};
use super::error::LedgerError;
use super::lines::JournalLine;

/// Resolved control and fallback account ids used by the posting patterns.
#[derive(Debug, Clone, Copy)]
pub struct AccountRefs {
    /// Accounts Payable control account.
    pub accounts_payable: i64,
    /// Accounts Receivable control account.
    pub accounts_receivable: i64,
    /// Cash account credited by disbursements.
    pub cash: i64,
    /// Sales tax payable account.
    pub sales_tax_payable: i64,
    /// Expense account used when an item carries no account.
    pub fallback_expense: i64,
    /// Revenue account used when an item carries no account.
    pub fallback_revenue: i64,
    /// Income account credited by payable write-offs.
    pub write_off_income: i64,
    /// Expense account debited by receivable write-offs and discounts.
    pub bad_debt_expense: i64,
}

/// Drops lines whose amount rounded to zero during allocation.
fn keep_nonzero(lines: Vec<JournalLine>) -> Vec<JournalLine> {
    lines
        .into_iter()
        .filter(|l| l.debit > Decimal::ZERO || l.credit > Decimal::ZERO)
        .collect()
}

/// Journal lines for an approved bill.
///
/// Debits the expense accounts of the bill's items with the tax-inclusive
/// total allocated proportionally over item weights, and credits Accounts
/// Payable for the total.
pub fn bill_entry_lines(
    totals: &DocumentTotals,
    items: &[SourceLine],
    refs: &AccountRefs,
) -> Result<Vec<JournalLine>, LedgerError> {
    if totals.total_amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }

    let mut lines: Vec<JournalLine> = allocate(totals.total_amount, items, refs.fallback_expense)
        .into_iter()
        .map(|l| JournalLine::debit(l.account_id, l.amount, "Expense - Bill"))
        .collect();
    lines.push(JournalLine::credit(
        refs.accounts_payable,
        totals.total_amount,
        "Accounts Payable - Bill",
    ));
    Ok(keep_nonzero(lines))
}

/// Journal lines for a sent invoice.
///
/// Debits Accounts Receivable for the total, credits the revenue accounts
/// of the invoice's items with the subtotal allocated proportionally, and
/// credits sales tax payable when tax applies.
pub fn invoice_entry_lines(
    totals: &DocumentTotals,
    items: &[SourceLine],
    refs: &AccountRefs,
) -> Result<Vec<JournalLine>, LedgerError> {
    if totals.total_amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }

    let mut lines = vec![JournalLine::debit(
        refs.accounts_receivable,
        totals.total_amount,
        "Accounts Receivable - Invoice",
    )];
    lines.extend(
        allocate(totals.subtotal, items, refs.fallback_revenue)
            .into_iter()
            .map(|l| JournalLine::credit(l.account_id, l.amount, "Revenue - Invoice")),
    );
    if totals.tax_amount > Decimal::ZERO {
        lines.push(JournalLine::credit(
            refs.sales_tax_payable,
            totals.tax_amount,
            "Sales Tax Payable - Invoice",
        ));
    }
    Ok(keep_nonzero(lines))
}

/// Journal lines for a disbursement.
///
/// Debits the disbursement's expense account, or Accounts Payable when the
/// disbursement settles a bill, and credits Cash.
pub fn disbursement_entry_lines(
    amount: Decimal,
    expense_account: Option<i64>,
    pays_bill: bool,
    refs: &AccountRefs,
) -> Result<Vec<JournalLine>, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }

    let debit_account = if pays_bill {
        refs.accounts_payable
    } else {
        expense_account.unwrap_or(refs.fallback_expense)
    };
    Ok(vec![
        JournalLine::debit(debit_account, amount, "Disbursement"),
        JournalLine::credit(refs.cash, amount, "Cash - Disbursement"),
    ])
}

/// Journal lines for an adjustment.
///
/// The pattern is picked from the adjustment type and the side of the
/// ledger it touches. `items` are the underlying document's line items,
/// used to spread the adjustment amount over the accounts it originally
/// hit; without a linked document the caller passes an empty slice and
/// the whole amount lands on the fallback account.
pub fn adjustment_entry_lines(
    adjustment_type: AdjustmentType,
    side: AdjustmentSide,
    amount: Decimal,
    items: &[SourceLine],
    refs: &AccountRefs,
) -> Result<Vec<JournalLine>, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }

    let lines = match side {
        AdjustmentSide::Payable => {
            let expense = || allocate(amount, items, refs.fallback_expense);
            match adjustment_type {
                AdjustmentType::DebitMemo => {
                    let mut lines: Vec<JournalLine> = expense()
                        .into_iter()
                        .map(|l| JournalLine::debit(l.account_id, l.amount, "Payable Debit Memo"))
                        .collect();
                    lines.push(JournalLine::credit(
                        refs.accounts_payable,
                        amount,
                        "Accounts Payable - Debit Memo",
                    ));
                    lines
                }
                AdjustmentType::CreditMemo | AdjustmentType::Discount => {
                    let mut lines = vec![JournalLine::debit(
                        refs.accounts_payable,
                        amount,
                        "Accounts Payable - Credit Memo",
                    )];
                    lines.extend(
                        expense()
                            .into_iter()
                            .map(|l| JournalLine::credit(l.account_id, l.amount, "Expense Reversal")),
                    );
                    lines
                }
                AdjustmentType::WriteOff => vec![
                    JournalLine::debit(
                        refs.accounts_payable,
                        amount,
                        "Accounts Payable - Write Off",
                    ),
                    JournalLine::credit(
                        refs.write_off_income,
                        amount,
                        "Payable Write Off Income",
                    ),
                ],
            }
        }
        AdjustmentSide::Receivable => {
            let revenue = || allocate(amount, items, refs.fallback_revenue);
            match adjustment_type {
                AdjustmentType::DebitMemo => {
                    let mut lines = vec![JournalLine::debit(
                        refs.accounts_receivable,
                        amount,
                        "Accounts Receivable - Debit Memo",
                    )];
                    lines.extend(
                        revenue()
                            .into_iter()
                            .map(|l| JournalLine::credit(l.account_id, l.amount, "Revenue - Debit Memo")),
                    );
                    lines
                }
                AdjustmentType::CreditMemo => {
                    let mut lines: Vec<JournalLine> = revenue()
                        .into_iter()
                        .map(|l| JournalLine::debit(l.account_id, l.amount, "Revenue Reversal"))
                        .collect();
                    lines.push(JournalLine::credit(
                        refs.accounts_receivable,
                        amount,
                        "Accounts Receivable - Credit Memo",
                    ));
                    lines
                }
                AdjustmentType::WriteOff | AdjustmentType::Discount => vec![
                    JournalLine::debit(
                        refs.bad_debt_expense,
                        amount,
                        "Discount/Write Off Expense",
                    ),
                    JournalLine::credit(
                        refs.accounts_receivable,
                        amount,
                        "Accounts Receivable - Adjustment",
                    ),
                ],
            }
        }
    };
    Ok(keep_nonzero(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::totals::{totals_from_inclusive_amount, totals_from_items};
    use crate::document::types::LineItemInput;
    use crate::ledger::lines::validate_lines;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn refs() -> AccountRefs {
        AccountRefs {
            accounts_payable: 20,
            accounts_receivable: 12,
            cash: 10,
            sales_tax_payable: 28,
            fallback_expense: 54,
            fallback_revenue: 40,
            write_off_income: 43,
            bad_debt_expense: 59,
        }
    }

    fn source(account_id: i64, amount: Decimal) -> SourceLine {
        SourceLine {
            account_id: Some(account_id),
            amount,
        }
    }

    #[test]
    fn test_bill_lines_balance_and_split() {
        // Two items 600/400, 12% tax: total 1120 allocated 672/448.
        let items = vec![source(100, dec!(600)), source(101, dec!(400))];
        let line_items: Vec<LineItemInput> = items
            .iter()
            .map(|s| LineItemInput {
                description: String::new(),
                quantity: dec!(1),
                unit_price: s.amount,
                account_id: s.account_id,
            })
            .collect();
        let totals = totals_from_items(&line_items, dec!(12));

        let lines = bill_entry_lines(&totals, &items, &refs()).unwrap();
        let entry = validate_lines(&lines).unwrap();
        assert_eq!(entry.total_debit, dec!(1120.00));
        assert_eq!(lines[0].debit, dec!(672.00));
        assert_eq!(lines[1].debit, dec!(448.00));
        assert_eq!(lines[2].account_id, refs().accounts_payable);
        assert_eq!(lines[2].credit, dec!(1120.00));
    }

    #[test]
    fn test_simple_bill_uses_fallback_expense() {
        let totals = totals_from_inclusive_amount(dec!(1120.00), dec!(12));
        let lines = bill_entry_lines(&totals, &[], &refs()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_id, refs().fallback_expense);
        assert_eq!(lines[0].debit, dec!(1120.00));
        validate_lines(&lines).unwrap();
    }

    #[test]
    fn test_invoice_lines_balance_with_tax() {
        let items = vec![source(200, dec!(1000))];
        let line_items = vec![LineItemInput {
            description: String::new(),
            quantity: dec!(1),
            unit_price: dec!(1000),
            account_id: Some(200),
        }];
        let totals = totals_from_items(&line_items, dec!(12));

        let lines = invoice_entry_lines(&totals, &items, &refs()).unwrap();
        validate_lines(&lines).unwrap();
        assert_eq!(lines[0].account_id, refs().accounts_receivable);
        assert_eq!(lines[0].debit, dec!(1120.00));
        assert_eq!(lines[1].credit, dec!(1000.00));
        assert_eq!(lines[2].account_id, refs().sales_tax_payable);
        assert_eq!(lines[2].credit, dec!(120.00));
    }

    #[test]
    fn test_invoice_zero_tax_omits_tax_line() {
        let items = vec![source(200, dec!(500))];
        let line_items = vec![LineItemInput {
            description: String::new(),
            quantity: dec!(1),
            unit_price: dec!(500),
            account_id: Some(200),
        }];
        let totals = totals_from_items(&line_items, Decimal::ZERO);
        let lines = invoice_entry_lines(&totals, &items, &refs()).unwrap();
        assert_eq!(lines.len(), 2);
        validate_lines(&lines).unwrap();
    }

    #[test]
    fn test_disbursement_plain_expense() {
        let lines = disbursement_entry_lines(dec!(250), Some(77), false, &refs()).unwrap();
        validate_lines(&lines).unwrap();
        assert_eq!(lines[0].account_id, 77);
        assert_eq!(lines[1].account_id, refs().cash);
    }

    #[test]
    fn test_disbursement_paying_bill_debits_payable() {
        let lines = disbursement_entry_lines(dec!(250), Some(77), true, &refs()).unwrap();
        assert_eq!(lines[0].account_id, refs().accounts_payable);
    }

    #[test]
    fn test_disbursement_rejects_zero_amount() {
        assert_eq!(
            disbursement_entry_lines(Decimal::ZERO, None, false, &refs()),
            Err(LedgerError::NonPositiveAmount)
        );
    }

    #[rstest]
    #[case(AdjustmentType::DebitMemo, AdjustmentSide::Payable)]
    #[case(AdjustmentType::CreditMemo, AdjustmentSide::Payable)]
    #[case(AdjustmentType::WriteOff, AdjustmentSide::Payable)]
    #[case(AdjustmentType::Discount, AdjustmentSide::Payable)]
    #[case(AdjustmentType::DebitMemo, AdjustmentSide::Receivable)]
    #[case(AdjustmentType::CreditMemo, AdjustmentSide::Receivable)]
    #[case(AdjustmentType::WriteOff, AdjustmentSide::Receivable)]
    #[case(AdjustmentType::Discount, AdjustmentSide::Receivable)]
    fn test_every_adjustment_pattern_balances(
        #[case] kind: AdjustmentType,
        #[case] side: AdjustmentSide,
    ) {
        let items = vec![source(300, dec!(700)), source(301, dec!(300))];
        let lines = adjustment_entry_lines(kind, side, dec!(333.33), &items, &refs()).unwrap();
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.total_debit, dec!(333.33));
    }

    #[test]
    fn test_payable_write_off_accounts() {
        let lines = adjustment_entry_lines(
            AdjustmentType::WriteOff,
            AdjustmentSide::Payable,
            dec!(100),
            &[],
            &refs(),
        )
        .unwrap();
        assert_eq!(lines[0].account_id, refs().accounts_payable);
        assert_eq!(lines[0].debit, dec!(100));
        assert_eq!(lines[1].account_id, refs().write_off_income);
        assert_eq!(lines[1].credit, dec!(100));
    }

    #[test]
    fn test_receivable_discount_hits_bad_debt() {
        let lines = adjustment_entry_lines(
            AdjustmentType::Discount,
            AdjustmentSide::Receivable,
            dec!(45.50),
            &[],
            &refs(),
        )
        .unwrap();
        assert_eq!(lines[0].account_id, refs().bad_debt_expense);
        assert_eq!(lines[1].account_id, refs().accounts_receivable);
    }

    #[test]
    fn test_unlinked_payable_adjustment_uses_fallback() {
        let lines = adjustment_entry_lines(
            AdjustmentType::DebitMemo,
            AdjustmentSide::Payable,
            dec!(200),
            &[],
            &refs(),
        )
        .unwrap();
        assert_eq!(lines[0].account_id, refs().fallback_expense);
    }
}
