//! Journal lines and balance validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// One journal entry line: a single-sided amount against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Chart-of-accounts id.
    pub account_id: i64,
    /// Debit amount (zero when the line is a credit).
    pub debit: Decimal,
    /// Credit amount (zero when the line is a debit).
    pub credit: Decimal,
    /// Line memo.
    pub description: String,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: i64, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: description.into(),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: i64, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: description.into(),
        }
    }
}

/// Validated totals of a balanced journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
}

/// Validates a set of journal lines and returns their totals.
///
/// An entry must have at least one line, every line must be strictly
/// one-sided with a non-negative amount, and total debits must equal
/// total credits exactly.
pub fn validate_lines(lines: &[JournalLine]) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                account_id: line.account_id,
            });
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(LedgerError::MixedLine {
                account_id: line.account_id,
            });
        }
        total_debit += line.debit;
        total_credit += line.credit;
    }

    if total_debit != total_credit {
        return Err(LedgerError::Unbalanced {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(EntryTotals {
        total_debit,
        total_credit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_entry() {
        let lines = vec![
            JournalLine::debit(1, dec!(600), "Office supplies"),
            JournalLine::debit(2, dec!(520), "Software"),
            JournalLine::credit(3, dec!(1120), "Accounts Payable"),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.total_debit, dec!(1120));
        assert_eq!(totals.total_credit, dec!(1120));
    }

    #[test]
    fn test_empty_entry_rejected() {
        assert_eq!(validate_lines(&[]), Err(LedgerError::EmptyEntry));
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let lines = vec![
            JournalLine::debit(1, dec!(100), ""),
            JournalLine::credit(2, dec!(99.99), ""),
        ];
        assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(99.99)
            })
        );
    }

    #[test]
    fn test_mixed_line_rejected() {
        let lines = vec![JournalLine {
            account_id: 5,
            debit: dec!(10),
            credit: dec!(10),
            description: String::new(),
        }];
        assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::MixedLine { account_id: 5 })
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![
            JournalLine::debit(1, dec!(-50), ""),
            JournalLine::credit(2, dec!(-50), ""),
        ];
        assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::NegativeAmount { account_id: 1 })
        );
    }
}
