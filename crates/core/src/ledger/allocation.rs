//! Proportional allocation of a total over source lines.
//!
//! Used wherever a single document amount has to be spread across the
//! accounts of its line items: bill expense lines, invoice revenue lines,
//! and adjustments scaled against the underlying document's items.
//!
//! The law: every line but the last gets its proportional share rounded to
//! cents, and the last line absorbs the residual, so the allocated amounts
//! always sum to the requested total exactly.

use rust_decimal::Decimal;

use crate::document::totals::round2;

/// One source line to allocate over: an optional account and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine {
    /// Chart-of-accounts id; `None` uses the fallback account.
    pub account_id: Option<i64>,
    /// The line's weight, typically its `line_total`.
    pub amount: Decimal,
}

/// One allocated line: a resolved account and its share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatedLine {
    /// Resolved chart-of-accounts id.
    pub account_id: i64,
    /// This line's share of the total.
    pub amount: Decimal,
}

/// Allocates `total` proportionally over `sources`.
///
/// Each line's share is `round2(weight * total / sum_of_weights)`, except
/// the last line which takes whatever remains, so the shares reconcile
/// with `total` exactly. No sources, or a non-positive weight sum, yields
/// a single line of `total` on the fallback account.
#[must_use]
pub fn allocate(total: Decimal, sources: &[SourceLine], fallback_account: i64) -> Vec<AllocatedLine> {
    let weight_sum: Decimal = sources.iter().map(|s| s.amount).sum();
    if sources.is_empty() || weight_sum <= Decimal::ZERO {
        return vec![AllocatedLine {
            account_id: fallback_account,
            amount: total,
        }];
    }

    let factor = total / weight_sum;
    let mut allocated = Decimal::ZERO;
    let last = sources.len() - 1;

    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let amount = if i == last {
                total - allocated
            } else {
                round2(source.amount * factor)
            };
            allocated += amount;
            AllocatedLine {
                account_id: source.account_id.unwrap_or(fallback_account),
                amount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FALLBACK: i64 = 99;

    fn line(account_id: Option<i64>, amount: Decimal) -> SourceLine {
        SourceLine { account_id, amount }
    }

    #[test]
    fn test_empty_sources_fall_back() {
        let result = allocate(dec!(500), &[], FALLBACK);
        assert_eq!(
            result,
            vec![AllocatedLine {
                account_id: FALLBACK,
                amount: dec!(500)
            }]
        );
    }

    #[test]
    fn test_zero_weight_sum_falls_back() {
        let sources = vec![line(Some(1), dec!(0)), line(Some(2), dec!(0))];
        let result = allocate(dec!(500), &sources, FALLBACK);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].account_id, FALLBACK);
        assert_eq!(result[0].amount, dec!(500));
    }

    #[test]
    fn test_proportional_split() {
        // 1120 over weights 600/400 => 672/448
        let sources = vec![line(Some(10), dec!(600)), line(Some(11), dec!(400))];
        let result = allocate(dec!(1120), &sources, FALLBACK);
        assert_eq!(result[0].amount, dec!(672.00));
        assert_eq!(result[1].amount, dec!(448.00));
    }

    #[test]
    fn test_last_line_absorbs_residual() {
        // 100 over three equal weights: 33.33 + 33.33 + 33.34
        let sources = vec![
            line(Some(1), dec!(1)),
            line(Some(2), dec!(1)),
            line(Some(3), dec!(1)),
        ];
        let result = allocate(dec!(100), &sources, FALLBACK);
        assert_eq!(result[0].amount, dec!(33.33));
        assert_eq!(result[1].amount, dec!(33.33));
        assert_eq!(result[2].amount, dec!(33.34));
        assert_eq!(result.iter().map(|l| l.amount).sum::<Decimal>(), dec!(100));
    }

    #[test]
    fn test_missing_account_uses_fallback() {
        let sources = vec![line(None, dec!(300)), line(Some(7), dec!(700))];
        let result = allocate(dec!(1000), &sources, FALLBACK);
        assert_eq!(result[0].account_id, FALLBACK);
        assert_eq!(result[1].account_id, 7);
    }

    #[test]
    fn test_scaling_to_smaller_total() {
        // Adjustment of 250 spread over item weights 600/400.
        let sources = vec![line(Some(10), dec!(600)), line(Some(11), dec!(400))];
        let result = allocate(dec!(250), &sources, FALLBACK);
        assert_eq!(result[0].amount, dec!(150.00));
        assert_eq!(result[1].amount, dec!(100.00));
        assert_eq!(result.iter().map(|l| l.amount).sum::<Decimal>(), dec!(250));
    }
}
