//! Property-based tests for the proportional allocator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::{SourceLine, allocate};

const FALLBACK: i64 = 1;

/// Strategy for a positive monetary amount, 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a list of source lines with positive weights.
fn source_lines() -> impl Strategy<Value = Vec<SourceLine>> {
    prop::collection::vec(
        (prop::option::of(1i64..1000i64), 1i64..10_000_000i64),
        1..12,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(account_id, cents)| SourceLine {
                account_id,
                amount: Decimal::new(cents, 2),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The allocated amounts always sum to the requested total exactly,
    /// whatever the weights.
    #[test]
    fn prop_allocation_sums_to_total(
        total in positive_amount(),
        sources in source_lines(),
    ) {
        let result = allocate(total, &sources, FALLBACK);
        let sum: Decimal = result.iter().map(|l| l.amount).sum();
        prop_assert_eq!(sum, total);
    }

    /// One allocated line per source line.
    #[test]
    fn prop_allocation_preserves_line_count(
        total in positive_amount(),
        sources in source_lines(),
    ) {
        let result = allocate(total, &sources, FALLBACK);
        prop_assert_eq!(result.len(), sources.len());
    }

    /// Every line except the last is rounded to cents; the residual the
    /// last line absorbs is itself at cent precision because total and
    /// all other lines are.
    #[test]
    fn prop_allocation_lines_have_cent_precision(
        total in positive_amount(),
        sources in source_lines(),
    ) {
        let result = allocate(total, &sources, FALLBACK);
        for line in &result {
            prop_assert_eq!(line.amount, line.amount.round_dp(2));
        }
    }
}
