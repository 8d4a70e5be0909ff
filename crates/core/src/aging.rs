//! Aging classification for open receivables and payables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days-past-due bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgingBucket {
    /// Not yet due.
    #[serde(rename = "current")]
    Current,
    /// 1 to 30 days past due.
    #[serde(rename = "1-30")]
    Days1To30,
    /// 31 to 60 days past due.
    #[serde(rename = "31-60")]
    Days31To60,
    /// 61 to 90 days past due.
    #[serde(rename = "61-90")]
    Days61To90,
    /// More than 90 days past due.
    #[serde(rename = "90+")]
    Over90,
}

impl AgingBucket {
    /// Classifies a due date against the report date.
    #[must_use]
    pub fn classify(due_date: NaiveDate, as_of: NaiveDate) -> Self {
        let days = (as_of - due_date).num_days();
        match days {
            ..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }
}

/// One open document feeding the aging report.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    /// Party the report groups by (customer or vendor id).
    pub party_id: i64,
    /// Party display name.
    pub party_name: String,
    /// Due date of the document.
    pub due_date: NaiveDate,
    /// Open balance.
    pub balance: Decimal,
}

/// Per-party aging totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingRow {
    /// Customer or vendor id.
    pub party_id: i64,
    /// Customer or vendor name.
    pub party_name: String,
    /// Balance not yet due.
    pub current: Decimal,
    /// Balance 1-30 days past due.
    pub days_1_30: Decimal,
    /// Balance 31-60 days past due.
    pub days_31_60: Decimal,
    /// Balance 61-90 days past due.
    pub days_61_90: Decimal,
    /// Balance more than 90 days past due.
    pub over_90: Decimal,
    /// Total open balance.
    pub total: Decimal,
}

impl AgingRow {
    fn new(party_id: i64, party_name: String) -> Self {
        Self {
            party_id,
            party_name,
            current: Decimal::ZERO,
            days_1_30: Decimal::ZERO,
            days_31_60: Decimal::ZERO,
            days_61_90: Decimal::ZERO,
            over_90: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        match bucket {
            AgingBucket::Current => self.current += amount,
            AgingBucket::Days1To30 => self.days_1_30 += amount,
            AgingBucket::Days31To60 => self.days_31_60 += amount,
            AgingBucket::Days61To90 => self.days_61_90 += amount,
            AgingBucket::Over90 => self.over_90 += amount,
        }
        self.total += amount;
    }
}

/// Builds the aging report: one row per party, balances summed per
/// bucket, ordered by party id.
#[must_use]
pub fn aging_report(documents: &[OpenDocument], as_of: NaiveDate) -> Vec<AgingRow> {
    let mut rows: BTreeMap<i64, AgingRow> = BTreeMap::new();
    for doc in documents {
        let bucket = AgingBucket::classify(doc.due_date, as_of);
        rows.entry(doc.party_id)
            .or_insert_with(|| AgingRow::new(doc.party_id, doc.party_name.clone()))
            .add(bucket, doc.balance);
    }
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2026, 8, 23), AgingBucket::Current)]
    #[case(date(2026, 9, 1), AgingBucket::Current)]
    #[case(date(2026, 8, 22), AgingBucket::Days1To30)]
    #[case(date(2026, 7, 24), AgingBucket::Days1To30)]
    #[case(date(2026, 7, 23), AgingBucket::Days31To60)]
    #[case(date(2026, 6, 24), AgingBucket::Days31To60)]
    #[case(date(2026, 5, 25), AgingBucket::Days61To90)]
    #[case(date(2026, 5, 24), AgingBucket::Over90)]
    #[case(date(2025, 1, 1), AgingBucket::Over90)]
    fn test_bucket_boundaries(#[case] due: NaiveDate, #[case] expected: AgingBucket) {
        assert_eq!(AgingBucket::classify(due, date(2026, 8, 23)), expected);
    }

    #[test]
    fn test_report_groups_by_party() {
        let as_of = date(2026, 8, 23);
        let docs = vec![
            OpenDocument {
                party_id: 1,
                party_name: "Acme".to_string(),
                due_date: date(2026, 9, 1),
                balance: dec!(500),
            },
            OpenDocument {
                party_id: 1,
                party_name: "Acme".to_string(),
                due_date: date(2026, 7, 1),
                balance: dec!(250),
            },
            OpenDocument {
                party_id: 2,
                party_name: "Globex".to_string(),
                due_date: date(2026, 1, 1),
                balance: dec!(75),
            },
        ];
        let rows = aging_report(&docs, as_of);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].current, dec!(500));
        assert_eq!(rows[0].days_31_60, dec!(250));
        assert_eq!(rows[0].total, dec!(750));
        assert_eq!(rows[1].over_90, dec!(75));
    }
}
