//! Entry and document number formatting.
//!
//! Sequence discovery (max existing number, collision retry) lives in the
//! database layer; these functions only format. The journal entry number
//! carries the year and the primary account code so numbers read like
//! `JE-2026-1001-0001`.

use chrono::{Datelike, NaiveDate};

use crate::document::types::AdjustmentSide;

/// Prefix shared by every entry number of a (year, account code) pair:
/// `JE-{year}-{account code}-`.
///
/// The account code is reduced to its alphanumeric characters and capped
/// at six; an empty result becomes `0000`.
#[must_use]
pub fn entry_prefix(year: i32, account_code: &str) -> String {
    let mut code: String = account_code
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(6)
        .collect();
    if code.is_empty() {
        code.push_str("0000");
    }
    format!("JE-{year}-{code}-")
}

/// Formats a journal entry number: `JE-{year}-{account code}-{seq:04}`.
#[must_use]
pub fn entry_number(year: i32, account_code: &str, seq: u32) -> String {
    format!("{}{seq:04}", entry_prefix(year, account_code))
}

/// Formats a bill number: `BILL-{year}-{seq:04}`.
#[must_use]
pub fn bill_number(year: i32, seq: u32) -> String {
    format!("BILL-{year}-{seq:04}")
}

/// Formats an invoice number: `INV-{year}-{seq:04}`.
#[must_use]
pub fn invoice_number(year: i32, seq: u32) -> String {
    format!("INV-{year}-{seq:04}")
}

/// Formats an adjustment number: `ADJ-P-{seq:04}` or `ADJ-R-{seq:04}`.
#[must_use]
pub fn adjustment_number(side: AdjustmentSide, seq: u32) -> String {
    let prefix = match side {
        AdjustmentSide::Payable => "ADJ-P",
        AdjustmentSide::Receivable => "ADJ-R",
    };
    format!("{prefix}-{seq:04}")
}

/// Formats a disbursement number: `DISB-{YYYYMMDD}-{seq:04}`.
#[must_use]
pub fn disbursement_number(date: NaiveDate, seq: u32) -> String {
    format!(
        "DISB-{:04}{:02}{:02}-{seq:04}",
        date.year(),
        date.month(),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_entry_number_format() {
        assert_eq!(entry_number(2026, "1001", 1), "JE-2026-1001-0001");
        assert_eq!(entry_number(2026, "1001", 123), "JE-2026-1001-0123");
    }

    #[rstest]
    #[case("20-01", "2001")]
    #[case("", "0000")]
    #[case("!!", "0000")]
    #[case("ABC123456", "ABC123")]
    fn test_entry_number_sanitizes_code(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(entry_number(2026, code, 7), format!("JE-2026-{expected}-0007"));
    }

    #[test]
    fn test_document_numbers() {
        assert_eq!(bill_number(2026, 12), "BILL-2026-0012");
        assert_eq!(invoice_number(2026, 3), "INV-2026-0003");
        assert_eq!(adjustment_number(AdjustmentSide::Payable, 5), "ADJ-P-0005");
        assert_eq!(adjustment_number(AdjustmentSide::Receivable, 5), "ADJ-R-0005");
    }

    #[test]
    fn test_disbursement_number() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(disbursement_number(date, 41), "DISB-20260823-0041");
    }
}
