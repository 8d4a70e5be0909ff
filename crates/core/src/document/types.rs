//! Source-document domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of source document driving a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Vendor bill (accounts payable).
    Bill,
    /// Customer invoice (accounts receivable).
    Invoice,
    /// Cash disbursement.
    Disbursement,
    /// AP/AR adjustment.
    Adjustment,
}

impl DocumentKind {
    /// Returns the journal reference string linking an entry back to the
    /// source document, unique per live document.
    #[must_use]
    pub fn reference(self, id: i64) -> String {
        match self {
            Self::Bill => format!("BILL-{id}"),
            Self::Invoice => format!("INV-{id}"),
            Self::Disbursement => format!("DISB-{id}"),
            Self::Adjustment => format!("ADJ-{id}"),
        }
    }
}

/// Adjustment type, determining the debit/credit pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Increases the balance owed.
    DebitMemo,
    /// Decreases the balance owed.
    CreditMemo,
    /// Removes an uncollectible/unpayable balance.
    WriteOff,
    /// Early-payment or goodwill discount.
    Discount,
}

impl AdjustmentType {
    /// Parse from the database string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debit_memo" => Some(Self::DebitMemo),
            "credit_memo" => Some(Self::CreditMemo),
            "write_off" => Some(Self::WriteOff),
            "discount" => Some(Self::Discount),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DebitMemo => "debit_memo",
            Self::CreditMemo => "credit_memo",
            Self::WriteOff => "write_off",
            Self::Discount => "discount",
        }
    }
}

/// Which side of the ledger an adjustment touches.
///
/// Payable adjustments reference a vendor (and optionally a bill);
/// receivable adjustments reference a customer (and optionally an invoice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSide {
    /// Vendor-side (accounts payable).
    Payable,
    /// Customer-side (accounts receivable).
    Receivable,
}

/// Source-document status, derived from balance vs. zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being drafted; no journal entry yet.
    Draft,
    /// Approved bill; journal entry posted.
    Approved,
    /// Sent invoice; journal entry posted.
    Sent,
    /// Partially settled.
    Partial,
    /// Fully settled (balance at or below zero).
    Paid,
    /// Past due with an open balance.
    Overdue,
}

impl DocumentStatus {
    /// Parse from the database string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "approved" => Some(Self::Approved),
            "sent" => Some(Self::Sent),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Returns true if a document in this status has posted a journal entry.
    #[must_use]
    pub const fn has_posted(self) -> bool {
        !matches!(self, Self::Draft)
    }
}

/// One line item of an itemized document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Free-form description.
    pub description: String,
    /// Quantity (defaults to 1 upstream).
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Chart-of-accounts id; `None` falls back to the configured account.
    pub account_id: Option<i64>,
}

impl LineItemInput {
    /// The line total, `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Computed monetary totals for a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Pre-tax subtotal.
    pub subtotal: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Tax-inclusive total.
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_strings() {
        assert_eq!(DocumentKind::Bill.reference(42), "BILL-42");
        assert_eq!(DocumentKind::Invoice.reference(7), "INV-7");
        assert_eq!(DocumentKind::Disbursement.reference(3), "DISB-3");
        assert_eq!(DocumentKind::Adjustment.reference(11), "ADJ-11");
    }

    #[test]
    fn test_adjustment_type_round_trip() {
        for t in [
            AdjustmentType::DebitMemo,
            AdjustmentType::CreditMemo,
            AdjustmentType::WriteOff,
            AdjustmentType::Discount,
        ] {
            assert_eq!(AdjustmentType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AdjustmentType::parse("refund"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for s in [
            DocumentStatus::Draft,
            DocumentStatus::Approved,
            DocumentStatus::Sent,
            DocumentStatus::Partial,
            DocumentStatus::Paid,
            DocumentStatus::Overdue,
        ] {
            assert_eq!(DocumentStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_has_posted() {
        assert!(!DocumentStatus::Draft.has_posted());
        assert!(DocumentStatus::Approved.has_posted());
        assert!(DocumentStatus::Sent.has_posted());
        assert!(DocumentStatus::Paid.has_posted());
    }

    #[test]
    fn test_line_total() {
        let item = LineItemInput {
            description: "Printer paper".to_string(),
            quantity: dec!(3),
            unit_price: dec!(249.50),
            account_id: Some(12),
        };
        assert_eq!(item.line_total(), dec!(748.50));
    }
}
