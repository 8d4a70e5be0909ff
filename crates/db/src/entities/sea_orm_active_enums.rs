//! String-backed active enums shared by the entities.
//!
//! Columns are stored as plain VARCHAR so the schema stays portable; the
//! enums here keep the value sets closed on the Rust side. Conversions to
//! the pure domain enums live next to the enums they mirror.

use finledger_core::document as domain;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chart-of-accounts classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Source-document lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Drafted, nothing posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Approved bill, journal entry posted.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Sent invoice, journal entry posted.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Partially settled.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Past due with an open balance.
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl From<DocumentStatus> for domain::DocumentStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::Approved => Self::Approved,
            DocumentStatus::Sent => Self::Sent,
            DocumentStatus::Partial => Self::Partial,
            DocumentStatus::Paid => Self::Paid,
            DocumentStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<domain::DocumentStatus> for DocumentStatus {
    fn from(status: domain::DocumentStatus) -> Self {
        match status {
            domain::DocumentStatus::Draft => Self::Draft,
            domain::DocumentStatus::Approved => Self::Approved,
            domain::DocumentStatus::Sent => Self::Sent,
            domain::DocumentStatus::Partial => Self::Partial,
            domain::DocumentStatus::Paid => Self::Paid,
            domain::DocumentStatus::Overdue => Self::Overdue,
        }
    }
}

/// Adjustment type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Raises the balance owed.
    #[sea_orm(string_value = "debit_memo")]
    DebitMemo,
    /// Lowers the balance owed.
    #[sea_orm(string_value = "credit_memo")]
    CreditMemo,
    /// Removes an uncollectible/unpayable balance.
    #[sea_orm(string_value = "write_off")]
    WriteOff,
    /// Early-payment or goodwill discount.
    #[sea_orm(string_value = "discount")]
    Discount,
}

impl From<AdjustmentType> for domain::AdjustmentType {
    fn from(kind: AdjustmentType) -> Self {
        match kind {
            AdjustmentType::DebitMemo => Self::DebitMemo,
            AdjustmentType::CreditMemo => Self::CreditMemo,
            AdjustmentType::WriteOff => Self::WriteOff,
            AdjustmentType::Discount => Self::Discount,
        }
    }
}

impl From<domain::AdjustmentType> for AdjustmentType {
    fn from(kind: domain::AdjustmentType) -> Self {
        match kind {
            domain::AdjustmentType::DebitMemo => Self::DebitMemo,
            domain::AdjustmentType::CreditMemo => Self::CreditMemo,
            domain::AdjustmentType::WriteOff => Self::WriteOff,
            domain::AdjustmentType::Discount => Self::Discount,
        }
    }
}

/// Journal entry status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    /// Entry recorded but not posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Entry posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// Budget lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Budget in force for its fiscal year.
    #[sea_orm(string_value = "active")]
    Active,
    /// Budget retired.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Task status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for action.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Done.
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Task priority.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    #[sea_orm(string_value = "low")]
    Low,
    /// Medium priority.
    #[sea_orm(string_value = "medium")]
    Medium,
    /// High priority.
    #[sea_orm(string_value = "high")]
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_both_ways() {
        for status in [
            domain::DocumentStatus::Draft,
            domain::DocumentStatus::Approved,
            domain::DocumentStatus::Sent,
            domain::DocumentStatus::Partial,
            domain::DocumentStatus::Paid,
            domain::DocumentStatus::Overdue,
        ] {
            let db: DocumentStatus = status.into();
            assert_eq!(domain::DocumentStatus::from(db), status);
        }
    }

    #[test]
    fn test_adjustment_type_maps_both_ways() {
        for kind in [
            domain::AdjustmentType::DebitMemo,
            domain::AdjustmentType::CreditMemo,
            domain::AdjustmentType::WriteOff,
            domain::AdjustmentType::Discount,
        ] {
            let db: AdjustmentType = kind.into();
            assert_eq!(domain::AdjustmentType::from(db), kind);
        }
    }
}
