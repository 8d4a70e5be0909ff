//! `SeaORM` Entity for AP/AR adjustments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AdjustmentType, DocumentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub adjustment_number: String,
    pub adjustment_type: AdjustmentType,
    /// Set on payable-side adjustments.
    pub vendor_id: Option<i64>,
    /// Set on receivable-side adjustments.
    pub customer_id: Option<i64>,
    pub bill_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub adjustment_date: Date,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub status: DocumentStatus,
    pub created_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
