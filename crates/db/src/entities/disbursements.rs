//! `SeaORM` Entity for cash disbursements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocumentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disbursements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub disbursement_number: String,
    pub disbursement_date: Date,
    pub payee: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub purpose: String,
    /// Bill this disbursement settles, if any.
    pub bill_id: Option<i64>,
    /// Expense account debited when no bill is linked.
    pub account_id: Option<i64>,
    pub status: DocumentStatus,
    pub notes: Option<String>,
    pub recorded_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills::Entity",
        from = "Column::BillId",
        to = "super::bills::Column::Id"
    )]
    Bills,
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
