//! AP/AR adjustment repository.
//!
//! An adjustment carries exactly one party: a vendor puts it on the
//! payable side, a customer on the receivable side. Posting writes the
//! journal entry for the adjustment pattern and moves the balance and
//! status of the linked bill or invoice.

use chrono::{NaiveDate, Utc};
use finledger_core::document::{
    AdjustmentSide, AdjustmentType, DocumentKind, DocumentStatus, balance_delta, next_status,
};
use finledger_core::ledger::{SourceLine, adjustment_entry_lines, adjustment_number};
use finledger_shared::{AccountsConfig, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::{self, JournalStatus};
use crate::entities::{adjustments, bill_items, bills, customers, invoice_items, invoices, vendors};

use super::audit::AuditLog;
use super::error::PostingError;
use super::journal::{self, WriteEntry};
use super::numbering;

/// Input for creating or updating an adjustment.
#[derive(Debug, Clone)]
pub struct AdjustmentInput {
    /// Kind of adjustment.
    pub adjustment_type: AdjustmentType,
    /// Vendor for a payable-side adjustment.
    pub vendor_id: Option<i64>,
    /// Customer for a receivable-side adjustment.
    pub customer_id: Option<i64>,
    /// Bill the adjustment applies to.
    pub bill_id: Option<i64>,
    /// Invoice the adjustment applies to.
    pub invoice_id: Option<i64>,
    /// Adjustment date.
    pub adjustment_date: NaiveDate,
    /// Adjustment amount, always positive; direction comes from the type.
    pub amount: Decimal,
    /// Why the adjustment was made.
    pub reason: Option<String>,
    /// Target status; `Approved` triggers posting.
    pub status: DocumentStatus,
}

impl AdjustmentInput {
    fn side(&self) -> Result<AdjustmentSide, PostingError> {
        match (self.vendor_id, self.customer_id) {
            (Some(_), None) => Ok(AdjustmentSide::Payable),
            (None, Some(_)) => Ok(AdjustmentSide::Receivable),
            _ => Err(PostingError::Validation(
                "an adjustment needs exactly one of vendor or customer".to_string(),
            )),
        }
    }
}

/// Filter options for listing adjustments.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentFilter {
    /// Filter by adjustment type.
    pub adjustment_type: Option<AdjustmentType>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Adjustment repository.
#[derive(Debug, Clone)]
pub struct AdjustmentRepository {
    db: DatabaseConnection,
    accounts: AccountsConfig,
}

impl AdjustmentRepository {
    /// Creates a new adjustment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, accounts: AccountsConfig) -> Self {
        Self { db, accounts }
    }

    /// Lists adjustments, newest first.
    pub async fn list(
        &self,
        filter: AdjustmentFilter,
    ) -> Result<Vec<adjustments::Model>, PostingError> {
        let mut query = adjustments::Entity::find();
        if let Some(kind) = filter.adjustment_type {
            query = query.filter(
                adjustments::Column::AdjustmentType
                    .eq(sea_orm_active_enums::AdjustmentType::from(kind)),
            );
        }
        if let Some(from) = filter.date_from {
            query = query.filter(adjustments::Column::AdjustmentDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(adjustments::Column::AdjustmentDate.lte(to));
        }
        let adjustments = query
            .order_by_desc(adjustments::Column::AdjustmentDate)
            .order_by_desc(adjustments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(adjustments)
    }

    /// Fetches one adjustment.
    pub async fn get(&self, id: i64) -> Result<adjustments::Model, PostingError> {
        adjustments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("adjustment", id))
    }

    /// Creates an adjustment, posting it when approved.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: AdjustmentInput,
    ) -> Result<adjustments::Model, PostingError> {
        let side = self.validate(&input).await?;

        let txn = self.db.begin().await?;

        let prefix = match side {
            AdjustmentSide::Payable => "ADJ-P-",
            AdjustmentSide::Receivable => "ADJ-R-",
        };
        let seq = numbering::next_document_seq(
            &txn,
            adjustments::Entity,
            adjustments::Column::AdjustmentNumber,
            prefix,
        )
        .await?;

        let now = Utc::now().into();
        let adjustment = adjustments::ActiveModel {
            adjustment_number: Set(adjustment_number(side, seq)),
            adjustment_type: Set(input.adjustment_type.into()),
            vendor_id: Set(input.vendor_id),
            customer_id: Set(input.customer_id),
            bill_id: Set(input.bill_id),
            invoice_id: Set(input.invoice_id),
            adjustment_date: Set(input.adjustment_date),
            amount: Set(input.amount),
            reason: Set(input.reason.clone()),
            status: Set(input.status.into()),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if input.status.has_posted() {
            self.post(&txn, ctx, &adjustment, side).await?;
            apply_to_source(&txn, &adjustment, false).await?;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Created adjustment",
            "adjustments",
            adjustment.id,
            None,
            serde_json::to_value(&adjustment).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(adjustment)
    }

    /// Updates an adjustment, reversing a prior posting first.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: AdjustmentInput,
    ) -> Result<adjustments::Model, PostingError> {
        let old = self.get(id).await?;
        let side = self.validate(&input).await?;

        let txn = self.db.begin().await?;
        if DocumentStatus::from(old.status.clone()).has_posted() {
            self.reverse(&txn, &old).await?;
        }

        let mut active: adjustments::ActiveModel = old.clone().into();
        active.adjustment_type = Set(input.adjustment_type.into());
        active.vendor_id = Set(input.vendor_id);
        active.customer_id = Set(input.customer_id);
        active.bill_id = Set(input.bill_id);
        active.invoice_id = Set(input.invoice_id);
        active.adjustment_date = Set(input.adjustment_date);
        active.amount = Set(input.amount);
        active.reason = Set(input.reason.clone());
        active.status = Set(input.status.into());
        active.updated_at = Set(Utc::now().into());
        let adjustment = active.update(&txn).await?;

        if input.status.has_posted() {
            self.post(&txn, ctx, &adjustment, side).await?;
            apply_to_source(&txn, &adjustment, false).await?;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Updated adjustment",
            "adjustments",
            id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&adjustment).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(adjustment)
    }

    /// Deletes an adjustment, reversing its posting first.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), PostingError> {
        let old = self.get(id).await?;

        let txn = self.db.begin().await?;
        if DocumentStatus::from(old.status.clone()).has_posted() {
            self.reverse(&txn, &old).await?;
        }
        adjustments::Entity::delete_by_id(id).exec(&txn).await?;
        AuditLog::record(
            &txn,
            ctx.user_id,
            "Deleted adjustment",
            "adjustments",
            id,
            serde_json::to_value(&old).ok(),
            None,
        )
        .await;
        txn.commit().await?;
        Ok(())
    }

    /// Validates party and linked document, returning the ledger side.
    async fn validate(&self, input: &AdjustmentInput) -> Result<AdjustmentSide, PostingError> {
        let side = input.side()?;
        if input.amount <= Decimal::ZERO {
            return Err(PostingError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }

        match side {
            AdjustmentSide::Payable => {
                if input.invoice_id.is_some() {
                    return Err(PostingError::Validation(
                        "a payable adjustment cannot reference an invoice".to_string(),
                    ));
                }
                let vendor_id = input.vendor_id.unwrap_or_default();
                vendors::Entity::find_by_id(vendor_id)
                    .filter(vendors::Column::IsActive.eq(true))
                    .one(&self.db)
                    .await?
                    .ok_or(PostingError::NotFound("vendor", vendor_id))?;
                if let Some(bill_id) = input.bill_id {
                    let bill = bills::Entity::find_by_id(bill_id)
                        .one(&self.db)
                        .await?
                        .ok_or(PostingError::NotFound("bill", bill_id))?;
                    if bill.vendor_id != vendor_id {
                        return Err(PostingError::Validation(
                            "bill does not belong to the adjustment's vendor".to_string(),
                        ));
                    }
                }
            }
            AdjustmentSide::Receivable => {
                if input.bill_id.is_some() {
                    return Err(PostingError::Validation(
                        "a receivable adjustment cannot reference a bill".to_string(),
                    ));
                }
                let customer_id = input.customer_id.unwrap_or_default();
                customers::Entity::find_by_id(customer_id)
                    .filter(customers::Column::IsActive.eq(true))
                    .one(&self.db)
                    .await?
                    .ok_or(PostingError::NotFound("customer", customer_id))?;
                if let Some(invoice_id) = input.invoice_id {
                    let invoice = invoices::Entity::find_by_id(invoice_id)
                        .one(&self.db)
                        .await?
                        .ok_or(PostingError::NotFound("invoice", invoice_id))?;
                    if invoice.customer_id != customer_id {
                        return Err(PostingError::Validation(
                            "invoice does not belong to the adjustment's customer".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(side)
    }

    /// Writes the journal entry for an approved adjustment.
    async fn post<C: ConnectionTrait + TransactionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        adjustment: &adjustments::Model,
        side: AdjustmentSide,
    ) -> Result<(), PostingError> {
        let refs = super::account::resolve_refs(conn, &self.accounts).await?;
        let sources = linked_item_sources(conn, adjustment).await?;
        let lines = adjustment_entry_lines(
            adjustment.adjustment_type.clone().into(),
            side,
            adjustment.amount,
            &sources,
            &refs,
        )?;

        let account_code = match side {
            AdjustmentSide::Payable => self.accounts.accounts_payable.clone(),
            AdjustmentSide::Receivable => self.accounts.accounts_receivable.clone(),
        };
        let description = match &adjustment.reason {
            Some(reason) => format!("Adjustment {} - {reason}", adjustment.adjustment_number),
            None => format!("Adjustment {}", adjustment.adjustment_number),
        };
        journal::write_entry(
            conn,
            WriteEntry {
                entry_date: adjustment.adjustment_date,
                description,
                reference: Some(DocumentKind::Adjustment.reference(adjustment.id)),
                account_code,
                lines,
                status: JournalStatus::Posted,
                created_by: ctx.user_id,
            },
        )
        .await?;
        Ok(())
    }

    /// Reverses a posted adjustment: journal entry removed, source
    /// document balance restored.
    async fn reverse<C: ConnectionTrait>(
        &self,
        conn: &C,
        old: &adjustments::Model,
    ) -> Result<(), PostingError> {
        journal::delete_by_reference(conn, &DocumentKind::Adjustment.reference(old.id)).await?;
        apply_to_source(conn, old, true).await
    }
}

/// Allocation weights from the linked document's line items. An unlinked
/// adjustment yields no weights and lands on the fallback account.
async fn linked_item_sources<C: ConnectionTrait>(
    conn: &C,
    adjustment: &adjustments::Model,
) -> Result<Vec<SourceLine>, PostingError> {
    if let Some(bill_id) = adjustment.bill_id {
        let items = bill_items::Entity::find()
            .filter(bill_items::Column::BillId.eq(bill_id))
            .order_by_asc(bill_items::Column::Id)
            .all(conn)
            .await?;
        return Ok(items
            .iter()
            .map(|item| SourceLine {
                account_id: item.account_id,
                amount: item.line_total,
            })
            .collect());
    }
    if let Some(invoice_id) = adjustment.invoice_id {
        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_items::Column::Id)
            .all(conn)
            .await?;
        return Ok(items
            .iter()
            .map(|item| SourceLine {
                account_id: item.account_id,
                amount: item.line_total,
            })
            .collect());
    }
    Ok(Vec::new())
}

/// Moves the linked document's balance and status by the adjustment's
/// signed delta; negated when reversing. Unlinked adjustments touch
/// nothing.
async fn apply_to_source<C: ConnectionTrait>(
    conn: &C,
    adjustment: &adjustments::Model,
    reverse: bool,
) -> Result<(), PostingError> {
    let kind: AdjustmentType = adjustment.adjustment_type.clone().into();
    let delta = balance_delta(kind, adjustment.amount, reverse);

    if let Some(bill_id) = adjustment.bill_id {
        let bill = bills::Entity::find_by_id(bill_id)
            .one(conn)
            .await?
            .ok_or(PostingError::NotFound("bill", bill_id))?;
        let balance = bill.balance + delta;
        let status = next_status(balance, bill.status.clone().into());
        let mut active: bills::ActiveModel = bill.into();
        active.balance = Set(balance);
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
    }
    if let Some(invoice_id) = adjustment.invoice_id {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(conn)
            .await?
            .ok_or(PostingError::NotFound("invoice", invoice_id))?;
        let balance = invoice.balance + delta;
        let status = next_status(balance, invoice.status.clone().into());
        let mut active: invoices::ActiveModel = invoice.into();
        active.balance = Set(balance);
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
    }
    Ok(())
}
