//! Vendor bill repository: CRUD plus posting orchestration.
//!
//! Creating or editing an approved bill writes a balanced journal entry
//! and consumes budget inside one database transaction. A breached budget
//! ceiling rolls the whole posting back and records an approval task on
//! the bare connection afterwards, so the task outlives the rollback.

use chrono::{Datelike, NaiveDate, Utc};
use finledger_core::budget::BudgetError;
use finledger_core::document::{
    DocumentStatus, DocumentKind, LineItemInput, totals_from_inclusive_amount, totals_from_items,
    DocumentTotals,
};
use finledger_core::ledger::{SourceLine, bill_entry_lines};
use finledger_core::budget::expense_totals_by_account;
use finledger_shared::{AccountsConfig, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::{self, JournalStatus};
use crate::entities::{bill_items, bills, vendors};

use super::account::{find_invalid_ids, resolve_refs};
use super::audit::AuditLog;
use super::error::PostingError;
use super::journal::{self, WriteEntry};
use super::task::{BudgetApprovalRequest, TaskRepository};
use super::{budget, numbering};

/// Input for creating or updating a bill.
#[derive(Debug, Clone)]
pub struct BillInput {
    /// Explicit number; generated when absent.
    pub bill_number: Option<String>,
    /// Vendor the bill belongs to.
    pub vendor_id: i64,
    /// Bill date.
    pub bill_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax rate in percent; configuration default when absent.
    pub tax_rate: Option<Decimal>,
    /// Tax-inclusive grand total for simple bills entered without items.
    pub amount: Option<Decimal>,
    /// Line items for itemized bills.
    pub items: Vec<LineItemInput>,
    /// Target status; `Approved` triggers posting.
    pub status: DocumentStatus,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter options for listing bills.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Statuses to include.
    pub statuses: Vec<DocumentStatus>,
    /// Filter by vendor.
    pub vendor_id: Option<i64>,
    /// Filter by bill date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by bill date range end.
    pub date_to: Option<NaiveDate>,
}

/// A bill with its line items.
#[derive(Debug, Clone)]
pub struct BillWithItems {
    /// Bill header.
    pub bill: bills::Model,
    /// Line items.
    pub items: Vec<bill_items::Model>,
}

/// Bill repository.
#[derive(Debug, Clone)]
pub struct BillRepository {
    db: DatabaseConnection,
    accounts: AccountsConfig,
    default_tax_rate: Decimal,
}

impl BillRepository {
    /// Creates a new bill repository.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        accounts: AccountsConfig,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            db,
            accounts,
            default_tax_rate,
        }
    }

    /// Previews the next bill number for the current year.
    pub async fn next_number(&self) -> Result<String, PostingError> {
        let year = Utc::now().date_naive().year();
        let seq = numbering::next_document_seq(
            &self.db,
            bills::Entity,
            bills::Column::BillNumber,
            &format!("BILL-{year}-"),
        )
        .await?;
        Ok(finledger_core::ledger::bill_number(year, seq))
    }

    /// Lists bills, newest first.
    pub async fn list(&self, filter: BillFilter) -> Result<Vec<bills::Model>, PostingError> {
        let mut query = bills::Entity::find();
        if !filter.statuses.is_empty() {
            let statuses: Vec<sea_orm_active_enums::DocumentStatus> =
                filter.statuses.into_iter().map(Into::into).collect();
            query = query.filter(bills::Column::Status.is_in(statuses));
        }
        if let Some(vendor_id) = filter.vendor_id {
            query = query.filter(bills::Column::VendorId.eq(vendor_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(bills::Column::BillDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(bills::Column::BillDate.lte(to));
        }
        let bills = query
            .order_by_desc(bills::Column::BillDate)
            .order_by_desc(bills::Column::Id)
            .all(&self.db)
            .await?;
        Ok(bills)
    }

    /// Fetches a bill with its items.
    pub async fn get(&self, id: i64) -> Result<BillWithItems, PostingError> {
        let bill = bills::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("bill", id))?;
        let items = bill
            .find_related(bill_items::Entity)
            .order_by_asc(bill_items::Column::Id)
            .all(&self.db)
            .await?;
        Ok(BillWithItems { bill, items })
    }

    /// Creates a bill, posting its journal entry when approved.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: BillInput,
    ) -> Result<BillWithItems, PostingError> {
        self.validate(&input).await?;
        let totals = self.totals(&input);

        let txn = self.db.begin().await?;

        let bill_number = match input.bill_number.clone() {
            Some(number) => number,
            None => {
                let year = input.bill_date.year();
                let seq = numbering::next_document_seq(
                    &txn,
                    bills::Entity,
                    bills::Column::BillNumber,
                    &format!("BILL-{year}-"),
                )
                .await?;
                finledger_core::ledger::bill_number(year, seq)
            }
        };

        let now = Utc::now().into();
        let bill = bills::ActiveModel {
            bill_number: Set(bill_number),
            vendor_id: Set(input.vendor_id),
            bill_date: Set(input.bill_date),
            due_date: Set(input.due_date),
            subtotal: Set(totals.subtotal),
            tax_rate: Set(totals.tax_rate),
            tax_amount: Set(totals.tax_amount),
            total_amount: Set(totals.total_amount),
            paid_amount: Set(Decimal::ZERO),
            balance: Set(totals.total_amount),
            status: Set(input.status.into()),
            notes: Set(input.notes.clone()),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let items = insert_items(&txn, bill.id, &input.items).await?;

        if input.status.has_posted() {
            let sources = item_sources(&items);
            if let Err(err) = self.post(&txn, ctx, &bill, &totals, &sources).await {
                return self.reject(txn, ctx, err, &bill.bill_number).await;
            }
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Created bill",
            "bills",
            bill.id,
            None,
            serde_json::to_value(&bill).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(BillWithItems { bill, items })
    }

    /// Updates a bill. A previously posted bill has its journal entry and
    /// budget consumption reversed before the new state is applied.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: BillInput,
    ) -> Result<BillWithItems, PostingError> {
        let old = self.get(id).await?;
        self.validate(&input).await?;
        let totals = self.totals(&input);

        let txn = self.db.begin().await?;

        if DocumentStatus::from(old.bill.status.clone()).has_posted() {
            self.reverse(&txn, &old).await?;
        }

        let now = Utc::now().into();
        let mut active: bills::ActiveModel = old.bill.clone().into();
        active.vendor_id = Set(input.vendor_id);
        active.bill_date = Set(input.bill_date);
        active.due_date = Set(input.due_date);
        active.subtotal = Set(totals.subtotal);
        active.tax_rate = Set(totals.tax_rate);
        active.tax_amount = Set(totals.tax_amount);
        active.total_amount = Set(totals.total_amount);
        active.balance = Set(totals.total_amount - old.bill.paid_amount);
        active.status = Set(input.status.into());
        active.notes = Set(input.notes.clone());
        active.updated_at = Set(now);
        let bill = active.update(&txn).await?;

        bill_items::Entity::delete_many()
            .filter(bill_items::Column::BillId.eq(id))
            .exec(&txn)
            .await?;
        let items = insert_items(&txn, id, &input.items).await?;

        if input.status.has_posted() {
            let sources = item_sources(&items);
            if let Err(err) = self.post(&txn, ctx, &bill, &totals, &sources).await {
                return self.reject(txn, ctx, err, &bill.bill_number).await;
            }
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Updated bill",
            "bills",
            id,
            serde_json::to_value(&old.bill).ok(),
            serde_json::to_value(&bill).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(BillWithItems { bill, items })
    }

    /// Deletes a bill, reversing its posting first.
    ///
    /// A bill with recorded payments cannot be deleted.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), PostingError> {
        let old = self.get(id).await?;
        if old.bill.paid_amount > Decimal::ZERO {
            return Err(PostingError::Conflict(
                "cannot delete a bill with recorded payments".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        if DocumentStatus::from(old.bill.status.clone()).has_posted() {
            self.reverse(&txn, &old).await?;
        }
        bills::Entity::delete_by_id(id).exec(&txn).await?;
        AuditLog::record(
            &txn,
            ctx.user_id,
            "Deleted bill",
            "bills",
            id,
            serde_json::to_value(&old.bill).ok(),
            None,
        )
        .await;
        txn.commit().await?;
        Ok(())
    }

    /// Aging buckets over unpaid bills, grouped by vendor.
    pub async fn aging(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<finledger_core::aging::AgingRow>, PostingError> {
        let open = bills::Entity::find()
            .filter(bills::Column::Balance.gt(Decimal::ZERO))
            .filter(bills::Column::Status.ne(sea_orm_active_enums::DocumentStatus::Draft))
            .find_also_related(vendors::Entity)
            .all(&self.db)
            .await?;

        let documents: Vec<finledger_core::aging::OpenDocument> = open
            .into_iter()
            .map(|(bill, vendor)| finledger_core::aging::OpenDocument {
                party_id: bill.vendor_id,
                party_name: vendor.map(|v| v.vendor_name).unwrap_or_default(),
                due_date: bill.due_date,
                balance: bill.balance,
            })
            .collect();
        Ok(finledger_core::aging::aging_report(&documents, as_of))
    }

    /// Validates vendor and item accounts before any write.
    async fn validate(&self, input: &BillInput) -> Result<(), PostingError> {
        vendors::Entity::find_by_id(input.vendor_id)
            .filter(vendors::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("vendor", input.vendor_id))?;

        let account_ids: Vec<i64> = input.items.iter().filter_map(|i| i.account_id).collect();
        let invalid = find_invalid_ids(&self.db, &account_ids).await?;
        if !invalid.is_empty() {
            return Err(PostingError::InvalidAccounts(invalid));
        }
        Ok(())
    }

    fn totals(&self, input: &BillInput) -> DocumentTotals {
        let tax_rate = input.tax_rate.unwrap_or(self.default_tax_rate);
        input.amount.map_or_else(
            || totals_from_items(&input.items, tax_rate),
            |amount| totals_from_inclusive_amount(amount, tax_rate),
        )
    }

    /// Writes the journal entry and consumes budget for an approved bill.
    async fn post<C: ConnectionTrait + TransactionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        bill: &bills::Model,
        totals: &DocumentTotals,
        sources: &[SourceLine],
    ) -> Result<(), PostingError> {
        let refs = resolve_refs(conn, &self.accounts).await?;
        let lines = bill_entry_lines(totals, sources, &refs)?;

        let fiscal_year = bill.bill_date.year();
        for (account_id, amount) in expense_totals_by_account(&lines) {
            if account_id == refs.accounts_payable {
                continue;
            }
            budget::apply_actual(conn, account_id, fiscal_year, amount).await?;
        }

        journal::write_entry(
            conn,
            WriteEntry {
                entry_date: bill.bill_date,
                description: format!("Bill {} - Vendor purchase", bill.bill_number),
                reference: Some(DocumentKind::Bill.reference(bill.id)),
                account_code: self.accounts.accounts_payable.clone(),
                lines,
                status: JournalStatus::Posted,
                created_by: ctx.user_id,
            },
        )
        .await?;
        Ok(())
    }

    /// Reverses a posted bill: journal entry removed, budget released.
    async fn reverse<C: ConnectionTrait>(
        &self,
        conn: &C,
        old: &BillWithItems,
    ) -> Result<(), PostingError> {
        let reference = DocumentKind::Bill.reference(old.bill.id);
        journal::delete_by_reference(conn, &reference).await?;

        let refs = resolve_refs(conn, &self.accounts).await?;
        let totals = model_totals(&old.bill);
        let sources = item_sources(&old.items);
        let lines = bill_entry_lines(&totals, &sources, &refs)?;
        let fiscal_year = old.bill.bill_date.year();
        for (account_id, amount) in expense_totals_by_account(&lines) {
            if account_id == refs.accounts_payable {
                continue;
            }
            budget::reverse_actual(conn, account_id, fiscal_year, amount).await?;
        }
        Ok(())
    }

    /// Rolls back a rejected posting and records the approval task.
    async fn reject(
        &self,
        txn: sea_orm::DatabaseTransaction,
        ctx: &RequestContext,
        err: PostingError,
        bill_number: &str,
    ) -> Result<BillWithItems, PostingError> {
        txn.rollback().await?;
        if let PostingError::Budget(BudgetError::Exceeded {
            account_id,
            requested,
            remaining,
        }) = &err
        {
            TaskRepository::new(self.db.clone())
                .create_budget_approval(BudgetApprovalRequest {
                    account_id: *account_id,
                    requested: *requested,
                    remaining: *remaining,
                    document: format!("Bill {bill_number}"),
                    requested_by: ctx.user_id,
                })
                .await?;
        }
        Err(err)
    }
}

/// Derives allocation weights from stored items.
fn item_sources(items: &[bill_items::Model]) -> Vec<SourceLine> {
    items
        .iter()
        .map(|item| SourceLine {
            account_id: item.account_id,
            amount: item.line_total,
        })
        .collect()
}

fn model_totals(bill: &bills::Model) -> DocumentTotals {
    DocumentTotals {
        subtotal: bill.subtotal,
        tax_rate: bill.tax_rate,
        tax_amount: bill.tax_amount,
        total_amount: bill.total_amount,
    }
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    bill_id: i64,
    items: &[LineItemInput],
) -> Result<Vec<bill_items::Model>, PostingError> {
    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let model = bill_items::ActiveModel {
            bill_id: Set(bill_id),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            line_total: Set(item.line_total()),
            account_id: Set(item.account_id),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}
