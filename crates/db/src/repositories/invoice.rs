//! Customer invoice repository: CRUD plus posting orchestration.
//!
//! Mirrors the bill flow on the receivable side: a sent invoice debits
//! Accounts Receivable and credits the revenue accounts of its items.
//! Revenue postings never consume budget.

use chrono::{Datelike, NaiveDate, Utc};
use finledger_core::document::{
    DocumentKind, DocumentStatus, DocumentTotals, LineItemInput, totals_from_items,
};
use finledger_core::ledger::{SourceLine, invoice_entry_lines};
use finledger_shared::{AccountsConfig, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::{self, JournalStatus};
use crate::entities::{customers, invoice_items, invoices};

use super::account::{find_invalid_ids, resolve_refs};
use super::audit::AuditLog;
use super::error::PostingError;
use super::journal::{self, WriteEntry};
use super::numbering;

/// Input for creating or updating an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceInput {
    /// Explicit number; generated when absent.
    pub invoice_number: Option<String>,
    /// Customer the invoice belongs to.
    pub customer_id: i64,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax rate in percent; configuration default when absent.
    pub tax_rate: Option<Decimal>,
    /// Line items. Every item must name a revenue account.
    pub items: Vec<LineItemInput>,
    /// Target status; `Sent` triggers posting.
    pub status: DocumentStatus,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Statuses to include.
    pub statuses: Vec<DocumentStatus>,
    /// Filter by customer.
    pub customer_id: Option<i64>,
    /// Filter by invoice date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by invoice date range end.
    pub date_to: Option<NaiveDate>,
}

/// An invoice with its line items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Line items.
    pub items: Vec<invoice_items::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    accounts: AccountsConfig,
    default_tax_rate: Decimal,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
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

    /// Previews the next invoice number for the current year.
    pub async fn next_number(&self) -> Result<String, PostingError> {
        let year = Utc::now().date_naive().year();
        let seq = numbering::next_document_seq(
            &self.db,
            invoices::Entity,
            invoices::Column::InvoiceNumber,
            &format!("INV-{year}-"),
        )
        .await?;
        Ok(finledger_core::ledger::invoice_number(year, seq))
    }

    /// Lists invoices, newest first.
    pub async fn list(&self, filter: InvoiceFilter) -> Result<Vec<invoices::Model>, PostingError> {
        let mut query = invoices::Entity::find();
        if !filter.statuses.is_empty() {
            let statuses: Vec<sea_orm_active_enums::DocumentStatus> =
                filter.statuses.into_iter().map(Into::into).collect();
            query = query.filter(invoices::Column::Status.is_in(statuses));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(invoices::Column::CustomerId.eq(customer_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::InvoiceDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::InvoiceDate.lte(to));
        }
        let invoices = query
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::Id)
            .all(&self.db)
            .await?;
        Ok(invoices)
    }

    /// Fetches an invoice with its items.
    pub async fn get(&self, id: i64) -> Result<InvoiceWithItems, PostingError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("invoice", id))?;
        let items = invoice
            .find_related(invoice_items::Entity)
            .order_by_asc(invoice_items::Column::Id)
            .all(&self.db)
            .await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Creates an invoice, posting its journal entry when sent.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: InvoiceInput,
    ) -> Result<InvoiceWithItems, PostingError> {
        self.validate(&input).await?;
        let tax_rate = input.tax_rate.unwrap_or(self.default_tax_rate);
        let totals = totals_from_items(&input.items, tax_rate);

        let txn = self.db.begin().await?;

        let invoice_number = match input.invoice_number.clone() {
            Some(number) => number,
            None => {
                let year = input.invoice_date.year();
                let seq = numbering::next_document_seq(
                    &txn,
                    invoices::Entity,
                    invoices::Column::InvoiceNumber,
                    &format!("INV-{year}-"),
                )
                .await?;
                finledger_core::ledger::invoice_number(year, seq)
            }
        };

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            invoice_number: Set(invoice_number),
            customer_id: Set(input.customer_id),
            invoice_date: Set(input.invoice_date),
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

        let items = insert_items(&txn, invoice.id, &input.items).await?;

        if input.status.has_posted() {
            self.post(&txn, ctx, &invoice, &totals, &item_sources(&items))
                .await?;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Created invoice",
            "invoices",
            invoice.id,
            None,
            serde_json::to_value(&invoice).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Updates an invoice, reversing a prior posting first.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: InvoiceInput,
    ) -> Result<InvoiceWithItems, PostingError> {
        let old = self.get(id).await?;
        self.validate(&input).await?;
        let tax_rate = input.tax_rate.unwrap_or(self.default_tax_rate);
        let totals = totals_from_items(&input.items, tax_rate);

        let txn = self.db.begin().await?;

        if DocumentStatus::from(old.invoice.status.clone()).has_posted() {
            journal::delete_by_reference(&txn, &DocumentKind::Invoice.reference(id)).await?;
        }

        let now = Utc::now().into();
        let mut active: invoices::ActiveModel = old.invoice.clone().into();
        active.customer_id = Set(input.customer_id);
        active.invoice_date = Set(input.invoice_date);
        active.due_date = Set(input.due_date);
        active.subtotal = Set(totals.subtotal);
        active.tax_rate = Set(totals.tax_rate);
        active.tax_amount = Set(totals.tax_amount);
        active.total_amount = Set(totals.total_amount);
        active.balance = Set(totals.total_amount - old.invoice.paid_amount);
        active.status = Set(input.status.into());
        active.notes = Set(input.notes.clone());
        active.updated_at = Set(now);
        let invoice = active.update(&txn).await?;

        invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        let items = insert_items(&txn, id, &input.items).await?;

        if input.status.has_posted() {
            self.post(&txn, ctx, &invoice, &totals, &item_sources(&items))
                .await?;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Updated invoice",
            "invoices",
            id,
            serde_json::to_value(&old.invoice).ok(),
            serde_json::to_value(&invoice).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Deletes an invoice, reversing its posting first.
    ///
    /// An invoice with recorded payments cannot be deleted.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), PostingError> {
        let old = self.get(id).await?;
        if old.invoice.paid_amount > Decimal::ZERO {
            return Err(PostingError::Conflict(
                "cannot delete an invoice with recorded payments".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        if DocumentStatus::from(old.invoice.status.clone()).has_posted() {
            journal::delete_by_reference(&txn, &DocumentKind::Invoice.reference(id)).await?;
        }
        invoices::Entity::delete_by_id(id).exec(&txn).await?;
        AuditLog::record(
            &txn,
            ctx.user_id,
            "Deleted invoice",
            "invoices",
            id,
            serde_json::to_value(&old.invoice).ok(),
            None,
        )
        .await;
        txn.commit().await?;
        Ok(())
    }

    /// Aging buckets over unpaid invoices, grouped by customer.
    pub async fn aging(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<finledger_core::aging::AgingRow>, PostingError> {
        let open = invoices::Entity::find()
            .filter(invoices::Column::Balance.gt(Decimal::ZERO))
            .filter(invoices::Column::Status.ne(sea_orm_active_enums::DocumentStatus::Draft))
            .find_also_related(customers::Entity)
            .all(&self.db)
            .await?;

        let documents: Vec<finledger_core::aging::OpenDocument> = open
            .into_iter()
            .map(|(invoice, customer)| finledger_core::aging::OpenDocument {
                party_id: invoice.customer_id,
                party_name: customer.map(|c| c.customer_name).unwrap_or_default(),
                due_date: invoice.due_date,
                balance: invoice.balance,
            })
            .collect();
        Ok(finledger_core::aging::aging_report(&documents, as_of))
    }

    /// Validates the customer and per-item revenue accounts.
    ///
    /// Unlike bills, every invoice item must carry an account; offenders
    /// are reported by their 1-based position.
    async fn validate(&self, input: &InvoiceInput) -> Result<(), PostingError> {
        customers::Entity::find_by_id(input.customer_id)
            .filter(customers::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("customer", input.customer_id))?;

        if input.items.is_empty() {
            return Err(PostingError::Validation(
                "an invoice requires at least one line item".to_string(),
            ));
        }

        let missing: Vec<String> = input
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.account_id.is_none())
            .map(|(i, _)| (i + 1).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PostingError::Validation(format!(
                "invoice items missing a revenue account: items {}",
                missing.join(", ")
            )));
        }

        let account_ids: Vec<i64> = input.items.iter().filter_map(|i| i.account_id).collect();
        let invalid = find_invalid_ids(&self.db, &account_ids).await?;
        if !invalid.is_empty() {
            return Err(PostingError::InvalidAccounts(invalid));
        }
        Ok(())
    }

    /// Writes the journal entry for a sent invoice.
    async fn post<C: ConnectionTrait + TransactionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        invoice: &invoices::Model,
        totals: &DocumentTotals,
        sources: &[SourceLine],
    ) -> Result<(), PostingError> {
        let refs = resolve_refs(conn, &self.accounts).await?;
        let lines = invoice_entry_lines(totals, sources, &refs)?;

        journal::write_entry(
            conn,
            WriteEntry {
                entry_date: invoice.invoice_date,
                description: format!("Invoice {} - Customer sales", invoice.invoice_number),
                reference: Some(DocumentKind::Invoice.reference(invoice.id)),
                account_code: self.accounts.accounts_receivable.clone(),
                lines,
                status: JournalStatus::Posted,
                created_by: ctx.user_id,
            },
        )
        .await?;
        Ok(())
    }
}

fn item_sources(items: &[invoice_items::Model]) -> Vec<SourceLine> {
    items
        .iter()
        .map(|item| SourceLine {
            account_id: item.account_id,
            amount: item.line_total,
        })
        .collect()
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    invoice_id: i64,
    items: &[LineItemInput],
) -> Result<Vec<invoice_items::Model>, PostingError> {
    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let model = invoice_items::ActiveModel {
            invoice_id: Set(invoice_id),
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
