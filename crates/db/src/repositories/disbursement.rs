//! Cash disbursement repository.
//!
//! A disbursement posts immediately: debit the expense account (or
//! Accounts Payable when it settles a bill) and credit Cash. Settling a
//! bill also moves the bill's paid amount, balance and status.

use chrono::{Datelike, NaiveDate, Utc};
use finledger_core::budget::BudgetError;
use finledger_core::document::{DocumentKind, next_status, payment_delta};
use finledger_core::ledger::disbursement_entry_lines;
use finledger_shared::{AccountsConfig, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::{DocumentStatus, JournalStatus};
use crate::entities::{bills, disbursements};

use super::account::{find_invalid_ids, resolve_refs};
use super::audit::AuditLog;
use super::error::PostingError;
use super::journal::{self, WriteEntry};
use super::numbering;
use super::task::{BudgetApprovalRequest, TaskRepository};
use super::budget;

/// Input for creating or updating a disbursement.
#[derive(Debug, Clone)]
pub struct DisbursementInput {
    /// Disbursement date.
    pub disbursement_date: NaiveDate,
    /// Who was paid.
    pub payee: String,
    /// Amount paid out.
    pub amount: Decimal,
    /// Payment method, e.g. `bank_transfer`.
    pub payment_method: String,
    /// External reference, e.g. a check number.
    pub reference_number: Option<String>,
    /// What the payment was for.
    pub purpose: String,
    /// Bill this disbursement settles.
    pub bill_id: Option<i64>,
    /// Expense account debited when no bill is linked.
    pub account_id: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter options for listing disbursements.
#[derive(Debug, Clone, Default)]
pub struct DisbursementFilter {
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Disbursement repository.
#[derive(Debug, Clone)]
pub struct DisbursementRepository {
    db: DatabaseConnection,
    accounts: AccountsConfig,
}

impl DisbursementRepository {
    /// Creates a new disbursement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, accounts: AccountsConfig) -> Self {
        Self { db, accounts }
    }

    /// Lists disbursements, newest first.
    pub async fn list(
        &self,
        filter: DisbursementFilter,
    ) -> Result<Vec<disbursements::Model>, PostingError> {
        let mut query = disbursements::Entity::find();
        if let Some(from) = filter.date_from {
            query = query.filter(disbursements::Column::DisbursementDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(disbursements::Column::DisbursementDate.lte(to));
        }
        let disbursements = query
            .order_by_desc(disbursements::Column::DisbursementDate)
            .order_by_desc(disbursements::Column::Id)
            .all(&self.db)
            .await?;
        Ok(disbursements)
    }

    /// Fetches one disbursement.
    pub async fn get(&self, id: i64) -> Result<disbursements::Model, PostingError> {
        disbursements::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("disbursement", id))
    }

    /// Records a disbursement and posts it.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: DisbursementInput,
    ) -> Result<disbursements::Model, PostingError> {
        self.validate(&input).await?;

        let txn = self.db.begin().await?;

        let date = input.disbursement_date;
        let prefix = format!("DISB-{:04}{:02}{:02}-", date.year(), date.month(), date.day());
        let seq = numbering::next_document_seq(
            &txn,
            disbursements::Entity,
            disbursements::Column::DisbursementNumber,
            &prefix,
        )
        .await?;
        let number = finledger_core::ledger::disbursement_number(date, seq);

        let now = Utc::now().into();
        let disbursement = disbursements::ActiveModel {
            disbursement_number: Set(number),
            disbursement_date: Set(date),
            payee: Set(input.payee.clone()),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.clone()),
            reference_number: Set(input.reference_number.clone()),
            purpose: Set(input.purpose.clone()),
            bill_id: Set(input.bill_id),
            account_id: Set(input.account_id),
            status: Set(DocumentStatus::Paid),
            notes: Set(input.notes.clone()),
            recorded_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Err(err) = self.post(&txn, ctx, &disbursement).await {
            return self
                .reject(txn, ctx, err, &disbursement.disbursement_number)
                .await;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Created disbursement",
            "disbursements",
            disbursement.id,
            None,
            serde_json::to_value(&disbursement).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(disbursement)
    }

    /// Updates a disbursement by reversing the old posting and applying
    /// the new one.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: DisbursementInput,
    ) -> Result<disbursements::Model, PostingError> {
        let old = self.get(id).await?;
        self.validate(&input).await?;

        let txn = self.db.begin().await?;
        self.reverse(&txn, &old).await?;

        let mut active: disbursements::ActiveModel = old.clone().into();
        active.disbursement_date = Set(input.disbursement_date);
        active.payee = Set(input.payee.clone());
        active.amount = Set(input.amount);
        active.payment_method = Set(input.payment_method.clone());
        active.reference_number = Set(input.reference_number.clone());
        active.purpose = Set(input.purpose.clone());
        active.bill_id = Set(input.bill_id);
        active.account_id = Set(input.account_id);
        active.notes = Set(input.notes.clone());
        active.updated_at = Set(Utc::now().into());
        let disbursement = active.update(&txn).await?;

        if let Err(err) = self.post(&txn, ctx, &disbursement).await {
            return self
                .reject(txn, ctx, err, &disbursement.disbursement_number)
                .await;
        }

        AuditLog::record(
            &txn,
            ctx.user_id,
            "Updated disbursement",
            "disbursements",
            id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&disbursement).ok(),
        )
        .await;
        txn.commit().await?;
        Ok(disbursement)
    }

    /// Deletes a disbursement, reversing its posting.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), PostingError> {
        let old = self.get(id).await?;

        let txn = self.db.begin().await?;
        self.reverse(&txn, &old).await?;
        disbursements::Entity::delete_by_id(id).exec(&txn).await?;
        AuditLog::record(
            &txn,
            ctx.user_id,
            "Deleted disbursement",
            "disbursements",
            id,
            serde_json::to_value(&old).ok(),
            None,
        )
        .await;
        txn.commit().await?;
        Ok(())
    }

    async fn validate(&self, input: &DisbursementInput) -> Result<(), PostingError> {
        if input.payee.trim().is_empty() || input.purpose.trim().is_empty() {
            return Err(PostingError::Validation(
                "payee and purpose are required".to_string(),
            ));
        }
        if input.amount <= Decimal::ZERO {
            return Err(PostingError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if let Some(bill_id) = input.bill_id {
            bills::Entity::find_by_id(bill_id)
                .one(&self.db)
                .await?
                .ok_or(PostingError::NotFound("bill", bill_id))?;
        }
        if let Some(account_id) = input.account_id {
            let invalid = find_invalid_ids(&self.db, &[account_id]).await?;
            if !invalid.is_empty() {
                return Err(PostingError::InvalidAccounts(invalid));
            }
        }
        Ok(())
    }

    /// Posts the journal entry, consumes budget for expense spend, and
    /// applies the payment to a linked bill.
    async fn post<C: ConnectionTrait + TransactionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        disbursement: &disbursements::Model,
    ) -> Result<(), PostingError> {
        let refs = resolve_refs(conn, &self.accounts).await?;
        let pays_bill = disbursement.bill_id.is_some();
        let lines = disbursement_entry_lines(
            disbursement.amount,
            disbursement.account_id,
            pays_bill,
            &refs,
        )?;

        if !pays_bill {
            let expense_account = disbursement.account_id.unwrap_or(refs.fallback_expense);
            budget::apply_actual(
                conn,
                expense_account,
                disbursement.disbursement_date.year(),
                disbursement.amount,
            )
            .await?;
        }

        journal::write_entry(
            conn,
            WriteEntry {
                entry_date: disbursement.disbursement_date,
                description: format!(
                    "Disbursement {} - {}",
                    disbursement.disbursement_number, disbursement.payee
                ),
                reference: Some(DocumentKind::Disbursement.reference(disbursement.id)),
                account_code: self.accounts.cash.clone(),
                lines,
                status: JournalStatus::Posted,
                created_by: ctx.user_id,
            },
        )
        .await?;

        if let Some(bill_id) = disbursement.bill_id {
            apply_bill_payment(conn, bill_id, disbursement.amount, false).await?;
        }
        Ok(())
    }

    /// Reverses the journal entry, released budget, and bill payment.
    async fn reverse<C: ConnectionTrait>(
        &self,
        conn: &C,
        old: &disbursements::Model,
    ) -> Result<(), PostingError> {
        journal::delete_by_reference(conn, &DocumentKind::Disbursement.reference(old.id)).await?;

        if old.bill_id.is_none() {
            let refs = resolve_refs(conn, &self.accounts).await?;
            let expense_account = old.account_id.unwrap_or(refs.fallback_expense);
            budget::reverse_actual(
                conn,
                expense_account,
                old.disbursement_date.year(),
                old.amount,
            )
            .await?;
        }

        if let Some(bill_id) = old.bill_id {
            apply_bill_payment(conn, bill_id, old.amount, true).await?;
        }
        Ok(())
    }

    /// Rolls back a rejected posting and records the approval task.
    async fn reject(
        &self,
        txn: sea_orm::DatabaseTransaction,
        ctx: &RequestContext,
        err: PostingError,
        number: &str,
    ) -> Result<disbursements::Model, PostingError> {
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
                    document: format!("Disbursement {number}"),
                    requested_by: ctx.user_id,
                })
                .await?;
        }
        Err(err)
    }
}

/// Moves a bill's paid amount, balance and status for a payment of
/// `amount`; negated when reversing.
async fn apply_bill_payment<C: ConnectionTrait>(
    conn: &C,
    bill_id: i64,
    amount: Decimal,
    reverse: bool,
) -> Result<(), PostingError> {
    let bill = bills::Entity::find_by_id(bill_id)
        .one(conn)
        .await?
        .ok_or(PostingError::NotFound("bill", bill_id))?;

    let balance = bill.balance + payment_delta(amount, reverse);
    let paid_amount = if reverse {
        bill.paid_amount - amount
    } else {
        bill.paid_amount + amount
    };
    let status = next_status(balance, bill.status.clone().into());

    let mut active: bills::ActiveModel = bill.into();
    active.balance = Set(balance);
    active.paid_amount = Set(paid_amount);
    active.status = Set(status.into());
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await?;
    Ok(())
}
