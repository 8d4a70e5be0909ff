//! Budget lookup and atomic actual-amount application.

use chrono::Utc;
use finledger_core::budget::{self, BudgetSnapshot};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::sea_orm_active_enums::BudgetStatus;
use crate::entities::{budget_items, budgets};

use super::error::PostingError;

impl From<&budget_items::Model> for BudgetSnapshot {
    fn from(item: &budget_items::Model) -> Self {
        Self {
            item_id: item.id,
            account_id: item.account_id,
            budgeted_amount: item.budgeted_amount,
            actual_amount: item.actual_amount,
        }
    }
}

/// Finds the budget item for an account under the active budget of the
/// given fiscal year. `None` means the account is unbudgeted.
pub async fn find_active_item<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    fiscal_year: i32,
) -> Result<Option<budget_items::Model>, PostingError> {
    let Some(budget) = budgets::Entity::find()
        .filter(budgets::Column::FiscalYear.eq(fiscal_year))
        .filter(budgets::Column::Status.eq(BudgetStatus::Active))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let item = budget_items::Entity::find()
        .filter(budget_items::Column::BudgetId.eq(budget.id))
        .filter(budget_items::Column::AccountId.eq(account_id))
        .one(conn)
        .await?;
    Ok(item)
}

/// Checks a spend against the account's budget without applying it.
pub async fn check<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    fiscal_year: i32,
    amount: Decimal,
) -> Result<(), PostingError> {
    let item = find_active_item(conn, account_id, fiscal_year).await?;
    budget::check_against_budget(item.as_ref().map(BudgetSnapshot::from).as_ref(), amount)?;
    Ok(())
}

/// Applies spend to the account's budget item, atomically.
///
/// The ceiling condition lives in the UPDATE itself (`budgeted - actual >=
/// amount`), so two concurrent postings cannot both slip under the limit;
/// the loser sees zero affected rows and fails the posting. Accounts
/// without a budget item pass through untouched.
pub async fn apply_actual<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    fiscal_year: i32,
    amount: Decimal,
) -> Result<(), PostingError> {
    let Some(item) = find_active_item(conn, account_id, fiscal_year).await? else {
        return Ok(());
    };

    let result = budget_items::Entity::update_many()
        .col_expr(
            budget_items::Column::ActualAmount,
            Expr::col(budget_items::Column::ActualAmount).add(amount),
        )
        .col_expr(
            budget_items::Column::Variance,
            Expr::col(budget_items::Column::BudgetedAmount)
                .sub(Expr::col(budget_items::Column::ActualAmount).add(amount)),
        )
        .col_expr(
            budget_items::Column::UpdatedAt,
            Expr::value(Utc::now()),
        )
        .filter(budget_items::Column::Id.eq(item.id))
        .filter(
            Expr::col(budget_items::Column::BudgetedAmount)
                .sub(Expr::col(budget_items::Column::ActualAmount))
                .gte(amount),
        )
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Re-read for accurate headroom in the error; the conditional
        // UPDATE already settled the race.
        let current = budget_items::Entity::find_by_id(item.id)
            .one(conn)
            .await?
            .map_or_else(|| BudgetSnapshot::from(&item), |m| BudgetSnapshot::from(&m));
        return Err(budget::BudgetError::Exceeded {
            account_id,
            requested: amount,
            remaining: current.remaining(),
        }
        .into());
    }
    Ok(())
}

/// Removes previously applied spend, used when reversing a posting.
///
/// Reversals never hit the ceiling condition; headroom only grows.
pub async fn reverse_actual<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    fiscal_year: i32,
    amount: Decimal,
) -> Result<(), PostingError> {
    let Some(item) = find_active_item(conn, account_id, fiscal_year).await? else {
        return Ok(());
    };

    budget_items::Entity::update_many()
        .col_expr(
            budget_items::Column::ActualAmount,
            Expr::col(budget_items::Column::ActualAmount).sub(amount),
        )
        .col_expr(
            budget_items::Column::Variance,
            Expr::col(budget_items::Column::BudgetedAmount)
                .sub(Expr::col(budget_items::Column::ActualAmount).sub(amount)),
        )
        .col_expr(
            budget_items::Column::UpdatedAt,
            Expr::value(Utc::now()),
        )
        .filter(budget_items::Column::Id.eq(item.id))
        .exec(conn)
        .await?;
    Ok(())
}

/// One budget item with its remaining headroom, for the read API.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BudgetItemView {
    /// Budget item id.
    pub id: i64,
    /// Account the item covers.
    pub account_id: i64,
    /// Fiscal year of the owning budget.
    pub fiscal_year: i32,
    /// Ceiling.
    pub budgeted_amount: Decimal,
    /// Spend so far.
    pub actual_amount: Decimal,
    /// Stored variance.
    pub variance: Decimal,
    /// Headroom left.
    pub remaining: Decimal,
}

/// Budget queries for the HTTP surface.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists items of the active budget for a fiscal year, optionally
    /// narrowed to one account.
    pub async fn list_items(
        &self,
        fiscal_year: i32,
        account_id: Option<i64>,
    ) -> Result<Vec<BudgetItemView>, PostingError> {
        let Some(budget) = budgets::Entity::find()
            .filter(budgets::Column::FiscalYear.eq(fiscal_year))
            .filter(budgets::Column::Status.eq(BudgetStatus::Active))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut query = budget_items::Entity::find()
            .filter(budget_items::Column::BudgetId.eq(budget.id));
        if let Some(account_id) = account_id {
            query = query.filter(budget_items::Column::AccountId.eq(account_id));
        }
        let items = query
            .order_by_asc(budget_items::Column::AccountId)
            .all(&self.db)
            .await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let snapshot = BudgetSnapshot::from(&item);
                BudgetItemView {
                    id: item.id,
                    account_id: item.account_id,
                    fiscal_year: budget.fiscal_year,
                    budgeted_amount: item.budgeted_amount,
                    actual_amount: item.actual_amount,
                    variance: item.variance,
                    remaining: snapshot.remaining(),
                }
            })
            .collect())
    }
}
