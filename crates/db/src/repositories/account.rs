//! Chart-of-accounts repository and account resolution.

use std::collections::{BTreeSet, HashMap};

use finledger_core::ledger::{AccountRefs, LedgerError};
use finledger_shared::config::AccountsConfig;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::chart_of_accounts;
use crate::entities::sea_orm_active_enums::AccountType;

use super::error::PostingError;

/// Returns the subset of `ids` that do not exist or are inactive.
///
/// An empty result means every referenced account is postable. Order is
/// ascending and duplicates are collapsed.
pub async fn find_invalid_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, PostingError> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found: BTreeSet<i64> = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::Id.is_in(wanted.iter().copied()))
        .filter(chart_of_accounts::Column::IsActive.eq(true))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();

    Ok(wanted.difference(&found).copied().collect())
}

/// Resolves the configured control and fallback account codes to ids.
///
/// Every code must exist as an active account; a missing one aborts the
/// posting instead of silently substituting some other account.
pub async fn resolve_refs<C: ConnectionTrait>(
    conn: &C,
    accounts: &AccountsConfig,
) -> Result<AccountRefs, PostingError> {
    let codes = [
        accounts.accounts_payable.as_str(),
        accounts.accounts_receivable.as_str(),
        accounts.cash.as_str(),
        accounts.sales_tax_payable.as_str(),
        accounts.fallback_expense.as_str(),
        accounts.fallback_revenue.as_str(),
        accounts.write_off_income.as_str(),
        accounts.bad_debt_expense.as_str(),
    ];

    let by_code: HashMap<String, i64> = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::AccountCode.is_in(codes))
        .filter(chart_of_accounts::Column::IsActive.eq(true))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (a.account_code, a.id))
        .collect();

    let lookup = |code: &str| -> Result<i64, PostingError> {
        by_code.get(code).copied().ok_or_else(|| {
            PostingError::Ledger(LedgerError::MissingAccount {
                code: code.to_string(),
            })
        })
    };

    Ok(AccountRefs {
        accounts_payable: lookup(&accounts.accounts_payable)?,
        accounts_receivable: lookup(&accounts.accounts_receivable)?,
        cash: lookup(&accounts.cash)?,
        sales_tax_payable: lookup(&accounts.sales_tax_payable)?,
        fallback_expense: lookup(&accounts.fallback_expense)?,
        fallback_revenue: lookup(&accounts.fallback_revenue)?,
        write_off_income: lookup(&accounts.write_off_income)?,
        bad_debt_expense: lookup(&accounts.bad_debt_expense)?,
    })
}

/// Chart-of-accounts queries.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accounts, optionally filtered by type and activity.
    pub async fn list(
        &self,
        account_type: Option<AccountType>,
        active_only: bool,
    ) -> Result<Vec<chart_of_accounts::Model>, PostingError> {
        let mut query = chart_of_accounts::Entity::find();
        if let Some(t) = account_type {
            query = query.filter(chart_of_accounts::Column::AccountType.eq(t));
        }
        if active_only {
            query = query.filter(chart_of_accounts::Column::IsActive.eq(true));
        }
        let accounts = query
            .order_by_asc(chart_of_accounts::Column::AccountCode)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Looks up one account by its code.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<chart_of_accounts::Model>, PostingError> {
        let account = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AccountCode.eq(code))
            .one(&self.db)
            .await?;
        Ok(account)
    }
}
