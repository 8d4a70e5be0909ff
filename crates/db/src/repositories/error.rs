//! Error type shared by the posting repositories.

use finledger_core::budget::BudgetError;
use finledger_core::ledger::LedgerError;
use sea_orm::DbErr;

/// Errors raised by posting and query operations.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Record not found by id.
    #[error("{0} not found: {1}")]
    NotFound(&'static str, i64),

    /// Request failed validation before any write.
    #[error("{0}")]
    Validation(String),

    /// One or more referenced accounts are missing or inactive.
    #[error("invalid or inactive account ids: {0:?}")]
    InvalidAccounts(Vec<i64>),

    /// State conflict, e.g. deleting a document with recorded payments.
    #[error("{0}")]
    Conflict(String),

    /// Journal construction or balance validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Budget ceiling enforcement failed.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
