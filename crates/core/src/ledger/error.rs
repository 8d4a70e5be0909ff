//! Error types for posting operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building or validating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The entry has no lines at all.
    #[error("journal entry has no lines")]
    EmptyEntry,

    /// Total debits do not equal total credits.
    #[error("journal entry is unbalanced: debits {debit} != credits {credit}")]
    Unbalanced {
        /// Sum of all debit amounts.
        debit: Decimal,
        /// Sum of all credit amounts.
        credit: Decimal,
    },

    /// A line carries both a debit and a credit amount.
    #[error("journal line for account {account_id} carries both debit and credit")]
    MixedLine {
        /// Offending account id.
        account_id: i64,
    },

    /// A line carries a negative amount on either side.
    #[error("journal line for account {account_id} has a negative amount")]
    NegativeAmount {
        /// Offending account id.
        account_id: i64,
    },

    /// A required control or fallback account is not configured in the
    /// chart of accounts. Posting never substitutes a default account.
    #[error("required account {code} is missing from the chart of accounts")]
    MissingAccount {
        /// Account code looked up in configuration.
        code: String,
    },

    /// The document amount is zero or negative.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}
