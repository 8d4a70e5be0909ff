//! Budget error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by budget enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// The posting would push an account past its budget ceiling.
    /// The whole posting rolls back and an approval task is recorded.
    #[error(
        "amount {requested} exceeds remaining budget {remaining} for account {account_id}"
    )]
    Exceeded {
        /// Account whose ceiling would be breached.
        account_id: i64,
        /// Amount the posting asked for.
        requested: Decimal,
        /// Headroom left under the ceiling.
        remaining: Decimal,
    },
}
