//! Budget ceiling math.
//!
//! The pure side of budget enforcement: snapshots, remaining/variance
//! math, and the exceed check. Atomic application of actuals lives in
//! the database layer.

pub mod error;
pub mod guard;
pub mod types;

pub use error::BudgetError;
pub use guard::{check_against_budget, expense_totals_by_account};
pub use types::BudgetSnapshot;
