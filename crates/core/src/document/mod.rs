//! Source-document model.
//!
//! A source document is the business record (bill, invoice, disbursement,
//! adjustment) that triggers a ledger posting. The four kinds are modeled
//! as one tagged family with shared totals and balance semantics so the
//! allocator, budget guard, and journal writer operate over a single
//! abstraction.

pub mod apply;
pub mod totals;
pub mod types;

pub use apply::{balance_delta, next_status, payment_delta};
pub use totals::{totals_from_inclusive_amount, totals_from_items};
pub use types::{
    AdjustmentSide, AdjustmentType, DocumentKind, DocumentStatus, DocumentTotals, LineItemInput,
};
