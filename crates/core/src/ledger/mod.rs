//! Double-entry posting logic.
//!
//! This module implements the heart of the ledger:
//! - Proportional allocation of a total over source lines
//! - Journal line construction and balance validation
//! - Debit/credit patterns for every source document type
//! - Entry and document numbering
//! - Error types for posting operations

pub mod allocation;
pub mod error;
pub mod lines;
pub mod numbering;
pub mod posting;

#[cfg(test)]
mod allocation_props;

pub use allocation::{AllocatedLine, SourceLine, allocate};
pub use error::LedgerError;
pub use lines::{EntryTotals, JournalLine, validate_lines};
pub use numbering::{
    adjustment_number, bill_number, disbursement_number, entry_number, entry_prefix,
    invoice_number,
};
pub use posting::{
    AccountRefs, adjustment_entry_lines, bill_entry_lines, disbursement_entry_lines,
    invoice_entry_lines,
};
