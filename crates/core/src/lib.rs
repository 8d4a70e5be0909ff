//! Core posting logic for Finledger.
//!
//! This crate contains the invariant-preserving heart of the system: the
//! proportional line allocator, the journal line patterns for every source
//! document type, budget guard math, balance reversal/re-apply, and entry
//! numbering. Everything here is pure - no database, no HTTP - so the
//! posting laws can be tested without a server.

pub mod aging;
pub mod budget;
pub mod document;
pub mod ledger;
