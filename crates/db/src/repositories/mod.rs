//! Repository abstractions over the entities.
//!
//! Each repository owns a `DatabaseConnection` and runs its multi-step
//! operations inside a database transaction. Posting orchestration (journal
//! write, budget guard, balance updates) lives here; the arithmetic it
//! applies comes from `finledger-core`.

pub mod account;
pub mod adjustment;
pub mod audit;
pub mod bill;
pub mod budget;
pub mod disbursement;
pub mod error;
pub mod invoice;
pub mod journal;
pub mod numbering;
pub mod session;
pub mod task;

pub use account::AccountRepository;
pub use adjustment::AdjustmentRepository;
pub use audit::AuditLog;
pub use bill::BillRepository;
pub use budget::BudgetRepository;
pub use disbursement::DisbursementRepository;
pub use error::PostingError;
pub use invoice::InvoiceRepository;
pub use journal::JournalRepository;
pub use session::SessionRepository;
pub use task::TaskRepository;
