//! `SeaORM` entity definitions.

pub mod sea_orm_active_enums;

pub mod adjustments;
pub mod audit_log;
pub mod bill_items;
pub mod bills;
pub mod budget_items;
pub mod budgets;
pub mod chart_of_accounts;
pub mod customers;
pub mod disbursements;
pub mod invoice_items;
pub mod invoices;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sessions;
pub mod tasks;
pub mod users;
pub mod vendors;
