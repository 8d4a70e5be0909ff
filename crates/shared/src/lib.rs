//! Shared types, errors, and configuration for Finledger.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration (including the control-account code table)
//! - The application-wide error taxonomy
//! - The explicit request context threaded through every posting call

pub mod config;
pub mod context;
pub mod error;

pub use config::{AccountsConfig, AppConfig, DatabaseConfig, PostingConfig, ServerConfig};
pub use context::{RequestContext, Role};
pub use error::{AppError, AppResult};
