//! Audit log writes.
//!
//! Audit writes never fail the operation they describe; a failed insert
//! is logged and dropped.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value;

use crate::entities::audit_log;

/// Audit log writer.
#[derive(Debug, Clone, Copy)]
pub struct AuditLog;

impl AuditLog {
    /// Records a user action against a table row.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        action: &str,
        table_name: &str,
        record_id: i64,
        old_values: Option<Value>,
        new_values: Option<Value>,
    ) {
        let entry = audit_log::ActiveModel {
            user_id: Set(Some(user_id)),
            action: Set(action.to_string()),
            table_name: Set(Some(table_name.to_string())),
            record_id: Set(Some(record_id)),
            old_values: Set(old_values),
            new_values: Set(new_values),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        if let Err(err) = entry.insert(conn).await {
            tracing::warn!(action, table_name, record_id, error = %err, "audit log write failed");
        }
    }
}
