//! Task creation, in particular budget approval requests.

use chrono::Utc;
use finledger_shared::Role;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;

use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use crate::entities::{tasks, users};

use super::error::PostingError;

/// Context for a budget approval task.
#[derive(Debug, Clone)]
pub struct BudgetApprovalRequest {
    /// Account whose ceiling was hit.
    pub account_id: i64,
    /// Amount the rejected posting asked for.
    pub requested: Decimal,
    /// Headroom that was left.
    pub remaining: Decimal,
    /// Human-readable document context, e.g. `Bill BILL-2026-0007`.
    pub document: String,
    /// User whose posting was rejected.
    pub requested_by: i64,
}

/// Task repository.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    db: DatabaseConnection,
}

impl TaskRepository {
    /// Creates a new task repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a budget approval task after a posting was rolled back.
    ///
    /// Runs on the bare connection: the posting transaction is already
    /// gone, and this write must survive it. Assigned to the
    /// highest-privileged active user, most recent login breaking ties.
    pub async fn create_budget_approval(
        &self,
        request: BudgetApprovalRequest,
    ) -> Result<tasks::Model, PostingError> {
        let assignee = self.find_approver().await?;
        let now = Utc::now().into();

        let task = tasks::ActiveModel {
            title: Set(format!("Budget approval needed: {}", request.document)),
            description: Set(Some(json!({
                "account_id": request.account_id,
                "requested_amount": request.requested,
                "remaining_budget": request.remaining,
                "document": request.document,
            }))),
            task_type: Set("budget_approval".to_string()),
            priority: Set(TaskPriority::High),
            status: Set(TaskStatus::Pending),
            assigned_to: Set(assignee),
            created_by: Set(Some(request.requested_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(task)
    }

    /// Picks the most privileged active user as approver.
    async fn find_approver(&self) -> Result<Option<i64>, PostingError> {
        let mut candidates = users::Entity::find()
            .filter(users::Column::IsActive.eq(true))
            .order_by_desc(users::Column::LastLogin)
            .all(&self.db)
            .await?;

        candidates.sort_by_key(|u| std::cmp::Reverse(Role::parse(&u.role)));
        Ok(candidates.first().map(|u| u.id))
    }

    /// Lists pending tasks for a user.
    pub async fn pending_for(&self, user_id: i64) -> Result<Vec<tasks::Model>, PostingError> {
        let tasks = tasks::Entity::find()
            .filter(tasks::Column::AssignedTo.eq(user_id))
            .filter(tasks::Column::Status.eq(TaskStatus::Pending))
            .order_by_desc(tasks::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(tasks)
    }
}
