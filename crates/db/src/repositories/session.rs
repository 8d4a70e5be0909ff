//! Bearer-token session lookup.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sessions, users};

use super::error::PostingError;

/// Session lifetime from creation.
const SESSION_TTL_HOURS: i64 = 12;

/// Session repository.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a session for the user and stamps their last login.
    pub async fn create(&self, user_id: i64) -> Result<sessions::Model, PostingError> {
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("user", user_id))?;

        let now = Utc::now();
        let session = sessions::ActiveModel {
            token: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            expires_at: Set((now + Duration::hours(SESSION_TTL_HOURS)).into()),
            created_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(now.into()));
        active.update(&self.db).await?;

        Ok(session)
    }

    /// Resolves a token to its user, ignoring expired sessions and
    /// deactivated users.
    pub async fn find_valid(
        &self,
        token: Uuid,
    ) -> Result<Option<(users::Model, sessions::Model)>, PostingError> {
        let found = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;

        Ok(found.and_then(|(session, user)| {
            user.filter(|u| u.is_active).map(|u| (u, session))
        }))
    }

    /// Drops a session, if it exists.
    pub async fn revoke(&self, token: Uuid) -> Result<u64, PostingError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
