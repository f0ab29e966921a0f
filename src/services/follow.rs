//! Follow service.
//!
//! The store guarantees idempotence (unique edge, conflict-ignoring
//! insert, unconditional delete); this layer adds the policy decisions:
//! the target must exist, and following yourself quietly does nothing.

use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::User;

pub struct FollowService {
    pool: SqlitePool,
}

impl FollowService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn target(&self, username: &str) -> Result<User> {
        db::users::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))
    }

    /// Follow `username`. Already following and self-follow are both
    /// silent successes; the target is returned for the redirect.
    pub async fn follow(&self, user_id: i64, username: &str) -> Result<User> {
        let author = self.target(username).await?;

        if author.id != user_id {
            let created = db::follows::create_follow(&self.pool, user_id, author.id).await?;
            if created {
                metrics::FOLLOWS_CREATED.inc();
                info!(user_id, author = %author.username, "follow created");
            }
        }

        Ok(author)
    }

    /// Unfollow `username`. A missing edge is a silent success.
    pub async fn unfollow(&self, user_id: i64, username: &str) -> Result<User> {
        let author = self.target(username).await?;

        let removed = db::follows::delete_follow(&self.pool, user_id, author.id).await?;
        if removed {
            metrics::FOLLOWS_DELETED.inc();
            info!(user_id, author = %author.username, "follow removed");
        }

        Ok(author)
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        Ok(db::follows::exists(&self.pool, user_id, author_id).await?)
    }
}
