//! Comment service. Comments are append-only: no edit, no delete.

use sqlx::SqlitePool;

use crate::db;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::Comment;

pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach a comment to a post. The post and the author both come from
    /// request context, never from the form body. Unknown post: NotFound.
    pub async fn add(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("post {post_id}")));
        }

        let comment = db::comments::insert_comment(&mut *tx, post_id, author_id, text).await?;
        tx.commit().await?;

        metrics::COMMENTS_CREATED.inc();
        Ok(comment)
    }
}
