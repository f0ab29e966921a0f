/// Data models for gazette
///
/// Row types for the relational store plus the joined view types feeds and
/// detail pages are built from. Users are owned by the external identity
/// subsystem; the local `users` table is its projection so posts, comments
/// and follows have something to reference.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity projection
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Group entity - a community a post may belong to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Post entity - the core content row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    /// Relative media path of the uploaded image, if any
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Short textual representation: the first `chars` characters of the
    /// text. Counted in characters, not bytes, so multi-byte text is safe.
    pub fn preview(&self, chars: usize) -> String {
        self.text.chars().take(chars).collect()
    }
}

/// Comment entity - attached to exactly one post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Follow edge - `user` follows `author`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Post row joined with its author and group, as feeds render it.
/// One query per page; no per-row lookups afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub fn preview(&self, chars: usize) -> String {
        self.text.chars().take(chars).collect()
    }
}

/// Comment row joined with its author
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
