use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Ensure the relational schema exists.
///
/// Tables are created lazily at service startup to unblock environments
/// where no migration has run yet (fresh developer machines, the test
/// suite's in-memory databases). Statements are idempotent.
///
/// Referential behavior lives in the schema, not in application code:
/// deleting a group nullifies `posts.group_id`, deleting a post drops its
/// comments, deleting a user drops their posts, comments and both ends of
/// their follows. Requires `PRAGMA foreign_keys = ON` on every connection.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    info!("Ensuring relational schema exists");

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    group_id INTEGER REFERENCES groups (id) ON DELETE SET NULL,
    image TEXT,
    created_at TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_posts_author_created
    ON posts (author_id, created_at DESC)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_posts_group_created
    ON posts (group_id, created_at DESC)
"#,
    r#"
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL REFERENCES posts (id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_comments_post_created
    ON comments (post_id, created_at DESC)
"#,
    r#"
CREATE TABLE IF NOT EXISTS follows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, author_id)
)
"#,
];
