use chrono::Utc;
use sqlx::SqlitePool;

/// Idempotent create follow; returns true if a new edge was inserted.
/// The UNIQUE constraint on (user_id, author_id) makes concurrent repeats
/// converge on a single row.
pub async fn create_follow(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO follows (user_id, author_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if an edge was removed.
pub async fn delete_follow(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE user_id = ? AND author_id = ?
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn exists(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
