use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Post, PostView};

const POST_COLUMNS: &str = "id, text, author_id, group_id, image, created_at";

/// Column list for the joined feed view. Every feed query joins the author
/// and the optional group up front; rendering never goes back to the store.
const POST_VIEW_COLUMNS: &str = "p.id, p.text, p.author_id, u.username AS author_username, \
     p.group_id, g.title AS group_title, g.slug AS group_slug, \
     p.image, p.created_at";

fn page_query(filter: &str) -> String {
    format!(
        "SELECT {} FROM posts p \
         JOIN users u ON u.id = p.author_id \
         LEFT JOIN groups g ON g.id = p.group_id \
         {} \
         ORDER BY p.created_at DESC, p.id DESC \
         LIMIT ? OFFSET ?",
        POST_VIEW_COLUMNS, filter,
    )
}

/// Insert a new post. `created_at` is set here, once; nothing updates it.
pub async fn insert_post<'e, E>(
    executor: E,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!(
        "INSERT INTO posts (text, author_id, group_id, image, created_at) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING {}",
        POST_COLUMNS,
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(text)
        .bind(author_id)
        .bind(group_id)
        .bind(image)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
}

/// Update a post's editable fields, scoped to its author.
///
/// The row is addressed by `(id, author_id)`, so a non-author update
/// touches nothing and returns `None` - the caller surfaces that as 404.
/// `author_id` and `created_at` are not in the SET list; an absent image
/// keeps the stored one.
pub async fn update_post<'e, E>(
    executor: E,
    post_id: i64,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Option<Post>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!(
        "UPDATE posts \
         SET text = ?, group_id = ?, image = COALESCE(?, image) \
         WHERE id = ? AND author_id = ? \
         RETURNING {}",
        POST_COLUMNS,
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(text)
        .bind(group_id)
        .bind(image)
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(executor)
        .await
}

/// Find a post by id, visible only to its author. Non-authors get `None`,
/// not a distinguishable "forbidden".
pub async fn find_for_author(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts WHERE id = ? AND author_id = ?",
        POST_COLUMNS,
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(pool)
        .await
}

/// Find the joined view of a single post.
pub async fn find_view_by_id(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Option<PostView>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts p \
         JOIN users u ON u.id = p.author_id \
         LEFT JOIN groups g ON g.id = p.group_id \
         WHERE p.id = ?",
        POST_VIEW_COLUMNS,
    );

    sqlx::query_as::<_, PostView>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// One page of all posts, newest first.
pub async fn page_all(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&page_query(""))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
}

/// One page of a group's posts, newest first.
pub async fn page_by_group(
    pool: &SqlitePool,
    group_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&page_query("WHERE p.group_id = ?"))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_by_group(pool: &SqlitePool, group_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = ?")
        .bind(group_id)
        .fetch_one(pool)
        .await
}

/// One page of an author's posts, newest first.
pub async fn page_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&page_query("WHERE p.author_id = ?"))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await
}

/// One page of posts whose authors the given user follows, newest first.
pub async fn page_by_followed(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let filter = "WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?)";

    sqlx::query_as::<_, PostView>(&page_query(filter))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_by_followed(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM posts p \
         WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
