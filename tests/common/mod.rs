//! Shared fixtures for the integration tests: an in-memory database, the
//! real route table, and helpers for identities and form bodies.
#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use gazette::cache::PageCache;
use gazette::db;
use gazette::handlers;
use gazette::models::{Group, Post, User};
use gazette::storage::MediaStore;
use gazette::Config;

pub struct TestCtx {
    pub pool: SqlitePool,
    pub config: Config,
    pub cache: web::Data<PageCache>,
    pub media_dir: TempDir,
}

async fn build(cache_ttl: Duration) -> TestCtx {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("sqlite options")
        .foreign_keys(true);
    // A single long-lived connection keeps every query on the same
    // in-memory database; recycling it would drop the schema and data.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect in-memory sqlite");
    db::ensure_schema(&pool).await.expect("ensure schema");

    let media_dir = tempfile::tempdir().expect("media tempdir");
    let mut config = Config::from_env().expect("config defaults");
    config.media.root = media_dir.path().display().to_string();

    TestCtx {
        pool,
        config,
        cache: web::Data::new(PageCache::new(cache_ttl)),
        media_dir,
    }
}

/// App context with the home page cache disabled, which is what most
/// tests want: every GET observes the store directly.
pub async fn setup() -> TestCtx {
    build(Duration::ZERO).await
}

/// App context with a real cache window, for the staleness tests.
pub async fn setup_with_cache(ttl: Duration) -> TestCtx {
    build(ttl).await
}

/// The application under test, wired exactly like the server binary.
pub async fn service(
    ctx: &TestCtx,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.config.clone()))
            .app_data(ctx.cache.clone())
            .app_data(web::Data::new(MediaStore::new(
                ctx.config.media.root.clone(),
            )))
            .configure(handlers::routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await
}

// ---------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------

pub async fn user(ctx: &TestCtx, username: &str) -> User {
    db::users::create_user(&ctx.pool, username)
        .await
        .expect("create user")
}

pub async fn group(ctx: &TestCtx, title: &str, slug: &str) -> Group {
    db::groups::create_group(&ctx.pool, title, slug, "a test community")
        .await
        .expect("create group")
}

pub async fn post(ctx: &TestCtx, author: &User, group: Option<&Group>, text: &str) -> Post {
    db::posts::insert_post(&ctx.pool, author.id, text, group.map(|g| g.id), None)
        .await
        .expect("create post")
}

pub async fn follow(ctx: &TestCtx, follower: &User, author: &User) {
    db::follows::create_follow(&ctx.pool, follower.id, author.id)
        .await
        .expect("create follow");
}

/// Attach the identity header the external auth layer would set.
pub fn as_user(req: test::TestRequest, user: &User) -> test::TestRequest {
    req.insert_header(("x-user-id", user.id.to_string()))
}

// ---------------------------------------------------------------------
// Multipart bodies for the post form
// ---------------------------------------------------------------------

pub const BOUNDARY: &str = "gazette-test-boundary-4Yb7zQ";

/// A valid 1x1 transparent PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a multipart body from text fields plus an optional
/// `(field, filename, content_type, bytes)` file part.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Location header of a redirect response.
pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("utf-8 location")
        .to_string()
}
