//! Feed handlers: home, group, profile, and following.

use actix_web::http::header::ContentType;
use actix_web::web::{self, Bytes};
use actix_web::HttpResponse;
use serde::Serialize;
use sqlx::SqlitePool;

use super::PageQuery;
use crate::cache::PageCache;
use crate::config::Config;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{Group, PostView, User};
use crate::services::{FeedService, FollowService, Page};

#[derive(Debug, Serialize)]
struct IndexContext {
    page: Page<PostView>,
}

#[derive(Debug, Serialize)]
struct GroupContext {
    group: Group,
    page: Page<PostView>,
}

#[derive(Debug, Serialize)]
struct ProfileContext {
    author: User,
    page: Page<PostView>,
    /// Present only for authenticated viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    following: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_is_not_user: Option<bool>,
}

#[derive(Debug, Serialize)]
struct FollowingContext {
    page: Page<PostView>,
    following_view: bool,
}

/// Home feed. The only cached route: the rendered body is served from the
/// page cache until its entry expires, so a brand-new post stays
/// invisible here for up to the cache window.
pub async fn index(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let number = query.number();
    let key = format!("home:page={number}");

    if let Some(body) = cache.get(&key) {
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body));
    }

    let feed = FeedService::new(pool.get_ref().clone(), config.feed.page_size);
    let page = feed.home(number).await?;

    let body = Bytes::from(serde_json::to_vec(&IndexContext { page })?);
    cache.put(key, body.clone());

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// Group feed. 404 for a slug nobody registered.
pub async fn group_posts(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let feed = FeedService::new(pool.get_ref().clone(), config.feed.page_size);
    let (group, page) = feed.group(&slug, query.number()).await?;

    Ok(HttpResponse::Ok().json(GroupContext { group, page }))
}

/// Profile feed. Public; an authenticated viewer additionally learns
/// whether they follow this author and whether the follow controls apply
/// (they never apply to your own profile).
pub async fn profile(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: Option<CurrentUser>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let feed = FeedService::new(pool.get_ref().clone(), config.feed.page_size);
    let (author, page) = feed.profile(&username, query.number()).await?;

    let (following, author_is_not_user) = match viewer {
        Some(viewer) => {
            let follows = FollowService::new(pool.get_ref().clone());
            (
                Some(follows.is_following(viewer.id, author.id).await?),
                Some(author.id != viewer.id),
            )
        }
        None => (None, None),
    };

    Ok(HttpResponse::Ok().json(ProfileContext {
        author,
        page,
        following,
        author_is_not_user,
    }))
}

/// Following feed: login required.
pub async fn following_feed(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    viewer: CurrentUser,
) -> Result<HttpResponse> {
    let feed = FeedService::new(pool.get_ref().clone(), config.feed.page_size);
    let page = feed.following(viewer.id, query.number()).await?;

    Ok(HttpResponse::Ok().json(FollowingContext {
        page,
        following_view: true,
    }))
}
