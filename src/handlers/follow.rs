//! Follow/unfollow handlers. Both redirect back to the target's profile;
//! both are idempotent, so repeating either is a harmless success.

use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use super::{profile_url, redirect};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::FollowService;

/// GET /profile/{username}/follow/
pub async fn follow_author(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let service = FollowService::new(pool.get_ref().clone());
    let author = service.follow(user.id, &username).await?;

    Ok(redirect(&profile_url(&author.username)))
}

/// GET /profile/{username}/unfollow/
pub async fn unfollow_author(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let service = FollowService::new(pool.get_ref().clone());
    let author = service.unfollow(user.id, &username).await?;

    Ok(redirect(&profile_url(&author.username)))
}
