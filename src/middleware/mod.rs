//! Identity extraction for gazette.
//!
//! Authentication itself lives in front of this service: the identity
//! layer verifies the session and forwards the user id in the `x-user-id`
//! header. Handlers declare what they need - [`CurrentUser`] for
//! login-gated routes, `Option<CurrentUser>` for public routes that
//! personalize - and extraction resolves the header against the local
//! `users` projection. An unauthenticated request to a gated route turns
//! into a redirect to the login route carrying a `next` parameter back to
//! the gated path.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::AppError;

/// Header the identity layer uses to forward the authenticated user id.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// The authenticated actor for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Build the login redirect for a request, preserving where it was going.
fn login_redirect(req: &HttpRequest) -> AppError {
    let login_url = req
        .app_data::<web::Data<Config>>()
        .map(|config| config.auth.login_url.clone())
        .unwrap_or_else(|| "/auth/login/".to_string());

    AppError::LoginRequired {
        location: format!("{}?next={}", login_url, req.path()),
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(raw) = req
                .headers()
                .get(IDENTITY_HEADER)
                .and_then(|value| value.to_str().ok())
            else {
                return Err(login_redirect(&req));
            };

            let Ok(user_id) = raw.parse::<i64>() else {
                return Err(login_redirect(&req));
            };

            let Some(pool) = req.app_data::<web::Data<SqlitePool>>() else {
                return Err(AppError::Internal("database pool not configured".to_string()));
            };

            // An id the identity layer vouches for but we have no row for
            // is treated as unauthenticated, not as a server error.
            match db::users::find_by_id(pool, user_id).await? {
                Some(user) => Ok(CurrentUser {
                    id: user.id,
                    username: user.username,
                }),
                None => Err(login_redirect(&req)),
            }
        })
    }
}
