//! HTTP request handlers, one async fn per route and verb, plus the
//! explicit route table wiring them up. Handlers compose the services,
//! apply authorization, and answer with a rendering context (JSON) or a
//! redirect; HTML itself is produced elsewhere.

pub mod comments;
pub mod feed;
pub mod follow;
pub mod posts;

use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// 1-based page number from the query string; absent or zero means the
/// first page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub(crate) fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

fn not_found_body() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Not found",
        "status": 404,
    }))
}

/// Fallback for anything the route table does not know.
pub async fn not_found() -> HttpResponse {
    not_found_body()
}

/// The route surface. Registered identically by the server binary and the
/// integration tests, so both exercise the same table.
pub fn routes(cfg: &mut web::ServiceConfig) {
    // A path parameter that does not parse (e.g. /posts/abc/) is a URL
    // that matches no resource: 404, not 400.
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(err, not_found_body()).into()
    }));

    cfg.route("/", web::get().to(feed::index))
        .route("/follow/", web::get().to(feed::following_feed))
        .route("/group/{slug}/", web::get().to(feed::group_posts))
        .route("/profile/{username}/", web::get().to(feed::profile))
        .route(
            "/profile/{username}/follow/",
            web::get().to(follow::follow_author),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(follow::unfollow_author),
        )
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_post)),
        )
        .route("/posts/{id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/posts/{id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_post)),
        )
        .route("/posts/{id}/comment/", web::post().to(comments::add_comment));
}
