//! Prometheus metrics for gazette.
//!
//! Write-path counters plus the HTTP handler for the `/metrics` endpoint.
//! Cache hit/miss counters live next to the page cache itself.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref POSTS_CREATED: IntCounter = register_int_counter!(
        "gazette_posts_created_total",
        "Total number of posts created"
    )
    .expect("Failed to register gazette_posts_created_total");
    pub static ref POSTS_EDITED: IntCounter = register_int_counter!(
        "gazette_posts_edited_total",
        "Total number of posts edited"
    )
    .expect("Failed to register gazette_posts_edited_total");
    pub static ref COMMENTS_CREATED: IntCounter = register_int_counter!(
        "gazette_comments_created_total",
        "Total number of comments created"
    )
    .expect("Failed to register gazette_comments_created_total");
    pub static ref FOLLOWS_CREATED: IntCounter = register_int_counter!(
        "gazette_follows_created_total",
        "Total number of follow edges created"
    )
    .expect("Failed to register gazette_follows_created_total");
    pub static ref FOLLOWS_DELETED: IntCounter = register_int_counter!(
        "gazette_follows_deleted_total",
        "Total number of follow edges removed"
    )
    .expect("Failed to register gazette_follows_deleted_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
