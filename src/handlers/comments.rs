//! Comment handler. One route, one verb: POST a comment, land back on the
//! post.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::{post_detail_url, redirect};
use crate::error::Result;
use crate::forms::{self, CommentFormData, CommentFormValues, FieldErrors};
use crate::middleware::CurrentUser;
use crate::services::CommentService;

#[derive(Debug, Serialize)]
struct CommentFormContext {
    form: CommentFormValues,
    errors: FieldErrors,
}

/// POST /posts/{id}/comment/ - login required, so an anonymous request is
/// redirected away before any row could be written. The post and the
/// author come from the route and the session, never from the body.
pub async fn add_comment(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Form<CommentFormData>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    match forms::validate_comment(form.into_inner()) {
        Err((values, errors)) => Ok(HttpResponse::Ok().json(CommentFormContext {
            form: values,
            errors,
        })),
        Ok(input) => {
            let service = CommentService::new(pool.get_ref().clone());
            let comment = service.add(post_id, user.id, &input.text).await?;

            info!(
                comment_id = comment.id,
                post_id,
                author = %user.username,
                "comment created"
            );
            Ok(redirect(&post_detail_url(post_id)))
        }
    }
}
