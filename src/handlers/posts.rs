//! Post handlers: detail page, create form, edit form.

use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::{post_detail_url, profile_url, redirect};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::forms::{self, FieldErrors, PostFormOutcome, PostFormValues, PostInput, PostUpload};
use crate::middleware::CurrentUser;
use crate::models::{CommentView, PostView};
use crate::services::PostService;
use crate::storage::MediaStore;

#[derive(Debug, Serialize)]
struct PostDetailContext {
    post: PostView,
    comments: Vec<CommentView>,
}

/// Create and edit share one template; `is_edit` tells them apart.
#[derive(Debug, Serialize)]
struct PostFormContext {
    form: PostFormValues,
    errors: FieldErrors,
    is_edit: bool,
}

/// Post detail: the joined view plus its comments. The comment form
/// itself is empty scaffolding for the rendering layer.
pub async fn post_detail(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let (post, comments) = service.detail(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostDetailContext { post, comments }))
}

/// GET /create/ - the empty post form.
pub async fn create_form(_user: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(PostFormContext {
        form: PostFormValues::default(),
        errors: FieldErrors::new(),
        is_edit: false,
    }))
}

/// POST /create/ - validate, persist, and send the author to their
/// profile. The author is always the signed-in user; the form carries no
/// author field and anything smuggled in is simply not read.
pub async fn create_post(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    media: web::Data<MediaStore>,
    form: MultipartForm<PostUpload>,
) -> Result<HttpResponse> {
    match forms::validate_post_upload(pool.get_ref(), form.into_inner()).await? {
        PostFormOutcome::Invalid { values, errors } => {
            Ok(HttpResponse::Ok().json(PostFormContext {
                form: values,
                errors,
                is_edit: false,
            }))
        }
        PostFormOutcome::Valid(input) => {
            let image = store_image(&media, &input)?;
            let service = PostService::new(pool.get_ref().clone());
            let post = service.create(user.id, &input, image.as_deref()).await?;

            info!(
                post_id = post.id,
                author = %user.username,
                preview = %post.preview(config.display.preview_chars),
                "post created"
            );
            Ok(redirect(&profile_url(&user.username)))
        }
    }
}

/// GET /posts/{id}/edit/ - the bound form, for the author only. Everyone
/// else gets 404; the post is looked up in the author's own queryset.
pub async fn edit_form(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let post = service
        .find_for_author(post_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

    Ok(HttpResponse::Ok().json(PostFormContext {
        form: PostFormValues {
            text: post.text.clone(),
            group: post
                .group_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        },
        errors: FieldErrors::new(),
        is_edit: true,
    }))
}

/// POST /posts/{id}/edit/ - update text, group and image, nothing else.
pub async fn edit_post(
    user: CurrentUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
    form: MultipartForm<PostUpload>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let service = PostService::new(pool.get_ref().clone());

    // Ownership gate before anything else; non-authors must not be able
    // to distinguish "exists" from "does not".
    if service.find_for_author(post_id, user.id).await?.is_none() {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }

    match forms::validate_post_upload(pool.get_ref(), form.into_inner()).await? {
        PostFormOutcome::Invalid { values, errors } => {
            Ok(HttpResponse::Ok().json(PostFormContext {
                form: values,
                errors,
                is_edit: true,
            }))
        }
        PostFormOutcome::Valid(input) => {
            let image = store_image(&media, &input)?;
            let post = service
                .update(post_id, user.id, &input, image.as_deref())
                .await?
                .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

            info!(
                post_id = post.id,
                author = %user.username,
                preview = %post.preview(config.display.preview_chars),
                "post edited"
            );
            Ok(redirect(&post_detail_url(post.id)))
        }
    }
}

fn store_image(media: &MediaStore, input: &PostInput) -> Result<Option<String>> {
    match input.image.as_ref() {
        Some(image) => Ok(Some(media.store_post_image(image)?)),
        None => Ok(None),
    }
}
