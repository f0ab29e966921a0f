//! Form decoding and validation for the post and comment forms.
//!
//! Both forms follow the same contract: input is normalized (leading and
//! trailing whitespace stripped), then checked field by field. A failed
//! check never reaches the store; the handler re-renders the form context
//! with the submitted values and a per-field error map, HTTP 200.

use std::collections::BTreeMap;
use std::fs;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::{Validate, ValidationErrors};

use crate::db;
use crate::error::Result;

/// Field name -> messages, in the shape form templates expect.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const BAD_GROUP: &str = "select a valid group";
const BAD_IMAGE: &str = "upload a valid image";

fn collect_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| "invalid value".to_string())
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}

// ---------------------------------------------------------------------
// Post form
// ---------------------------------------------------------------------

/// Raw multipart submission of the post form. The form has no author
/// field at all; authorship always comes from the session.
#[derive(Debug, MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<TempFile>,
}

/// Submitted values echoed back into the re-rendered form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: String,
}

/// A validated image: sniffed bytes plus the extension to store it under.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Normalized, validated post input ready for the store.
#[derive(Debug)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Validate)]
struct PostTextField {
    #[validate(length(min = 1, message = "this field is required"))]
    text: String,
}

pub enum PostFormOutcome {
    Valid(PostInput),
    Invalid {
        values: PostFormValues,
        errors: FieldErrors,
    },
}

/// Validate a post form submission.
///
/// An unknown or non-numeric group id is a field error, not a server
/// error. An image part must sniff as real image content; a part with an
/// empty body or no filename is treated as "no image chosen".
pub async fn validate_post_upload(
    pool: &SqlitePool,
    upload: PostUpload,
) -> Result<PostFormOutcome> {
    let text = upload
        .text
        .map(|field| field.0)
        .unwrap_or_default()
        .trim()
        .to_string();
    let group_raw = upload
        .group
        .map(|field| field.0)
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut errors = FieldErrors::new();

    if let Err(validation) = (PostTextField { text: text.clone() }).validate() {
        errors.extend(collect_errors(&validation));
    }

    let group_id = if group_raw.is_empty() {
        None
    } else {
        match group_raw.parse::<i64>() {
            Ok(id) => match db::groups::find_by_id(pool, id).await? {
                Some(group) => Some(group.id),
                None => {
                    errors.insert("group".to_string(), vec![BAD_GROUP.to_string()]);
                    None
                }
            },
            Err(_) => {
                errors.insert("group".to_string(), vec![BAD_GROUP.to_string()]);
                None
            }
        }
    };

    let image = match upload.image {
        Some(file) => match read_image(&file) {
            Ok(image) => image,
            Err(message) => {
                errors.insert("image".to_string(), vec![message]);
                None
            }
        },
        None => None,
    };

    if errors.is_empty() {
        Ok(PostFormOutcome::Valid(PostInput {
            text,
            group_id,
            image,
        }))
    } else {
        Ok(PostFormOutcome::Invalid {
            values: PostFormValues {
                text,
                group: group_raw,
            },
            errors,
        })
    }
}

/// Sniff an uploaded part. Browsers submit an empty part for an untouched
/// file input; that counts as no image, not a bad one.
fn read_image(file: &TempFile) -> std::result::Result<Option<ImageUpload>, String> {
    let unnamed = file.file_name.as_deref().unwrap_or("").is_empty();
    if file.size == 0 && unnamed {
        return Ok(None);
    }

    if let Some(content_type) = file.content_type.as_ref() {
        if content_type.type_() != mime::IMAGE {
            return Err(BAD_IMAGE.to_string());
        }
    }

    let bytes = fs::read(file.file.path()).map_err(|_| BAD_IMAGE.to_string())?;
    let format = image::guess_format(&bytes).map_err(|_| BAD_IMAGE.to_string())?;
    let extension = format.extensions_str().first().copied().unwrap_or("img");

    Ok(Some(ImageUpload { bytes, extension }))
}

// ---------------------------------------------------------------------
// Comment form
// ---------------------------------------------------------------------

/// Raw urlencoded submission of the comment form.
#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentFormValues {
    pub text: String,
}

#[derive(Debug, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, message = "this field is required"))]
    pub text: String,
}

pub fn validate_comment(
    data: CommentFormData,
) -> std::result::Result<CommentInput, (CommentFormValues, FieldErrors)> {
    let text = data.text.unwrap_or_default().trim().to_string();
    let input = CommentInput { text };

    match input.validate() {
        Ok(()) => Ok(input),
        Err(validation) => Err((
            CommentFormValues {
                text: input.text,
            },
            collect_errors(&validation),
        )),
    }
}
