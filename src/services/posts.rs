//! Post service - creation, editing, and the detail view.

use sqlx::SqlitePool;

use crate::db;
use crate::error::{AppError, Result};
use crate::forms::PostInput;
use crate::metrics;
use crate::models::{CommentView, Post, PostView};

pub struct PostService {
    pool: SqlitePool,
}

impl PostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a post for `author_id`. The author is whoever is signed in;
    /// no form input can change that. `image` is the already-stored media
    /// path, if an image was uploaded.
    pub async fn create(
        &self,
        author_id: i64,
        input: &PostInput,
        image: Option<&str>,
    ) -> Result<Post> {
        let mut tx = self.pool.begin().await?;
        let post =
            db::posts::insert_post(&mut *tx, author_id, &input.text, input.group_id, image)
                .await?;
        tx.commit().await?;

        metrics::POSTS_CREATED.inc();
        Ok(post)
    }

    /// Update the editable fields of a post owned by `author_id`.
    ///
    /// Returns `None` when the post does not exist *for this author* -
    /// somebody else's post and a missing post are indistinguishable.
    /// `author_id` and `created_at` are immutable; a `None` image keeps
    /// the stored one.
    pub async fn update(
        &self,
        post_id: i64,
        author_id: i64,
        input: &PostInput,
        image: Option<&str>,
    ) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;
        let post = db::posts::update_post(
            &mut *tx,
            post_id,
            author_id,
            &input.text,
            input.group_id,
            image,
        )
        .await?;
        tx.commit().await?;

        if post.is_some() {
            metrics::POSTS_EDITED.inc();
        }
        Ok(post)
    }

    /// A post as its author sees it on the edit form; `None` for everyone
    /// else.
    pub async fn find_for_author(&self, post_id: i64, author_id: i64) -> Result<Option<Post>> {
        Ok(db::posts::find_for_author(&self.pool, post_id, author_id).await?)
    }

    /// The joined post view plus its comments, newest first.
    pub async fn detail(&self, post_id: i64) -> Result<(PostView, Vec<CommentView>)> {
        let post = db::posts::find_view_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
        let comments = db::comments::list_for_post(&self.pool, post_id).await?;

        Ok((post, comments))
    }
}
