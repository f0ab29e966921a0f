//! Feed query engine.
//!
//! Builds the ordered, paginated post pages behind the four feed
//! contexts: everything, one group, one author, and the authors a viewer
//! follows. All queries are newest-first and join author and group
//! eagerly; pagination is plain LIMIT/OFFSET driven by a 1-based page
//! number.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Group, PostView, User};

/// One page of an ordered result set.
///
/// Requesting a page past the end is not an error; it comes back with an
/// empty item list and the real totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    fn assemble(items: Vec<T>, number: u32, page_size: u32, total_items: i64) -> Self {
        let size = i64::from(page_size.max(1));
        let num_pages = ((total_items + size - 1) / size).max(1) as u32;

        Self {
            items,
            number,
            page_size,
            total_items,
            num_pages,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}

pub struct FeedService {
    pool: SqlitePool,
    page_size: u32,
}

impl FeedService {
    pub fn new(pool: SqlitePool, page_size: u32) -> Self {
        Self { pool, page_size }
    }

    fn limit_offset(&self, number: u32) -> (i64, i64) {
        let size = i64::from(self.page_size.max(1));
        (size, (i64::from(number) - 1) * size)
    }

    /// Home feed: every post.
    pub async fn home(&self, number: u32) -> Result<Page<PostView>> {
        let (limit, offset) = self.limit_offset(number);
        let items = db::posts::page_all(&self.pool, limit, offset).await?;
        let total = db::posts::count_all(&self.pool).await?;

        Ok(Page::assemble(items, number, self.page_size, total))
    }

    /// Group feed: posts tagged to the group behind `slug`.
    pub async fn group(&self, slug: &str, number: u32) -> Result<(Group, Page<PostView>)> {
        let group = db::groups::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {slug}")))?;

        let (limit, offset) = self.limit_offset(number);
        let items = db::posts::page_by_group(&self.pool, group.id, limit, offset).await?;
        let total = db::posts::count_by_group(&self.pool, group.id).await?;

        Ok((group, Page::assemble(items, number, self.page_size, total)))
    }

    /// Profile feed: posts written by `username`.
    pub async fn profile(&self, username: &str, number: u32) -> Result<(User, Page<PostView>)> {
        let author = db::users::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

        let (limit, offset) = self.limit_offset(number);
        let items = db::posts::page_by_author(&self.pool, author.id, limit, offset).await?;
        let total = db::posts::count_by_author(&self.pool, author.id).await?;

        Ok((author, Page::assemble(items, number, self.page_size, total)))
    }

    /// Following feed: posts by every author the viewer follows.
    pub async fn following(&self, viewer_id: i64, number: u32) -> Result<Page<PostView>> {
        let (limit, offset) = self.limit_offset(number);
        let items = db::posts::page_by_followed(&self.pool, viewer_id, limit, offset).await?;
        let total = db::posts::count_by_followed(&self.pool, viewer_id).await?;

        Ok(Page::assemble(items, number, self.page_size, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math_rounds_up_and_never_hits_zero() {
        let page = Page::<u8>::assemble(vec![], 1, 10, 0);
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);

        let page = Page::<u8>::assemble(vec![], 2, 10, 13);
        assert_eq!(page.num_pages, 2);
        assert!(!page.has_next);
        assert!(page.has_previous);

        let page = Page::<u8>::assemble(vec![], 1, 10, 13);
        assert!(page.has_next);
    }
}
