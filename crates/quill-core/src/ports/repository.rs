use async_trait::async_trait;

use crate::domain::{NewPost, Page, PageRequest, Post, PostId};
use crate::error::RepoError;

/// Post query gateway.
///
/// Reads never mutate shared state and may run concurrently. A read that
/// matches nothing returns an empty `Vec`, not an error.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return the stored row.
    ///
    /// The returned title is the normalized one, and `id` / `created_at`
    /// are the values storage assigned.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Find a post by its id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Exact match against the stored title.
    ///
    /// Stored titles are uppercase, so callers wanting a case-insensitive
    /// lookup must uppercase `title` first.
    async fn get_posts_by_title(&self, title: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts whose title contains `keyword`, newest first.
    async fn search_posts_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError>;

    /// All posts, newest first, one page at a time.
    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;
}
