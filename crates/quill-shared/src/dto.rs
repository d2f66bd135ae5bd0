//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quill_core::domain::{NewPost, Page, PageRequest, Post};

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        NewPost::new(req.title, req.content)
    }
}

/// `?title=` for the exact-title lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

/// `?keyword=` for the substring search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

/// `?page=&per_page=` for listing. `limit` is accepted for `per_page`,
/// matching the field name of [`PostListResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page", alias = "limit")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

impl From<ListQuery> for PageRequest {
    fn from(q: ListQuery) -> Self {
        PageRequest::new(q.page, q.per_page)
    }
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
        }
    }
}

/// Paginated list of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub data: Vec<PostResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl From<Page<Post>> for PostListResponse {
    fn from(page: Page<Post>) -> Self {
        let page = page.map(PostResponse::from);
        Self {
            data: page.data,
            total: page.total,
            page: page.page,
            limit: page.per_page,
        }
    }
}
