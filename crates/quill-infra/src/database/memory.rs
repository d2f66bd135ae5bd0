//! In-memory post repository - used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, Page, PageRequest, Post, PostId};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

#[derive(Default)]
struct Store {
    next_id: PostId,
    posts: Vec<Post>,
}

/// In-memory post repository using a `Vec` behind an async RwLock.
///
/// Applies the pre-insert normalization hook itself, in place of the
/// database trigger. Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    /// Newest first; later ids win ties on `created_at`.
    fn newest_first(posts: &mut [Post]) {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let new_post = new_post.normalized();

        let mut store = self.store.write().await;
        store.next_id = store
            .next_id
            .checked_add(1)
            .ok_or_else(|| RepoError::Constraint("post id sequence exhausted".to_string()))?;

        let post = Post {
            id: store.next_id,
            title: new_post.title,
            content: new_post.content,
            created_at: Utc::now(),
        };
        store.posts.push(post.clone());

        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_posts_by_title(&self, title: &str) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .filter(|p| p.title == title)
            .cloned()
            .collect())
    }

    async fn search_posts_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        let mut matches: Vec<Post> = {
            let store = self.store.read().await;
            store
                .posts
                .iter()
                .filter(|p| p.title.contains(keyword))
                .cloned()
                .collect()
        };
        Self::newest_first(&mut matches);
        Ok(matches)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let mut all = self.store.read().await.posts.clone();
        Self::newest_first(&mut all);

        let total = all.len() as u64;
        let data = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page() as usize)
            .collect();

        Ok(Page::new(data, total, page))
    }
}
