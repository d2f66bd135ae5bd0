//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Statement};

use quill_core::domain::{NewPost, Page, PageRequest, Post, PostId};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL post repository.
///
/// Title normalization happens in the `before_insert_post` trigger, so
/// titles are sent exactly as submitted.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        tracing::debug!(title_len = new_post.title.len(), "Inserting post");
        self.insert_returning::<Post, post::ActiveModel>(new_post.into())
            .await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        self.fetch_by_id(id).await
    }

    async fn get_posts_by_title(&self, title: &str) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(title = %title, "Calling get_post_by_title");

        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            "SELECT * FROM get_post_by_title($1)",
            [title.into()],
        );
        let rows = PostEntity::find()
            .from_raw_sql(stmt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_posts_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(keyword = %keyword, "Searching posts by title");

        let select = PostEntity::find()
            .filter(post::Column::Title.contains(keyword))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id);
        self.fetch_all(select).await
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id);
        self.fetch_page(select, page).await
    }
}
