#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};
    use quill_core::domain::{NewPost, PageRequest, Post};
    use quill_core::error::RepoError;
    use quill_core::ports::PostRepository;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;

    fn model(id: i32, title: &str, minutes_ago: i64) -> post::Model {
        post::Model {
            id,
            title: title.to_owned(),
            content: "Content".to_owned(),
            created_at: (Utc::now() - Duration::minutes(minutes_ago)).into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "TEST POST", 0)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(1).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "TEST POST");
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn test_create_returns_row_rewritten_by_trigger() {
        // RETURNING yields what the trigger stored, not what was sent
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(10, "HELLO WORLD", 0)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = repo
            .create(NewPost::new("hello world", "Content"))
            .await
            .unwrap();
        assert_eq!(post.id, 10);
        assert_eq!(post.title, "HELLO WORLD");

        let log = format!("{:?}", repo.into_inner().into_transaction_log());
        assert!(log.contains("INSERT INTO \\\"post\\\""));
        assert!(log.contains("RETURNING"));
        // title is sent as submitted; created_at is left to the column default
        assert!(log.contains("hello world"));
        assert!(!log.contains("\\\"created_at\\\") VALUES"));
    }

    #[tokio::test]
    async fn test_get_posts_by_title_calls_stored_function() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "HELLO WORLD", 0)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let posts = repo.get_posts_by_title("HELLO WORLD").await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "HELLO WORLD");

        let log = format!("{:?}", repo.into_inner().into_transaction_log());
        assert!(log.contains("SELECT * FROM get_post_by_title($1)"));
        assert!(log.contains("HELLO WORLD"));
    }

    #[tokio::test]
    async fn test_search_uses_substring_pattern_newest_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(2, "BETA", 1), model(1, "ALPHA", 5)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let titles: Vec<_> = repo
            .search_posts_by_title("A")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["BETA", "ALPHA"]);

        let log = format!("{:?}", repo.into_inner().into_transaction_log());
        assert!(log.contains("LIKE"));
        assert!(log.contains("%A%"));
        assert!(log.contains("ORDER BY \\\"post\\\".\\\"created_at\\\" DESC"));
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.search_posts_by_title("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_reports_total_and_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([(
                "num_items",
                Into::<Value>::into(3i64),
            )])]])
            .append_query_results([vec![model(3, "THREE", 0), model(2, "TWO", 1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let page = repo.list(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 2);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_query_errors_pass_driver_message_through() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "function get_post_by_title(unknown) does not exist".to_owned(),
            )])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        match repo.get_posts_by_title("X").await.unwrap_err() {
            RepoError::Query(msg) => assert!(msg.contains("does not exist")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
