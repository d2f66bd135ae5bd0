//! Post handlers over the query gateway.

use actix_web::{HttpResponse, web};

use quill_core::domain::{NewPost, PageRequest, PostId};
use quill_core::error::DomainError;
use quill_shared::dto::{
    CreatePostRequest, ListQuery, PostListResponse, PostResponse, SearchQuery, TitleQuery,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_responses(posts: Vec<quill_core::domain::Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let new_post = NewPost::from(body.into_inner());
    new_post.validate()?;

    let post = state.posts.create(new_post).await?;
    tracing::info!(post_id = post.id, "Post created");

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// GET /api/posts?page=&per_page=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list(PageRequest::from(query.into_inner())).await?;
    Ok(HttpResponse::Ok().json(PostListResponse::from(page)))
}

/// GET /api/posts/{id}
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "Post",
            id,
        })?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// GET /api/posts/by-title?title=
///
/// Exact match on the stored, uppercased title.
pub async fn get_by_title(
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.get_posts_by_title(&query.title).await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// GET /api/posts/search?keyword=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search_posts_by_title(&query.keyword).await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    macro_rules! create_post {
        ($app:expr, $title:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .set_json(json!({ "title": $title, "content": "x" }))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            body
        }};
    }

    #[actix_web::test]
    async fn create_returns_uppercased_title() {
        let app = app!(AppState::in_memory());

        let body = create_post!(app, "hello world");
        assert_eq!(body["title"], "HELLO WORLD");
        assert_eq!(body["content"], "x");
        assert!(body["id"].is_number());
        assert!(body["createdAt"].is_string());
    }

    #[actix_web::test]
    async fn by_title_matches_only_the_stored_form() {
        let app = app!(AppState::in_memory());
        create_post!(app, "hello world");

        let req = test::TestRequest::get()
            .uri("/api/posts/by-title?title=HELLO%20WORLD")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);

        let req = test::TestRequest::get()
            .uri("/api/posts/by-title?title=hello%20world")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn search_lists_newest_first() {
        let app = app!(AppState::in_memory());
        create_post!(app, "ALPHA");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        create_post!(app, "BETA");

        let req = test::TestRequest::get()
            .uri("/api/posts/search?keyword=A")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<_> = body.iter().map(|p| p["title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["BETA", "ALPHA"]);

        let req = test::TestRequest::get()
            .uri("/api/posts/search?keyword=zzz")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Vec<Value> = test::read_body_json(resp).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn get_by_id_and_missing_id() {
        let app = app!(AppState::in_memory());
        let created = create_post!(app, "one");
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "ONE");

        let req = test::TestRequest::get().uri("/api/posts/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
    }

    #[actix_web::test]
    async fn blank_title_is_rejected() {
        let app = app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "  ", "content": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_is_paginated() {
        let app = app!(AppState::in_memory());
        for title in ["a", "b", "c"] {
            create_post!(app, title);
        }

        let req = test::TestRequest::get()
            .uri("/api/posts?page=1&per_page=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn list_accepts_limit_and_huge_pages() {
        let app = app!(AppState::in_memory());
        for title in ["a", "b", "c"] {
            create_post!(app, title);
        }

        let req = test::TestRequest::get()
            .uri("/api/posts?page=2&limit=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["limit"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?page={}&per_page=100", u64::MAX))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 3);
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
