use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use folio::application::articles::ArticleService;
use folio::cache::MemoryCacheStore;
use folio::infra::http::build_app;
use folio::infra::memory::InMemoryRepositories;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let service = ArticleService::new(
        Arc::new(InMemoryRepositories::new()),
        Arc::new(MemoryCacheStore::new()),
    );
    build_app(service)
}

fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn crud_round_trip() {
    let router = app();

    let (status, created) = send(
        &router,
        json_request(
            Method::POST,
            "/api/articles",
            Some(json!({"title": "T1", "body": "B1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = send(&router, json_request(Method::GET, "/api/articles", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/api/articles/{id}"),
            Some(json!({"title": "T2", "body": "B1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "T2");

    let (_, fetched) = send(
        &router,
        json_request(Method::GET, &format!("/api/articles/{id}"), None),
    )
    .await;
    assert_eq!(fetched["title"], "T2");

    let (status, _) = send(
        &router,
        json_request(Method::DELETE, &format!("/api/articles/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &router,
        json_request(Method::GET, &format!("/api/articles/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn validation_errors_list_fields() {
    let router = app();
    let long_title = "x".repeat(101);

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/articles",
            Some(json!({"title": long_title, "body": ""})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_failed");
    assert_eq!(
        body["error"]["fields"]["title"][0],
        "The title may not be greater than 100 characters."
    );
    assert_eq!(body["error"]["fields"]["body"][0], "The body field is required.");
}

#[tokio::test]
async fn delete_of_missing_article_is_not_found() {
    let router = app();

    let (status, body) = send(
        &router,
        json_request(Method::DELETE, "/api/articles/7", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "article not found");
}

#[tokio::test]
async fn non_numeric_id_is_a_json_bad_request() {
    let router = app();

    let (status, body) = send(
        &router,
        json_request(Method::GET, "/api/articles/abc", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["hint"].is_string());
}
