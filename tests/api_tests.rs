//! API integration tests
//!
//! Requests go through the full router (CORS, tracing, extractors, error
//! mapping) backed by the in-memory book store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, repository::MemoryBooksRepository, AppConfig, AppState};

fn app() -> Router {
    let state = AppState::new(&AppConfig::default(), Arc::new(MemoryBooksRepository::new()));
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

async fn create(app: &Router, title: &str, author: &str, isbn: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": title, "author": author, "isbn": isbn })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();

    let book = create(&app, "Dune", "Herbert", "111").await;
    assert_eq!(book, json!({ "id": 1, "title": "Dune", "author": "Herbert", "isbn": "111" }));

    let (status, body) = send(&app, Method::GET, "/api/books?filter=Dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["pagination"]["totalBooks"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/books/1",
        Some(json!({ "title": "Dune Messiah", "author": "Herbert", "isbn": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune Messiah");

    let (status, body) = send(&app, Method::GET, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune Messiah");

    let (status, body) = send(&app, Method::DELETE, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalBooks"], 0);
}

#[tokio::test]
async fn test_list_empty_catalog() {
    let (status, body) = send(&app(), Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "books": [],
            "pagination": { "currentPage": 1, "totalPages": 0, "totalBooks": 0, "perPage": 10 }
        })
    );
}

#[tokio::test]
async fn test_list_pagination_and_filter() {
    let app = app();
    for i in 1..=12 {
        create(&app, &format!("Volume {}", i), "Series Author", &format!("isbn-{:02}", i)).await;
    }
    create(&app, "Standalone", "Someone Else", "solo").await;

    let (_, body) = send(&app, Method::GET, "/api/books?page=2&limit=5", None).await;
    let ids: Vec<i64> = body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 2, "totalPages": 3, "totalBooks": 13, "perPage": 5 })
    );

    let uri = "/api/books?filter=series%20author&limit=10";
    let (_, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(body["pagination"]["totalBooks"], 12);
    assert_eq!(body["books"].as_array().unwrap().len(), 10);

    let (_, body) = send(&app, Method::GET, "/api/books?filter=isbn-1", None).await;
    assert_eq!(body["pagination"]["totalBooks"], 3);

    // Out-of-range page: empty slice, totals unchanged
    let (status, body) = send(&app, Method::GET, "/api/books?page=40", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["totalBooks"], 13);
    assert_eq!(body["pagination"]["currentPage"], 40);
}

#[tokio::test]
async fn test_list_repeated_paging_parameter_uses_defaults() {
    let app = app();
    for i in 1..=12 {
        create(&app, &format!("Book {}", i), "Author", &format!("{}", i)).await;
    }

    let uri = "/api/books?page=1&page=2&limit=5&limit=6";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 1, "totalPages": 2, "totalBooks": 12, "perPage": 10 })
    );
    assert_eq!(body["books"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_create_missing_fields() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/books", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Dune", "author": "", "isbn": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(body["pagination"]["totalBooks"], 0);
}

#[tokio::test]
async fn test_create_rejects_unknown_fields() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Dune", "author": "Herbert", "isbn": "111", "year": 1965 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_duplicate_isbn() {
    let app = app();
    create(&app, "Dune", "Herbert", "111").await;
    let other = create(&app, "Neuromancer", "Gibson", "222").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Dune again", "author": "Herbert", "isbn": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", other["id"]),
        Some(json!({ "title": "Neuromancer", "author": "Gibson", "isbn": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, "/api/books?filter=111", None).await;
    assert_eq!(body["pagination"]["totalBooks"], 1);
    assert_eq!(body["books"][0]["title"], "Dune");
}

#[tokio::test]
async fn test_update_errors() {
    let app = app();
    create(&app, "Dune", "Herbert", "111").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/books/42",
        Some(json!({ "title": "Updated Title", "author": "Updated Author", "isbn": "0987654321" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let body = Some(json!({ "title": "Only" }));
    let (status, body) = send(&app, Method::PUT, "/api/books/1", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/books/abc",
        Some(json!({ "title": "Dune", "author": "Herbert", "isbn": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = app();
    create(&app, "Dune", "Herbert", "111").await;

    let (status, _) = send(&app, Method::DELETE, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_ids_are_fresh() {
    let app = app();
    let a = create(&app, "A", "X", "1").await;
    let b = create(&app, "B", "X", "2").await;
    send(&app, Method::DELETE, &format!("/api/books/{}", b["id"]), None).await;
    let c = create(&app, "C", "X", "3").await;

    assert_ne!(a["id"], b["id"]);
    assert_ne!(c["id"], a["id"]);
    assert_ne!(c["id"], b["id"]);
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/books")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
