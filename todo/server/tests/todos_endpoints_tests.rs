use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use insta::assert_yaml_snapshot;
use serde_json::{Value, json};
use todo_server::todo::TodoStore;
use todo_server::web::create_app;
use tower::ServiceExt;

/// Sends a request through the router and decodes the JSON response body.
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn can_check_health_endpoint() {
    let app = create_app(TodoStore::new());

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn can_list_seeded_todos() {
    let app = create_app(TodoStore::seeded());

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/todos")).await;

    assert_eq!(status, StatusCode::OK);
    let todos = body.as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["id"], 1);
    assert_eq!(todos[0]["title"], "Welcome to Todo App");
}

#[tokio::test]
async fn can_list_empty_store() {
    let app = create_app(TodoStore::new());

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/todos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn can_walk_through_todo_lifecycle() {
    let app = create_app(TodoStore::seeded());

    let (status, created) = send(
        &app,
        json_request(Method::POST, "/api/v1/todos", json!({ "title": "Buy milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 2);
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["priority"], "medium");
    assert_eq!(created["completed"], false);

    let (status, fetched) = send(&app, empty_request(Method::GET, "/api/v1/todos/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, toggled) = send(&app, empty_request(Method::PUT, "/api/v1/todos/2/toggle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["created_at"], created["created_at"]);

    let (status, deleted) = send(&app, empty_request(Method::DELETE, "/api/v1/todos/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "message": "Todo deleted successfully" }));

    let (status, _) = send(&app, empty_request(Method::GET, "/api/v1/todos/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_update_todo_with_full_body() {
    let app = create_app(TodoStore::seeded());

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/todos/1",
            json!({
                "title": "Read the manual",
                "description": "Cover to cover",
                "priority": "low",
                "completed": true
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["title"], "Read the manual");
    assert_eq!(updated["description"], "Cover to cover");
    assert_eq!(updated["priority"], "low");
    assert_eq!(updated["completed"], true);
}

#[tokio::test]
async fn can_return_not_found_for_unknown_id() {
    let app = create_app(TodoStore::new());

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/todos/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_yaml_snapshot!(body, @r"
    kind: NOT_FOUND
    message: Todo not found
    ");
}

#[tokio::test]
async fn can_reject_non_numeric_id_on_every_route() {
    let app = create_app(TodoStore::seeded());

    let requests = [
        empty_request(Method::GET, "/api/v1/todos/abc"),
        empty_request(Method::PUT, "/api/v1/todos/abc/toggle"),
        empty_request(Method::DELETE, "/api/v1/todos/abc"),
        json_request(Method::PUT, "/api/v1/todos/abc", json!({ "title": "x" })),
    ];

    for request in requests {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "kind": "BAD_REQUEST", "message": "Invalid ID" }));
    }
}

#[tokio::test]
async fn can_reject_malformed_create_body() {
    let app = create_app(TodoStore::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/todos")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BAD_REQUEST");
}

#[tokio::test]
async fn can_reject_wrongly_typed_update_body() {
    let app = create_app(TodoStore::seeded());

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/v1/todos/1", json!({ "completed": "yes" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BAD_REQUEST");
}

#[tokio::test]
async fn can_return_not_found_when_toggling_deleted_todo() {
    let app = create_app(TodoStore::seeded());

    send(&app, empty_request(Method::DELETE, "/api/v1/todos/1")).await;
    let (status, body) = send(&app, empty_request(Method::PUT, "/api/v1/todos/1/toggle")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn can_allow_any_origin() {
    let app = create_app(TodoStore::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/todos")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin"),
        Some(&axum::http::HeaderValue::from_static("*"))
    );
}
