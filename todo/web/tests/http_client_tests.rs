use serde_json::{Value, json};
use std::time::Duration;
use todo_core::{CreateTodo, UpdateTodo};
use todo_web::client::{ApiClientError, HttpTodoApi, TodoApi};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn todo_json(id: u32, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "completed": completed,
        "priority": "medium",
        "created_at": "2025-01-01T10:00:00Z",
        "updated_at": "2025-01-01T10:00:00Z"
    })
}

fn client_for(server: &MockServer) -> HttpTodoApi {
    HttpTodoApi::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn can_list_todos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            todo_json(1, "Buy milk", false),
            todo_json(2, "Walk the dog", true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let todos = client_for(&server).list_todos().await.unwrap();

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].title, "Buy milk");
    assert!(todos[1].completed);
}

#[tokio::test]
async fn can_create_todo_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/todos"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": "",
            "priority": "medium",
            "completed": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(todo_json(3, "Buy milk", false)))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_todo(CreateTodo {
            title: "Buy milk".to_string(),
            priority: "medium".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, 3);
}

#[tokio::test]
async fn can_update_and_toggle_todo() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/todos/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(3, "Buy oat milk", false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/todos/3/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(3, "Buy oat milk", true)))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let updated = client
        .update_todo(
            3,
            UpdateTodo {
                title: "Buy oat milk".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let toggled = client.toggle_todo(3).await.unwrap();

    assert_eq!(updated.title, "Buy oat milk");
    assert!(toggled.completed);
}

#[tokio::test]
async fn can_accept_no_content_on_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/todos/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).delete_todo(3).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn can_surface_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/todos/9"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "kind": "NOT_FOUND", "message": "Todo not found" })),
        )
        .mount(&server)
        .await;

    let error = client_for(&server).get_todo(9).await.unwrap_err();

    match error {
        ApiClientError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Todo not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn can_report_undecodable_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client_for(&server).list_todos().await.unwrap_err();

    assert!(matches!(error, ApiClientError::Decode(_)));
}

#[tokio::test]
async fn can_report_unreachable_api() {
    let client = HttpTodoApi::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    let error = client.list_todos().await.unwrap_err();

    assert!(matches!(error, ApiClientError::Request(_)));
}
