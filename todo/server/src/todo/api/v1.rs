use crate::todo::{TodoState, TodoStoreError};
use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use std::sync::Arc;
use todo_core::{
    ApiErrorBody, CreateTodo, ErrorKind, MessageResponse, TodoItem, UpdateTodo,
};

/// Error type for the todo JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `{id}` path segment is not an unsigned integer.
    #[error("Invalid ID")]
    InvalidId,
    /// The request body could not be deserialized.
    #[error("{0}")]
    InvalidBody(String),
    /// The store has no item with the requested ID.
    #[error("Todo not found")]
    NotFound(u32),
    /// The store cannot assign another ID.
    #[error("Todo store is full")]
    StoreFull,
}

impl From<TodoStoreError> for ApiError {
    fn from(error: TodoStoreError) -> Self {
        match error {
            TodoStoreError::NotFound(id) => ApiError::NotFound(id),
            TodoStoreError::IdsExhausted => ApiError::StoreFull,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidId | ApiError::InvalidBody(_) => ErrorKind::BadRequest,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::StoreFull => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("Rejecting todo request: {:?}", self);
        (status, Json(ApiErrorBody::new(self.kind(), self.to_string()))).into_response()
    }
}

fn parse_id(raw: &str) -> Result<u32, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// Handler for GET /api/v1/todos - Returns all todos in insertion order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = [TodoItem])
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(State(state): State<Arc<TodoState>>) -> Json<Vec<TodoItem>> {
    Json(state.store.list().await)
}

/// Handler for GET /api/v1/todos/{id} - Returns a single todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = u32, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "Successfully retrieved todo", body = TodoItem),
        (status = 400, description = "ID is not an integer", body = ApiErrorBody),
        (status = 404, description = "Todo not found", body = ApiErrorBody)
    ),
    tag = "Todos"
)]
pub async fn get_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.get(id).await?))
}

/// Handler for POST /api/v1/todos - Creates a todo.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodo,
    responses(
        (status = 201, description = "Todo created", body = TodoItem),
        (status = 400, description = "Malformed request body", body = ApiErrorBody),
        (status = 500, description = "No todo IDs left", body = ApiErrorBody)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let Json(request) = payload?;
    let todo = state.store.create(request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for PUT /api/v1/todos/{id} - Replaces the editable fields of a todo.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = u32, Path, description = "ID of the todo")),
    request_body = UpdateTodo,
    responses(
        (status = 200, description = "Todo updated", body = TodoItem),
        (status = 400, description = "Malformed ID or request body", body = ApiErrorBody),
        (status = 404, description = "Todo not found", body = ApiErrorBody)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    Ok(Json(state.store.update(id, request).await?))
}

/// Handler for PUT /api/v1/todos/{id}/toggle - Flips the completed flag.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}/toggle",
    params(("id" = u32, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "Todo toggled", body = TodoItem),
        (status = 400, description = "ID is not an integer", body = ApiErrorBody),
        (status = 404, description = "Todo not found", body = ApiErrorBody)
    ),
    tag = "Todos"
)]
pub async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.toggle(id).await?))
}

/// Handler for DELETE /api/v1/todos/{id} - Removes a todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = u32, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 400, description = "ID is not an integer", body = ApiErrorBody),
        (status = 404, description = "Todo not found", body = ApiErrorBody)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}

/// Creates and returns the todos API router.
pub fn create_api_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .route("/todos/{id}/toggle", put(toggle_todo_handler))
        .with_state(state)
}
