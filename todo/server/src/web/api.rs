use std::sync::Arc;

use crate::todo::TodoState;

use axum::Router;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(todo_state: Arc<TodoState>) -> axum::Router {
    let todos_router = crate::todo::api::v1::create_api_router(todo_state);
    Router::new().nest("/api/v1", todos_router)
}
