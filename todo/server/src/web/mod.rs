use axum::{Json, Router, routing::get};
use std::sync::Arc;
use todo_core::{
    ApiErrorBody, CreateTodo, ErrorKind, HealthResponse, MessageResponse, TodoItem, UpdateTodo,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::todo::{TodoState, TodoStore, api::v1};

pub mod api;

/// OpenAPI document for the todo store.
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_handler,
        v1::list_todos_handler,
        v1::get_todo_handler,
        v1::create_todo_handler,
        v1::update_todo_handler,
        v1::toggle_todo_handler,
        v1::delete_todo_handler,
    ),
    components(schemas(
        TodoItem,
        CreateTodo,
        UpdateTodo,
        ApiErrorBody,
        ErrorKind,
        MessageResponse,
        HealthResponse
    )),
    tags(
        (name = "Todos", description = "In-memory todo store"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// Builds the full application router around the given store.
pub fn create_app(store: TodoStore) -> Router {
    let todo_state = Arc::new(TodoState { store });

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(api::create_api_router(todo_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Todo store API running on http://{}", server_address);

    let app = create_app(TodoStore::seeded());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
