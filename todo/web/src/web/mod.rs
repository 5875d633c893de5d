use axum::http::StatusCode;
use axum::response::Html;
use axum::{Json, Router, routing::get};
use std::sync::Arc;
use std::time::Duration;
use todo_core::HealthResponse;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::client::{HttpTodoApi, TodoApi};
use crate::config::Config;
use crate::todo::TodoState;
use crate::todo::web::create_todo_router;

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Failed to render page: {:?}", self);
        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response()
    }
}

/// Builds the frontend router on top of the given todo API client.
pub fn create_app(api: Arc<dyn TodoApi>, static_dir: &str) -> Router {
    let todo_state = Arc::new(TodoState { api });

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(create_todo_router(todo_state))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("SSR frontend running on http://{}", server_address);
    tracing::info!("Todo API URL: {}", config.api_url);

    let api = HttpTodoApi::new(
        &config.api_url,
        Duration::from_secs(config.api_timeout_secs),
    )?;
    let app = create_app(Arc::new(api), &config.static_dir);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
