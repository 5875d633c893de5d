//! Client for the todo store API.
//!
//! The frontend never owns todo items; every page render and form submission goes
//! through [`TodoApi`]. [`HttpTodoApi`] is the production implementation.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use todo_core::{ApiErrorBody, CreateTodo, TodoItem, UpdateTodo};

/// Error type for calls to the todo store API.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request could not be sent or timed out.
    #[error("request to todo API failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The API answered with an unexpected status.
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body was not the expected JSON.
    #[error("could not decode todo API response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Operations of the todo store API used by the frontend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Fetches every todo in store order.
    async fn list_todos(&self) -> Result<Vec<TodoItem>, ApiClientError>;

    async fn get_todo(&self, id: u32) -> Result<TodoItem, ApiClientError>;

    async fn create_todo(&self, request: CreateTodo) -> Result<TodoItem, ApiClientError>;

    /// Replaces the editable fields of a todo.
    async fn update_todo(&self, id: u32, request: UpdateTodo) -> Result<TodoItem, ApiClientError>;

    async fn toggle_todo(&self, id: u32) -> Result<TodoItem, ApiClientError>;

    async fn delete_todo(&self, id: u32) -> Result<(), ApiClientError>;
}

/// [`TodoApi`] over HTTP+JSON.
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Creates a client for the API at `api_url` (without the `/api/v1` prefix).
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiClientError::Request)?;
        Ok(Self {
            client,
            base_url: format!("{}/api/v1", api_url.trim_end_matches('/')),
        })
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: u32) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    /// Passes the response through when its status is one of `accepted`.
    async fn expect_status(
        response: Response,
        accepted: &[StatusCode],
    ) -> Result<Response, ApiClientError> {
        let status = response.status();
        if accepted.contains(&status) {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(error_body) => error_body.message,
            Err(_) => body,
        };
        Err(ApiClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_for_todo(
        request: reqwest::RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<TodoItem, ApiClientError> {
        let response = request.send().await.map_err(ApiClientError::Request)?;
        Self::expect_status(response, accepted)
            .await?
            .json::<TodoItem>()
            .await
            .map_err(ApiClientError::Decode)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    #[tracing::instrument(skip(self))]
    async fn list_todos(&self) -> Result<Vec<TodoItem>, ApiClientError> {
        let response = self
            .client
            .get(self.todos_url())
            .send()
            .await
            .map_err(ApiClientError::Request)?;
        Self::expect_status(response, &[StatusCode::OK])
            .await?
            .json::<Vec<TodoItem>>()
            .await
            .map_err(ApiClientError::Decode)
    }

    #[tracing::instrument(skip(self))]
    async fn get_todo(&self, id: u32) -> Result<TodoItem, ApiClientError> {
        Self::send_for_todo(self.client.get(self.todo_url(id)), &[StatusCode::OK]).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_todo(&self, request: CreateTodo) -> Result<TodoItem, ApiClientError> {
        Self::send_for_todo(
            self.client.post(self.todos_url()).json(&request),
            &[StatusCode::CREATED, StatusCode::OK],
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn update_todo(&self, id: u32, request: UpdateTodo) -> Result<TodoItem, ApiClientError> {
        Self::send_for_todo(
            self.client.put(self.todo_url(id)).json(&request),
            &[StatusCode::OK],
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_todo(&self, id: u32) -> Result<TodoItem, ApiClientError> {
        Self::send_for_todo(
            self.client.put(format!("{}/toggle", self.todo_url(id))),
            &[StatusCode::OK],
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_todo(&self, id: u32) -> Result<(), ApiClientError> {
        let response = self
            .client
            .delete(self.todo_url(id))
            .send()
            .await
            .map_err(ApiClientError::Request)?;
        Self::expect_status(response, &[StatusCode::OK, StatusCode::NO_CONTENT]).await?;
        Ok(())
    }
}
