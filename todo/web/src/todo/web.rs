use askama::Template;
use axum::{
    Form, Router,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    response::{Html, Redirect},
    routing::{get, post},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::sync::Arc;
use todo_core::{CreateTodo, DEFAULT_PRIORITY, PRIORITIES, UpdateTodo};

use crate::client::ApiClientError;
use crate::todo::TodoState;
use crate::todo::view::TodoListView;
use crate::web::WebError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    filter: Option<String>,
    success: Option<String>,
    error: Option<String>,
}

/// Query string of the form actions, carrying the filter to return to.
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoForm {
    title: String,
    description: String,
    priority: String,
    /// Only sent by clients that want to set the flag explicitly
    completed: Option<bool>,
}

impl TodoForm {
    fn title(&self) -> Result<String, TodoActionError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TodoActionError::MissingTitle);
        }
        Ok(title.to_string())
    }

    fn priority(&self) -> String {
        if self.priority.is_empty() {
            DEFAULT_PRIORITY.to_string()
        } else {
            self.priority.clone()
        }
    }
}

/// Custom error type for todo form actions. Every variant ends up as a redirect.
#[derive(Debug, thiserror::Error)]
enum TodoActionError {
    #[error("Invalid form data")]
    InvalidForm(#[from] FormRejection),
    #[error("Invalid todo ID")]
    InvalidId,
    #[error("Title is required")]
    MissingTitle,
    /// The todo API call failed; the message is what the user sees.
    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: ApiClientError,
    },
}

fn upstream(message: &'static str) -> impl FnOnce(ApiClientError) -> TodoActionError {
    move |source| TodoActionError::Upstream { message, source }
}

fn parse_id(raw: &str) -> Result<u32, TodoActionError> {
    raw.parse().map_err(|_| TodoActionError::InvalidId)
}

/// Unparseable query strings, e.g. with a repeated key, count as empty ones.
fn query_or_default<T: Default>(query: Result<Query<T>, QueryRejection>) -> T {
    match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!("Ignoring query string: {}", rejection.body_text());
            T::default()
        }
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Builds the list page URL with an optional flash message and the filter to keep.
fn list_location(flash: Option<(&str, &str)>, filter: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some((key, message)) = flash {
        params.push(format!("{}={}", key, encode(message)));
    }
    if let Some(filter) = filter.filter(|filter| !filter.is_empty()) {
        params.push(format!("filter={}", encode(filter)));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Turns the outcome of a form action into a redirect back to the list page.
fn redirect_to_list(
    outcome: Result<Option<&'static str>, TodoActionError>,
    filter: Option<&str>,
) -> Redirect {
    let location = match outcome {
        Ok(success) => list_location(success.map(|message| ("success", message)), filter),
        Err(err) => {
            match &err {
                TodoActionError::Upstream { source, .. } => {
                    tracing::error!("{}: {}", err, source)
                }
                _ => tracing::warn!("Rejected todo form: {}", err),
            }
            let message = err.to_string();
            list_location(Some(("error", &message)), filter)
        }
    };
    Redirect::to(&location)
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    view: TodoListView,
    priorities: &'static [&'static str],
}

impl IndexTemplate {
    pub fn new(view: TodoListView) -> Self {
        Self {
            view,
            priorities: &PRIORITIES,
        }
    }

    /// CSS class of a filter link.
    fn filter_class(&self, filter: &str) -> &'static str {
        if self.view.selected.as_str() == filter {
            "active"
        } else {
            ""
        }
    }

    fn selected_attr(&self, current: &str, option: &str) -> &'static str {
        if current == option { "selected" } else { "" }
    }
}

/// Handler for the list page.
#[tracing::instrument(skip(state))]
async fn index_handler(
    State(state): State<Arc<TodoState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Html<String>, WebError> {
    let query = query_or_default(query);
    let filter = query.filter.as_deref();
    let view = match state.api.list_todos().await {
        Ok(todos) => TodoListView::build(todos, filter).with_messages(query.success, query.error),
        Err(err) => {
            tracing::error!("Failed to load todos: {}", err);
            TodoListView::unavailable(filter, format!("Failed to load todos: {}", err))
        }
    };

    let template = IndexTemplate::new(view);
    template.render().map(Html).map_err(WebError::from)
}

async fn create_todo(
    state: &TodoState,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Result<Option<&'static str>, TodoActionError> {
    let Form(form) = form?;
    let request = CreateTodo {
        title: form.title()?,
        description: form.description.trim().to_string(),
        priority: form.priority(),
        completed: false,
    };

    state
        .api
        .create_todo(request)
        .await
        .map_err(upstream("Failed to create todo"))?;
    Ok(Some("Todo created successfully"))
}

/// Handler for creating a todo via POST request.
#[tracing::instrument(skip(state, form))]
async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    query: Result<Query<ActionQuery>, QueryRejection>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Redirect {
    let query = query_or_default(query);
    let outcome = create_todo(&state, form).await;
    redirect_to_list(outcome, query.filter.as_deref())
}

async fn toggle_todo(state: &TodoState, id: &str) -> Result<Option<&'static str>, TodoActionError> {
    let id = parse_id(id)?;
    state
        .api
        .toggle_todo(id)
        .await
        .map_err(upstream("Failed to toggle todo"))?;
    Ok(None)
}

/// Handler for toggling a todo via POST request.
#[tracing::instrument(skip(state))]
async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Redirect {
    let query = query_or_default(query);
    let outcome = toggle_todo(&state, &id).await;
    redirect_to_list(outcome, query.filter.as_deref())
}

async fn update_todo(
    state: &TodoState,
    id: &str,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Result<Option<&'static str>, TodoActionError> {
    let id = parse_id(id)?;
    let Form(form) = form?;
    let title = form.title()?;

    // The edit form has no checkbox; keep whatever the store has.
    let completed = match form.completed {
        Some(completed) => completed,
        None => {
            state
                .api
                .get_todo(id)
                .await
                .map_err(upstream("Failed to update todo"))?
                .completed
        }
    };

    let request = UpdateTodo {
        title,
        description: form.description.trim().to_string(),
        priority: form.priority(),
        completed,
    };
    state
        .api
        .update_todo(id, request)
        .await
        .map_err(upstream("Failed to update todo"))?;
    Ok(Some("Todo updated successfully"))
}

/// Handler for updating a todo via POST request.
#[tracing::instrument(skip(state, form))]
async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    query: Result<Query<ActionQuery>, QueryRejection>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Redirect {
    let query = query_or_default(query);
    let outcome = update_todo(&state, &id, form).await;
    redirect_to_list(outcome, query.filter.as_deref())
}

async fn delete_todo(state: &TodoState, id: &str) -> Result<Option<&'static str>, TodoActionError> {
    let id = parse_id(id)?;
    state
        .api
        .delete_todo(id)
        .await
        .map_err(upstream("Failed to delete todo"))?;
    Ok(Some("Todo deleted successfully"))
}

/// Handler for deleting a todo via POST request.
#[tracing::instrument(skip(state))]
async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Redirect {
    let query = query_or_default(query);
    let outcome = delete_todo(&state, &id).await;
    redirect_to_list(outcome, query.filter.as_deref())
}

/// Creates and returns the todo router with the list page and all form actions.
pub fn create_todo_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/todos", post(create_todo_handler))
        .route("/todos/{id}/toggle", post(toggle_todo_handler))
        .route("/todos/{id}/update", post(update_todo_handler))
        .route("/todos/{id}/delete", post(delete_todo_handler))
        .with_state(state)
}
