//! Wire contract shared by the todo store API and the SSR frontend.
//!
//! Both processes serialize the same types, so the JSON shape of a todo item,
//! its request bodies and the API's error bodies are defined exactly once.

mod error;
mod todo;

pub use error::{ApiErrorBody, ErrorKind, HealthResponse, MessageResponse};
pub use todo::{CreateTodo, DEFAULT_PRIORITY, PRIORITIES, TodoItem, UpdateTodo};
