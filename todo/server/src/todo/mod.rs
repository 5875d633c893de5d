use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use todo_core::{CreateTodo, DEFAULT_PRIORITY, TodoItem, UpdateTodo};
use tokio::sync::RwLock;

pub mod api;

/// Error type for TodoStore operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TodoStoreError {
    /// Represents a todo not found error.
    #[error("Todo with ID {0} not found")]
    NotFound(u32),
    /// The ID counter reached `u32::MAX`, so no unused ID remains.
    #[error("No todo IDs left to assign")]
    IdsExhausted,
}

#[derive(Debug)]
struct TodoList {
    todos: Vec<TodoItem>,
    next_id: u32,
}

impl Default for TodoList {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }
}

impl TodoList {
    fn position(&self, id: u32) -> Result<usize, TodoStoreError> {
        self.todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(TodoStoreError::NotFound(id))
    }

    fn find_mut(&mut self, id: u32) -> Result<&mut TodoItem, TodoStoreError> {
        self.todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(TodoStoreError::NotFound(id))
    }

    fn insert(
        &mut self,
        title: String,
        description: String,
        priority: String,
        completed: bool,
    ) -> Result<TodoItem, TodoStoreError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(TodoStoreError::IdsExhausted)?;

        let now = Utc::now();
        let todo = TodoItem {
            id,
            title,
            description,
            completed,
            priority,
            created_at: now,
            updated_at: now,
        };
        self.todos.push(todo.clone());
        Ok(todo)
    }
}

/// Returns the current time, nudged past `previous` when the clock has not moved.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// In-memory collection of todo items.
///
/// Every clone shares the same collection. Reads and writes go through a single
/// lock, so mutations are applied one at a time in arrival order.
#[derive(Clone, Debug, Default)]
pub struct TodoStore {
    inner: Arc<RwLock<TodoList>>,
}

impl TodoStore {
    /// Creates an empty store whose first item will get ID 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the welcome item.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let welcome = TodoItem {
            id: 1,
            title: "Welcome to Todo App".to_string(),
            description: "This is your first todo item. You can edit, complete, or delete it."
                .to_string(),
            completed: false,
            priority: DEFAULT_PRIORITY.to_string(),
            created_at: now,
            updated_at: now,
        };
        let list = TodoList {
            todos: vec![welcome],
            next_id: 2,
        };
        Self {
            inner: Arc::new(RwLock::new(list)),
        }
    }

    /// Retrieves all todo items in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Vec<TodoItem> {
        self.inner.read().await.todos.clone()
    }

    /// Retrieves a todo item by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `TodoItem` if found, or `TodoStoreError::NotFound` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: u32) -> Result<TodoItem, TodoStoreError> {
        let list = self.inner.read().await;
        let index = list.position(id)?;
        Ok(list.todos[index].clone())
    }

    /// Creates a new todo item with the next free ID.
    ///
    /// An empty priority falls back to `"medium"`. Fails with
    /// `TodoStoreError::IdsExhausted` once the last ID has been used.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, request: CreateTodo) -> Result<TodoItem, TodoStoreError> {
        let priority = request.priority_or_default().to_string();
        let CreateTodo {
            title,
            description,
            completed,
            ..
        } = request;

        let todo = self
            .inner
            .write()
            .await
            .insert(title, description, priority, completed)?;
        tracing::info!("Created todo with ID {}", todo.id);
        Ok(todo)
    }

    /// Replaces the editable fields of a todo item.
    ///
    /// The ID and creation time are preserved; the update time always advances.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: u32,
        request: UpdateTodo,
    ) -> Result<TodoItem, TodoStoreError> {
        let mut list = self.inner.write().await;
        let todo = list.find_mut(id)?;
        todo.title = request.title;
        todo.description = request.description;
        todo.priority = request.priority;
        todo.completed = request.completed;
        todo.updated_at = advance(todo.updated_at);
        Ok(todo.clone())
    }

    /// Flips the completed flag of a todo item.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, id: u32) -> Result<TodoItem, TodoStoreError> {
        let mut list = self.inner.write().await;
        let todo = list.find_mut(id)?;
        todo.completed = !todo.completed;
        todo.updated_at = advance(todo.updated_at);
        Ok(todo.clone())
    }

    /// Removes a todo item, keeping the order of the remaining ones.
    ///
    /// # Returns
    ///
    /// A `Result` containing the removed `TodoItem`, or `TodoStoreError::NotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: u32) -> Result<TodoItem, TodoStoreError> {
        let mut list = self.inner.write().await;
        let index = list.position(id)?;
        let todo = list.todos.remove(index);
        tracing::info!("Deleted todo with ID {}", id);
        Ok(todo)
    }
}

/// State shared by the todo API handlers.
#[derive(Clone, Debug, Default)]
pub struct TodoState {
    pub store: TodoStore,
}
