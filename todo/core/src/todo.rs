use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority assigned to a new item when the request leaves it empty.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Priority labels offered by the frontend. The API accepts any label.
pub const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

/// A single todo item as stored by the API and rendered by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TodoItem {
    /// Unique identifier, assigned by the store and never reused
    pub id: u32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: String,
    /// Set once when the item is created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an item. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    /// Falls back to `"medium"` when empty
    pub priority: String,
    pub completed: bool,
}

impl CreateTodo {
    /// Returns the requested priority, or the default one when it is empty.
    pub fn priority_or_default(&self) -> &str {
        if self.priority.is_empty() {
            DEFAULT_PRIORITY
        } else {
            &self.priority
        }
    }
}

/// Request body for a full update. Omitted fields are replaced by their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct UpdateTodo {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub completed: bool,
}
