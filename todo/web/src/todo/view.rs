use todo_core::TodoItem;

/// Which todos the list page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Parses the `filter` query value. Anything unrecognized shows all todos.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            _ => Filter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(&self, todo: &TodoItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

/// Per-request data behind the list page, derived from one fetch of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListView {
    /// Todos matching the selected filter, in store order
    pub todos: Vec<TodoItem>,
    /// The filter as requested, echoed back into links and form actions
    pub filter: String,
    pub selected: Filter,
    pub total_count: usize,
    pub completed_count: usize,
    pub active_count: usize,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl TodoListView {
    /// Computes counts and the filtered subset from the full list of todos.
    pub fn build(todos: Vec<TodoItem>, filter: Option<&str>) -> Self {
        let filter = match filter {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => Filter::All.as_str().to_string(),
        };
        let selected = Filter::parse(&filter);

        let total_count = todos.len();
        let completed_count = todos.iter().filter(|todo| todo.completed).count();
        let todos = todos
            .into_iter()
            .filter(|todo| selected.matches(todo))
            .collect();

        Self {
            todos,
            filter,
            selected,
            total_count,
            completed_count,
            active_count: total_count - completed_count,
            success: None,
            error: None,
        }
    }

    /// A page with no todos that only shows an error, used when the store is unreachable.
    pub fn unavailable(filter: Option<&str>, error: String) -> Self {
        Self::build(Vec::new(), filter).with_messages(None, Some(error))
    }

    /// Attaches flash messages, ignoring empty ones.
    pub fn with_messages(mut self, success: Option<String>, error: Option<String>) -> Self {
        self.success = success.filter(|message| !message.is_empty());
        self.error = error.filter(|message| !message.is_empty());
        self
    }
}
