//! Domain types for the todo/goals example.
//!
//! Both lists are stored as shared slices. A reducer that has nothing to do
//! for an action hands back the same allocation, so "unchanged" can be
//! checked with [`Arc::ptr_eq`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, unique within the list
    pub id: u64,
    /// What needs doing
    pub name: String,
    /// Whether it is done
    pub complete: bool,
}

impl Todo {
    /// Creates a new todo
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, complete: bool) -> Self {
        Self {
            id,
            name: name.into(),
            complete,
        }
    }

    /// A copy of this todo with `complete` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            complete: !self.complete,
            ..self.clone()
        }
    }
}

/// A single goal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Identifier, unique within the list
    pub id: u64,
    /// What to achieve
    pub name: String,
}

impl Goal {
    /// Creates a new goal
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Combined application state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todo list, in insertion order
    pub todos: Arc<[Todo]>,
    /// Goal list, in insertion order
    pub goals: Arc<[Goal]>,
}

impl AppState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self {
            todos: Arc::from(Vec::new()),
            goals: Arc::from(Vec::new()),
        }
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn todo(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Returns a goal by ID
    #[must_use]
    pub fn goal(&self, id: u64) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.complete).count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that can happen to the app state
///
/// On the wire each action is a JSON object whose `type` field names the
/// variant, e.g. `{"type":"REMOVE_TODO","id":1}`. Any unrecognised `type`
/// decodes to [`AppAction::Unknown`], which no reducer reacts to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppAction {
    /// Append a todo
    AddTodo {
        /// The todo to append
        todo: Todo,
    },

    /// Remove every todo with this id
    RemoveTodo {
        /// Todo to remove
        id: u64,
    },

    /// Flip `complete` on every todo with this id
    ToggleTodo {
        /// Todo to toggle
        id: u64,
    },

    /// Append a goal
    AddGoal {
        /// The goal to append
        goal: Goal,
    },

    /// Remove every goal with this id
    RemoveGoal {
        /// Goal to remove
        id: u64,
    },

    /// An action type this app does not know
    #[serde(other)]
    Unknown,
}
