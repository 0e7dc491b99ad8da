//! Reducer logic for the todo/goals example.
//!
//! Each list has its own reducer that sees every action and ignores the ones
//! that are not about it. [`AppReducer`] runs both and assembles the result.

use crate::types::{AppAction, AppState, Goal, Todo};
use std::convert::Infallible;
use std::sync::Arc;
use unistore_core::reducer::Reducer;

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = Arc<[Todo]>;
    type Action = AppAction;
    type Error = Infallible;

    fn initial_state(&self) -> Self::State {
        Arc::from(Vec::new())
    }

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, Self::Error> {
        let next: Self::State = match action {
            AppAction::AddTodo { todo } => state.iter().cloned().chain([todo.clone()]).collect(),
            AppAction::RemoveTodo { id } => {
                state.iter().filter(|todo| todo.id != *id).cloned().collect()
            },
            AppAction::ToggleTodo { id } => state
                .iter()
                .map(|todo| if todo.id == *id { todo.toggled() } else { todo.clone() })
                .collect(),
            AppAction::AddGoal { .. } | AppAction::RemoveGoal { .. } | AppAction::Unknown => {
                Arc::clone(state)
            },
        };
        Ok(next)
    }
}

/// Reducer for the goal list
#[derive(Clone, Copy, Debug, Default)]
pub struct GoalsReducer;

impl Reducer for GoalsReducer {
    type State = Arc<[Goal]>;
    type Action = AppAction;
    type Error = Infallible;

    fn initial_state(&self) -> Self::State {
        Arc::from(Vec::new())
    }

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, Self::Error> {
        let next: Self::State = match action {
            AppAction::AddGoal { goal } => state.iter().cloned().chain([goal.clone()]).collect(),
            AppAction::RemoveGoal { id } => {
                state.iter().filter(|goal| goal.id != *id).cloned().collect()
            },
            AppAction::AddTodo { .. }
            | AppAction::RemoveTodo { .. }
            | AppAction::ToggleTodo { .. }
            | AppAction::Unknown => Arc::clone(state),
        };
        Ok(next)
    }
}

/// Root reducer: `{ todos: todos(state.todos, action), goals: goals(state.goals, action) }`
#[derive(Clone, Copy, Debug, Default)]
pub struct AppReducer {
    todos: TodosReducer,
    goals: GoalsReducer,
}

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: TodosReducer,
            goals: GoalsReducer,
        }
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Error = Infallible;

    fn initial_state(&self) -> Self::State {
        AppState {
            todos: self.todos.initial_state(),
            goals: self.goals.initial_state(),
        }
    }

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, Self::Error> {
        Ok(AppState {
            todos: self.todos.reduce(&state.todos, action)?,
            goals: self.goals.reduce(&state.goals, action)?,
        })
    }
}
