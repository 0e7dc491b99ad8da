//! Todo and goal lists driven by a unistore `Store`.
//!
//! This example shows:
//!
//! - One reducer per slice of state (`TodosReducer`, `GoalsReducer`)
//! - A root reducer that combines them (`AppReducer`)
//! - Actions as a tagged enum with a JSON wire shape
//! - A listener that prints every new state
//!
//! # Quick Start
//!
//! ```
//! use todo_goals::{AppAction, AppReducer, Todo};
//! use unistore_runtime::Store;
//!
//! let store = Store::new(AppReducer::new());
//!
//! let observer = store.clone();
//! let subscription = store.subscribe(move || {
//!     println!("{} todos", observer.state(|s| s.todos.len()));
//! });
//!
//! store.dispatch(AppAction::AddTodo { todo: Todo::new(0, "Walk the dog", false) }).unwrap();
//! store.dispatch(AppAction::ToggleTodo { id: 0 }).unwrap();
//!
//! assert_eq!(store.state(|s| s.completed_count()), 1);
//! subscription.unsubscribe();
//! ```

pub mod reducer;
pub mod script;
pub mod types;

// Re-export commonly used types
pub use reducer::{AppReducer, GoalsReducer, TodosReducer};
pub use script::{ScriptError, demo_actions, load_script, parse_script};
pub use types::{AppAction, AppState, Goal, Todo};
