//! Action scripts: JSON lines, one action per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! {"type":"ADD_TODO","todo":{"id":0,"name":"Walk the dog","complete":false}}
//! {"type":"TOGGLE_TODO","id":0}
//! ```

use crate::types::{AppAction, Goal, Todo};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading an action script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be read
    #[error("Failed to read action script {}: {source}", .path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line is not a valid action
    #[error("Invalid action on line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Parse actions from JSON lines.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] for the first line that is not a valid
/// action object.
pub fn parse_script(input: &str) -> Result<Vec<AppAction>, ScriptError> {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| ScriptError::Parse { line, source })
        })
        .collect()
}

/// Read and parse an action script from disk.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] if the file cannot be read and
/// [`ScriptError::Parse`] if a line is not a valid action.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<AppAction>, ScriptError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let actions = parse_script(&input)?;
    tracing::debug!(path = %path.display(), count = actions.len(), "Loaded action script");
    Ok(actions)
}

/// The built-in demo sequence.
///
/// Adds three todos, removes the second, toggles the first, adds two goals
/// and removes the first goal.
#[must_use]
pub fn demo_actions() -> Vec<AppAction> {
    vec![
        AppAction::AddTodo {
            todo: Todo::new(0, "Walk the dog", false),
        },
        AppAction::AddTodo {
            todo: Todo::new(1, "Wash the car", false),
        },
        AppAction::AddTodo {
            todo: Todo::new(2, "Go to the gym", true),
        },
        AppAction::RemoveTodo { id: 1 },
        AppAction::ToggleTodo { id: 0 },
        AppAction::AddGoal {
            goal: Goal::new(0, "Learn Redux"),
        },
        AppAction::AddGoal {
            goal: Goal::new(1, "Lose 20 pounds"),
        },
        AppAction::RemoveGoal { id: 0 },
    ]
}
