//! Todo/goals demo binary
//!
//! Usage: `todo-goals [SCRIPT]`
//!
//! Dispatches the actions in `SCRIPT` (JSON lines), or the built-in demo
//! sequence when no script is given, printing the state after each one.

use anyhow::Context;
use std::path::PathBuf;
use todo_goals::{AppReducer, demo_actions, load_script};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unistore_runtime::metrics::MetricsRecorder;
use unistore_runtime::{Store, StoreConfig};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_goals=info,unistore_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut metrics = MetricsRecorder::new();
    metrics.install().context("Failed to install metrics recorder")?;

    let actions = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_script(&path)
            .with_context(|| format!("Failed to load actions from {}", path.display()))?,
        None => demo_actions(),
    };

    println!("=== Todo & Goals Example ===\n");

    let store = Store::with_config(
        AppReducer::new(),
        StoreConfig::default().with_name("todo-goals"),
    );

    let observer = store.clone();
    let subscription = store.subscribe(move || match observer.state(serde_json::to_string) {
        Ok(json) => println!("The new state is: {json}"),
        Err(error) => tracing::error!(%error, "Failed to serialize state"),
    });

    tracing::info!(
        listener = %subscription.id(),
        actions = actions.len(),
        "Dispatching actions"
    );
    for action in actions {
        tracing::debug!(?action, "Dispatching");
        store.dispatch(action)?;
    }

    // Drops the listener, and with it the store handle it captured
    subscription.unsubscribe();

    let state = store.snapshot();
    println!("\nTodos:");
    for todo in state.todos.iter() {
        let status = if todo.complete { "✓" } else { " " };
        println!("  [{status}] {} (#{})", todo.name, todo.id);
    }
    println!("Goals:");
    for goal in state.goals.iter() {
        println!("  - {} (#{})", goal.name, goal.id);
    }
    println!(
        "\nCompleted: {}/{}",
        state.completed_count(),
        state.todos.len()
    );

    if let Some(rendered) = metrics.render() {
        tracing::info!("Store metrics:\n{rendered}");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
