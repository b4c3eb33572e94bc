//! Scripted demo of the nested to-do store.
//!
//! Runs a fixed sequence of actions and prints the list after each step.
//! Pass `--json` to print the final state as JSON.
//!
//! ```text
//! RUST_LOG=nested_todo=trace cargo run -p nested-todo -- --json
//! ```

use anyhow::{Context, Result};
use nested_todo::{RootItem, TodoApp, TodoConfig, TodoState};
use nested_todo_runtime::metrics::describe_metrics;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nested_todo=debug,nested_todo_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    describe_metrics();

    let json = std::env::args().any(|arg| arg == "--json");
    let config = TodoConfig::from_env().context("Failed to load configuration")?;
    let app = TodoApp::init(&config);
    let actions = app.actions();

    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    app.subscribe(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    println!("=== Nested Todo Demo ===\n");

    actions.create("Groceries", None)?;
    actions.create("Laundry", None)?;
    actions.create("   ", None)?;
    let groceries = find_root(&app, "Groceries")?;
    actions.create("Milk", Some(&groceries))?;
    actions.create("Eggs", Some(&groceries))?;
    print_list("Created items", &app.snapshot());

    let groceries = find_root(&app, "Groceries")?;
    let milk = groceries
        .children
        .values()
        .find(|child| child.text == "Milk")
        .context("Milk was not created")?;
    actions.toggle_complete(milk)?;
    print_list("Completed Milk", &app.snapshot());

    actions.toggle_complete(&find_root(&app, "Laundry")?)?;
    actions.remove_completed()?;
    print_list("Removed completed items", &app.snapshot());

    actions.toggle_complete_all()?;
    print_list("Toggled everything", &app.snapshot());

    println!(
        "\nAll completed: {} | change notifications: {}",
        app.are_all_completed(),
        changes.load(Ordering::Relaxed)
    );

    if json {
        let state = serde_json::to_string_pretty(&app.snapshot()).context("Failed to serialize state")?;
        println!("\n{state}");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn find_root(app: &TodoApp, text: &str) -> Result<RootItem> {
    app.get_all()
        .into_values()
        .find(|root| root.text == text)
        .with_context(|| format!("No root item named {text:?}"))
}

fn print_list(title: &str, state: &TodoState) {
    let filter = state.status_filter();
    println!("{title} (filter: {filter}):");

    let mut roots: Vec<&RootItem> = state.items().values().collect();
    roots.sort_by(|a, b| a.text.cmp(&b.text));

    for root in roots.into_iter().filter(|root| filter.matches(root.completed)) {
        println!("  [{}] {}", mark(root.completed), root.text);

        let mut children: Vec<_> = root.children.values().collect();
        children.sort_by(|a, b| a.text.cmp(&b.text));
        for child in children {
            println!("      [{}] {}", mark(child.completed), child.text);
        }
    }

    println!(
        "  {} open, {} done\n",
        state.active_count(),
        state.completed_count()
    );
}

const fn mark(completed: bool) -> char {
    if completed { 'x' } else { ' ' }
}
