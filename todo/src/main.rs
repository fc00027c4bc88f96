//! Demo binary for the todo shells.
//!
//! Runs the same short session against each configured shell and reports
//! how many notifications each strategy produced.

use anyhow::Context;
use std::cell::Cell;
use std::rc::Rc;
use todo::config::{DemoConfig, ShellKind};
use todo::{
    drain_event_count, LocalTodoApp, ObservableTodoApp, ReactiveTodoApp, Todo, TodoApi, TodoCollection,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,composable_todo_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DemoConfig::from_env().context("failed to load demo configuration")?;
    tracing::info!(?config, "Starting todo demo");

    for kind in &config.shells {
        println!("=== {kind} ===\n");
        run_shell(*kind, &config)?;
        println!();
    }

    println!("=== Demo Complete ===");
    Ok(())
}

fn initial_collection(config: &DemoConfig) -> TodoCollection {
    if config.seed {
        TodoCollection::seeded()
    } else {
        TodoCollection::new()
    }
}

fn counter() -> (Rc<Cell<u64>>, impl Fn() + Clone) {
    let count = Rc::new(Cell::new(0));
    let bump = {
        let count = Rc::clone(&count);
        move || count.set(count.get() + 1)
    };
    (count, bump)
}

fn run_shell(kind: ShellKind, config: &DemoConfig) -> anyhow::Result<()> {
    let collection = initial_collection(config);

    match kind {
        ShellKind::Local => {
            let mut app = LocalTodoApp::with_collection(collection);
            run_session(&mut app)?;
            println!(
                "Forced updates: {}, rows rendered: {}",
                app.revision(),
                app.renders()
            );
        },
        ShellKind::Reactive => {
            let mut app = ReactiveTodoApp::with_config(collection, config.store_config());
            let mut actions = app.subscribe_actions();

            let (list_renders, bump_list) = counter();
            let _list = app.watch_ids(move |_| bump_list());
            let (row_renders, bump_row) = counter();
            let _rows: Vec<_> = app
                .ids()
                .into_iter()
                .map(|id| {
                    let bump_row = bump_row.clone();
                    app.watch_todo(id, move |_| bump_row())
                })
                .collect();

            run_session(&mut app)?;

            let emitted = drain_event_count(&mut actions);
            println!(
                "Events emitted: {emitted}, list renders: {}, row renders: {}",
                list_renders.get(),
                row_renders.get()
            );
        },
        ShellKind::Observable => {
            let mut app = ObservableTodoApp::with_collection(collection);

            let (list_renders, bump_list) = counter();
            app.observe_list(move |_| bump_list());
            let (row_renders, bump_row) = counter();
            let ids = app.collection().ids();
            for id in ids {
                let bump_row = bump_row.clone();
                app.observe_todo(&id, move |_| bump_row());
            }

            run_session(&mut app)?;
            println!(
                "List renders: {}, row renders: {}",
                list_renders.get(),
                row_renders.get()
            );
        },
    }

    Ok(())
}

fn run_session(app: &mut impl TodoApi) -> anyhow::Result<()> {
    print_list("Initial", &app.todos());

    println!("\n>>> add \"Reading\"");
    app.add_todo("Reading")?;
    print_list("After add", &app.todos());

    println!("\n>>> add \"Reading\" again");
    app.add_todo("Reading")?;
    print_list("After duplicate add", &app.todos());

    println!("\n>>> toggle \"Learning\"");
    match app.find_by_name("Learning") {
        Some(todo) => app.toggle_todo(&todo.id)?,
        None => println!("(no such todo)"),
    }
    print_list("After toggle", &app.todos());

    println!("\n>>> delete \"Sleeping\"");
    match app.find_by_name("Sleeping") {
        Some(todo) => app.delete_todo(&todo.id)?,
        None => println!("(no such todo)"),
    }
    print_list("After delete", &app.todos());

    let json = serde_json::to_string_pretty(&app.todos()).context("failed to serialize todos")?;
    println!("\nFinal state:\n{json}");
    Ok(())
}

fn print_list(label: &str, todos: &[Todo]) {
    println!("{label} ({} todos):", todos.len());
    for todo in todos {
        let status = if todo.completed { "✓" } else { " " };
        println!("  [{status}] {}", todo.name);
    }
}
