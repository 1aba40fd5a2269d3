//! CLI inspection entry point.
//!
//! # Responsibility
//! - Verify `tasknest_core` linkage and print the crate version.
//! - Print the persisted todo list of an existing database.
//!
//! Usage: `tasknest_cli [db_path]` (defaults to `tasknest.sqlite3`).
//! A missing database file is an error; pending storage migrations are
//! applied on open.
//! Set `TASKNEST_LOG_DIR` to an absolute path to enable file logging.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use tasknest_core::db::open_db;
use tasknest_core::{load_state, AppState, SqliteSnapshotStore};

const DEFAULT_DB_PATH: &str = "tasknest.sqlite3";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("TASKNEST_LOG_DIR") {
        tasknest_core::init_logging(tasknest_core::default_log_level(), &log_dir)?;
    }

    println!("tasknest_core version={}", tasknest_core::core_version());

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let store = open_existing_store(&db_path)?;
    let state = load_state(&store)?;

    println!(
        "db={} todos={} sub_tasks={} model={}",
        db_path,
        state.todos.len(),
        state.sub_tasks.len(),
        state.settings.model
    );
    print_todos(&state);
    Ok(())
}

fn open_existing_store(db_path: &str) -> Result<SqliteSnapshotStore, Box<dyn Error>> {
    if !Path::new(db_path).is_file() {
        return Err(format!("database `{db_path}` does not exist").into());
    }
    Ok(SqliteSnapshotStore::new(open_db(db_path)?))
}

fn print_todos(state: &AppState) {
    for todo in state.ordered_todos() {
        let mark = if todo.completed { "x" } else { " " };
        let fold = if state.is_collapsed(&todo.id) { "+" } else { "-" };
        println!("{fold} [{mark}] p{} {}", todo.priority, todo.text);
        if state.is_collapsed(&todo.id) {
            continue;
        }
        for sub_task in state.sub_tasks_of(&todo.id) {
            let mark = if sub_task.completed { "x" } else { " " };
            println!("    [{mark}] {}", sub_task.text);
        }
    }
}
