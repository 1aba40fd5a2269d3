//! State engine: pure transitions over `AppState`.
//!
//! # Responsibility
//! - Implement every mutation of the todo/sub-task graph.
//! - Keep ordering, cascade and cleanup rules in one place.
//!
//! # Invariants
//! - Every operation takes the state by value and returns the next state;
//!   callers never observe a partial update.
//! - Referencing a nonexistent id is a no-op, never an error. AI results may
//!   land after the targeted todo was edited or deleted.
//! - After every operation `AppState::validate()` succeeds.
//!
//! # See also
//! - `crate::service::todo_service` for the stateful wrapper.

mod order_ops;
mod settings_ops;
mod sub_task_ops;
mod todo_ops;

pub use order_ops::{move_todo_to_index, reorder_todos};
pub use settings_ops::{clear_settings, update_settings};
pub use sub_task_ops::{
    add_generated_sub_tasks, delete_sub_task, toggle_sub_task_completed, update_sub_task_text,
};
pub use todo_ops::{
    create_todo, delete_todo, toggle_todo_collapsed, toggle_todo_completed, update_todo_text,
};
