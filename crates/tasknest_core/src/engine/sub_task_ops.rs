//! Sub-task transitions.

use crate::model::state::AppState;
use crate::model::todo::{normalize_text, SubTask};

/// Appends AI-generated sub-tasks to the end of a todo, in the given order.
///
/// Blank items are skipped. No-op when the todo does not exist or nothing
/// survives trimming.
pub fn add_generated_sub_tasks<S: AsRef<str>>(
    mut state: AppState,
    todo_id: &str,
    items: &[S],
) -> AppState {
    let Some(todo) = state.todos.get_mut(todo_id) else {
        return state;
    };
    for item in items {
        if let Some(sub_task) = SubTask::generated(todo_id, item.as_ref()) {
            todo.sub_task_ids.push(sub_task.id.clone());
            state.sub_tasks.insert(sub_task.id.clone(), sub_task);
        }
    }
    state
}

/// Flips a sub-task's completion flag. Never touches the parent.
pub fn toggle_sub_task_completed(mut state: AppState, sub_task_id: &str) -> AppState {
    if let Some(sub_task) = state.sub_tasks.get_mut(sub_task_id) {
        sub_task.completed = !sub_task.completed;
    }
    state
}

/// Replaces a sub-task's text; blank input keeps the original text.
pub fn update_sub_task_text(mut state: AppState, sub_task_id: &str, text: &str) -> AppState {
    let Some(text) = normalize_text(text) else {
        return state;
    };
    if let Some(sub_task) = state.sub_tasks.get_mut(sub_task_id) {
        sub_task.text = text;
    }
    state
}

/// Removes a sub-task and unlinks it from its parent.
pub fn delete_sub_task(mut state: AppState, sub_task_id: &str) -> AppState {
    let Some(sub_task) = state.sub_tasks.remove(sub_task_id) else {
        return state;
    };
    if let Some(parent) = state.todos.get_mut(&sub_task.parent_id) {
        parent.sub_task_ids.retain(|id| id != sub_task_id);
    }
    state
}
