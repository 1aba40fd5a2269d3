//! Todo-level transitions: create, complete, delete, edit, collapse.

use crate::model::state::AppState;
use crate::model::todo::{normalize_text, Todo, TodoId};

/// Creates a todo at the front of the display order.
///
/// Returns the next state and the new id, or the unchanged state and `None`
/// when `text` is blank after trimming.
pub fn create_todo(mut state: AppState, text: &str) -> (AppState, Option<TodoId>) {
    let Some(todo) = Todo::new(text) else {
        return (state, None);
    };
    let id = todo.id.clone();
    state.todo_order.insert(0, id.clone());
    state.todos.insert(id.clone(), todo);
    (state, Some(id))
}

/// Flips a todo's completion flag.
///
/// Completing moves the todo behind every other incomplete todo and ahead of
/// the completed ones (stable partition), and force-completes its
/// sub-tasks. Un-completing changes neither order nor sub-tasks.
pub fn toggle_todo_completed(mut state: AppState, todo_id: &str) -> AppState {
    let Some(todo) = state.todos.get_mut(todo_id) else {
        return state;
    };
    todo.completed = !todo.completed;
    if !todo.completed {
        return state;
    }

    for sub_task_id in &todo.sub_task_ids {
        if let Some(sub_task) = state.sub_tasks.get_mut(sub_task_id) {
            sub_task.completed = true;
        }
    }

    let (mut incomplete, complete): (Vec<TodoId>, Vec<TodoId>) = state
        .todo_order
        .iter()
        .filter(|id| id.as_str() != todo_id)
        .cloned()
        .partition(|id| state.todos.get(id).is_some_and(|other| !other.completed));
    incomplete.push(todo_id.to_string());
    incomplete.extend(complete);
    state.todo_order = incomplete;
    state
}

/// Removes a todo together with its sub-tasks, order entry and collapsed
/// entry.
pub fn delete_todo(mut state: AppState, todo_id: &str) -> AppState {
    let Some(todo) = state.todos.remove(todo_id) else {
        return state;
    };
    for sub_task_id in &todo.sub_task_ids {
        state.sub_tasks.remove(sub_task_id);
    }
    state.todo_order.retain(|id| id != todo_id);
    state.collapsed_todo_ids.remove(todo_id);
    state
}

/// Replaces a todo's text; blank input keeps the original text.
pub fn update_todo_text(mut state: AppState, todo_id: &str, text: &str) -> AppState {
    let Some(text) = normalize_text(text) else {
        return state;
    };
    if let Some(todo) = state.todos.get_mut(todo_id) {
        todo.text = text;
    }
    state
}

/// Toggles whether a todo row is collapsed.
pub fn toggle_todo_collapsed(mut state: AppState, todo_id: &str) -> AppState {
    if !state.todos.contains_key(todo_id) {
        return state;
    }
    if !state.collapsed_todo_ids.remove(todo_id) {
        state.collapsed_todo_ids.insert(todo_id.to_string());
    }
    state
}
