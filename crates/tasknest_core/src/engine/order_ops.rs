//! Display-order transitions.

use crate::model::state::AppState;
use crate::model::todo::{Priority, TodoId};
use std::collections::{BTreeMap, HashSet};

/// Applies a candidate ordering, optionally overwriting priorities.
///
/// Candidate ids are kept only if they name an existing todo and have not
/// been seen earlier in the list. Todos missing from the candidate are
/// appended in their current relative order, so a partial or stale list
/// still yields a full permutation. Priorities are written as given for
/// existing todos; `Priority` values are already clamped.
pub fn reorder_todos<S: AsRef<str>>(
    mut state: AppState,
    ordered_ids: &[S],
    priorities: Option<&BTreeMap<TodoId, Priority>>,
) -> AppState {
    let mut placed: HashSet<&str> = HashSet::with_capacity(state.todo_order.len());
    let mut next_order: Vec<TodoId> = Vec::with_capacity(state.todo_order.len());

    for id in ordered_ids.iter().map(|id| id.as_ref()) {
        if state.todos.contains_key(id) && placed.insert(id) {
            next_order.push(id.to_string());
        }
    }
    for id in &state.todo_order {
        if !placed.contains(id.as_str()) {
            next_order.push(id.clone());
        }
    }
    state.todo_order = next_order;

    if let Some(priorities) = priorities {
        for (id, priority) in priorities {
            if let Some(todo) = state.todos.get_mut(id) {
                todo.priority = *priority;
            }
        }
    }
    state
}

/// Moves a todo so it lands at `target_index` of the original list.
///
/// `target_index` counts positions before removal, so when the todo moves
/// down the effective insertion index is `target_index - 1`. No-op when the
/// todo is absent or `target_index` is past the end of the list.
pub fn move_todo_to_index(mut state: AppState, todo_id: &str, target_index: usize) -> AppState {
    if target_index > state.todo_order.len() {
        return state;
    }
    let Some(from_index) = state.todo_order.iter().position(|id| id == todo_id) else {
        return state;
    };

    let moved = state.todo_order.remove(from_index);
    let insert_at = if from_index < target_index {
        target_index - 1
    } else {
        target_index
    };
    state.todo_order.insert(insert_at, moved);
    state
}
