use std::collections::BTreeMap;

use serde_json::json;
use tasknest_core::engine::{
    add_generated_sub_tasks, clear_settings, create_todo, delete_sub_task, delete_todo,
    move_todo_to_index, reorder_todos, toggle_sub_task_completed, toggle_todo_collapsed,
    toggle_todo_completed, update_settings, update_sub_task_text, update_todo_text,
};
use tasknest_core::{clamp_rank_priority, AppState, ModelPreset, SettingsPatch, TodoId};

/// Returns a state whose display order is `texts`, plus ids in that order.
fn seed(texts: &[&str]) -> (AppState, Vec<TodoId>) {
    let mut state = AppState::default();
    let mut ids = Vec::new();
    for text in texts.iter().rev() {
        let (next, id) = create_todo(state, text);
        state = next;
        ids.insert(0, id.unwrap());
    }
    assert_eq!(state.todo_order, ids);
    (state, ids)
}

fn sub_task_ids(state: &AppState, todo_id: &str) -> Vec<String> {
    state.todos[todo_id].sub_task_ids.clone()
}

#[test]
fn create_todo_prepends_with_defaults() {
    let (state, first) = create_todo(AppState::default(), "  write report ");
    let first = first.unwrap();
    let (state, second) = create_todo(state, "book flights");
    let second = second.unwrap();

    assert_eq!(state.todo_order, vec![second.clone(), first.clone()]);
    let todo = &state.todos[&first];
    assert_eq!(todo.text, "write report");
    assert_eq!(todo.priority.get(), 0);
    assert!(!todo.completed);
    state.validate().unwrap();
}

#[test]
fn create_todo_with_blank_text_is_noop() {
    let (state, id) = create_todo(AppState::default(), "   ");
    assert!(id.is_none());
    assert_eq!(state, AppState::default());
}

#[test]
fn completing_moves_todo_behind_remaining_incompletes() {
    let (state, ids) = seed(&["A", "B", "C"]);
    let (a, b, c) = (&ids[0], &ids[1], &ids[2]);

    // C complete sits at the end: [A, B, C].
    let state = toggle_todo_completed(state, c);
    assert_eq!(&state.todo_order, &[a.clone(), b.clone(), c.clone()]);

    let state = toggle_todo_completed(state, a);
    assert_eq!(&state.todo_order, &[b.clone(), a.clone(), c.clone()]);
    assert!(state.todos[a].completed);
    state.validate().unwrap();
}

#[test]
fn uncompleting_leaves_order_untouched() {
    let (state, ids) = seed(&["A", "B", "C"]);
    let state = toggle_todo_completed(state, &ids[0]);
    let order_before = state.todo_order.clone();

    let state = toggle_todo_completed(state, &ids[0]);
    assert!(!state.todos[&ids[0]].completed);
    assert_eq!(state.todo_order, order_before);
}

#[test]
fn completing_cascades_to_sub_tasks_but_uncompleting_does_not() {
    let (state, ids) = seed(&["plan party"]);
    let todo = &ids[0];
    let state = add_generated_sub_tasks(state, todo, &["invite", "cake", "music"]);
    let children = sub_task_ids(&state, todo);
    assert_eq!(children.len(), 3);

    let state = toggle_todo_completed(state, todo);
    assert!(children.iter().all(|id| state.sub_tasks[id].completed));

    // Un-completing the parent keeps cascaded children completed. This
    // asymmetry is observed behavior and may surprise users.
    let state = toggle_todo_completed(state, todo);
    assert!(!state.todos[todo].completed);
    assert!(children.iter().all(|id| state.sub_tasks[id].completed));
}

#[test]
fn delete_todo_removes_sub_tasks_order_and_collapsed_entry() {
    let (state, ids) = seed(&["A", "B"]);
    let a = &ids[0];
    let state = add_generated_sub_tasks(state, a, &["S1", "S2"]);
    let state = toggle_todo_collapsed(state, a);
    let children = sub_task_ids(&state, a);

    let state = delete_todo(state, a);
    assert!(!state.todos.contains_key(a));
    assert!(children.iter().all(|id| !state.sub_tasks.contains_key(id)));
    assert_eq!(state.todo_order, vec![ids[1].clone()]);
    assert!(!state.is_collapsed(a));
    state.validate().unwrap();
}

#[test]
fn add_generated_sub_tasks_appends_in_order() {
    let (state, ids) = seed(&["A"]);
    let a = &ids[0];
    let state = add_generated_sub_tasks(state, a, &["first", "second"]);
    let state = add_generated_sub_tasks(state, a, &[" third ", "   "]);

    let texts = state.sub_task_texts(a);
    assert_eq!(texts, vec!["first", "second", "third"]);
    let first = &state.sub_tasks[&sub_task_ids(&state, a)[0]];
    assert_eq!(&first.parent_id, a);
    state.validate().unwrap();
}

#[test]
fn add_generated_sub_tasks_ignores_empty_batch_and_missing_todo() {
    let (state, ids) = seed(&["A"]);
    let empty: [&str; 0] = [];
    let unchanged = add_generated_sub_tasks(state.clone(), &ids[0], &empty);
    assert_eq!(unchanged, state);

    let unchanged = add_generated_sub_tasks(state.clone(), "missing", &["x"]);
    assert_eq!(unchanged, state);
}

#[test]
fn sub_task_edits_toggle_and_delete() {
    let (state, ids) = seed(&["A"]);
    let a = &ids[0];
    let state = add_generated_sub_tasks(state, a, &["draft", "send"]);
    let children = sub_task_ids(&state, a);

    let state = toggle_sub_task_completed(state, &children[0]);
    assert!(state.sub_tasks[&children[0]].completed);
    assert!(!state.todos[a].completed);

    let state = update_sub_task_text(state, &children[0], "  redraft ");
    assert_eq!(state.sub_tasks[&children[0]].text, "redraft");
    let state = update_sub_task_text(state, &children[0], "  ");
    assert_eq!(state.sub_tasks[&children[0]].text, "redraft");

    let state = delete_sub_task(state, &children[0]);
    assert!(!state.sub_tasks.contains_key(&children[0]));
    assert_eq!(sub_task_ids(&state, a), vec![children[1].clone()]);
    state.validate().unwrap();
}

#[test]
fn update_todo_text_trims_and_keeps_original_on_blank() {
    let (state, ids) = seed(&["A"]);
    let state = update_todo_text(state, &ids[0], " renamed ");
    assert_eq!(state.todos[&ids[0]].text, "renamed");
    let state = update_todo_text(state, &ids[0], "\t");
    assert_eq!(state.todos[&ids[0]].text, "renamed");
}

#[test]
fn operations_on_missing_ids_are_noops() {
    let (state, _) = seed(&["A", "B"]);
    let same = toggle_todo_completed(state.clone(), "nope");
    let same = delete_todo(same, "nope");
    let same = toggle_sub_task_completed(same, "nope");
    let same = update_sub_task_text(same, "nope", "text");
    let same = update_todo_text(same, "nope", "text");
    let same = delete_sub_task(same, "nope");
    let same = move_todo_to_index(same, "nope", 0);
    let same = toggle_todo_collapsed(same, "nope");
    assert_eq!(same, state);
}

#[test]
fn reorder_sanitizes_candidate_and_appends_leftovers() {
    let (state, ids) = seed(&["A", "B", "C", "D"]);
    let (a, b, c, d) = (&ids[0], &ids[1], &ids[2], &ids[3]);

    let candidate = vec![c.clone(), c.clone(), "Z".to_string(), a.clone()];
    let state = reorder_todos(state, &candidate, None);
    assert_eq!(
        state.todo_order,
        vec![c.clone(), a.clone(), b.clone(), d.clone()]
    );
    state.validate().unwrap();
}

#[test]
fn reorder_applies_priorities_to_existing_todos() {
    let (state, ids) = seed(&["A", "B"]);
    let mut priorities = BTreeMap::new();
    priorities.insert(ids[1].clone(), clamp_rank_priority(&json!(5)));
    priorities.insert("ghost".to_string(), clamp_rank_priority(&json!(2)));

    let state = reorder_todos(state, &[ids[1].clone(), ids[0].clone()], Some(&priorities));
    assert_eq!(state.todo_order, vec![ids[1].clone(), ids[0].clone()]);
    assert_eq!(state.todos[&ids[1]].priority.get(), 5);
    assert_eq!(state.todos[&ids[0]].priority.get(), 0);
    assert!(!state.todos.contains_key("ghost"));
}

#[test]
fn move_to_index_compensates_for_removal() {
    let (state, ids) = seed(&["A", "B", "C"]);
    let (a, b, c) = (&ids[0], &ids[1], &ids[2]);

    let moved = move_todo_to_index(state.clone(), a, 2);
    assert_eq!(moved.todo_order, vec![b.clone(), a.clone(), c.clone()]);

    let moved = move_todo_to_index(state.clone(), a, 3);
    assert_eq!(moved.todo_order, vec![b.clone(), c.clone(), a.clone()]);

    let moved = move_todo_to_index(state.clone(), c, 0);
    assert_eq!(moved.todo_order, vec![c.clone(), a.clone(), b.clone()]);

    let unchanged = move_todo_to_index(state.clone(), a, 4);
    assert_eq!(unchanged, state);
}

#[test]
fn collapse_toggles_membership() {
    let (state, ids) = seed(&["A"]);
    let state = toggle_todo_collapsed(state, &ids[0]);
    assert!(state.is_collapsed(&ids[0]));
    let state = toggle_todo_collapsed(state, &ids[0]);
    assert!(!state.is_collapsed(&ids[0]));
}

#[test]
fn settings_merge_and_clear_keeps_model() {
    let state = update_settings(
        AppState::default(),
        SettingsPatch {
            api_key: Some("sk-test".to_string()),
            model: None,
        },
    );
    assert_eq!(state.settings.api_key, "sk-test");
    assert_eq!(state.settings.model, ModelPreset::default());

    let state = update_settings(
        state,
        SettingsPatch {
            api_key: None,
            model: Some(ModelPreset::Gpt4o),
        },
    );
    assert_eq!(state.settings.api_key, "sk-test");
    assert_eq!(state.settings.model, ModelPreset::Gpt4o);

    let state = clear_settings(state);
    assert!(state.settings.api_key.is_empty());
    assert_eq!(state.settings.model, ModelPreset::Gpt4o);
}

#[test]
fn invariants_hold_across_mixed_operation_sequence() {
    let (mut state, ids) = seed(&["A", "B", "C", "D", "E"]);
    state = add_generated_sub_tasks(state, &ids[1], &["b1", "b2"]);
    state = toggle_todo_completed(state, &ids[1]);
    state = move_todo_to_index(state, &ids[4], 0);
    state = toggle_todo_collapsed(state, &ids[2]);
    state = delete_todo(state, &ids[2]);
    state = reorder_todos(state, &[ids[3].clone(), ids[3].clone(), ids[0].clone()], None);
    let (next, _) = create_todo(state, "F");
    state = next;
    state = toggle_todo_completed(state, &ids[0]);
    let first_child = sub_task_ids(&state, &ids[1])[0].clone();
    state = delete_sub_task(state, &first_child);

    state.validate().unwrap();
    assert_eq!(state.todo_order.len(), state.todos.len());
    assert!(state.collapsed_todo_ids.is_empty());
}

#[test]
fn ranking_input_lists_incomplete_todos_in_order() {
    let (state, ids) = seed(&["A", "B", "C"]);
    let state = toggle_todo_completed(state, &ids[1]);
    let candidates = state.incomplete_todos_for_ranking();
    let candidate_ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(candidate_ids, vec![ids[0].as_str(), ids[2].as_str()]);
    assert_eq!(candidates[0].text, "A");
}
