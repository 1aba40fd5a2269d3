//! Snapshot encoding and load-time sanitization.
//!
//! # Responsibility
//! - Encode `AppState` into the persisted JSON layout.
//! - Decode persisted JSON into a state that satisfies every graph invariant.
//!
//! # Invariants
//! - A blob that fails to parse or carries another `schemaVersion` decodes to
//!   the default state. There is no partial migration.
//! - Within a matching version every field is re-validated; the stored shape
//!   is never trusted.

use crate::model::settings::{AppSettings, ModelPreset};
use crate::model::state::{AppState, SCHEMA_VERSION};
use crate::model::todo::{
    clamp_priority, normalize_text, SubTask, SubTaskId, SubTaskSource, Todo, TodoId,
};
use crate::persist::STORAGE_KEY;
use crate::repo::snapshot_repo::{SnapshotStore, StoreResult};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Serializes the state into its persisted JSON form.
pub fn encode_snapshot(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Decodes a persisted blob, falling back to the default state.
pub fn decode_snapshot(blob: &str) -> AppState {
    let root = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(root)) => root,
        Ok(_) => {
            warn!("event=snapshot_decode module=persist status=reset reason=not_an_object");
            return AppState::default();
        }
        Err(err) => {
            warn!(
                "event=snapshot_decode module=persist status=reset reason=parse_failed line={} column={}",
                err.line(),
                err.column()
            );
            return AppState::default();
        }
    };

    let version = root.get("schemaVersion").and_then(Value::as_u64);
    if version != Some(u64::from(SCHEMA_VERSION)) {
        warn!(
            "event=snapshot_decode module=persist status=reset reason=version_mismatch found={} expected={}",
            version.map_or_else(|| "none".to_string(), |v| v.to_string()),
            SCHEMA_VERSION
        );
        return AppState::default();
    }

    sanitize_root(&root)
}

/// Loads and decodes the snapshot stored under the fixed storage key.
///
/// A missing blob yields the default state. Storage failures propagate.
pub fn load_state(store: &dyn SnapshotStore) -> StoreResult<AppState> {
    let Some(blob) = store.load_blob(STORAGE_KEY)? else {
        info!("event=snapshot_load module=persist status=empty");
        return Ok(AppState::default());
    };
    let state = decode_snapshot(&blob);
    if let Err(err) = state.validate() {
        error!(
            "event=snapshot_load module=persist status=invalid error={}",
            err
        );
    }
    info!(
        "event=snapshot_load module=persist status=ok todos={} sub_tasks={} bytes={}",
        state.todos.len(),
        state.sub_tasks.len(),
        blob.len()
    );
    Ok(state)
}

fn sanitize_root(root: &Map<String, Value>) -> AppState {
    let mut todos = sanitize_todos(root.get("todos"));
    let sub_tasks = sanitize_sub_tasks(root.get("subTasks"), &todos);
    let sub_tasks = reconcile_sub_tasks(&mut todos, sub_tasks);
    let todo_order = sanitize_order(root.get("todoOrder"), &todos);
    let collapsed_todo_ids = string_items(root.get("collapsedTodoIds"))
        .filter(|id| todos.contains_key(*id))
        .map(str::to_string)
        .collect();

    AppState {
        todos,
        sub_tasks,
        todo_order,
        collapsed_todo_ids,
        settings: sanitize_settings(root.get("settings")),
        schema_version: SCHEMA_VERSION,
    }
}

fn sanitize_todos(value: Option<&Value>) -> BTreeMap<TodoId, Todo> {
    let mut todos = BTreeMap::new();
    let Some(Value::Object(entries)) = value else {
        return todos;
    };

    for (key, entry) in entries {
        let Value::Object(fields) = entry else {
            continue;
        };
        let Some(text) = fields.get("text").and_then(Value::as_str).and_then(normalize_text)
        else {
            continue;
        };
        let id = non_blank_str(fields.get("id")).unwrap_or(key.as_str());
        if id.trim().is_empty() || todos.contains_key(id) {
            continue;
        }

        todos.insert(
            id.to_string(),
            Todo {
                id: id.to_string(),
                text,
                priority: clamp_priority(fields.get("priority").unwrap_or(&Value::Null)),
                completed: fields
                    .get("completed")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                created_at: fields.get("createdAt").and_then(Value::as_i64).unwrap_or(0),
                sub_task_ids: string_items(fields.get("subTaskIds"))
                    .map(str::to_string)
                    .collect(),
            },
        );
    }
    todos
}

fn sanitize_sub_tasks(
    value: Option<&Value>,
    todos: &BTreeMap<TodoId, Todo>,
) -> BTreeMap<SubTaskId, SubTask> {
    let mut sub_tasks = BTreeMap::new();
    let Some(Value::Object(entries)) = value else {
        return sub_tasks;
    };

    for (key, entry) in entries {
        let Value::Object(fields) = entry else {
            continue;
        };
        let Some(text) = fields.get("text").and_then(Value::as_str).and_then(normalize_text)
        else {
            continue;
        };
        let Some(parent_id) = fields
            .get("parentId")
            .and_then(Value::as_str)
            .filter(|parent_id| todos.contains_key(*parent_id))
        else {
            continue;
        };
        let id = non_blank_str(fields.get("id")).unwrap_or(key.as_str());
        if id.trim().is_empty() || sub_tasks.contains_key(id) {
            continue;
        }

        sub_tasks.insert(
            id.to_string(),
            SubTask {
                id: id.to_string(),
                parent_id: parent_id.to_string(),
                text,
                completed: fields
                    .get("completed")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                created_at: fields.get("createdAt").and_then(Value::as_i64).unwrap_or(0),
                source: fields
                    .get("source")
                    .cloned()
                    .and_then(|source| serde_json::from_value(source).ok())
                    .unwrap_or(SubTaskSource::Ai),
            },
        );
    }
    sub_tasks
}

/// Makes parent lists and back-references agree.
///
/// Parent lists keep only ids that exist and point back at that parent.
/// Sub-tasks their parent does not list are appended in creation order.
fn reconcile_sub_tasks(
    todos: &mut BTreeMap<TodoId, Todo>,
    sub_tasks: BTreeMap<SubTaskId, SubTask>,
) -> BTreeMap<SubTaskId, SubTask> {
    let mut listed: HashSet<SubTaskId> = HashSet::new();
    for todo in todos.values_mut() {
        todo.sub_task_ids.retain(|id| {
            sub_tasks
                .get(id)
                .is_some_and(|sub_task| sub_task.parent_id == todo.id)
                && listed.insert(id.clone())
        });
    }

    let mut unlisted: Vec<&SubTask> = sub_tasks
        .values()
        .filter(|sub_task| !listed.contains(&sub_task.id))
        .collect();
    unlisted.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
    for sub_task in unlisted {
        if let Some(parent) = todos.get_mut(&sub_task.parent_id) {
            parent.sub_task_ids.push(sub_task.id.clone());
        }
    }

    sub_tasks
}

fn sanitize_order(value: Option<&Value>, todos: &BTreeMap<TodoId, Todo>) -> Vec<TodoId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<TodoId> = string_items(value)
        .filter(|id| todos.contains_key(*id) && seen.insert(*id))
        .map(str::to_string)
        .collect();

    let mut missing: Vec<&Todo> = todos
        .values()
        .filter(|todo| !seen.contains(todo.id.as_str()))
        .collect();
    // Newest first, matching where `create_todo` inserts.
    missing.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    order.extend(missing.into_iter().map(|todo| todo.id.clone()));
    order
}

fn sanitize_settings(value: Option<&Value>) -> AppSettings {
    let Some(Value::Object(fields)) = value else {
        return AppSettings::default();
    };
    AppSettings {
        api_key: fields
            .get("apiKey")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        model: fields
            .get("model")
            .and_then(Value::as_str)
            .map(ModelPreset::parse_or_default)
            .unwrap_or_default(),
    }
}

fn string_items(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}
