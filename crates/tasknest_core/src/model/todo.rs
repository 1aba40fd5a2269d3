//! Todo and sub-task domain model.
//!
//! # Responsibility
//! - Define the two-level entity shapes owned by `AppState`.
//! - Own priority normalization for every write path.
//!
//! # Invariants
//! - `Todo::text` and `SubTask::text` are non-empty after trimming.
//! - `Priority` never leaves `[0, 5]`; it can only be built through the
//!   clamp functions below.
//! - `SubTask::parent_id` is a lookup back-reference; ownership lives in
//!   `Todo::sub_task_ids`.
//!
//! # See also
//! - `crate::model::state::AppState` for the graph invariants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a top-level todo.
///
/// Opaque text; freshly created ids are UUID v4 strings.
pub type TodoId = String;

/// Stable identifier of a sub-task.
pub type SubTaskId = String;

/// Normalized priority value in `[0, 5]`.
///
/// `0` means "unranked/new"; the ranking pass only ever assigns `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;
    /// Lower bound used by the ranking pass.
    pub const RANK_MIN: u8 = 1;

    /// Priority of a todo that has never been ranked.
    pub const UNRANKED: Priority = Priority(0);
    /// Neutral ranking default: valid but unconfident.
    pub const NEUTRAL: Priority = Priority(3);

    /// Returns the raw integer value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes an untrusted priority value into `[0, 5]`.
///
/// Non-numeric and non-integer input maps to `0`; values at or below `0`
/// map to `0`; values at or above `5` map to `5`.
pub fn clamp_priority(raw: &Value) -> Priority {
    clamp_into_range(raw, Priority::MIN, Priority::MAX, Priority::UNRANKED)
}

/// Normalizes a priority returned by the ranking pass into `[1, 5]`.
///
/// Invalid input maps to the neutral midpoint `3` instead of `0`, since a
/// ranked todo is never "unranked".
pub fn clamp_rank_priority(raw: &Value) -> Priority {
    clamp_into_range(raw, Priority::RANK_MIN, Priority::MAX, Priority::NEUTRAL)
}

fn clamp_into_range(raw: &Value, min: u8, max: u8, fallback: Priority) -> Priority {
    let Some(number) = raw.as_f64() else {
        return fallback;
    };
    if !number.is_finite() || number.fract() != 0.0 {
        return fallback;
    }
    if number <= f64::from(min) {
        return Priority(min);
    }
    if number >= f64::from(max) {
        return Priority(max);
    }
    // In range and integral, so the cast is exact.
    Priority(number as u8)
}

/// Origin tag of a sub-task.
///
/// Only AI-generated sub-tasks exist today; manual entry is a reserved
/// future variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubTaskSource {
    #[default]
    Ai,
}

/// Top-level task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    /// Trimmed, never empty.
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Owned sub-task ids in display order.
    pub sub_task_ids: Vec<SubTaskId>,
}

impl Todo {
    /// Creates an unranked, incomplete todo with a generated id.
    ///
    /// Returns `None` when `text` is blank after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self {
            id: new_id(),
            text,
            priority: Priority::UNRANKED,
            completed: false,
            created_at: now_epoch_ms(),
            sub_task_ids: Vec::new(),
        })
    }
}

/// Decomposition step of a `Todo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: SubTaskId,
    /// Non-owning back-reference used for lookup and cleanup.
    pub parent_id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
    pub source: SubTaskSource,
}

impl SubTask {
    /// Creates an incomplete AI-generated sub-task under `parent_id`.
    ///
    /// Returns `None` when `text` is blank after trimming.
    pub fn generated(parent_id: &str, text: &str) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self {
            id: new_id(),
            parent_id: parent_id.to_string(),
            text,
            completed: false,
            created_at: now_epoch_ms(),
            source: SubTaskSource::Ai,
        })
    }
}

/// Trims `raw` and rejects blank results.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{clamp_priority, clamp_rank_priority, normalize_text, SubTask, Todo};
    use serde_json::json;

    #[test]
    fn clamp_priority_handles_range_and_garbage() {
        assert_eq!(clamp_priority(&json!(-5)).get(), 0);
        assert_eq!(clamp_priority(&json!(3.5)).get(), 0);
        assert_eq!(clamp_priority(&json!(7)).get(), 5);
        assert_eq!(clamp_priority(&json!(2)).get(), 2);
        assert_eq!(clamp_priority(&json!("4")).get(), 0);
        assert_eq!(clamp_priority(&json!(null)).get(), 0);
        assert_eq!(clamp_priority(&json!(5.0)).get(), 5);
    }

    #[test]
    fn clamp_rank_priority_uses_floor_one_and_neutral_default() {
        assert_eq!(clamp_rank_priority(&json!(0)).get(), 1);
        assert_eq!(clamp_rank_priority(&json!("abc")).get(), 3);
        assert_eq!(clamp_rank_priority(&json!(6)).get(), 5);
        assert_eq!(clamp_rank_priority(&json!(2.5)).get(), 3);
        assert_eq!(clamp_rank_priority(&json!(4)).get(), 4);
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  walk dog \n").as_deref(), Some("walk dog"));
        assert_eq!(normalize_text(" \t "), None);
    }

    #[test]
    fn constructors_reject_blank_text() {
        assert!(Todo::new("   ").is_none());
        assert!(SubTask::generated("parent", "").is_none());

        let todo = Todo::new(" plan trip ").unwrap();
        assert_eq!(todo.text, "plan trip");
        assert_eq!(todo.priority.get(), 0);
        assert!(!todo.completed);
        assert!(todo.sub_task_ids.is_empty());
    }
}
