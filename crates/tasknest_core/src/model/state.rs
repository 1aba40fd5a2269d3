//! Aggregate root for the todo/sub-task graph.
//!
//! # Responsibility
//! - Hold id-indexed arenas for todos and sub-tasks plus display order.
//! - Provide read helpers for callers and the AI protocol.
//! - Check graph invariants (`validate`).
//!
//! # Invariants
//! - `todo_order` is a duplicate-free permutation of `todos` keys.
//! - Every id in `Todo::sub_task_ids` exists in `sub_tasks` with a matching
//!   `parent_id`, and every sub-task is listed by its parent.
//! - `collapsed_todo_ids` only holds existing todo ids.

use crate::model::settings::AppSettings;
use crate::model::todo::{Priority, SubTask, SubTaskId, Todo, TodoId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Version tag of the persisted snapshot layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete in-memory application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub todos: BTreeMap<TodoId, Todo>,
    pub sub_tasks: BTreeMap<SubTaskId, SubTask>,
    pub todo_order: Vec<TodoId>,
    /// View-state cache of collapsed rows.
    pub collapsed_todo_ids: BTreeSet<TodoId>,
    pub settings: AppSettings,
    pub schema_version: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            sub_tasks: BTreeMap::new(),
            todo_order: Vec::new(),
            collapsed_todo_ids: BTreeSet::new(),
            settings: AppSettings::default(),
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Todo summary sent to the ranking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankCandidate {
    pub id: TodoId,
    pub text: String,
}

impl AppState {
    /// Todos in display order.
    pub fn ordered_todos(&self) -> impl Iterator<Item = &Todo> + '_ {
        self.todo_order.iter().filter_map(|id| self.todos.get(id))
    }

    /// Sub-tasks of `todo_id` in display order; empty for unknown ids.
    pub fn sub_tasks_of<'a>(&'a self, todo_id: &str) -> Vec<&'a SubTask> {
        self.todos
            .get(todo_id)
            .map(|todo| {
                todo.sub_task_ids
                    .iter()
                    .filter_map(|id| self.sub_tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Existing sub-task texts of `todo_id`, used for generation dedup.
    pub fn sub_task_texts(&self, todo_id: &str) -> Vec<String> {
        self.sub_tasks_of(todo_id)
            .into_iter()
            .map(|sub_task| sub_task.text.clone())
            .collect()
    }

    /// Incomplete todos in display order, as ranking input.
    pub fn incomplete_todos_for_ranking(&self) -> Vec<RankCandidate> {
        self.ordered_todos()
            .filter(|todo| !todo.completed)
            .map(|todo| RankCandidate {
                id: todo.id.clone(),
                text: todo.text.clone(),
            })
            .collect()
    }

    /// Returns whether `todo_id` is currently collapsed.
    pub fn is_collapsed(&self, todo_id: &str) -> bool {
        self.collapsed_todo_ids.contains(todo_id)
    }

    /// Checks every graph invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        let mut seen = BTreeSet::new();
        for id in &self.todo_order {
            if !self.todos.contains_key(id) {
                return Err(StateValidationError::DanglingOrderEntry(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(StateValidationError::DuplicateOrderEntry(id.clone()));
            }
        }
        if let Some(missing) = self.todos.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(StateValidationError::MissingOrderEntry(missing.clone()));
        }

        let mut listed = BTreeSet::new();
        for todo in self.todos.values() {
            if todo.text.trim().is_empty() {
                return Err(StateValidationError::BlankText(todo.id.clone()));
            }
            if todo.priority.get() > Priority::MAX {
                return Err(StateValidationError::PriorityOutOfRange(todo.id.clone()));
            }
            for sub_task_id in &todo.sub_task_ids {
                let Some(sub_task) = self.sub_tasks.get(sub_task_id) else {
                    return Err(StateValidationError::DanglingSubTask {
                        todo_id: todo.id.clone(),
                        sub_task_id: sub_task_id.clone(),
                    });
                };
                if sub_task.parent_id != todo.id || !listed.insert(sub_task_id.as_str()) {
                    return Err(StateValidationError::ParentMismatch(sub_task_id.clone()));
                }
            }
        }
        for sub_task in self.sub_tasks.values() {
            if !listed.contains(sub_task.id.as_str()) {
                return Err(StateValidationError::OrphanSubTask(sub_task.id.clone()));
            }
            if sub_task.text.trim().is_empty() {
                return Err(StateValidationError::BlankText(sub_task.id.clone()));
            }
        }

        if let Some(stale) = self
            .collapsed_todo_ids
            .iter()
            .find(|id| !self.todos.contains_key(id.as_str()))
        {
            return Err(StateValidationError::StaleCollapsedEntry(stale.clone()));
        }

        Ok(())
    }
}

/// Graph invariant violations reported by `AppState::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    DanglingOrderEntry(TodoId),
    DuplicateOrderEntry(TodoId),
    MissingOrderEntry(TodoId),
    BlankText(String),
    PriorityOutOfRange(TodoId),
    DanglingSubTask {
        todo_id: TodoId,
        sub_task_id: SubTaskId,
    },
    ParentMismatch(SubTaskId),
    OrphanSubTask(SubTaskId),
    StaleCollapsedEntry(TodoId),
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingOrderEntry(id) => write!(f, "todo order references unknown todo: {id}"),
            Self::DuplicateOrderEntry(id) => write!(f, "todo order lists todo twice: {id}"),
            Self::MissingOrderEntry(id) => write!(f, "todo missing from todo order: {id}"),
            Self::BlankText(id) => write!(f, "entity has blank text: {id}"),
            Self::PriorityOutOfRange(id) => write!(f, "todo priority out of range: {id}"),
            Self::DanglingSubTask {
                todo_id,
                sub_task_id,
            } => write!(
                f,
                "todo {todo_id} references unknown sub-task {sub_task_id}"
            ),
            Self::ParentMismatch(id) => {
                write!(f, "sub-task is listed by a todo that is not its parent: {id}")
            }
            Self::OrphanSubTask(id) => write!(f, "sub-task is not listed by its parent: {id}"),
            Self::StaleCollapsedEntry(id) => {
                write!(f, "collapsed set references unknown todo: {id}")
            }
        }
    }
}

impl Error for StateValidationError {}
