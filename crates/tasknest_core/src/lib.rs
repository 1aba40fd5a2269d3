//! Core domain logic for TaskNest.
//! This crate is the single source of truth for todo graph invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod persist;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::settings::{AppSettings, ModelPreset, SettingsPatch};
pub use model::state::{AppState, RankCandidate, StateValidationError, SCHEMA_VERSION};
pub use model::todo::{
    clamp_priority, clamp_rank_priority, Priority, SubTask, SubTaskId, SubTaskSource, Todo,
    TodoId,
};
pub use persist::{
    decode_snapshot, encode_snapshot, load_state, DebouncedWriter, PersistConfig, STORAGE_KEY,
};
pub use repo::snapshot_repo::{
    InMemorySnapshotStore, SnapshotStore, SqliteSnapshotStore, StoreError, StoreResult,
};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
