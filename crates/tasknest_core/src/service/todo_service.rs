//! Todo use-case service.
//!
//! # Responsibility
//! - Own the latest `AppState` snapshot and apply engine transitions to it
//!   one at a time.
//! - Schedule a debounced persistence write after every effective change.
//!
//! # Invariants
//! - Transitions go through `crate::engine`; this layer never edits state
//!   fields directly.
//! - Unchanged states are not scheduled for writing.

use crate::engine;
use crate::model::state::AppState;
use crate::model::todo::TodoId;
use crate::persist::{encode_snapshot, load_state, DebouncedWriter, PersistConfig};
use crate::repo::snapshot_repo::{SnapshotStore, StoreResult};
use log::{debug, error, info};
use std::sync::Arc;

/// Single-writer owner of the application state.
pub struct TodoService {
    state: AppState,
    writer: DebouncedWriter,
}

impl TodoService {
    /// Loads the persisted snapshot from `store` and starts the writer.
    ///
    /// Must be called inside a tokio runtime.
    pub fn open<S>(store: Arc<S>, config: PersistConfig) -> StoreResult<Self>
    where
        S: SnapshotStore + 'static,
    {
        let state = load_state(store.as_ref())?;
        info!(
            "event=service_open module=service status=ok todos={} debounce_ms={}",
            state.todos.len(),
            config.debounce.as_millis()
        );
        Ok(Self {
            state,
            writer: DebouncedWriter::spawn(store, config.debounce),
        })
    }

    /// Returns the latest snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies one engine transition and schedules persistence if the state
    /// changed.
    ///
    /// # Example
    /// `service.apply(|state| engine::delete_todo(state, &id));`
    pub fn apply<F>(&mut self, transition: F)
    where
        F: FnOnce(AppState) -> AppState,
    {
        let previous = self.state.clone();
        let next = transition(std::mem::take(&mut self.state));
        let changed = next != previous;
        self.state = next;
        if changed {
            self.persist();
        } else {
            debug!("event=state_apply module=service status=noop");
        }
    }

    /// Creates a todo and returns its id; `None` for blank text.
    pub fn create_todo(&mut self, text: &str) -> Option<TodoId> {
        let (next, id) = engine::create_todo(std::mem::take(&mut self.state), text);
        self.state = next;
        if id.is_some() {
            self.persist();
        }
        id
    }

    /// Writes the pending snapshot immediately.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Flushes and stops the background writer.
    pub async fn close(self) {
        self.writer.shutdown().await;
    }

    fn persist(&self) {
        match encode_snapshot(&self.state) {
            Ok(blob) => self.writer.schedule(blob),
            Err(err) => error!(
                "event=snapshot_encode module=service status=error error={}",
                err
            ),
        }
    }
}
