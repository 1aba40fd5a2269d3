//! Persistence adapter for `AppState` snapshots.
//!
//! # Responsibility
//! - Encode/decode the persisted snapshot and sanitize it on load.
//! - Debounce snapshot writes to the blob store.
//!
//! # Invariants
//! - Snapshots are stored under the single key `STORAGE_KEY`.
//! - The API key is persisted in plain text, exactly as entered.
//!
//! # See also
//! - `crate::repo::snapshot_repo` for the blob stores.

use std::time::Duration;

mod debounce;
mod snapshot;

pub use debounce::DebouncedWriter;
pub use snapshot::{decode_snapshot, encode_snapshot, load_state};

/// Fixed key the snapshot blob is stored under.
pub const STORAGE_KEY: &str = "tasknest.app_state";

/// Default quiet period before a scheduled snapshot is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Persistence tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistConfig {
    /// Quiet period; each new snapshot restarts it.
    pub debounce: Duration,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
