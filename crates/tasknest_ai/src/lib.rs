//! AI-assisted operations for TaskNest.
//!
//! # Responsibility
//! - Turn todo state into schema-constrained model requests.
//! - Decode untrusted model output back into validated domain data.
//!
//! # Invariants
//! - Nothing here mutates `AppState`; callers apply results through the
//!   core engine.
//! - Every failure is one `AiError` with a stable `code()`.
//!
//! # See also
//! - `tasknest_core::engine` for `add_generated_sub_tasks` / `reorder_todos`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod ranking;
pub mod request;
pub mod schema;
pub mod subtasks;
pub mod transport;

pub use config::{AiClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use envelope::{decode_payload, extract_text};
pub use error::{AiError, AiResult};
pub use ranking::{rank_todos, sanitize_rankings, RankingResult};
pub use request::AiRequest;
pub use schema::MAX_GENERATED_SUB_TASKS;
pub use subtasks::{generate_sub_tasks, sanitize_generated};
pub use transport::{AiTransport, ReqwestTransport};
