//! Domain model for the todo/sub-task graph.
//!
//! # Responsibility
//! - Define canonical entity shapes used by the state engine.
//! - Keep priority normalization in one place.
//!
//! # Invariants
//! - Entities are referenced by id through arena-style maps, never nested.
//! - Hard delete only; there are no tombstones.
//!
//! # See also
//! - `crate::engine` for the transitions over these types.

pub mod settings;
pub mod state;
pub mod todo;
