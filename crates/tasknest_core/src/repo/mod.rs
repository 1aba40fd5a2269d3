//! Repository layer for persisted snapshots.
//!
//! # Responsibility
//! - Define the blob storage contract the persistence adapter writes to.
//! - Isolate SQLite query details from state and service code.
//!
//! # Invariants
//! - Repositories move opaque text; sanitization happens in `persist`.

pub mod snapshot_repo;
