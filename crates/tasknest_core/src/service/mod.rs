//! Core use-case services.
//!
//! # Responsibility
//! - Wire state engine transitions to snapshot persistence.
//! - Keep callers decoupled from storage details.

pub mod todo_service;
