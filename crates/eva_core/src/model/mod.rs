//! Domain model for cheatsheet entries.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep field addressing closed over a fixed enum.
//!
//! # Invariants
//! - Entry ids are dense and renumbered on delete.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod entry;
