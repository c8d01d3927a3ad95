//! Entry search entry points.
//!
//! # Responsibility
//! - Expose multi-term substring search over all entry text fields.
//! - Keep query building inside core.

pub mod entry_search;
