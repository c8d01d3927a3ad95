//! Core domain logic for the eva cheatsheet store.
//! This crate is the single source of truth for entry invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    expand_newline_escapes, normalize_field_value, Entry, EntryField, EntryId,
    EntryValidationError, NewEntry, NOTES_PLACEHOLDER,
};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
pub use search::entry_search::{search_entries, SearchQuery};
pub use service::entry_service::EntryService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
