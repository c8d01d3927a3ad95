//! Entry use-case service.
//!
//! # Responsibility
//! - Turn raw user input into stored values before persistence.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Every write goes through `normalize_field_value`, so escape expansion,
//!   placeholder notes and the title rule hold for all callers.
//! - Service layer remains storage-agnostic.

use crate::model::entry::{normalize_field_value, Entry, EntryField, EntryId, NewEntry};
use crate::repo::entry_repo::{EntryRepository, RepoResult};
use crate::search::entry_search::SearchQuery;

/// Use-case service wrapper for entry operations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Normalizes raw input and stores a new entry.
    ///
    /// # Contract
    /// - Blank title fails with `RepoError::Validation`.
    /// - Returns the assigned id.
    pub fn add_entry(&self, raw: &NewEntry) -> RepoResult<EntryId> {
        let entry = raw.normalized()?;
        self.repo.create_entry(&entry)
    }

    pub fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.repo.get_entry(id)
    }

    pub fn get_field(&self, id: EntryId, field: EntryField) -> RepoResult<Option<String>> {
        self.repo.get_field(id, field)
    }

    /// Normalizes raw input for `field` and overwrites it.
    ///
    /// Returns the value that was stored.
    pub fn update_field(&self, id: EntryId, field: EntryField, raw: &str) -> RepoResult<String> {
        let value = normalize_field_value(field, raw)?;
        self.repo.update_field(id, field, &value)?;
        Ok(value)
    }

    /// Deletes one entry and renumbers the rest.
    pub fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.repo.delete_entry(id)
    }

    pub fn search(&self, query: &SearchQuery) -> RepoResult<Vec<Entry>> {
        self.repo.search_entries(query)
    }

    pub fn count_entries(&self) -> RepoResult<u64> {
        self.repo.count_entries()
    }
}
