//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `entries` table.
//! - Own delete-with-reindex, which keeps ids dense.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate stored-value rules before SQL mutations.
//! - After every delete, ids are `1..=n` with no gaps and the
//!   `sqlite_sequence` counter equals the max id (0 when empty).
//! - Delete, renumbering and counter reset commit together or not at all.

use crate::db::schema::ENTRIES_TABLE;
use crate::db::DbError;
use crate::model::entry::{
    validate_field_value, Entry, EntryField, EntryId, EntryValidationError, NewEntry,
};
use crate::search::entry_search::{search_entries, SearchQuery};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    keywords,
    attack_step,
    explanation,
    commands,
    notes,
    created_at,
    updated_at
FROM entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no entry found with id {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for entry operations.
pub trait EntryRepository {
    /// Inserts an entry and returns its assigned id. Timestamps are set by
    /// the store.
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    fn get_field(&self, id: EntryId, field: EntryField) -> RepoResult<Option<String>>;
    /// Overwrites one field and refreshes `updated_at`.
    fn update_field(&self, id: EntryId, field: EntryField, value: &str) -> RepoResult<()>;
    /// Removes one entry and renumbers every later entry down by one.
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    fn search_entries(&self, query: &SearchQuery) -> RepoResult<Vec<Entry>>;
    fn count_entries(&self) -> RepoResult<u64>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                title,
                keywords,
                attack_step,
                explanation,
                commands,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.title.as_str(),
                entry.keywords.as_str(),
                entry.attack_step.as_str(),
                entry.explanation.as_str(),
                entry.commands.as_str(),
                entry.notes.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("event=entry_create module=repo status=ok id={id}");
        Ok(id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn get_field(&self, id: EntryId, field: EntryField) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                &format!("SELECT {} FROM entries WHERE id = ?1;", field.column()),
                [id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;

        Ok(value.map(Option::unwrap_or_default))
    }

    fn update_field(&self, id: EntryId, field: EntryField, value: &str) -> RepoResult<()> {
        validate_field_value(field, value)?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE entries
                 SET
                    {} = ?1,
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?2;",
                field.column()
            ),
            params![value, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=entry_update module=repo status=ok id={id} field={field}");
        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        match delete_and_reindex(self.conn, id) {
            Ok(shifted) => {
                info!("event=entry_delete module=repo status=ok id={id} shifted={shifted}");
                Ok(())
            }
            Err(err) => {
                error!("event=entry_delete module=repo status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    fn search_entries(&self, query: &SearchQuery) -> RepoResult<Vec<Entry>> {
        search_entries(self.conn, query)
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative entry count `{count}`")))
    }
}

/// Runs delete, renumber and counter reset in one IMMEDIATE transaction.
///
/// Returns how many entries were renumbered. Any early return drops `tx`,
/// which rolls back.
fn delete_and_reindex(conn: &Connection, id: EntryId) -> RepoResult<usize> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let removed = tx.execute("DELETE FROM entries WHERE id = ?1;", [id])?;
    if removed == 0 {
        return Err(RepoError::NotFound(id));
    }

    // Two passes through negative ids so no intermediate row can collide
    // with a primary key that has not moved yet.
    let shifted = tx.execute("UPDATE entries SET id = -(id - 1) WHERE id > ?1;", [id])?;
    tx.execute("UPDATE entries SET id = -id WHERE id < 0;", [])?;

    tx.execute(
        "UPDATE sqlite_sequence
         SET seq = COALESCE((SELECT MAX(id) FROM entries), 0)
         WHERE name = ?1;",
        [ENTRIES_TABLE],
    )?;

    tx.commit()?;
    Ok(shifted)
}

pub(crate) fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id: EntryId = row.get("id")?;
    if id < 1 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in entries.id"
        )));
    }

    // Blank titles are refused on write only; stored ones load as-is.
    Ok(Entry {
        id,
        title: text_column(row, "title")?,
        keywords: text_column(row, "keywords")?,
        attack_step: text_column(row, "attack_step")?,
        explanation: text_column(row, "explanation")?,
        commands: text_column(row, "commands")?,
        notes: text_column(row, "notes")?,
        created_at: text_column(row, "created_at")?,
        updated_at: text_column(row, "updated_at")?,
    })
}

fn text_column(row: &Row<'_>, name: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(name)?.unwrap_or_default())
}
