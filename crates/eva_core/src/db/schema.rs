//! Entry table definition.
//!
//! `id` uses `AUTOINCREMENT`, so the identifier counter lives in
//! `sqlite_sequence` under the name [`ENTRIES_TABLE`]. Delete-with-reindex
//! rewrites that counter; see `repo::entry_repo`.

use super::DbResult;
use rusqlite::Connection;

/// Table name, also the `sqlite_sequence.name` key.
pub const ENTRIES_TABLE: &str = "entries";

const CREATE_ENTRIES_SQL: &str = "CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    keywords TEXT,
    attack_step TEXT,
    explanation TEXT,
    commands TEXT,
    notes TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";

/// Creates the `entries` table if absent. No migration path exists for
/// schema changes.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_ENTRIES_SQL)?;
    Ok(())
}

/// Returns whether the `entries` table is present.
pub fn entries_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [ENTRIES_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
