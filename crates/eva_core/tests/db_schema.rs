use eva_core::db::schema::entries_table_exists;
use eva_core::db::{open_db, open_db_in_memory};
use eva_core::{EntryRepository, NewEntry, SqliteEntryRepository};

#[test]
fn open_db_in_memory_creates_entries_table() {
    let conn = open_db_in_memory().unwrap();
    assert!(entries_table_exists(&conn).unwrap());
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".eva").join("eva.db");

    let conn = open_db(&path).unwrap();
    assert!(entries_table_exists(&conn).unwrap());
    assert!(path.exists());
}

#[test]
fn reopening_existing_database_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eva.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        repo.create_entry(&NewEntry {
            title: "kept".to_string(),
            notes: "n".to_string(),
            ..NewEntry::default()
        })
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteEntryRepository::new(&conn);
    assert_eq!(repo.count_entries().unwrap(), 1);
    assert_eq!(repo.get_entry(1).unwrap().unwrap().title, "kept");
}

#[test]
fn open_db_fails_when_parent_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let err = open_db(blocker.join("eva.db")).unwrap_err();
    assert!(err.to_string().contains("not-a-dir"));
}
