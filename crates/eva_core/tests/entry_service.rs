use eva_core::db::open_db_in_memory;
use eva_core::{
    EntryField, EntryService, EntryValidationError, NewEntry, RepoError, SqliteEntryRepository,
    NOTES_PLACEHOLDER,
};

#[test]
fn add_entry_applies_escapes_and_placeholder() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::new(&conn));

    let id = service
        .add_entry(&NewEntry {
            title: "SQLi".to_string(),
            keywords: "web,injection".to_string(),
            attack_step: "exploitation".to_string(),
            explanation: "test\\npayload".to_string(),
            commands: "' OR 1=1--".to_string(),
            notes: String::new(),
        })
        .unwrap();

    let stored = service.get_entry(id).unwrap().unwrap();
    assert_eq!(stored.title, "SQLi");
    assert_eq!(stored.keywords, "web,injection");
    assert_eq!(stored.attack_step, "exploitation");
    assert_eq!(stored.explanation, "test\npayload");
    assert_eq!(stored.commands, "' OR 1=1--");
    assert_eq!(stored.notes, NOTES_PLACEHOLDER);
}

#[test]
fn add_entry_keeps_escapes_in_single_line_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::new(&conn));

    let id = service
        .add_entry(&NewEntry {
            title: "a\\nb".to_string(),
            commands: "id\\nwhoami".to_string(),
            notes: "x\\ny".to_string(),
            ..NewEntry::default()
        })
        .unwrap();

    let stored = service.get_entry(id).unwrap().unwrap();
    assert_eq!(stored.title, "a\\nb");
    assert_eq!(stored.commands, "id\nwhoami");
    assert_eq!(stored.notes, "x\ny");
}

#[test]
fn add_entry_with_blank_title_stores_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::new(&conn));

    let err = service.add_entry(&NewEntry::default()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::EmptyTitle)
    ));
    assert_eq!(service.count_entries().unwrap(), 0);
}

#[test]
fn update_field_normalizes_like_add() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::new(&conn));
    let id = service
        .add_entry(&NewEntry {
            title: "LFI".to_string(),
            notes: "check logs".to_string(),
            ..NewEntry::default()
        })
        .unwrap();

    let notes = service.update_field(id, EntryField::Notes, "  ").unwrap();
    assert_eq!(notes, NOTES_PLACEHOLDER);

    let stored = service
        .update_field(id, EntryField::Explanation, "read\\n/etc/passwd")
        .unwrap();
    assert_eq!(stored, "read\n/etc/passwd");
    assert_eq!(
        service
            .get_field(id, EntryField::Explanation)
            .unwrap()
            .as_deref(),
        Some("read\n/etc/passwd")
    );

    let err = service.update_field(id, EntryField::Title, " ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::EmptyTitle)
    ));
    assert_eq!(service.get_entry(id).unwrap().unwrap().title, "LFI");
}

#[test]
fn delete_then_add_reuses_next_dense_id() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::new(&conn));
    for title in ["one", "two", "three"] {
        service
            .add_entry(&NewEntry {
                title: title.to_string(),
                ..NewEntry::default()
            })
            .unwrap();
    }

    service.delete_entry(2).unwrap();

    assert_eq!(service.get_entry(2).unwrap().unwrap().title, "three");
    let next = service
        .add_entry(&NewEntry {
            title: "four".to_string(),
            ..NewEntry::default()
        })
        .unwrap();
    assert_eq!(next, 3);
}
