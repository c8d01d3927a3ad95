//! Entry domain model.
//!
//! # Responsibility
//! - Define the cheatsheet entry record and its editable fields.
//! - Provide input normalization shared by every write path.
//!
//! # Invariants
//! - `id` is a dense display sequence starting at 1, not a stable key.
//! - `title` is never written blank.
//! - `notes` is never empty; blank input becomes [`NOTES_PLACEHOLDER`].

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display-facing sequence number. Renumbered on delete.
pub type EntryId = i64;

/// Stored in place of blank notes.
pub const NOTES_PLACEHOLDER: &str = "No additional notes.";

/// One of the six user-editable text fields.
///
/// Column names are derived from this enum only, so callers can never
/// address arbitrary columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Title,
    Keywords,
    AttackStep,
    Explanation,
    Commands,
    Notes,
}

impl EntryField {
    /// All editable fields in menu/prompt order.
    pub const ALL: [EntryField; 6] = [
        EntryField::Title,
        EntryField::Keywords,
        EntryField::AttackStep,
        EntryField::Explanation,
        EntryField::Commands,
        EntryField::Notes,
    ];

    /// SQLite column backing this field.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Keywords => "keywords",
            Self::AttackStep => "attack_step",
            Self::Explanation => "explanation",
            Self::Commands => "commands",
            Self::Notes => "notes",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Keywords => "Keywords",
            Self::AttackStep => "Attack Step",
            Self::Explanation => "Explanation",
            Self::Commands => "Commands",
            Self::Notes => "Notes",
        }
    }

    /// Parses a column name back into a field.
    pub fn from_column(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == value)
    }

    /// Whether literal `\n` escapes are expanded for this field.
    pub fn expands_newline_escapes(self) -> bool {
        matches!(self, Self::Explanation | Self::Commands | Self::Notes)
    }
}

impl Display for EntryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Persisted cheatsheet entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub keywords: String,
    pub attack_step: String,
    pub explanation: String,
    pub commands: String,
    pub notes: String,
    /// SQLite `CURRENT_TIMESTAMP` text (UTC), set once on insert.
    pub created_at: String,
    /// SQLite `CURRENT_TIMESTAMP` text (UTC), refreshed on every field update.
    pub updated_at: String,
}

impl Entry {
    /// Returns the current value of one editable field.
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Title => &self.title,
            EntryField::Keywords => &self.keywords,
            EntryField::AttackStep => &self.attack_step,
            EntryField::Explanation => &self.explanation,
            EntryField::Commands => &self.commands,
            EntryField::Notes => &self.notes,
        }
    }
}

/// Field values for an entry that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub keywords: String,
    pub attack_step: String,
    pub explanation: String,
    pub commands: String,
    pub notes: String,
}

impl NewEntry {
    /// Returns the value of one field.
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Title => &self.title,
            EntryField::Keywords => &self.keywords,
            EntryField::AttackStep => &self.attack_step,
            EntryField::Explanation => &self.explanation,
            EntryField::Commands => &self.commands,
            EntryField::Notes => &self.notes,
        }
    }

    /// Sets one field by enum.
    pub fn set_field(&mut self, field: EntryField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EntryField::Title => self.title = value,
            EntryField::Keywords => self.keywords = value,
            EntryField::AttackStep => self.attack_step = value,
            EntryField::Explanation => self.explanation = value,
            EntryField::Commands => self.commands = value,
            EntryField::Notes => self.notes = value,
        }
    }

    /// Applies [`normalize_field_value`] to every field.
    pub fn normalized(&self) -> Result<NewEntry, EntryValidationError> {
        let mut normalized = NewEntry::default();
        for field in EntryField::ALL {
            normalized.set_field(field, normalize_field_value(field, self.field(field))?);
        }
        Ok(normalized)
    }

    /// Checks persistence invariants without modifying values.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_field_value(EntryField::Title, &self.title)?;
        validate_field_value(EntryField::Notes, &self.notes)
    }
}

/// Validation failures for entry writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyTitle,
    EmptyNotes,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyNotes => write!(f, "notes cannot be empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// Replaces the two-character sequence `\n` with a real newline.
pub fn expand_newline_escapes(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// Turns raw user input into the stored value for `field`.
///
/// - Blank title is rejected.
/// - Blank notes become [`NOTES_PLACEHOLDER`].
/// - Explanation, commands and notes get `\n` escapes expanded.
pub fn normalize_field_value(
    field: EntryField,
    raw: &str,
) -> Result<String, EntryValidationError> {
    match field {
        EntryField::Title if raw.trim().is_empty() => Err(EntryValidationError::EmptyTitle),
        EntryField::Notes if raw.trim().is_empty() => Ok(NOTES_PLACEHOLDER.to_string()),
        field if field.expands_newline_escapes() => Ok(expand_newline_escapes(raw)),
        _ => Ok(raw.to_string()),
    }
}

/// Checks the stored-value invariants for one field.
pub fn validate_field_value(field: EntryField, value: &str) -> Result<(), EntryValidationError> {
    match field {
        EntryField::Title if value.trim().is_empty() => Err(EntryValidationError::EmptyTitle),
        EntryField::Notes if value.is_empty() => Err(EntryValidationError::EmptyNotes),
        _ => Ok(()),
    }
}
