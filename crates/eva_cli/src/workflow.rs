//! Interactive entry workflows.
//!
//! # Responsibility
//! - Drive add/view/modify/delete/search on top of [`EntryService`].
//! - Report every storage failure to the user and return to the caller.
//!
//! # Invariants
//! - Only [`PromptError`] leaves a workflow; storage errors never do.
//! - Delete runs only after a yes/no confirmation and a matching
//!   verification code.
//! - Modify redisplays the entry without offering modify again.
//!
//! [`PromptError`]: crate::prompt::PromptError

use crate::prompt::{PromptResult, Prompter};
use crate::render;
use eva_core::{
    normalize_field_value, EntryField, EntryId, EntryRepository, EntryService, NewEntry,
    RepoError, SearchQuery,
};
use log::{info, warn};
use rand::{Rng, RngCore};
use std::io::Write;

const VERIFICATION_CODE_MIN: u16 = 1000;
const VERIFICATION_CODE_MAX: u16 = 9999;

const MODIFY_DELETE_CHOICE: &str = "7";
const MODIFY_CANCEL_CHOICE: &str = "8";

/// Add prompts, in the order fields are asked for.
const ADD_PROMPTS: [(EntryField, &str); 6] = [
    (EntryField::Title, "Title: "),
    (EntryField::Keywords, "Keywords (comma-separated): "),
    (EntryField::AttackStep, "Attack Step: "),
    (EntryField::Explanation, "Explanation (use \\n for new lines): "),
    (EntryField::Commands, "Commands (use \\n for new lines): "),
    (EntryField::Notes, "Additional Notes: "),
];

/// Draws a fresh 4-digit delete verification code.
pub fn generate_verification_code(rng: &mut dyn RngCore) -> u16 {
    rng.gen_range(VERIFICATION_CODE_MIN..=VERIFICATION_CODE_MAX)
}

/// Parses a user-typed entry id. Anything but a positive integer is `None`.
pub fn parse_entry_id(input: &str) -> Option<EntryId> {
    input.trim().parse::<EntryId>().ok().filter(|id| *id > 0)
}

/// Maps a modify-menu choice (`1`..`6`) to its field.
fn field_for_choice(choice: &str) -> Option<EntryField> {
    let index = choice.trim().parse::<usize>().ok()?;
    EntryField::ALL.get(index.checked_sub(1)?).copied()
}

/// One interactive session's collaborators.
pub struct Workflows<'a, R: EntryRepository> {
    service: EntryService<R>,
    pub(crate) prompter: &'a mut dyn Prompter,
    pub(crate) out: &'a mut dyn Write,
    rng: &'a mut dyn RngCore,
}

impl<'a, R: EntryRepository> Workflows<'a, R> {
    pub fn new(
        service: EntryService<R>,
        prompter: &'a mut dyn Prompter,
        out: &'a mut dyn Write,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            service,
            prompter,
            out,
            rng,
        }
    }

    pub fn service(&self) -> &EntryService<R> {
        &self.service
    }

    /// Prompts for all six fields and stores a new entry.
    pub fn add_entry(&mut self) -> PromptResult<()> {
        render::header(self.out, "Adding New Entry")?;

        let mut draft = NewEntry::default();
        for (field, message) in ADD_PROMPTS {
            let value = self.prompter.read_line(message)?;
            draft.set_field(field, value);
        }

        match self.service.add_entry(&draft) {
            Ok(id) => render::success(self.out, &format!("Entry added successfully (ID {id})"))?,
            Err(RepoError::Validation(err)) => {
                render::warning(self.out, &format!("Entry not saved: {err}."))?
            }
            Err(err) => render::failure(self.out, &format!("Error adding entry: {err}"))?,
        }
        Ok(())
    }

    /// Shows one entry; with `offer_modify`, asks whether to edit it.
    pub fn view_entry(&mut self, id: EntryId, offer_modify: bool) -> PromptResult<()> {
        let entry = match self.service.get_entry(id) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                render::failure(self.out, "Entry not found")?;
                return Ok(());
            }
            Err(err) => {
                render::failure(self.out, &format!("Error loading entry: {err}"))?;
                return Ok(());
            }
        };

        render::entry_details(self.out, &entry)?;

        if offer_modify && self.prompter.confirm("\nWould you like to modify this entry?")? {
            self.modify_entry(id)?;
        }
        Ok(())
    }

    /// Field menu for one entry; also the way into delete.
    pub fn modify_entry(&mut self, id: EntryId) -> PromptResult<()> {
        render::header(self.out, "Modify Entry")?;
        writeln!(self.out, "Which section would you like to modify?")?;
        for (index, field) in EntryField::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {}", index + 1, field.label())?;
        }
        writeln!(self.out, "{MODIFY_DELETE_CHOICE}. Delete Entry")?;
        writeln!(self.out, "{MODIFY_CANCEL_CHOICE}. Cancel")?;

        let choice = self.prompter.read_line("Select an option (1-8): ")?;
        let field = match choice.trim() {
            MODIFY_CANCEL_CHOICE => {
                render::warning(self.out, "Modification cancelled.")?;
                return Ok(());
            }
            MODIFY_DELETE_CHOICE => return self.delete_entry(id),
            other => match field_for_choice(other) {
                Some(field) => field,
                None => {
                    render::warning(self.out, "Invalid choice. Modification cancelled.")?;
                    return Ok(());
                }
            },
        };

        let current = match self.service.get_field(id, field) {
            Ok(Some(value)) => value,
            Ok(None) => {
                render::failure(self.out, "Entry not found")?;
                return Ok(());
            }
            Err(err) => {
                let message = format!("Error retrieving current content: {err}");
                render::failure(self.out, &message)?;
                return Ok(());
            }
        };

        render::header(self.out, "Current content:")?;
        writeln!(self.out, "{current}")?;

        let raw = self.prompter.read_line("\nEnter new content: ")?;
        if let Err(err) = normalize_field_value(field, &raw) {
            render::warning(self.out, &format!("Modification cancelled: {err}."))?;
            return Ok(());
        }

        if !self.prompter.confirm("\nDo you want to save these changes?")? {
            render::warning(self.out, "Modification cancelled.")?;
            return Ok(());
        }

        match self.service.update_field(id, field, &raw) {
            Ok(_) => {
                render::success(self.out, "Entry updated successfully")?;
                self.view_entry(id, false)
            }
            Err(err) => {
                render::failure(self.out, &format!("Error updating entry: {err}"))?;
                Ok(())
            }
        }
    }

    /// Two-step confirmed delete followed by reindexing.
    pub fn delete_entry(&mut self, id: EntryId) -> PromptResult<()> {
        render::failure(
            self.out,
            "\nWarning: This will permanently delete the entry.",
        )?;
        if !self.prompter.confirm("Are you sure?")? {
            render::warning(self.out, "Deletion cancelled.")?;
            return Ok(());
        }

        let code = generate_verification_code(self.rng);
        render::failure(
            self.out,
            &format!("\nTo confirm deletion, please enter this 4-digit code: {code}"),
        )?;

        let typed = self.prompter.read_line("Enter verification code: ")?;
        if typed != code.to_string() {
            warn!("event=entry_delete module=cli status=rejected id={id} reason=code_mismatch");
            render::failure(self.out, "Incorrect verification code. Deletion cancelled.")?;
            return Ok(());
        }

        match self.service.delete_entry(id) {
            Ok(()) => render::success(
                self.out,
                "Entry successfully deleted and database reindexed.",
            )?,
            Err(RepoError::NotFound(_)) => render::failure(self.out, "No entry found with that ID.")?,
            Err(err) => render::failure(self.out, &format!("Error deleting entry: {err}"))?,
        }
        Ok(())
    }

    /// Whitespace-separated term search with optional drill-down.
    pub fn search_entries(&mut self) -> PromptResult<()> {
        render::header(self.out, "Search Entries")?;
        let input = self
            .prompter
            .read_line("Enter search terms (separate multiple terms with spaces): ")?;
        let query = SearchQuery::from_input(&input);

        let entries = match self.service.search(&query) {
            Ok(entries) => entries,
            Err(err) => {
                render::failure(self.out, &format!("Error searching entries: {err}"))?;
                return Ok(());
            }
        };
        info!(
            "event=entry_search module=cli status=ok terms={} hits={}",
            query.terms.len(),
            entries.len()
        );

        render::search_table(self.out, &entries)?;
        if entries.is_empty() {
            render::warning(self.out, "No entries found.")?;
            return Ok(());
        }

        if self
            .prompter
            .confirm("\nWould you like to see full details of any entry?")?
        {
            let typed = self.prompter.read_line("Enter entry ID: ")?;
            match parse_entry_id(&typed) {
                Some(id) => self.view_entry(id, true)?,
                None => render::failure(self.out, "Entry not found")?,
            }
        }
        Ok(())
    }
}
