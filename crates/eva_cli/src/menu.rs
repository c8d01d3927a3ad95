//! Top-level menu loop.
//!
//! # Invariants
//! - Unrecognized input redraws the menu without any message.
//! - The loop ends on Exit or on the first prompt error.

use crate::prompt::PromptResult;
use crate::render;
use crate::workflow::Workflows;
use eva_core::EntryRepository;
use log::info;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    Add,
    Exit,
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Search),
        "2" => Some(MenuChoice::Add),
        "3" => Some(MenuChoice::Exit),
        _ => None,
    }
}

fn print_menu(out: &mut dyn Write) -> std::io::Result<()> {
    render::header(out, "EVA - Cheatsheet/Notes Database Tool")?;
    writeln!(out, "1. Search database")?;
    writeln!(out, "2. Add entry")?;
    writeln!(out, "3. Exit")
}

/// Runs the menu until the user exits. Prompt errors are returned as-is so
/// the caller can tell an interrupt from an i/o failure.
pub fn run_menu<R: EntryRepository>(workflows: &mut Workflows<'_, R>) -> PromptResult<()> {
    loop {
        print_menu(workflows.out)?;
        let input = workflows.prompter.read_line("\nSelect an option (1-3): ")?;

        match parse_menu_choice(&input) {
            Some(MenuChoice::Search) => workflows.search_entries()?,
            Some(MenuChoice::Add) => workflows.add_entry()?,
            Some(MenuChoice::Exit) => {
                info!("event=session_end module=cli status=ok reason=exit");
                render::success(workflows.out, "Goodbye!")?;
                return Ok(());
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompter;
    use crate::prompt::PromptError;
    use eva_core::db::open_db_in_memory;
    use eva_core::{EntryService, SqliteEntryRepository};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(answers: &[&str]) -> (PromptResult<()>, String, ScriptedPrompter, u64) {
        colored::control::set_override(false);
        let conn = open_db_in_memory().unwrap();
        let mut prompter = ScriptedPrompter::new(answers);
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);

        let result = {
            let mut workflows = Workflows::new(
                EntryService::new(SqliteEntryRepository::new(&conn)),
                &mut prompter,
                &mut out,
                &mut rng,
            );
            run_menu(&mut workflows)
        };
        let count = SqliteEntryRepository::new(&conn).count_entries().unwrap();
        (result, String::from_utf8(out).unwrap(), prompter, count)
    }

    #[test]
    fn parse_menu_choice_maps_three_options() {
        assert_eq!(parse_menu_choice("1"), Some(MenuChoice::Search));
        assert_eq!(parse_menu_choice(" 2 "), Some(MenuChoice::Add));
        assert_eq!(parse_menu_choice("3"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("4"), None);
        assert_eq!(parse_menu_choice(""), None);
    }

    #[test]
    fn exit_says_goodbye() {
        let (result, output, _, _) = run(&["3"]);

        assert!(result.is_ok());
        assert!(output.contains("EVA - Cheatsheet/Notes Database Tool"));
        assert!(output.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn invalid_choice_redraws_menu_silently() {
        let (result, output, prompter, _) = run(&["9", "abc", "3"]);

        assert!(result.is_ok());
        assert_eq!(prompter.prompts.len(), 3);
        assert_eq!(output.matches("1. Search database").count(), 3);
    }

    #[test]
    fn add_then_exit_persists_entry() {
        let (result, output, _, count) = run(&["2", "nmap", "recon", "scan", "", "nmap -sV", "", "3"]);

        assert!(result.is_ok());
        assert!(output.contains("Entry added successfully"));
        assert_eq!(count, 1);
    }

    #[test]
    fn closed_input_ends_the_loop_with_an_error() {
        let (result, _, _, _) = run(&["1"]);

        let err = result.unwrap_err();
        assert!(matches!(err, PromptError::Closed));
        assert!(err.ends_session());
    }
}
