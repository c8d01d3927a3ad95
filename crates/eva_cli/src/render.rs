//! Terminal rendering for entries and status lines.
//!
//! Colours: cyan labels, blue headers, green success, yellow warnings,
//! red errors.

use colored::Colorize;
use eva_core::Entry;
use std::io::{self, Write};

/// Column width in the search table.
pub const COLUMN_WIDTH: usize = 30;
const ELLIPSIS: &str = "...";

/// Cuts `value` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut cut = value.chars().take(keep).collect::<String>();
    cut.push_str(ELLIPSIS);
    cut
}

pub fn header(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out, "\n{}", text.blue())
}

pub fn success(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out, "{}", text.green())
}

pub fn warning(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out, "{}", text.yellow())
}

pub fn failure(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out, "{}", text.red())
}

/// Prints every field of `entry`, timestamps included.
pub fn entry_details(out: &mut dyn Write, entry: &Entry) -> io::Result<()> {
    header(out, "Entry Details")?;
    writeln!(out, "{} {}", "ID:".cyan(), entry.id)?;
    writeln!(out, "{} {}", "Title:".cyan(), entry.title)?;
    writeln!(out, "{} {}", "Keywords:".cyan(), entry.keywords)?;
    writeln!(out, "{} {}", "Attack Step:".cyan(), entry.attack_step)?;
    writeln!(out, "{} {}", "Explanation:".cyan(), entry.explanation)?;
    writeln!(out, "{}\n{}", "Commands:".cyan(), entry.commands)?;
    writeln!(out, "{} {}", "Notes:".cyan(), entry.notes)?;
    writeln!(out, "{} {}", "Created:".cyan(), entry.created_at)?;
    writeln!(out, "{} {}", "Last Updated:".cyan(), entry.updated_at)
}

/// Prints the fixed-width summary table header followed by one row per entry.
pub fn search_table(out: &mut dyn Write, entries: &[Entry]) -> io::Result<()> {
    let heading = format!(
        "ID\t{:<width$}\t{:<width$}\t{}",
        "Title",
        "Keywords",
        "Attack Step",
        width = COLUMN_WIDTH
    );
    writeln!(out, "\n{}", heading.cyan())?;
    writeln!(out, "{}", "-".repeat(8 + 3 * (COLUMN_WIDTH + 4)))?;

    for entry in entries {
        writeln!(
            out,
            "{}\t{:<width$}\t{:<width$}\t{:<width$}",
            entry.id,
            truncate(&entry.title, COLUMN_WIDTH),
            truncate(&entry.keywords, COLUMN_WIDTH),
            truncate(&entry.attack_step, COLUMN_WIDTH),
            width = COLUMN_WIDTH
        )?;
    }
    Ok(())
}
