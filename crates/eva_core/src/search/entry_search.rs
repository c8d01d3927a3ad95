//! Multi-term substring search over entries.
//!
//! # Responsibility
//! - Match every term (AND) against any of the six text fields (OR).
//! - Return full entries in id order.
//!
//! # Invariants
//! - Matching is a case-sensitive literal substring test (`instr`), so `%`
//!   and `_` in terms have no wildcard meaning.
//! - Zero terms matches every entry.

use crate::model::entry::{Entry, EntryField};
use crate::repo::entry_repo::{parse_entry_row, RepoResult, ENTRY_SELECT_SQL};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::time::Instant;

/// Ordered search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: Vec<String>,
}

impl SearchQuery {
    /// Creates a query from already split terms. Empty terms are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|term: &String| !term.is_empty())
                .collect(),
        }
    }

    /// Splits one input line on whitespace.
    pub fn from_input(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Returns all entries matching `query`, ordered by id.
pub fn search_entries(conn: &Connection, query: &SearchQuery) -> RepoResult<Vec<Entry>> {
    let started_at = Instant::now();
    let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::with_capacity(query.terms.len());

    for (index, term) in query.terms.iter().enumerate() {
        sql.push_str(&term_clause(index + 1));
        bind_values.push(Value::Text(term.clone()));
    }
    sql.push_str(" ORDER BY id ASC;");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut entries = Vec::new();

    while let Some(row) = rows.next()? {
        entries.push(parse_entry_row(row)?);
    }

    debug!(
        "event=entry_search module=search status=ok terms={} hits={} duration_ms={}",
        query.terms.len(),
        entries.len(),
        started_at.elapsed().as_millis()
    );
    Ok(entries)
}

fn term_clause(param_index: usize) -> String {
    let alternatives = EntryField::ALL
        .iter()
        .map(|field| format!("instr({}, ?{param_index}) > 0", field.column()))
        .collect::<Vec<_>>();
    format!(" AND ({})", alternatives.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::{term_clause, SearchQuery};

    #[test]
    fn from_input_splits_on_any_whitespace() {
        let query = SearchQuery::from_input("  nmap \t smb\nscan ");
        assert_eq!(query.terms, vec!["nmap", "smb", "scan"]);
        assert!(SearchQuery::from_input("   ").is_empty());
    }

    #[test]
    fn term_clause_covers_every_field_with_one_placeholder() {
        let clause = term_clause(2);
        assert_eq!(clause.matches("?2").count(), 6);
        assert!(clause.contains("instr(attack_step, ?2) > 0"));
        assert!(clause.starts_with(" AND ("));
    }
}
