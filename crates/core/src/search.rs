//! Case-insensitive substring search over the terminology table.

use crate::table::{TerminologyEntry, TerminologyTable};

impl TerminologyTable {
    /// Find every entry whose `namaste_term` contains `query`, ignoring case.
    ///
    /// An empty or absent query yields no results rather than the whole table, so clients may
    /// call this on every keystroke. Results follow table order; there is no ranking and no
    /// result cap.
    pub fn search(&self, query: Option<&str>) -> Vec<&TerminologyEntry> {
        let needle = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return Vec::new(),
        };

        self.iter()
            .filter(|entry| entry.namaste_term.to_lowercase().contains(&needle))
            .collect()
    }
}
