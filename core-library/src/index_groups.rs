//! Alphabetical index groups
//!
//! The group definition is a whitespace separated list. A plain entry such as
//! `A` is a prefix mapped to itself; an entry such as `X-Z(XYZ)` maps each of
//! the characters between the parentheses to the group name before them.

use crate::error::{LibraryError, Result};

/// Key used for names that match no configured group
pub const UNMATCHED_GROUP: &str = "#";

/// Parsed index group definition, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroups {
    /// (lower-cased prefix, group name)
    entries: Vec<(String, String)>,
}

impl IndexGroups {
    /// Parses a group definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the definition has no entries.
    pub fn parse(definition: &str) -> Result<Self> {
        let groups = Self::parse_entries(definition);
        if groups.entries.is_empty() {
            return Err(LibraryError::InvalidInput {
                field: "index_groups".to_string(),
                message: "at least one index group is required".to_string(),
            });
        }
        Ok(groups)
    }

    fn parse_entries(definition: &str) -> Self {
        let mut entries = Vec::new();

        for entry in definition.split_whitespace() {
            match entry.find('(') {
                Some(open) if entry.ends_with(')') => {
                    let name = &entry[..open];
                    let chars = &entry[open + 1..entry.len() - 1];
                    for c in chars.chars() {
                        entries.push((c.to_lowercase().collect(), name.to_string()));
                    }
                }
                _ => entries.push((entry.to_lowercase(), entry.to_string())),
            }
        }

        Self { entries }
    }

    /// Group name for a source name, or [`UNMATCHED_GROUP`]
    pub fn key_for(&self, name: &str) -> &str {
        let lower = name.to_lowercase();
        self.entries
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix.as_str()))
            .map(|(_, group)| group.as_str())
            .unwrap_or(UNMATCHED_GROUP)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for IndexGroups {
    fn default() -> Self {
        Self::parse_entries(core_runtime::config::DEFAULT_INDEX_GROUPS)
    }
}
