//! Parser for enzyme name equivalence tables.
//!
//! Each line maps an enzyme name to the name that should be reported in its
//! place: `name preferred`, separated by whitespace.

use std::collections::HashMap;
use std::path::Path;

use crate::parsing::ParseError;
use crate::utils::validation::check_record_limit;

/// Enzyme name substitutions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Equivalences {
    preferred: HashMap<String, String>,
}

impl Equivalences {
    /// Preferred name for `name`, or `name` itself when none is listed
    #[must_use]
    pub fn preferred<'a>(&'a self, name: &'a str) -> &'a str {
        self.preferred.get(name).map_or(name, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.preferred.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, preferred: impl Into<String>) {
        self.preferred.insert(name.into(), preferred.into());
    }
}

/// Parse an equivalence table file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_equivalence_text`].
pub fn parse_equivalence_file(path: &Path) -> Result<Equivalences, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_equivalence_text(&text)
}

/// Parse an equivalence table
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for a line without exactly two
/// names, or `ParseError::TooManyRecords` past the record limit.
pub fn parse_equivalence_text(text: &str) -> Result<Equivalences, ParseError> {
    let mut table = Equivalences::default();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if check_record_limit(table.len()).is_some() {
            return Err(ParseError::TooManyRecords(table.len()));
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [name, preferred] = fields[..] else {
            return Err(ParseError::InvalidFormat(format!(
                "Line {}: expected 'name preferred', got '{trimmed}'",
                idx + 1
            )));
        };
        table.insert(name, preferred);
    }

    Ok(table)
}
