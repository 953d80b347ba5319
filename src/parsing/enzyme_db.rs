//! Parser for tab-separated restriction enzyme databases.
//!
//! One enzyme per line:
//!
//! ```text
//! name  site  length  ncuts  blunt  c1  c2  c3  c4  [organism  [isoschizomers  [suppliers]]]
//! ```
//!
//! Lines starting with `#` and blank lines are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::parsing::{ParseError, RecordPolicy};
use crate::restriction::enzyme::{EnzymeDatabase, RestrictionEnzyme};
use crate::utils::validation::check_record_limit;

/// A record dropped under [`RecordPolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub line: usize,
    pub reason: String,
}

/// Parse an enzyme database file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, and the errors of
/// [`parse_enzyme_text`].
pub fn parse_enzyme_file(path: &Path, policy: RecordPolicy) -> Result<EnzymeDatabase, ParseError> {
    let text = std::fs::read_to_string(path)?;
    let db = parse_enzyme_text(&text, policy)?;
    info!(
        path = %path.display(),
        enzymes = db.len(),
        skipped = db.skipped.len(),
        "Loaded enzyme database"
    );
    Ok(db)
}

/// Parse enzyme records from text.
///
/// # Errors
///
/// Returns `ParseError::EnzymeRecord` for the first malformed record under
/// [`RecordPolicy::Abort`], `ParseError::TooManyRecords` past the record
/// limit, or `ParseError::InvalidFormat` if no enzymes were read.
pub fn parse_enzyme_text(text: &str, policy: RecordPolicy) -> Result<EnzymeDatabase, ParseError> {
    let mut enzymes = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if check_record_limit(enzymes.len()).is_some() {
            return Err(ParseError::TooManyRecords(enzymes.len()));
        }

        match parse_record(line) {
            Ok(enzyme) => enzymes.push(enzyme),
            Err(reason) => match policy {
                RecordPolicy::Abort => {
                    return Err(ParseError::EnzymeRecord {
                        line: line_num,
                        reason,
                    })
                }
                RecordPolicy::Skip => {
                    warn!(line = line_num, %reason, "Skipping malformed enzyme record");
                    skipped.push(SkippedRecord {
                        line: line_num,
                        reason,
                    });
                }
            },
        }
    }

    if enzymes.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No enzymes found in database".to_string(),
        ));
    }

    let mut db = EnzymeDatabase::new(enzymes);
    db.skipped = skipped;
    Ok(db)
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {field} '{value}'"))
}

fn parse_record(line: &str) -> Result<RestrictionEnzyme, String> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() < 9 {
        return Err(format!("expected at least 9 fields, got {}", fields.len()));
    }

    let name = fields[0].trim();
    let site = fields[1].trim();
    let length: usize = parse_field(fields[2], "length")?;
    let ncuts: usize = parse_field(fields[3], "cut count")?;
    let blunt: u8 = parse_field(fields[4], "blunt flag")?;
    let offsets = fields[5..9]
        .iter()
        .map(|f| parse_field::<i64>(f, "cut offset"))
        .collect::<Result<Vec<_>, _>>()?;

    if length != site.len() {
        return Err(format!(
            "length {length} does not match site '{site}' ({} bases)",
            site.len()
        ));
    }
    if ncuts != 2 && ncuts != 4 {
        return Err(format!("cut count must be 2 or 4, got {ncuts}"));
    }
    if blunt > 1 {
        return Err(format!("blunt flag must be 0 or 1, got {blunt}"));
    }

    let mut enzyme =
        RestrictionEnzyme::new(name, site, &offsets[..ncuts]).map_err(|e| e.to_string())?;
    if enzyme.blunt != (blunt == 1) {
        return Err(format!(
            "blunt flag {blunt} contradicts cut offsets {:?}",
            enzyme.cuts
        ));
    }

    let optional = |i: usize| {
        fields
            .get(i)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
    };
    enzyme.organism = optional(9).map(str::to_string);
    enzyme.isoschizomers = optional(10)
        .map(|f| {
            f.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    enzyme.suppliers = optional(11).unwrap_or_default().to_string();

    Ok(enzyme)
}
