//! Parser for fingerprint databases.
//!
//! Each fingerprint is a run of lines:
//!
//! ```text
//! code
//! accession
//! title
//! element count
//! ```
//!
//! followed, for every element, by its length, percent threshold and
//! maximum score on separate lines and then 26 matrix rows (`A` to `Z`) of
//! whitespace-separated integers. Lines starting with `#` and blank lines
//! are ignored.

use std::path::Path;

use tracing::{info, warn};

use crate::fingerprint::{Element, Fingerprint, MATRIX_ROWS};
use crate::parsing::enzyme_db::SkippedRecord;
use crate::parsing::{ParseError, RecordPolicy};
use crate::utils::validation::check_record_limit;

/// Fingerprints read from a database, plus any skipped under
/// [`RecordPolicy::Skip`]
#[derive(Debug, Clone, Default)]
pub struct FingerprintDatabase {
    pub fingerprints: Vec<Fingerprint>,
    pub skipped: Vec<SkippedRecord>,
}

struct Lines<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
            .collect();
        Self {
            lines,
            pos: 0,
            last_line: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn next_line(&mut self, what: &str) -> Result<&'a str, (usize, String)> {
        let Some(&(n, line)) = self.lines.get(self.pos) else {
            return Err((self.last_line, format!("unexpected end of file, expected {what}")));
        };
        self.pos += 1;
        self.last_line = n;
        Ok(line)
    }

    fn next_number<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, (usize, String)> {
        let line = self.next_line(what)?;
        line.parse()
            .map_err(|_| (self.last_line, format!("invalid {what} '{line}'")))
    }

    /// Advance to the next run of lines shaped like a fingerprint header
    fn skip_to_next_header(&mut self) {
        while self.pos < self.lines.len() && !self.at_header(self.pos) {
            self.pos += 1;
        }
    }

    /// Code, accession, title and a positive element count from line `i`
    fn at_header(&self, i: usize) -> bool {
        let line = |offset: usize| self.lines.get(i + offset).map(|&(_, l)| l);
        line(0).is_some_and(looks_like_code)
            && line(1).is_some_and(looks_like_accession)
            && line(2).is_some()
            && line(3)
                .and_then(|l| l.parse::<usize>().ok())
                .is_some_and(|count| count > 0)
    }
}

/// Fingerprint codes are a single token of letters, digits and underscores
/// starting with a letter; matrix rows and numbers never look like that.
fn looks_like_code(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !line.chars().all(|c| c.is_ascii_digit())
}

/// Accessions are letters followed by digits, e.g. `PR00048`
fn looks_like_accession(line: &str) -> bool {
    let digits = line.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    digits.len() < line.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Parse a fingerprint database file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, and the errors of
/// [`parse_fingerprint_text`].
pub fn parse_fingerprint_file(
    path: &Path,
    policy: RecordPolicy,
) -> Result<FingerprintDatabase, ParseError> {
    let text = std::fs::read_to_string(path)?;
    let db = parse_fingerprint_text(&text, policy)?;
    info!(
        path = %path.display(),
        fingerprints = db.fingerprints.len(),
        skipped = db.skipped.len(),
        "Loaded fingerprint database"
    );
    Ok(db)
}

/// Parse fingerprints from text.
///
/// # Errors
///
/// Returns `ParseError::FingerprintRecord` for the first malformed
/// fingerprint under [`RecordPolicy::Abort`], `ParseError::TooManyRecords`
/// past the record limit, or `ParseError::InvalidFormat` if nothing was read.
pub fn parse_fingerprint_text(
    text: &str,
    policy: RecordPolicy,
) -> Result<FingerprintDatabase, ParseError> {
    let mut lines = Lines::new(text);
    let mut db = FingerprintDatabase::default();

    while !lines.is_done() {
        if check_record_limit(db.fingerprints.len()).is_some() {
            return Err(ParseError::TooManyRecords(db.fingerprints.len()));
        }
        match parse_fingerprint(&mut lines) {
            Ok(fingerprint) => db.fingerprints.push(fingerprint),
            Err((line, reason)) => match policy {
                RecordPolicy::Abort => return Err(ParseError::FingerprintRecord { line, reason }),
                RecordPolicy::Skip => {
                    warn!(line, %reason, "Skipping malformed fingerprint");
                    db.skipped.push(SkippedRecord { line, reason });
                    lines.skip_to_next_header();
                }
            },
        }
    }

    if db.fingerprints.is_empty() && db.skipped.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No fingerprints found in database".to_string(),
        ));
    }
    Ok(db)
}

fn parse_fingerprint(lines: &mut Lines<'_>) -> Result<Fingerprint, (usize, String)> {
    let code = lines.next_line("fingerprint code")?.to_string();
    if !looks_like_code(&code) {
        return Err((lines.last_line, format!("invalid fingerprint code '{code}'")));
    }
    let accession = lines.next_line("accession")?.to_string();
    let title = lines.next_line("title")?.to_string();
    let count: usize = lines.next_number("element count")?;
    if count == 0 {
        return Err((lines.last_line, format!("fingerprint {code} has no elements")));
    }

    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let length: usize = lines.next_number("element length")?;
        let threshold: i64 = lines.next_number("threshold")?;
        let max_score: i64 = lines.next_number("maximum score")?;
        let mut rows = Vec::with_capacity(MATRIX_ROWS);
        for _ in 0..MATRIX_ROWS {
            let line = lines.next_line("matrix row")?;
            let row = line
                .split_whitespace()
                .map(str::parse::<i64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| (lines.last_line, format!("invalid matrix value: {e}")))?;
            rows.push(row);
        }
        let element = Element::new(length, threshold, max_score, rows)
            .map_err(|reason| (lines.last_line, reason))?;
        elements.push(element);
    }

    Ok(Fingerprint {
        code,
        accession,
        title,
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Text for a single-element fingerprint whose matrix favours `letter`
    fn record(code: &str, letter: u8, length: usize) -> String {
        let mut text = format!("{code}\nPR00001\nTest print {code}\n1\n{length}\n80\n{}\n", 10 * length);
        for row in 0..MATRIX_ROWS {
            let value = if row == usize::from(letter - b'A') { 10 } else { 0 };
            let cols: Vec<String> = (0..length).map(|_| value.to_string()).collect();
            text.push_str(&cols.join(" "));
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_fingerprints() {
        let text = format!("# test db\n{}\n{}", record("WPRINT", b'W', 3), record("CPRINT", b'C', 2));
        let db = parse_fingerprint_text(&text, RecordPolicy::Abort).unwrap();
        assert_eq!(db.fingerprints.len(), 2);

        let fp = &db.fingerprints[0];
        assert_eq!(fp.code, "WPRINT");
        assert_eq!(fp.accession, "PR00001");
        assert_eq!(fp.title, "Test print WPRINT");
        assert_eq!(fp.elements.len(), 1);
        assert_eq!(fp.elements[0].length, 3);
        assert_eq!(fp.elements[0].threshold, 80);
        assert_eq!(fp.elements[0].score(b"WWW"), 30);
    }

    #[test]
    fn test_truncated_record() {
        let text = record("WPRINT", b'W', 3);
        let truncated: String = text.lines().take(10).collect::<Vec<_>>().join("\n");
        let err = parse_fingerprint_text(&truncated, RecordPolicy::Abort).unwrap_err();
        assert!(matches!(err, ParseError::FingerprintRecord { .. }));
    }

    #[test]
    fn test_skip_bad_fingerprint() {
        let bad = record("BADPRINT", b'W', 3).replacen("\n3\n", "\n4\n", 1);
        let text = format!("{bad}{}", record("CPRINT", b'C', 2));
        let db = parse_fingerprint_text(&text, RecordPolicy::Skip).unwrap();
        assert_eq!(db.fingerprints.len(), 1);
        assert_eq!(db.fingerprints[0].code, "CPRINT");
        assert_eq!(db.skipped.len(), 1);
    }

    #[test]
    fn test_skip_bad_code_resyncs_on_full_header() {
        // the accession and one-word title of the bad record look like codes
        let bad = record("BAD PRINT", b'W', 3).replace("Test print BAD PRINT", "Kinase");
        let good = record("CPRINT", b'C', 2).replace("Test print CPRINT", "Zinc");
        let text = format!("{bad}{good}{}", record("WPRINT", b'W', 3));
        let db = parse_fingerprint_text(&text, RecordPolicy::Skip).unwrap();
        let codes: Vec<&str> = db.fingerprints.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["CPRINT", "WPRINT"]);
        assert_eq!(db.fingerprints[0].title, "Zinc");
        assert_eq!(db.skipped.len(), 1);
        assert_eq!(db.skipped[0].line, 1);
    }

    #[test]
    fn test_accession_shape() {
        assert!(looks_like_accession("PR00048"));
        assert!(!looks_like_accession("Kinase"));
        assert!(!looks_like_accession("00048"));
        assert!(!looks_like_accession("PR 00048"));
    }

    #[test]
    fn test_code_shape() {
        assert!(looks_like_code("PR00001"));
        assert!(looks_like_code("TESTPRINT"));
        assert!(!looks_like_code("10 0 0"));
        assert!(!looks_like_code("42"));
    }
}
