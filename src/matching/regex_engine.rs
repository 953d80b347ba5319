use std::fmt::Write as _;

use regex::bytes::{Regex, RegexBuilder};
use tracing::debug;

use crate::matching::engine::{RawHit, ScanError, SearchEngine};
use crate::pattern::atom::{Atom, AtomKind};
use crate::pattern::Pattern;

/// Compiled program size ceiling for translated patterns
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Exact search through a translated byte regular expression.
///
/// Matches are leftmost-first and non-overlapping; repeat ranges are greedy.
#[derive(Debug, Clone)]
pub struct RegexEngine {
    regex: Regex,
}

impl RegexEngine {
    /// Translate and compile; `None` if the program exceeds the size limit.
    #[must_use]
    pub fn new(pattern: &Pattern) -> Option<Self> {
        let source = translate(pattern);
        match RegexBuilder::new(&source)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                debug!(pattern = %pattern, error = %e, "Regular expression rejected");
                None
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Render a pattern as a byte regex with Unicode disabled
#[must_use]
pub fn translate(pattern: &Pattern) -> String {
    let mut out = String::from("(?s-u)");
    if pattern.properties.anchored_start {
        out.push('^');
    }
    for atom in &pattern.atoms {
        push_atom(&mut out, atom);
    }
    if pattern.properties.anchored_end {
        out.push('$');
    }
    out
}

fn push_byte(out: &mut String, byte: u8) {
    if byte.is_ascii_alphanumeric() {
        out.push(char::from(byte));
    } else {
        let _ = write!(out, "\\x{byte:02X}");
    }
}

fn push_atom(out: &mut String, atom: &Atom) {
    match atom.kind {
        AtomKind::Literal(c) => push_byte(out, c),
        AtomKind::Class(set) => {
            out.push('[');
            set.iter().for_each(|c| push_byte(out, c));
            out.push(']');
        }
        AtomKind::Complement(set) => {
            out.push_str("[^");
            set.iter().for_each(|c| push_byte(out, c));
            out.push(']');
        }
        AtomKind::DontCare => out.push('.'),
    }
    let repeat = atom.repeat;
    if repeat.is_fixed() {
        if repeat.min != 1 {
            let _ = write!(out, "{{{}}}", repeat.min);
        }
    } else {
        let _ = write!(out, "{{{},{}}}", repeat.min, repeat.max);
    }
}

impl SearchEngine for RegexEngine {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        hits.extend(self.regex.find_iter(text).map(|m| RawHit {
            start: m.start(),
            length: m.len(),
            mismatches: 0,
        }));
        Ok(())
    }
}
