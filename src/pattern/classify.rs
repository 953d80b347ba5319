//! Pattern text cleaning, grammar validation and feature detection.

use crate::core::alphabet::SeqType;
use crate::core::bits::SymbolSet;
use crate::pattern::atom::{Atom, AtomKind, Repeat};
use crate::pattern::{Pattern, PatternError, PatternProperties};
use crate::utils::validation::{MAX_PATTERN_ATOMS, MAX_REPEAT};

/// Uppercase, drop whitespace and PROSITE `-` separators, and drop one
/// terminating `.`
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if out.ends_with('.') {
        out.pop();
    }
    out
}

/// Parse and classify a pattern.
///
/// # Errors
///
/// Returns a [`PatternError`] describing the first grammar violation found.
pub fn classify(raw: &str, seq_type: SeqType) -> Result<Pattern, PatternError> {
    let normalized = normalize(raw);
    let text = normalized.as_bytes();

    let mut body_start = 0;
    let mut body_end = text.len();
    let anchored_start = text.first() == Some(&b'<');
    if anchored_start {
        body_start = 1;
    }
    let anchored_end = body_end > body_start && text[body_end - 1] == b'>';
    if anchored_end {
        body_end -= 1;
    }
    if body_start >= body_end {
        return Err(PatternError::Empty);
    }

    let parsed = Parser {
        pattern: &normalized,
        text,
        end: body_end,
        seq_type,
    }
    .parse(body_start)?;

    let atoms = expand_fixed_repeats(&normalized, parsed)?;
    if atoms.is_empty() {
        return Err(PatternError::Empty);
    }
    if atoms.iter().all(|a| a.repeat.min == 0) {
        return Err(PatternError::ZeroLength {
            pattern: normalized,
        });
    }

    let canonical: String = atoms
        .iter()
        .map(|a| a.render(seq_type.dont_care()))
        .collect();

    let properties = PatternProperties {
        anchored_start,
        anchored_end,
        has_class: atoms.iter().any(|a| matches!(a.kind, AtomKind::Class(_))),
        has_complement: atoms
            .iter()
            .any(|a| matches!(a.kind, AtomKind::Complement(_))),
        has_dont_care: atoms.iter().any(|a| a.kind == AtomKind::DontCare),
        has_range: atoms.iter().any(Atom::is_ranged),
        real_length: atoms.len(),
        encoded_length: canonical.len(),
    };

    Ok(Pattern {
        raw: raw.to_string(),
        normalized,
        canonical,
        seq_type,
        atoms,
        properties,
    })
}

/// Replace every fixed repeat `(n)` by `n` consecutive single atoms
fn expand_fixed_repeats(pattern: &str, atoms: Vec<Atom>) -> Result<Vec<Atom>, PatternError> {
    let mut expanded = Vec::with_capacity(atoms.len());
    for atom in atoms {
        let copies = if atom.repeat.is_fixed() { atom.repeat.min } else { 1 };
        if expanded.len() + copies > MAX_PATTERN_ATOMS {
            return Err(PatternError::RepeatTooLarge {
                pattern: pattern.to_string(),
                count: expanded.len() + copies,
                limit: MAX_PATTERN_ATOMS,
            });
        }
        if atom.repeat.is_fixed() {
            expanded.extend(std::iter::repeat(Atom::once(atom.kind)).take(copies));
        } else {
            expanded.push(atom);
        }
    }
    Ok(expanded)
}

struct Parser<'a> {
    pattern: &'a str,
    text: &'a [u8],
    end: usize,
    seq_type: SeqType,
}

impl Parser<'_> {
    fn parse(&self, start: usize) -> Result<Vec<Atom>, PatternError> {
        let mut atoms: Vec<Atom> = Vec::new();
        // Whether the most recent atom already carries an explicit repeat
        let mut repeated = false;
        let mut i = start;

        while i < self.end {
            let c = self.text[i];
            match c {
                b'[' | b'{' => {
                    let (set, next) = self.parse_class(i)?;
                    let kind = if c == b'[' {
                        AtomKind::Class(set)
                    } else {
                        AtomKind::Complement(set)
                    };
                    atoms.push(Atom::once(kind));
                    repeated = false;
                    i = next;
                }
                b'(' => {
                    let (repeat, next) = self.parse_repeat(i)?;
                    match atoms.last_mut() {
                        Some(atom) if !repeated => atom.repeat = repeat,
                        _ => return Err(self.misplaced_repeat(i)),
                    }
                    repeated = true;
                    i = next;
                }
                b']' | b'}' | b')' => return Err(self.unbalanced(i, c)),
                b'<' | b'>' => {
                    return Err(PatternError::MisplacedAnchor {
                        pattern: self.pattern.to_string(),
                        position: i,
                    })
                }
                _ => {
                    atoms.push(Atom::once(self.residue(i, c)?));
                    repeated = false;
                    i += 1;
                }
            }
        }

        Ok(atoms)
    }

    /// Atom kind for a residue letter outside any class
    fn residue(&self, position: usize, c: u8) -> Result<AtomKind, PatternError> {
        if c == self.seq_type.dont_care() {
            return Ok(AtomKind::DontCare);
        }
        if !is_residue(c) {
            return Err(self.invalid_character(position, c));
        }
        Ok(match self.seq_type.ambiguity(c) {
            Some(expansion) => AtomKind::Class(SymbolSet::from_bytes(expansion)),
            None => AtomKind::Literal(c),
        })
    }

    /// Parse `[...]` or `{...}` opened at `open`; returns the set and the
    /// index just past the closing bracket
    fn parse_class(&self, open: usize) -> Result<(SymbolSet, usize), PatternError> {
        let close = if self.text[open] == b'[' { b']' } else { b'}' };
        let mut set = SymbolSet::EMPTY;
        let mut j = open + 1;

        loop {
            if j >= self.end {
                return Err(self.unbalanced(open, self.text[open]));
            }
            let c = self.text[j];
            if c == close {
                break;
            }
            match c {
                b'[' | b'{' => {
                    return Err(PatternError::Nested {
                        pattern: self.pattern.to_string(),
                        position: j,
                    })
                }
                b']' | b'}' => return Err(self.unbalanced(j, c)),
                b'(' | b')' => return Err(self.misplaced_repeat(j)),
                b'<' | b'>' => {
                    return Err(PatternError::MisplacedAnchor {
                        pattern: self.pattern.to_string(),
                        position: j,
                    })
                }
                _ if c == self.seq_type.dont_care() => {
                    return Err(PatternError::DontCareInClass {
                        pattern: self.pattern.to_string(),
                        position: j,
                    })
                }
                _ if is_residue(c) => match self.seq_type.ambiguity(c) {
                    Some(expansion) => set = set.union(SymbolSet::from_bytes(expansion)),
                    None => set.insert(c),
                },
                _ => return Err(self.invalid_character(j, c)),
            }
            j += 1;
        }

        if set.is_empty() {
            return Err(PatternError::EmptyClass {
                pattern: self.pattern.to_string(),
                position: open,
            });
        }
        Ok((set, j + 1))
    }

    /// Parse `(n)` or `(n,m)` opened at `open`
    fn parse_repeat(&self, open: usize) -> Result<(Repeat, usize), PatternError> {
        let mut j = open + 1;
        let min = self.parse_count(&mut j, open)?;
        let max = if j < self.end && self.text[j] == b',' {
            j += 1;
            self.parse_count(&mut j, open)?
        } else {
            min
        };

        if j >= self.end {
            return Err(self.unbalanced(open, b'('));
        }
        if self.text[j] != b')' {
            return Err(self.invalid_repeat(open, "expected ')' after repeat count"));
        }
        if min > max {
            return Err(self.invalid_repeat(open, "minimum exceeds maximum"));
        }

        Ok((Repeat { min, max }, j + 1))
    }

    fn parse_count(&self, j: &mut usize, open: usize) -> Result<usize, PatternError> {
        let start = *j;
        while *j < self.end && self.text[*j].is_ascii_digit() {
            *j += 1;
        }
        if start == *j {
            return Err(self.invalid_repeat(open, "missing repeat count"));
        }
        let digits = std::str::from_utf8(&self.text[start..*j])
            .map_err(|_| self.invalid_repeat(open, "non-ASCII repeat count"))?;
        let count = digits.parse::<usize>().unwrap_or(usize::MAX);
        if count > MAX_REPEAT {
            return Err(PatternError::RepeatTooLarge {
                pattern: self.pattern.to_string(),
                count,
                limit: MAX_REPEAT,
            });
        }
        Ok(count)
    }

    fn unbalanced(&self, position: usize, bracket: u8) -> PatternError {
        PatternError::Unbalanced {
            pattern: self.pattern.to_string(),
            position,
            bracket: char::from(bracket),
        }
    }

    fn misplaced_repeat(&self, position: usize) -> PatternError {
        PatternError::MisplacedRepeat {
            pattern: self.pattern.to_string(),
            position,
        }
    }

    fn invalid_repeat(&self, position: usize, reason: &'static str) -> PatternError {
        PatternError::InvalidRepeat {
            pattern: self.pattern.to_string(),
            position,
            reason,
        }
    }

    fn invalid_character(&self, position: usize, c: u8) -> PatternError {
        PatternError::InvalidCharacter {
            pattern: self.pattern.to_string(),
            position,
            character: char::from(c),
        }
    }
}

/// Residue letters accepted in patterns: `A`-`Z` and the stop symbol `*`
fn is_residue(c: u8) -> bool {
    c.is_ascii_uppercase() || c == b'*'
}
