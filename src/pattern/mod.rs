//! PROSITE-style motif patterns.
//!
//! A pattern is a sequence of atoms: literal residues, inclusion classes
//! `[...]`, exclusion classes `{...}` and don't-care positions, each with an
//! optional repeat `(n)` or `(n,m)`. A leading `<` anchors the motif to the
//! sequence start and a trailing `>` to the sequence end.
//!
//! ## Example
//!
//! ```rust
//! use motifscan::core::alphabet::SeqType;
//! use motifscan::pattern::Pattern;
//!
//! let pattern = Pattern::parse("C-x(2,4)-C-x(3)-[LIVMFYWC].", SeqType::Protein).unwrap();
//! assert!(pattern.properties.has_range);
//! assert!(pattern.properties.has_class);
//! assert_eq!(pattern.canonical, "CX(2,4)CXXX[CFILMVWY]");
//! ```

pub mod atom;
pub mod classify;

use thiserror::Error;

use crate::core::alphabet::SeqType;
use crate::matching::selector::SearchAlgorithmKind;
use crate::pattern::atom::{Atom, AtomKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Empty pattern")]
    Empty,

    #[error("Pattern '{pattern}' can match an empty string")]
    ZeroLength { pattern: String },

    #[error("Unbalanced '{bracket}' at position {position} in pattern '{pattern}'")]
    Unbalanced {
        pattern: String,
        position: usize,
        bracket: char,
    },

    #[error("Nested class at position {position} in pattern '{pattern}'")]
    Nested { pattern: String, position: usize },

    #[error("Invalid character '{character}' at position {position} in pattern '{pattern}'")]
    InvalidCharacter {
        pattern: String,
        position: usize,
        character: char,
    },

    #[error("Anchor at position {position} is not at either end of pattern '{pattern}'")]
    MisplacedAnchor { pattern: String, position: usize },

    #[error("Repeat at position {position} does not follow a residue, class or complement in pattern '{pattern}'")]
    MisplacedRepeat { pattern: String, position: usize },

    #[error("Invalid repeat at position {position} in pattern '{pattern}': {reason}")]
    InvalidRepeat {
        pattern: String,
        position: usize,
        reason: &'static str,
    },

    #[error("Don't-care symbol inside a class at position {position} in pattern '{pattern}'")]
    DontCareInClass { pattern: String, position: usize },

    #[error("Empty class at position {position} in pattern '{pattern}'")]
    EmptyClass { pattern: String, position: usize },

    #[error("Repeat count {count} exceeds maximum of {limit} in pattern '{pattern}'")]
    RepeatTooLarge {
        pattern: String,
        count: usize,
        limit: usize,
    },

    #[error("Pattern length {length} exceeds the {limit}-position limit of {kind}")]
    PatternTooLarge {
        kind: SearchAlgorithmKind,
        length: usize,
        limit: usize,
    },

    #[error("{kind} cannot search this pattern: {reason}")]
    UnsupportedEngine {
        kind: SearchAlgorithmKind,
        reason: &'static str,
    },

    #[error("Mismatch budget {mismatches} must be smaller than the shortest match length {min_length}")]
    MismatchBudget { mismatches: usize, min_length: usize },
}

/// Grammar features of a pattern, derived once at parse time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternProperties {
    pub anchored_start: bool,
    pub anchored_end: bool,
    pub has_class: bool,
    pub has_complement: bool,
    pub has_dont_care: bool,
    pub has_range: bool,
    /// Number of atoms after fixed-repeat expansion
    pub real_length: usize,
    /// Length of the canonical pattern text, grammar markers included
    pub encoded_length: usize,
}

impl PatternProperties {
    /// True when every atom is a single literal residue
    #[must_use]
    pub fn is_exact(&self) -> bool {
        !(self.has_class || self.has_complement || self.has_dont_care || self.has_range)
    }
}

/// A parsed, classified motif
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Text as supplied by the caller
    pub raw: String,

    /// Uppercased text with whitespace and separators removed
    pub normalized: String,

    /// Canonical rendering after repeat expansion, anchors excluded
    pub canonical: String,

    pub seq_type: SeqType,

    pub atoms: Vec<Atom>,

    pub properties: PatternProperties,
}

impl Pattern {
    /// Parse a pattern in the PROSITE-like grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for any grammar violation.
    pub fn parse(raw: &str, seq_type: SeqType) -> Result<Self, PatternError> {
        classify::classify(raw, seq_type)
    }

    /// Build a pattern that matches `residues` literally, without
    /// interpreting ambiguity letters or grammar markers.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::Empty` if `residues` is empty.
    pub fn literal(residues: &[u8], seq_type: SeqType) -> Result<Self, PatternError> {
        if residues.is_empty() {
            return Err(PatternError::Empty);
        }
        let upper = residues.to_ascii_uppercase();
        if let Some((position, &c)) = upper
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_graphic())
        {
            return Err(PatternError::InvalidCharacter {
                pattern: String::from_utf8_lossy(&upper).to_string(),
                position,
                character: char::from(c),
            });
        }
        let text = String::from_utf8_lossy(&upper).to_string();
        let atoms: Vec<Atom> = upper
            .iter()
            .map(|&c| Atom::once(AtomKind::Literal(c)))
            .collect();
        let properties = PatternProperties {
            real_length: atoms.len(),
            encoded_length: atoms.len(),
            ..PatternProperties::default()
        };
        Ok(Self {
            raw: text.clone(),
            normalized: text.clone(),
            canonical: text,
            seq_type,
            atoms,
            properties,
        })
    }

    /// Shortest number of residues a match can span
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.atoms.iter().map(|a| a.repeat.min).sum()
    }

    /// Longest number of residues a match can span
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.atoms.iter().map(|a| a.repeat.max).sum()
    }

    /// The residues of an all-literal pattern, `None` otherwise
    #[must_use]
    pub fn literal_residues(&self) -> Option<Vec<u8>> {
        self.atoms
            .iter()
            .map(|a| match a.kind {
                AtomKind::Literal(c) if !a.is_ranged() => Some(c),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.properties.anchored_start {
            write!(f, "<")?;
        }
        write!(f, "{}", self.canonical)?;
        if self.properties.anchored_end {
            write!(f, ">")?;
        }
        Ok(())
    }
}
