use serde::{Deserialize, Serialize};

/// Strand a hit was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// Per-element bookkeeping for fingerprint hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMatch {
    /// 0-based element index within the fingerprint
    pub element: usize,

    /// Score as a percentage of the element's maximum score
    pub percent: i64,

    /// Number of hits for this element in the sequence
    pub hits_per_element: usize,

    /// Number of elements of the fingerprint with at least one hit
    pub hits_per_motif: usize,

    pub all_elements_matched: bool,

    pub elements_in_order: bool,
}

/// A single occurrence of a motif in a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHit {
    pub seq_name: String,

    /// Pattern text, or fingerprint code
    pub pattern: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// 0-based offset of the first matched residue (forward coordinates)
    pub start: usize,

    /// Caller-facing coordinate of `start` (sequence `begin` applied)
    pub position: usize,

    pub length: usize,

    pub mismatches: usize,

    pub strand: Strand,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<ElementMatch>,
}

impl MatchHit {
    /// 0-based offset one past the last matched residue
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}
