use serde::{Deserialize, Serialize};

use crate::core::iupac::reverse_complement;

/// A named residue string to be scanned.
///
/// Residues are stored uppercase. `begin` is the caller-facing 1-based
/// coordinate of the first residue and only affects reported positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,

    residues: Vec<u8>,

    /// 1-based coordinate of `residues[0]` in the caller's frame
    pub begin: usize,

    /// Whether the molecule is circular (plasmids, organelles)
    #[serde(default)]
    pub circular: bool,
}

impl Sequence {
    pub fn new(name: impl Into<String>, residues: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            residues: residues.as_ref().to_ascii_uppercase(),
            begin: 1,
            circular: false,
        }
    }

    #[must_use]
    pub fn with_begin(mut self, begin: usize) -> Self {
        self.begin = begin;
        self
    }

    #[must_use]
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    #[must_use]
    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Reverse complement of the residues (nucleic sequences only)
    #[must_use]
    pub fn reverse_complement(&self) -> Vec<u8> {
        reverse_complement(&self.residues)
    }

    /// Caller-facing coordinate of a 0-based offset
    #[must_use]
    pub fn position(&self, offset: usize) -> usize {
        self.begin + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_uppercases() {
        let seq = Sequence::new("s1", "acgtN");
        assert_eq!(seq.residues(), b"ACGTN");
        assert_eq!(seq.len(), 5);
        assert!(!seq.circular);
    }

    #[test]
    fn test_position_uses_begin() {
        let seq = Sequence::new("s1", "ACGT").with_begin(101);
        assert_eq!(seq.position(0), 101);
        assert_eq!(seq.position(3), 104);
    }

    #[test]
    fn test_reverse_complement() {
        let seq = Sequence::new("s1", "AACGT");
        assert_eq!(seq.reverse_complement(), b"ACGTT".to_vec());
    }
}
