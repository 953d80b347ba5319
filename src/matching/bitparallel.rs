use crate::core::alphabet::{slot_byte, SymbolTable};
use crate::core::bits::{MatchLimit, WordMask, WORD_SIZE};
use crate::matching::engine::{RawHit, ScanError, SearchEngine};
use crate::pattern::atom::Atom;

/// Shift-or search over at most [`WORD_SIZE`] fixed positions.
///
/// Literal atoms give the classic exact shift-or; classes, complements and
/// don't-cares simply clear their bit in several symbol masks.
#[derive(Debug, Clone)]
pub struct ShiftOr {
    masks: SymbolTable<WordMask>,
    limit: MatchLimit,
    length: usize,
}

impl ShiftOr {
    /// Build the per-symbol masks.
    ///
    /// `atoms` must be non-empty, unranged and at most [`WORD_SIZE`] long.
    #[must_use]
    pub fn new(atoms: &[Atom]) -> Self {
        debug_assert!(!atoms.is_empty() && atoms.len() <= WORD_SIZE);
        let masks = SymbolTable::from_fn(|slot| {
            let byte = slot_byte(slot);
            let mut mask = WordMask::ALL;
            for (pos, atom) in atoms.iter().enumerate() {
                if atom.kind.accepts(byte) {
                    mask.clear(pos);
                }
            }
            mask
        });
        Self {
            masks,
            limit: MatchLimit::for_length(atoms.len()),
            length: atoms.len(),
        }
    }
}

impl SearchEngine for ShiftOr {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        let mut state = WordMask::ALL;
        for (i, &c) in text.iter().enumerate() {
            state = state.shift_in(self.masks.lookup(c));
            if self.limit.accepts(state) {
                hits.push(RawHit {
                    start: i + 1 - self.length,
                    length: self.length,
                    mismatches: 0,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::SeqType;
    use crate::pattern::Pattern;

    fn scan(raw: &str, text: &[u8]) -> Vec<usize> {
        let pattern = Pattern::parse(raw, SeqType::Protein).unwrap();
        let mut hits = Vec::new();
        ShiftOr::new(&pattern.atoms).scan(text, &mut hits).unwrap();
        hits.iter().map(|h| h.start).collect()
    }

    #[test]
    fn test_exact_overlapping() {
        assert_eq!(scan("AA", b"AAAA"), vec![0, 1, 2]);
        assert_eq!(scan("ACG", b"TTACGACG"), vec![2, 5]);
        assert!(scan("ACG", b"AC").is_empty());
    }

    #[test]
    fn test_classes() {
        assert_eq!(scan("A[CG]T", b"ACTAGTATT"), vec![0, 3]);
        assert_eq!(scan("A{C}T", b"ACTAGT"), vec![3]);
        assert_eq!(scan("AxT", b"ACTAGTAAT"), vec![0, 3, 6]);
    }

    #[test]
    fn test_out_of_alphabet_bytes() {
        // a byte above 0x7f is accepted by complements and don't-cares only
        assert_eq!(scan("A{C}T", &[b'A', 0xC3, b'T']), vec![0]);
        assert_eq!(scan("AxT", &[b'A', 0xFF, b'T']), vec![0]);
        assert!(scan("A[CG]T", &[b'A', 0xC3, b'T']).is_empty());
    }

    #[test]
    fn test_full_word_pattern() {
        let raw = "AC".repeat(WORD_SIZE / 2);
        let text = format!("G{raw}G{raw}");
        assert_eq!(scan(&raw, text.as_bytes()), vec![1, WORD_SIZE + 2]);
    }
}
