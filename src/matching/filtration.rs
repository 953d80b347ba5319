use crate::core::alphabet::{slot_byte, SymbolTable};
use crate::matching::engine::{RawHit, ScanError, SearchEngine};
use crate::pattern::atom::{Atom, AtomKind};

/// Tarhio-Ukkonen approximate search, extended to class membership.
///
/// A window is verified right to left and abandoned once more than `k`
/// positions reject. The shift comes from the last `k + 1` window
/// residues: for each, the distance back to the nearest pattern position
/// that would accept it.
#[derive(Debug, Clone)]
pub struct TarhioUkkonen {
    kinds: Vec<AtomKind>,
    mismatches: usize,
    /// Shift tables for pattern positions `m - k - 1 .. m`
    shifts: Vec<SymbolTable<usize>>,
}

impl TarhioUkkonen {
    /// `atoms` must be unranged; `mismatches` must be below their count.
    #[must_use]
    pub fn new(atoms: &[Atom], mismatches: usize) -> Self {
        let kinds: Vec<AtomKind> = atoms.iter().map(|a| a.kind).collect();
        let m = kinds.len();
        let first = m.saturating_sub(mismatches + 1);
        let shifts = (first..m)
            .map(|j| {
                SymbolTable::from_fn(|slot| {
                    let byte = slot_byte(slot);
                    (1..=j)
                        .find(|&s| kinds[j - s].accepts(byte))
                        .unwrap_or(j + 1)
                })
            })
            .collect();
        Self {
            kinds,
            mismatches,
            shifts,
        }
    }

    fn first(&self) -> usize {
        self.kinds.len() - self.shifts.len()
    }
}

impl SearchEngine for TarhioUkkonen {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        let m = self.kinds.len();
        if m == 0 || text.len() < m {
            return Ok(());
        }
        let first = self.first();
        let mut pos = 0;
        while pos + m <= text.len() {
            let window = &text[pos..pos + m];

            let mut rejected = 0;
            for (kind, &c) in self.kinds.iter().zip(window).rev() {
                if !kind.accepts(c) {
                    rejected += 1;
                    if rejected > self.mismatches {
                        break;
                    }
                }
            }
            if rejected <= self.mismatches {
                hits.push(RawHit {
                    start: pos,
                    length: m,
                    mismatches: rejected,
                });
            }

            let shift = self
                .shifts
                .iter()
                .enumerate()
                .map(|(i, table)| table.lookup(window[first + i]))
                .min()
                .unwrap_or(1);
            pos += shift.max(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::SeqType;
    use crate::pattern::Pattern;

    fn scan(raw: &str, k: usize, text: &[u8]) -> Vec<(usize, usize)> {
        let pattern = Pattern::parse(raw, SeqType::Protein).unwrap();
        let mut hits = Vec::new();
        TarhioUkkonen::new(&pattern.atoms, k)
            .scan(text, &mut hits)
            .unwrap();
        hits.iter().map(|h| (h.start, h.mismatches)).collect()
    }

    fn brute_force(raw: &str, k: usize, text: &[u8]) -> Vec<(usize, usize)> {
        let pattern = Pattern::parse(raw, SeqType::Protein).unwrap();
        let m = pattern.atoms.len();
        (0..=text.len().saturating_sub(m))
            .filter(|&s| s + m <= text.len())
            .filter_map(|s| {
                let rejected = pattern
                    .atoms
                    .iter()
                    .zip(&text[s..s + m])
                    .filter(|&(a, &c)| !a.kind.accepts(c))
                    .count();
                (rejected <= k).then_some((s, rejected))
            })
            .collect()
    }

    #[test]
    fn test_class_with_one_mismatch() {
        assert_eq!(scan("A[CG]T", 1, b"ACTTGT"), vec![(0, 0), (3, 1)]);
    }

    #[test]
    fn test_complement() {
        assert_eq!(scan("A{C}TT", 1, b"ACTTAGTT"), vec![(0, 1), (4, 0)]);
    }

    #[test]
    fn test_agrees_with_brute_force() {
        let text = b"MKVLAAGICLLWPSTRAQEDCKACFGHILLAAKKVLAAWCPSTR";
        for (raw, k) in [
            ("[AL]A[GW]", 1),
            ("C[KP]{A}C", 1),
            ("[LIV]{P}A[AGW][IC]", 2),
            ("W[CP]{Q}", 2),
        ] {
            assert_eq!(scan(raw, k, text), brute_force(raw, k, text), "{raw}");
        }
    }

    #[test]
    fn test_shift_table_defaults_past_the_window() {
        let pattern = Pattern::parse("A[CG]T", SeqType::Protein).unwrap();
        let engine = TarhioUkkonen::new(&pattern.atoms, 1);
        // tables cover positions 1 and 2
        assert_eq!(engine.shifts.len(), 2);
        assert_eq!(engine.shifts[1].lookup(b'Z'), 3);
        assert_eq!(engine.shifts[1].lookup(b'C'), 1);
        assert_eq!(engine.shifts[1].lookup(b'A'), 2);
    }
}
