use crate::core::alphabet::SymbolTable;
use crate::matching::engine::{RawHit, ScanError, SearchEngine};

/// Baeza-Yates-Perleberg counting search for literal patterns with
/// substitutions.
///
/// Each text residue decrements the counter of every window in which it
/// lines up with an equal pattern residue. Counters start at the pattern
/// length, so a completed window's counter is its mismatch count.
#[derive(Debug, Clone)]
pub struct Perleberg {
    offsets: SymbolTable<Vec<usize>>,
    length: usize,
    mismatches: usize,
}

impl Perleberg {
    #[must_use]
    pub fn new(pattern: &[u8], mismatches: usize) -> Self {
        let mut offsets = SymbolTable::new(Vec::new());
        for (j, &c) in pattern.iter().enumerate() {
            offsets.get_mut(c).push(j);
        }
        Self {
            offsets,
            length: pattern.len(),
            mismatches,
        }
    }
}

impl SearchEngine for Perleberg {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        let m = self.length;
        if m == 0 || text.len() < m {
            return Ok(());
        }
        // at most m windows are open at once
        let cap = m.next_power_of_two();
        let wrap = cap - 1;
        let mut counts = vec![m; cap];

        for (i, &c) in text.iter().enumerate() {
            for &j in self.offsets.get(c) {
                if j <= i {
                    counts[(i - j) & wrap] -= 1;
                }
            }
            if i + 1 >= m {
                let start = i + 1 - m;
                let slot = start & wrap;
                if counts[slot] <= self.mismatches {
                    hits.push(RawHit {
                        start,
                        length: m,
                        mismatches: counts[slot],
                    });
                }
                counts[slot] = m;
            }
        }
        Ok(())
    }
}
