use crate::core::alphabet::SymbolTable;
use crate::matching::engine::{RawHit, ScanError, SearchEngine};

/// Boyer-Moore-Horspool exact search
#[derive(Debug, Clone)]
pub struct Horspool {
    pattern: Vec<u8>,
    skip: SymbolTable<usize>,
}

impl Horspool {
    #[must_use]
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let mut skip = SymbolTable::new(m);
        for (i, &c) in pattern.iter().enumerate().take(m.saturating_sub(1)) {
            *skip.get_mut(c) = m - 1 - i;
        }
        Self {
            pattern: pattern.to_vec(),
            skip,
        }
    }
}

impl SearchEngine for Horspool {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        let m = self.pattern.len();
        if m == 0 || text.len() < m {
            return Ok(());
        }
        let mut pos = 0;
        while pos + m <= text.len() {
            let window = &text[pos..pos + m];
            if window.iter().rev().eq(self.pattern.iter().rev()) {
                hits.push(RawHit {
                    start: pos,
                    length: m,
                    mismatches: 0,
                });
                pos += 1;
            } else {
                pos += self.skip.lookup(window[m - 1]).max(1);
            }
        }
        Ok(())
    }
}
