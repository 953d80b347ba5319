use std::collections::{BTreeMap, HashSet};

use crate::matching::engine::{RawHit, ScanError, SearchEngine};
use crate::pattern::atom::{Atom, AtomKind};
use crate::pattern::Pattern;

/// Recursive backtracking over atoms; handles every pattern shape.
///
/// Fixed atoms are consumed iteratively and only ranged atoms branch, so the
/// recursion depth is bounded by the number of ranged atoms. Each start is
/// walked on its own: a branch state `(atom, position, mismatches)` is
/// expanded at most once, and one hit is kept per distinct length with the
/// smallest mismatch count any alignment reaches.
#[derive(Debug, Clone)]
pub struct Backtracker {
    atoms: Vec<Atom>,
    /// `min_suffix[i]` is the fewest residues atoms `i..` can consume
    min_suffix: Vec<usize>,
    anchored_start: bool,
    anchored_end: bool,
    mismatches: usize,
    max_depth: usize,
}

struct Walk<'a> {
    text: &'a [u8],
    start: usize,
    /// Match length to fewest mismatches
    ends: BTreeMap<usize, usize>,
    /// Branch states already expanded from this start
    seen: HashSet<(usize, usize, usize)>,
}

impl<'a> Walk<'a> {
    fn new(text: &'a [u8], start: usize) -> Self {
        Self {
            text,
            start,
            ends: BTreeMap::new(),
            seen: HashSet::new(),
        }
    }

    fn record(&mut self, end: usize, used: usize) {
        let best = self.ends.entry(end - self.start).or_insert(used);
        *best = (*best).min(used);
    }

    fn flush(self, hits: &mut Vec<RawHit>) {
        let start = self.start;
        hits.extend(self.ends.into_iter().map(|(length, mismatches)| RawHit {
            start,
            length,
            mismatches,
        }));
    }
}

impl Backtracker {
    #[must_use]
    pub fn new(pattern: &Pattern, mismatches: usize, max_depth: usize) -> Self {
        let atoms = pattern.atoms.clone();
        let mut min_suffix = vec![0; atoms.len() + 1];
        for i in (0..atoms.len()).rev() {
            min_suffix[i] = min_suffix[i + 1] + atoms[i].repeat.min;
        }
        Self {
            atoms,
            min_suffix,
            anchored_start: pattern.properties.anchored_start,
            anchored_end: pattern.properties.anchored_end,
            mismatches,
            max_depth,
        }
    }

    /// Charge one residue against the budget; `None` once it is exhausted
    fn consume(&self, kind: AtomKind, byte: u8, used: usize) -> Option<usize> {
        if kind.accepts(byte) {
            Some(used)
        } else if used < self.mismatches {
            Some(used + 1)
        } else {
            None
        }
    }

    fn walk(
        &self,
        walk: &mut Walk<'_>,
        mut idx: usize,
        mut pos: usize,
        mut used: usize,
        depth: usize,
    ) -> Result<(), ScanError> {
        if depth > self.max_depth {
            return Err(ScanError::RecursionDepthExceeded {
                depth: self.max_depth,
            });
        }
        if !walk.seen.insert((idx, pos, used)) {
            return Ok(());
        }
        let text = walk.text;
        loop {
            if pos + self.min_suffix[idx] > text.len() {
                return Ok(());
            }
            let Some(atom) = self.atoms.get(idx) else {
                if !self.anchored_end || pos == text.len() {
                    walk.record(pos, used);
                }
                return Ok(());
            };

            for _ in 0..atom.repeat.min {
                match self.consume(atom.kind, text[pos], used) {
                    Some(u) => used = u,
                    None => return Ok(()),
                }
                pos += 1;
            }
            idx += 1;

            if atom.is_ranged() {
                let optional = atom.repeat.max - atom.repeat.min;
                for extra in 0..=optional {
                    self.walk(walk, idx, pos, used, depth + 1)?;
                    if extra == optional || pos >= text.len() {
                        break;
                    }
                    match self.consume(atom.kind, text[pos], used) {
                        Some(u) => used = u,
                        None => break,
                    }
                    pos += 1;
                }
                return Ok(());
            }
        }
    }
}

impl Backtracker {
    fn walk_from<'a>(&self, text: &'a [u8], start: usize) -> Result<Walk<'a>, ScanError> {
        let mut walk = Walk::new(text, start);
        self.walk(&mut walk, 0, start, 0, 0)?;
        Ok(walk)
    }
}

impl SearchEngine for Backtracker {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        let last_start = if self.anchored_start {
            usize::from(!text.is_empty())
        } else {
            text.len()
        };
        for start in 0..last_start {
            self.walk_from(text, start)?.flush(hits);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::SeqType;
    use crate::utils::validation::MAX_BACKTRACK_DEPTH;

    fn scan(raw: &str, k: usize, text: &[u8]) -> Vec<(usize, usize, usize)> {
        let pattern = Pattern::parse(raw, SeqType::Protein).unwrap();
        let mut hits = Vec::new();
        Backtracker::new(&pattern, k, MAX_BACKTRACK_DEPTH)
            .scan(text, &mut hits)
            .unwrap();
        hits.iter()
            .map(|h| (h.start, h.length, h.mismatches))
            .collect()
    }

    #[test]
    fn test_exact_fixed_pattern() {
        assert_eq!(scan("ACG", 0, b"TACGT"), vec![(1, 3, 0)]);
    }

    #[test]
    fn test_ranges_report_each_length() {
        assert_eq!(
            scan("Cx(1,2)C", 0, b"CACCA"),
            vec![(0, 3, 0), (0, 4, 0)]
        );
    }

    #[test]
    fn test_mismatches_keep_minimum() {
        // ACG aligned at 0 with one substitution
        assert_eq!(scan("ACG", 1, b"ATG"), vec![(0, 3, 1)]);
        // A x(0,1) G: "AG" exact, "ATG" exact via the optional position
        let hits = scan("Ax(0,1)G", 1, b"ATG");
        assert!(hits.contains(&(0, 2, 1)));
        assert!(hits.contains(&(0, 3, 0)));
    }

    #[test]
    fn test_anchors() {
        assert_eq!(scan("<AC", 0, b"ACAC"), vec![(0, 2, 0)]);
        assert_eq!(scan("AC>", 0, b"ACAC"), vec![(2, 2, 0)]);
        assert_eq!(scan("<Ax(0,2)>", 0, b"ACC"), vec![(0, 3, 0)]);
    }

    #[test]
    fn test_stacked_ranges_expand_each_state_once() {
        let pattern = Pattern::parse("C-x(0,15)-x(0,15)-x(0,15)-x(0,15)-C", SeqType::Protein).unwrap();
        let engine = Backtracker::new(&pattern, 1, MAX_BACKTRACK_DEPTH);
        let text = b"C".repeat(200);

        let walk = engine.walk_from(&text, 0).unwrap();
        // lengths 2..=62 all end on a C
        assert_eq!(walk.ends.len(), 61);
        assert!(walk.ends.values().all(|&m| m == 0));
        // atoms x window x budget bounds the expanded states
        assert!(walk.seen.len() <= (pattern.atoms.len() + 1) * 63 * 2);

        let mut hits = Vec::new();
        engine.scan(&text, &mut hits).unwrap();
        let mut distinct = hits.clone();
        distinct.dedup_by_key(|h| (h.start, h.length));
        assert_eq!(hits.len(), distinct.len());
        assert!(hits.windows(2).all(|w| (w[0].start, w[0].length) < (w[1].start, w[1].length)));
    }

    #[test]
    fn test_recursion_limit() {
        let raw = "Ax(0,1)".repeat(4);
        let pattern = Pattern::parse(&raw, SeqType::Protein).unwrap();
        let mut hits = Vec::new();
        let result = Backtracker::new(&pattern, 0, 2).scan(b"AAAAAAAA", &mut hits);
        assert_eq!(
            result,
            Err(ScanError::RecursionDepthExceeded { depth: 2 })
        );
    }
}
