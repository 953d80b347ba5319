use crate::core::hit::{MatchHit, Strand};
use crate::core::sequence::Sequence;
use crate::matching::engine::RawHit;
use crate::pattern::Pattern;

/// Turns raw engine output for one sequence into reported hits.
///
/// Anchors are checked here on the coordinates of the scanned text, so
/// engines that ignore anchors stay correct. Reverse-strand hits are then
/// mapped back to forward coordinates.
#[derive(Debug)]
pub struct HitCollector<'a> {
    seq: &'a Sequence,
    pattern: &'a Pattern,
}

impl<'a> HitCollector<'a> {
    #[must_use]
    pub fn new(seq: &'a Sequence, pattern: &'a Pattern) -> Self {
        Self { seq, pattern }
    }

    fn satisfies_anchors(&self, hit: &RawHit) -> bool {
        let props = &self.pattern.properties;
        (!props.anchored_start || hit.start == 0)
            && (!props.anchored_end || hit.start + hit.length == self.seq.len())
    }

    /// Filter, order and convert raw hits found on `strand`
    #[must_use]
    pub fn collect(&self, mut raw: Vec<RawHit>, strand: Strand) -> Vec<MatchHit> {
        raw.retain(|h| self.satisfies_anchors(h));
        raw.sort_unstable_by_key(|h| (h.start, h.length, h.mismatches));
        raw.dedup_by_key(|h| (h.start, h.length));

        let n = self.seq.len();
        let mut hits: Vec<MatchHit> = raw
            .into_iter()
            .map(|h| {
                let start = match strand {
                    Strand::Forward => h.start,
                    Strand::Reverse => n - h.start - h.length,
                };
                MatchHit {
                    seq_name: self.seq.name.clone(),
                    pattern: self.pattern.to_string(),
                    accession: None,
                    title: None,
                    start,
                    position: self.seq.position(start),
                    length: h.length,
                    mismatches: h.mismatches,
                    strand,
                    fingerprint: None,
                }
            })
            .collect();
        if strand == Strand::Reverse {
            hits.sort_by_key(|h| (h.start, h.length));
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::SeqType;

    fn raw(start: usize, length: usize, mismatches: usize) -> RawHit {
        RawHit {
            start,
            length,
            mismatches,
        }
    }

    #[test]
    fn test_orders_and_dedups() {
        let seq = Sequence::new("s", "ACGTACGT").with_begin(101);
        let pattern = Pattern::parse("ACG", SeqType::Nucleic).unwrap();
        let hits = HitCollector::new(&seq, &pattern).collect(
            vec![raw(4, 3, 0), raw(0, 3, 1), raw(0, 3, 0)],
            Strand::Forward,
        );
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].start, hits[0].mismatches), (0, 0));
        assert_eq!(hits[0].position, 101);
        assert_eq!(hits[1].start, 4);
        assert_eq!(hits[1].end(), 7);
    }

    #[test]
    fn test_anchor_filter() {
        let seq = Sequence::new("s", "ACGTACG");
        let pattern = Pattern::parse("ACG>", SeqType::Nucleic).unwrap();
        let hits = HitCollector::new(&seq, &pattern)
            .collect(vec![raw(0, 3, 0), raw(4, 3, 0)], Strand::Forward);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, 4);
    }

    #[test]
    fn test_reverse_coordinates() {
        let seq = Sequence::new("s", "AACGGTT");
        let pattern = Pattern::parse("AAC", SeqType::Nucleic).unwrap();
        let hits = HitCollector::new(&seq, &pattern).collect(vec![raw(0, 3, 0)], Strand::Reverse);
        assert_eq!(hits[0].start, 4);
        assert_eq!(hits[0].strand, Strand::Reverse);
        assert_eq!(hits[0].pattern, "AAC");
    }
}
