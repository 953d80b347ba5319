use tracing::debug;

use crate::core::hit::{ElementMatch, MatchHit, Strand};
use crate::core::sequence::Sequence;
use crate::fingerprint::{Fingerprint, FingerprintConfig};
use crate::matching::ScanError;

/// An element window at or above the element's threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ElementHit {
    element: usize,
    start: usize,
    percent: i64,
}

/// Slides fingerprint elements over sequences
#[derive(Debug, Clone, Default)]
pub struct FingerprintScanner {
    config: FingerprintConfig,
}

impl FingerprintScanner {
    #[must_use]
    pub fn new(config: FingerprintConfig) -> Self {
        Self { config }
    }

    /// Scan one fingerprint against a sequence.
    ///
    /// Returns one hit per element window at or above threshold, or nothing
    /// when the number of matched elements is outside the configured range.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptySequence` for an empty sequence.
    pub fn scan(&self, fingerprint: &Fingerprint, seq: &Sequence) -> Result<Vec<MatchHit>, ScanError> {
        if seq.is_empty() {
            return Err(ScanError::EmptySequence(seq.name.clone()));
        }
        let residues = seq.residues();

        let mut found = Vec::new();
        for (k, element) in fingerprint.elements.iter().enumerate() {
            if element.length > residues.len() {
                continue;
            }
            for (start, window) in residues.windows(element.length).enumerate() {
                let percent = element.percent(element.score(window));
                if percent >= element.threshold {
                    found.push(ElementHit {
                        element: k,
                        start,
                        percent,
                    });
                }
            }
        }

        let mut hits_per_element = vec![0usize; fingerprint.elements.len()];
        for hit in &found {
            hits_per_element[hit.element] += 1;
        }
        let hits_per_motif = hits_per_element.iter().filter(|&&n| n > 0).count();

        debug!(
            fingerprint = %fingerprint.code,
            sequence = %seq.name,
            element_hits = found.len(),
            hits_per_motif,
            "Scanned fingerprint"
        );

        if !self.config.accepts(hits_per_motif) {
            return Ok(Vec::new());
        }

        let all_elements_matched = hits_per_motif == fingerprint.elements.len();
        let elements_in_order = in_order(&found, fingerprint.elements.len());

        Ok(found
            .into_iter()
            .map(|hit| {
                let length = fingerprint.elements[hit.element].length;
                MatchHit {
                    seq_name: seq.name.clone(),
                    pattern: fingerprint.code.clone(),
                    accession: Some(fingerprint.accession.clone()),
                    title: Some(fingerprint.title.clone()),
                    start: hit.start,
                    position: seq.position(hit.start),
                    length,
                    mismatches: 0,
                    strand: Strand::Forward,
                    fingerprint: Some(ElementMatch {
                        element: hit.element,
                        percent: hit.percent,
                        hits_per_element: hits_per_element[hit.element],
                        hits_per_motif,
                        all_elements_matched,
                        elements_in_order,
                    }),
                }
            })
            .collect())
    }

    /// Scan every fingerprint against a sequence
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptySequence` for an empty sequence.
    pub fn scan_all(
        &self,
        fingerprints: &[Fingerprint],
        seq: &Sequence,
    ) -> Result<Vec<MatchHit>, ScanError> {
        let mut hits = Vec::new();
        for fingerprint in fingerprints {
            hits.extend(self.scan(fingerprint, seq)?);
        }
        Ok(hits)
    }
}

/// Whether the matched elements can be chained with strictly increasing
/// starts, taking the earliest usable hit of each element in turn.
///
/// `found` is ordered by element, then start.
fn in_order(found: &[ElementHit], elements: usize) -> bool {
    let mut last: Option<usize> = None;
    for k in 0..elements {
        let mut starts = found.iter().filter(|h| h.element == k).map(|h| h.start).peekable();
        if starts.peek().is_none() {
            continue;
        }
        match starts.find(|&s| last.map_or(true, |l| s > l)) {
            Some(s) => last = Some(s),
            None => return false,
        }
    }
    true
}
