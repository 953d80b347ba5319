use thiserror::Error;
use tracing::{debug, warn};

use crate::core::alphabet::SeqType;
use crate::core::bits::WORD_SIZE;
use crate::core::hit::{MatchHit, Strand};
use crate::core::sequence::Sequence;
use crate::matching::backtrack::Backtracker;
use crate::matching::bitparallel::ShiftOr;
use crate::matching::collector::HitCollector;
use crate::matching::filtration::TarhioUkkonen;
use crate::matching::horspool::Horspool;
use crate::matching::perleberg::Perleberg;
use crate::matching::regex_engine::RegexEngine;
use crate::matching::selector::{select_algorithm, SearchAlgorithmKind};
use crate::pattern::{Pattern, PatternError};
use crate::utils::validation::MAX_BACKTRACK_DEPTH;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Sequence '{0}' is empty")]
    EmptySequence(String),

    #[error("Backtracking exceeded maximum recursion depth of {depth}")]
    RecursionDepthExceeded { depth: usize },

    #[error("Reverse-strand search needs a nucleic pattern, got a {0} pattern")]
    ReverseStrandUnsupported(SeqType),
}

/// An occurrence as reported by an engine, in text coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawHit {
    pub start: usize,
    pub length: usize,
    pub mismatches: usize,
}

/// Common contract of the search algorithms: tables are built once at
/// construction and `scan` never mutates them.
pub trait SearchEngine {
    /// Append every occurrence in `text` to `hits`
    ///
    /// # Errors
    ///
    /// Only the backtracking engine fails, with
    /// `ScanError::RecursionDepthExceeded`.
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError>;
}

/// Precomputed tables for one of the seven algorithms
#[derive(Debug, Clone)]
pub enum CompiledEngine {
    ExactLong(Horspool),
    ExactSmallWithMismatches(Perleberg),
    ExactBitParallel(ShiftOr),
    ClassBitParallel(ShiftOr),
    VariableLengthRegex(RegexEngine),
    ClassWithMismatchesFiltration(TarhioUkkonen),
    GeneralBacktrack(Backtracker),
}

impl CompiledEngine {
    /// Build the tables of `kind` for a pattern.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::PatternTooLarge` when a bit-parallel engine is
    /// asked for a pattern longer than a machine word, and
    /// `PatternError::UnsupportedEngine` when `kind` cannot express the
    /// pattern's grammar or mismatch budget.
    pub fn build(
        pattern: &Pattern,
        mismatches: usize,
        kind: SearchAlgorithmKind,
    ) -> Result<Self, PatternError> {
        let props = &pattern.properties;
        let unsupported = |reason| PatternError::UnsupportedEngine { kind, reason };

        match kind {
            SearchAlgorithmKind::ExactLong => {
                let residues = pattern
                    .literal_residues()
                    .ok_or_else(|| unsupported("pattern is not a plain residue string"))?;
                if mismatches > 0 {
                    return Err(unsupported("mismatches are not supported"));
                }
                Ok(Self::ExactLong(Horspool::new(&residues)))
            }
            SearchAlgorithmKind::ExactSmallWithMismatches => {
                let residues = pattern
                    .literal_residues()
                    .ok_or_else(|| unsupported("pattern is not a plain residue string"))?;
                Ok(Self::ExactSmallWithMismatches(Perleberg::new(
                    &residues, mismatches,
                )))
            }
            SearchAlgorithmKind::ExactBitParallel => {
                let residues = pattern
                    .literal_residues()
                    .ok_or_else(|| unsupported("pattern is not a plain residue string"))?;
                if mismatches > 0 {
                    return Err(unsupported("mismatches are not supported"));
                }
                if residues.len() > WORD_SIZE {
                    return Err(PatternError::PatternTooLarge {
                        kind,
                        length: residues.len(),
                        limit: WORD_SIZE,
                    });
                }
                Ok(Self::ExactBitParallel(ShiftOr::new(&pattern.atoms)))
            }
            SearchAlgorithmKind::ClassBitParallel => {
                if props.has_range {
                    return Err(unsupported("repeat ranges are not supported"));
                }
                if mismatches > 0 {
                    return Err(unsupported("mismatches are not supported"));
                }
                if props.real_length > WORD_SIZE {
                    return Err(PatternError::PatternTooLarge {
                        kind,
                        length: props.real_length,
                        limit: WORD_SIZE,
                    });
                }
                Ok(Self::ClassBitParallel(ShiftOr::new(&pattern.atoms)))
            }
            SearchAlgorithmKind::VariableLengthRegex => {
                if mismatches > 0 {
                    return Err(unsupported("mismatches are not supported"));
                }
                RegexEngine::new(pattern)
                    .map(Self::VariableLengthRegex)
                    .ok_or_else(|| unsupported("regular expression exceeds the size limit"))
            }
            SearchAlgorithmKind::ClassWithMismatchesFiltration => {
                if props.has_range {
                    return Err(unsupported("repeat ranges are not supported"));
                }
                Ok(Self::ClassWithMismatchesFiltration(TarhioUkkonen::new(
                    &pattern.atoms,
                    mismatches,
                )))
            }
            SearchAlgorithmKind::GeneralBacktrack => Ok(Self::GeneralBacktrack(Backtracker::new(
                pattern,
                mismatches,
                MAX_BACKTRACK_DEPTH,
            ))),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SearchAlgorithmKind {
        match self {
            Self::ExactLong(_) => SearchAlgorithmKind::ExactLong,
            Self::ExactSmallWithMismatches(_) => SearchAlgorithmKind::ExactSmallWithMismatches,
            Self::ExactBitParallel(_) => SearchAlgorithmKind::ExactBitParallel,
            Self::ClassBitParallel(_) => SearchAlgorithmKind::ClassBitParallel,
            Self::VariableLengthRegex(_) => SearchAlgorithmKind::VariableLengthRegex,
            Self::ClassWithMismatchesFiltration(_) => {
                SearchAlgorithmKind::ClassWithMismatchesFiltration
            }
            Self::GeneralBacktrack(_) => SearchAlgorithmKind::GeneralBacktrack,
        }
    }

    fn as_engine(&self) -> &dyn SearchEngine {
        match self {
            Self::ExactLong(e) => e,
            Self::ExactSmallWithMismatches(e) => e,
            Self::ExactBitParallel(e) | Self::ClassBitParallel(e) => e,
            Self::VariableLengthRegex(e) => e,
            Self::ClassWithMismatchesFiltration(e) => e,
            Self::GeneralBacktrack(e) => e,
        }
    }
}

impl SearchEngine for CompiledEngine {
    fn scan(&self, text: &[u8], hits: &mut Vec<RawHit>) -> Result<(), ScanError> {
        self.as_engine().scan(text, hits)
    }
}

/// A pattern bound to a mismatch budget and the engine chosen for it.
///
/// Compile once, then scan any number of sequences; scanning never
/// mutates the compiled tables.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: Pattern,
    mismatches: usize,
    engine: CompiledEngine,
}

impl CompiledPattern {
    /// Compile a pattern with the cheapest correct engine.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::MismatchBudget` if the budget is not smaller
    /// than the shortest possible match.
    pub fn new(pattern: Pattern, mismatches: usize) -> Result<Self, PatternError> {
        check_mismatch_budget(&pattern, mismatches)?;
        let kind = select_algorithm(&pattern.properties, mismatches);
        let engine = match CompiledEngine::build(&pattern, mismatches, kind) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Falling back to backtracking search");
                CompiledEngine::build(&pattern, mismatches, SearchAlgorithmKind::GeneralBacktrack)?
            }
        };
        Ok(Self {
            pattern,
            mismatches,
            engine,
        })
    }

    /// Compile a pattern with a specific engine.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::PatternTooLarge` or
    /// `PatternError::UnsupportedEngine` if `kind` cannot search this
    /// pattern, or `PatternError::MismatchBudget` for an oversized budget.
    pub fn with_algorithm(
        pattern: Pattern,
        mismatches: usize,
        kind: SearchAlgorithmKind,
    ) -> Result<Self, PatternError> {
        check_mismatch_budget(&pattern, mismatches)?;
        let engine = CompiledEngine::build(&pattern, mismatches, kind)?;
        Ok(Self {
            pattern,
            mismatches,
            engine,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.mismatches
    }

    #[must_use]
    pub fn kind(&self) -> SearchAlgorithmKind {
        self.engine.kind()
    }

    /// Raw engine output for `text`, before anchor filtering and ordering
    ///
    /// # Errors
    ///
    /// Propagates `ScanError::RecursionDepthExceeded` from the backtracking
    /// engine.
    pub fn scan_raw(&self, text: &[u8]) -> Result<Vec<RawHit>, ScanError> {
        let mut hits = Vec::new();
        self.engine.scan(text, &mut hits)?;
        Ok(hits)
    }

    /// Find all occurrences on the forward strand.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptySequence` for an empty sequence, or
    /// `ScanError::RecursionDepthExceeded` from the backtracking engine.
    pub fn search(&self, seq: &Sequence) -> Result<Vec<MatchHit>, ScanError> {
        if seq.is_empty() {
            return Err(ScanError::EmptySequence(seq.name.clone()));
        }
        let raw = self.scan_raw(seq.residues())?;
        debug!(
            sequence = %seq.name,
            kind = %self.kind(),
            raw_hits = raw.len(),
            "Scanned forward strand"
        );
        Ok(self.collector(seq).collect(raw, Strand::Forward))
    }

    /// Find all occurrences on both strands of a nucleic sequence.
    ///
    /// Reverse-strand hits are reported in forward coordinates.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ReverseStrandUnsupported` for protein patterns,
    /// plus the errors of [`CompiledPattern::search`].
    pub fn search_both_strands(&self, seq: &Sequence) -> Result<Vec<MatchHit>, ScanError> {
        if self.pattern.seq_type != SeqType::Nucleic {
            return Err(ScanError::ReverseStrandUnsupported(self.pattern.seq_type));
        }
        let mut hits = self.search(seq)?;
        let reverse = seq.reverse_complement();
        let raw = self.scan_raw(&reverse)?;
        hits.extend(self.collector(seq).collect(raw, Strand::Reverse));
        hits.sort_by(|a, b| {
            (a.start, a.length, a.strand).cmp(&(b.start, b.length, b.strand))
        });
        Ok(hits)
    }

    fn collector<'a>(&'a self, seq: &'a Sequence) -> HitCollector<'a> {
        HitCollector::new(seq, &self.pattern)
    }
}

fn check_mismatch_budget(pattern: &Pattern, mismatches: usize) -> Result<(), PatternError> {
    let min_length = pattern.min_length();
    if mismatches >= min_length {
        return Err(PatternError::MismatchBudget {
            mismatches,
            min_length,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str, seq_type: SeqType, mismatches: usize) -> CompiledPattern {
        CompiledPattern::new(Pattern::parse(raw, seq_type).unwrap(), mismatches).unwrap()
    }

    fn starts(hits: &[MatchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.start).collect()
    }

    #[test]
    fn test_exact_search() {
        let compiled = compile("AC", SeqType::Nucleic, 0);
        assert_eq!(compiled.kind(), SearchAlgorithmKind::ExactBitParallel);
        let hits = compiled.search(&Sequence::new("s", "ACGTAC")).unwrap();
        assert_eq!(starts(&hits), vec![0, 4]);
        assert!(hits.iter().all(|h| h.length == 2 && h.mismatches == 0));
        assert_eq!(hits[0].position, 1);
    }

    #[test]
    fn test_class_search() {
        let compiled = compile("A[CG]T", SeqType::Protein, 0);
        let hits = compiled.search(&Sequence::new("s", "ACTAGT")).unwrap();
        assert_eq!(starts(&hits), vec![0, 3]);
    }

    #[test]
    fn test_anchored_search() {
        let compiled = compile("<AC", SeqType::Protein, 0);
        let hits = compiled.search(&Sequence::new("s", "ACGTAC")).unwrap();
        assert_eq!(starts(&hits), vec![0]);

        let compiled = compile("AC>", SeqType::Protein, 0);
        let hits = compiled.search(&Sequence::new("s", "ACGTAC")).unwrap();
        assert_eq!(starts(&hits), vec![4]);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let compiled = compile("AC", SeqType::Protein, 0);
        assert!(matches!(
            compiled.search(&Sequence::new("empty", "")),
            Err(ScanError::EmptySequence(_))
        ));
    }

    #[test]
    fn test_mismatch_budget_rejected() {
        let pattern = Pattern::parse("ACG", SeqType::Nucleic).unwrap();
        assert!(matches!(
            CompiledPattern::new(pattern, 3),
            Err(PatternError::MismatchBudget { .. })
        ));
    }

    #[test]
    fn test_forced_engine_too_large() {
        let pattern = Pattern::parse(&"A".repeat(WORD_SIZE + 1), SeqType::Protein).unwrap();
        assert!(matches!(
            CompiledPattern::with_algorithm(pattern, 0, SearchAlgorithmKind::ExactBitParallel),
            Err(PatternError::PatternTooLarge { .. })
        ));
    }

    #[test]
    fn test_forced_engine_unsupported() {
        let pattern = Pattern::parse("A[CG]T", SeqType::Protein).unwrap();
        assert!(matches!(
            CompiledPattern::with_algorithm(pattern.clone(), 0, SearchAlgorithmKind::ExactLong),
            Err(PatternError::UnsupportedEngine { .. })
        ));
        assert!(matches!(
            CompiledPattern::with_algorithm(pattern, 1, SearchAlgorithmKind::VariableLengthRegex),
            Err(PatternError::UnsupportedEngine { .. })
        ));
    }

    #[test]
    fn test_both_strands() {
        let compiled = compile("AAC", SeqType::Nucleic, 0);
        // GTT on the forward strand is AAC on the reverse strand
        let hits = compiled
            .search_both_strands(&Sequence::new("s", "AACGGTT"))
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].start, hits[0].strand), (0, Strand::Forward));
        assert_eq!((hits[1].start, hits[1].strand), (4, Strand::Reverse));
    }

    #[test]
    fn test_both_strands_requires_nucleic() {
        let compiled = compile("AAC", SeqType::Protein, 0);
        assert!(matches!(
            compiled.search_both_strands(&Sequence::new("s", "AAC")),
            Err(ScanError::ReverseStrandUnsupported(SeqType::Protein))
        ));
    }
}
