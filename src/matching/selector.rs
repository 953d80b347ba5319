use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::alphabet::ALPHABET_SIZE;
use crate::core::bits::WORD_SIZE;
use crate::pattern::PatternProperties;

/// The search algorithm chosen for a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithmKind {
    /// Boyer-Moore-Horspool over literal residues
    ExactLong,
    /// Baeza-Yates-Perleberg counting with mismatches
    ExactSmallWithMismatches,
    /// Shift-or over literal residues
    ExactBitParallel,
    /// Shift-or with class-aware masks (Baeza-Yates-Gonnet)
    ClassBitParallel,
    /// Translation to a regular expression
    VariableLengthRegex,
    /// Tarhio-Ukkonen filtration with class membership
    ClassWithMismatchesFiltration,
    /// Recursive backtracking; correct for every pattern
    GeneralBacktrack,
}

impl SearchAlgorithmKind {
    pub const ALL: [Self; 7] = [
        Self::ExactLong,
        Self::ExactSmallWithMismatches,
        Self::ExactBitParallel,
        Self::ClassBitParallel,
        Self::VariableLengthRegex,
        Self::ClassWithMismatchesFiltration,
        Self::GeneralBacktrack,
    ];
}

impl std::fmt::Display for SearchAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ExactLong => "Boyer-Moore-Horspool",
            Self::ExactSmallWithMismatches => "Baeza-Yates-Perleberg",
            Self::ExactBitParallel => "Shift-Or",
            Self::ClassBitParallel => "Baeza-Yates-Gonnet",
            Self::VariableLengthRegex => "regular expression",
            Self::ClassWithMismatchesFiltration => "Tarhio-Ukkonen-Bleasby",
            Self::GeneralBacktrack => "recursive backtracking",
        };
        write!(f, "{name}")
    }
}

/// Pick the cheapest engine that is correct for a pattern and mismatch budget.
///
/// Rules are tried in order; [`SearchAlgorithmKind::GeneralBacktrack`] is the
/// fallback and never rejects a pattern.
#[must_use]
pub fn select_algorithm(props: &PatternProperties, mismatches: usize) -> SearchAlgorithmKind {
    let exact = props.is_exact();
    let has_class = props.has_class || props.has_complement || props.has_dont_care;

    let kind = if exact && mismatches == 0 && props.encoded_length > WORD_SIZE {
        SearchAlgorithmKind::ExactLong
    } else if exact && mismatches > 0 && props.encoded_length <= ALPHABET_SIZE / 2 {
        SearchAlgorithmKind::ExactSmallWithMismatches
    } else if exact && mismatches == 0 && props.encoded_length <= WORD_SIZE {
        SearchAlgorithmKind::ExactBitParallel
    } else if has_class && !props.has_range && mismatches == 0 && props.real_length <= WORD_SIZE
    {
        SearchAlgorithmKind::ClassBitParallel
    } else if mismatches == 0 && (props.has_range || props.real_length > WORD_SIZE) {
        SearchAlgorithmKind::VariableLengthRegex
    } else if mismatches > 0 && !props.has_range && (props.has_class || props.has_complement) {
        SearchAlgorithmKind::ClassWithMismatchesFiltration
    } else {
        SearchAlgorithmKind::GeneralBacktrack
    };

    debug!(
        %kind,
        mismatches,
        real_length = props.real_length,
        encoded_length = props.encoded_length,
        "Selected search algorithm"
    );

    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::SeqType;
    use crate::pattern::Pattern;

    fn select(raw: &str, mismatches: usize) -> SearchAlgorithmKind {
        let pattern = Pattern::parse(raw, SeqType::Protein).unwrap();
        select_algorithm(&pattern.properties, mismatches)
    }

    #[test]
    fn test_exact_patterns() {
        assert_eq!(select("AC", 0), SearchAlgorithmKind::ExactBitParallel);
        assert_eq!(
            select(&"A".repeat(WORD_SIZE), 0),
            SearchAlgorithmKind::ExactBitParallel
        );
        assert_eq!(
            select(&"A".repeat(WORD_SIZE + 1), 0),
            SearchAlgorithmKind::ExactLong
        );
    }

    #[test]
    fn test_exact_with_mismatches() {
        assert_eq!(select("ACDEF", 1), SearchAlgorithmKind::ExactSmallWithMismatches);
        assert_eq!(
            select(&"A".repeat(ALPHABET_SIZE / 2 + 1), 1),
            SearchAlgorithmKind::GeneralBacktrack
        );
    }

    #[test]
    fn test_class_patterns() {
        assert_eq!(select("A[CG]T", 0), SearchAlgorithmKind::ClassBitParallel);
        assert_eq!(select("A{P}X", 0), SearchAlgorithmKind::ClassBitParallel);
        assert_eq!(
            select(&"[AC]".repeat(WORD_SIZE + 1), 0),
            SearchAlgorithmKind::VariableLengthRegex
        );
        assert_eq!(
            select("A[CG]T", 1),
            SearchAlgorithmKind::ClassWithMismatchesFiltration
        );
    }

    #[test]
    fn test_ranges_and_fallback() {
        assert_eq!(select("Cx(2,4)C", 0), SearchAlgorithmKind::VariableLengthRegex);
        assert_eq!(select("Cx(2,4)C", 1), SearchAlgorithmKind::GeneralBacktrack);
        // don't-care with mismatches has no specialised engine
        assert_eq!(select("CxxC", 1), SearchAlgorithmKind::GeneralBacktrack);
    }
}
