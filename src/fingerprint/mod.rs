//! Fingerprint scanning with fixed-width scoring matrices.
//!
//! A fingerprint is an ordered set of elements. Each element is a scoring
//! matrix with one row per letter `A..=Z` and one column per position; a
//! window scores the sum of its residues' entries, expressed as a
//! percentage of the element's maximum score.
//!
//! - [`Fingerprint`] / [`Element`]: Matrix definitions
//! - [`FingerprintScanner`]: Slides every element over a sequence
//! - [`FingerprintConfig`]: How many elements must hit for a report

pub mod scan;

use serde::{Deserialize, Serialize};

pub use scan::FingerprintScanner;

/// Number of matrix rows, one per letter `A..=Z`
pub const MATRIX_ROWS: usize = 26;

/// One scoring-matrix element of a fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub length: usize,

    /// Minimum percentage score for a hit
    pub threshold: i64,

    pub max_score: i64,

    /// `rows[letter][position]`
    pub rows: Vec<Vec<i64>>,
}

impl Element {
    /// Create an element, checking the matrix shape.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the length is zero, the
    /// maximum score is not positive, or the matrix is not 26 rows of
    /// `length` columns.
    pub fn new(
        length: usize,
        threshold: i64,
        max_score: i64,
        rows: Vec<Vec<i64>>,
    ) -> Result<Self, String> {
        if length == 0 {
            return Err("element length must be positive".to_string());
        }
        if max_score <= 0 {
            return Err(format!("maximum score must be positive, got {max_score}"));
        }
        if rows.len() != MATRIX_ROWS {
            return Err(format!("expected {MATRIX_ROWS} matrix rows, got {}", rows.len()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != length) {
            return Err(format!(
                "matrix row {} has {} columns, expected {length}",
                char::from(b'A' + i as u8),
                row.len()
            ));
        }
        Ok(Self {
            length,
            threshold,
            max_score,
            rows,
        })
    }

    /// Raw score of `window`, which must be `length` residues long.
    ///
    /// Residues outside `A..=Z` score 0.
    #[must_use]
    pub fn score(&self, window: &[u8]) -> i64 {
        window
            .iter()
            .enumerate()
            .map(|(j, &c)| {
                let c = c.to_ascii_uppercase();
                if c.is_ascii_uppercase() {
                    self.rows[usize::from(c - b'A')][j]
                } else {
                    0
                }
            })
            .sum()
    }

    /// Score as an integer percentage of the maximum
    #[must_use]
    pub fn percent(&self, score: i64) -> i64 {
        score * 100 / self.max_score
    }
}

/// A named set of elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub code: String,
    pub accession: String,
    pub title: String,
    pub elements: Vec<Element>,
}

/// Reporting limits for fingerprint matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Fewest elements with hits for a fingerprint to be reported
    pub min_elements: usize,

    /// Most elements with hits for a fingerprint to be reported
    pub max_elements: Option<usize>,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            min_elements: 2,
            max_elements: None,
        }
    }
}

impl FingerprintConfig {
    #[must_use]
    pub fn accepts(&self, hits_per_motif: usize) -> bool {
        hits_per_motif >= self.min_elements
            && self.max_elements.map_or(true, |max| hits_per_motif <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Element of `length` that scores 10 for `letter` at every position
    pub(crate) fn element_for(letter: u8, length: usize, threshold: i64) -> Element {
        let mut rows = vec![vec![0; length]; MATRIX_ROWS];
        rows[usize::from(letter - b'A')] = vec![10; length];
        Element::new(length, threshold, 10 * length as i64, rows).unwrap()
    }

    #[test]
    fn test_element_score() {
        let element = element_for(b'W', 3, 60);
        assert_eq!(element.score(b"WWW"), 30);
        assert_eq!(element.score(b"WAW"), 20);
        assert_eq!(element.score(b"w*W"), 20);
        assert_eq!(element.percent(20), 66);
    }

    #[test]
    fn test_element_shape_checks() {
        assert!(Element::new(0, 50, 10, vec![vec![]; MATRIX_ROWS]).is_err());
        assert!(Element::new(2, 50, 0, vec![vec![0; 2]; MATRIX_ROWS]).is_err());
        assert!(Element::new(2, 50, 10, vec![vec![0; 2]; 25]).is_err());
        let mut rows = vec![vec![0; 2]; MATRIX_ROWS];
        rows[3] = vec![0; 3];
        let err = Element::new(2, 50, 10, rows).unwrap_err();
        assert!(err.contains("row D"));
    }

    #[test]
    fn test_config_limits() {
        let config = FingerprintConfig::default();
        assert!(!config.accepts(1));
        assert!(config.accepts(2));
        assert!(config.accepts(50));

        let config = FingerprintConfig {
            min_elements: 1,
            max_elements: Some(2),
        };
        assert!(config.accepts(1));
        assert!(!config.accepts(3));
    }
}
