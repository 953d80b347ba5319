//! Parsers for the sequence and database files the scanners consume.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: Plain or gzip-compressed sequences, read with noodles
//! - **Enzyme databases**: Tab-separated restriction enzyme records
//! - **Equivalence tables**: Enzyme name to preferred-name substitutions
//! - **Fingerprint databases**: Scoring-matrix motif definitions
//!
//! ## Example
//!
//! ```rust
//! use motifscan::parsing::enzyme_db::parse_enzyme_text;
//! use motifscan::parsing::RecordPolicy;
//!
//! let text = "EcoRI\tGAATTC\t6\t2\t0\t1\t5\t0\t0\tEscherichia coli\t\tBFHJKMNOQRSX\n";
//! let db = parse_enzyme_text(text, RecordPolicy::Abort).unwrap();
//! assert_eq!(db.enzymes[0].cuts, vec![1, 5]);
//! ```
//!
//! ## Malformed records
//!
//! Database parsers take a [`RecordPolicy`]. Under [`RecordPolicy::Abort`]
//! the first bad record fails the load with its line number; under
//! [`RecordPolicy::Skip`] it is logged and reported back to the caller.

pub mod enzyme_db;
pub mod equivalence;
pub mod fasta;
pub mod fingerprint_db;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::validation::MAX_RECORDS;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Invalid enzyme record at line {line}: {reason}")]
    EnzymeRecord { line: usize, reason: String },

    #[error("Invalid fingerprint record at line {line}: {reason}")]
    FingerprintRecord { line: usize, reason: String },

    #[error("Too many records: {0} exceeds maximum allowed ({max})", max = MAX_RECORDS)]
    TooManyRecords(usize),
}

/// What to do with a malformed database record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Fail the whole load
    #[default]
    Abort,
    /// Drop the record, log it and keep going
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_records_names_the_limit() {
        let message = ParseError::TooManyRecords(MAX_RECORDS).to_string();
        assert!(message.contains(&format!("({MAX_RECORDS})")));
    }
}
