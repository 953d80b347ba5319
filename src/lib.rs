//! # motifscan
//!
//! A library for finding sequence motifs in protein and nucleic acid sequences.
//!
//! Patterns are written in a PROSITE-like grammar: literal residues, inclusion
//! classes `[...]`, exclusion classes `{...}`, don't-care positions and repeat
//! ranges, optionally anchored to either end of the sequence. Each pattern is
//! compiled once with the cheapest search algorithm that is correct for its
//! shape and mismatch budget, then scanned against any number of sequences.
//!
//! ## Features
//!
//! - **Seven search engines**: Shift-Or, Horspool, Perleberg, Tarhio-Ukkonen,
//!   regular-expression translation and a backtracking fallback
//! - **Approximate matching**: A substitution budget for every pattern shape
//! - **Restriction digests**: Ambiguity-code sites, both strands, circular
//!   molecules, mirror dedup and isoschizomer grouping
//! - **Fingerprints**: Scoring-matrix elements with thresholds and ordering
//!
//! ## Example
//!
//! ```rust
//! use motifscan::{CompiledPattern, Pattern, SeqType, Sequence};
//!
//! let pattern = Pattern::parse("A[CG]T", SeqType::Nucleic).unwrap();
//! let compiled = CompiledPattern::new(pattern, 0).unwrap();
//!
//! let hits = compiled.search(&Sequence::new("seq1", "ACTAGT")).unwrap();
//! let starts: Vec<usize> = hits.iter().map(|h| h.start).collect();
//! assert_eq!(starts, vec![0, 3]);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Alphabets, bit types, sequences and hit records
//! - [`pattern`]: Pattern grammar and classification
//! - [`matching`]: Search engines, algorithm selection and hit collection
//! - [`restriction`]: Enzyme databases and restriction digests
//! - [`fingerprint`]: Scoring-matrix fingerprint scans
//! - [`parsing`]: FASTA, enzyme, equivalence and fingerprint file parsers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod fingerprint;
pub mod matching;
pub mod parsing;
pub mod pattern;
pub mod restriction;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::alphabet::SeqType;
pub use core::hit::{MatchHit, Strand};
pub use core::sequence::Sequence;
pub use matching::{CompiledPattern, SearchAlgorithmKind};
pub use pattern::{Pattern, PatternError};
pub use restriction::{DigestConfig, EnzymeDatabase, RestrictionDigester, RestrictionHit};
