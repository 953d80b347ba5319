//! Motif search engines and algorithm selection.
//!
//! This module provides the core search functionality:
//!
//! - [`CompiledPattern`]: A pattern bound to a mismatch budget and engine
//! - [`select_algorithm`]: Picks the cheapest correct engine for a pattern
//! - [`HitCollector`]: Anchor filtering, ordering and coordinate mapping
//!
//! ## Engines
//!
//! | Pattern shape                         | Engine                    |
//! |---------------------------------------|---------------------------|
//! | literal, longer than a word           | Boyer-Moore-Horspool      |
//! | literal, with mismatches              | Baeza-Yates-Perleberg     |
//! | literal, up to a word                 | Shift-Or                  |
//! | classes, up to a word                 | Baeza-Yates-Gonnet        |
//! | repeat ranges or long classes         | regular expression        |
//! | classes, with mismatches              | Tarhio-Ukkonen-Bleasby    |
//! | anything else                         | recursive backtracking    |
//!
//! ## Example
//!
//! ```rust
//! use motifscan::core::alphabet::SeqType;
//! use motifscan::core::sequence::Sequence;
//! use motifscan::matching::CompiledPattern;
//! use motifscan::pattern::Pattern;
//!
//! let pattern = Pattern::parse("C-x(2)-[DE]", SeqType::Protein).unwrap();
//! let compiled = CompiledPattern::new(pattern, 0).unwrap();
//!
//! let hits = compiled.search(&Sequence::new("p1", "MCAAEKCGGD")).unwrap();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].position, 2);
//! ```

pub mod backtrack;
pub mod bitparallel;
pub mod collector;
pub mod engine;
pub mod filtration;
pub mod horspool;
pub mod perleberg;
pub mod regex_engine;
pub mod selector;

pub use collector::HitCollector;
pub use engine::{CompiledEngine, CompiledPattern, RawHit, ScanError, SearchEngine};
pub use selector::{select_algorithm, SearchAlgorithmKind};
