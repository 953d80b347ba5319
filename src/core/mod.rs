//! Core data types shared by every search mode.
//!
//! - [`alphabet`]: residue alphabets and bounds-checked per-symbol tables
//! - [`bits`]: fixed-width bit sets and shift-or words
//! - [`iupac`]: 4-bit nucleotide ambiguity codes and complements
//! - [`sequence`]: the residue string being scanned
//! - [`hit`]: [`MatchHit`](hit::MatchHit) records returned by scans

pub mod alphabet;
pub mod bits;
pub mod hit;
pub mod iupac;
pub mod sequence;
