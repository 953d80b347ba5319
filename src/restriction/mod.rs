//! Restriction-enzyme digestion of nucleic sequences.
//!
//! - [`RestrictionEnzyme`] / [`EnzymeDatabase`]: Enzyme sites and cut geometry
//! - [`RestrictionDigester`]: Finds sites on both strands and computes cuts
//! - [`reconcile`]: Mirror dedup, isoschizomer grouping, filtering, ordering
//!
//! ## Example
//!
//! ```rust
//! use motifscan::core::sequence::Sequence;
//! use motifscan::restriction::{DigestConfig, EnzymeDatabase, RestrictionDigester};
//!
//! let db = EnzymeDatabase::load_embedded().unwrap();
//! let config = DigestConfig {
//!     enzymes: Some(vec!["EcoRI".to_string()]),
//!     ..DigestConfig::default()
//! };
//! let digester = RestrictionDigester::new(&db, config).unwrap();
//!
//! let hits = digester.digest(&Sequence::new("pUC", "TTGAATTCTT")).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].cuts, vec![3, 7]);
//! ```

pub mod digest;
pub mod enzyme;
pub mod reconcile;

pub use digest::{fragment_lengths, DigestConfig, DigestError, RestrictionDigester, RestrictionHit};
pub use enzyme::{EnzymeDatabase, EnzymeError, RestrictionEnzyme};
