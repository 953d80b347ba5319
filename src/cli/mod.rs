//! Command-line interface for motifscan.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **patmatch**: Search sequences for a PROSITE-style pattern
//! - **restrict**: Find restriction enzyme cut sites
//! - **pscan**: Scan sequences against a fingerprint database
//!
//! ## Usage
//!
//! ```text
//! # Search a protein file for a zinc-finger-like motif
//! motifscan patmatch proteins.fa --protein --pattern "C-x(2,4)-C-x(3)-[LIVMFYWC]"
//!
//! # Allow one substitution, both strands
//! motifscan patmatch genome.fa --pattern GATTACA --mismatches 1 --both-strands
//!
//! # Digest a plasmid with two enzymes, JSON output
//! motifscan restrict plasmid.fa --circular --enzymes EcoRI,BamHI --format json
//!
//! # Fingerprint scan
//! motifscan pscan proteins.fa --prints prints.dat --emin 3
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::core::sequence::Sequence;
use crate::parsing::fasta::read_fasta_file;

pub mod patmatch;
pub mod pscan;
pub mod restrict;

#[derive(Parser)]
#[command(name = "motifscan")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Search sequences for motifs, restriction sites and fingerprints")]
#[command(
    long_about = "motifscan finds occurrences of sequence motifs.\n\nIt provides:\n- PROSITE-style pattern search with an optional mismatch budget\n- Restriction digests with ambiguity codes, circular molecules and isoschizomer grouping\n- Fingerprint scans with scoring-matrix elements"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search sequences for a pattern
    Patmatch(patmatch::PatmatchArgs),

    /// Find restriction enzyme cut sites
    Restrict(restrict::RestrictArgs),

    /// Scan sequences against fingerprints
    Pscan(pscan::PscanArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Read all sequences from a FASTA file, dropping empty records
fn read_sequences(path: &Path, verbose: bool) -> anyhow::Result<Vec<Sequence>> {
    let mut sequences = read_fasta_file(path)?;
    sequences.retain(|seq| {
        if seq.is_empty() {
            warn!(sequence = %seq.name, "Skipping empty sequence");
        }
        !seq.is_empty()
    });
    if verbose {
        eprintln!(
            "Read {} sequence(s) from {}",
            sequences.len(),
            path.display()
        );
    }
    Ok(sequences)
}
