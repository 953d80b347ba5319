use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sequences, OutputFormat};
use crate::core::hit::MatchHit;
use crate::fingerprint::{FingerprintConfig, FingerprintScanner};
use crate::parsing::fingerprint_db::parse_fingerprint_file;
use crate::parsing::RecordPolicy;

#[derive(Args)]
pub struct PscanArgs {
    /// Input FASTA file of protein sequences (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Fingerprint database
    #[arg(long, required = true)]
    pub prints: PathBuf,

    /// Minimum number of elements that must hit
    #[arg(long, default_value = "2")]
    pub emin: usize,

    /// Maximum number of elements that may hit
    #[arg(long)]
    pub emax: Option<usize>,

    /// Skip malformed fingerprints instead of failing
    #[arg(long)]
    pub lenient: bool,
}

pub fn run(args: PscanArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let policy = if args.lenient {
        RecordPolicy::Skip
    } else {
        RecordPolicy::Abort
    };
    let db = parse_fingerprint_file(&args.prints, policy)?;
    if !db.skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} malformed fingerprint(s)",
            db.skipped.len()
        );
    }
    if verbose {
        eprintln!("Loaded {} fingerprint(s)", db.fingerprints.len());
    }

    let scanner = FingerprintScanner::new(FingerprintConfig {
        min_elements: args.emin,
        max_elements: args.emax,
    });

    let sequences = read_sequences(&args.input, verbose)?;
    let mut hits = Vec::new();
    for seq in &sequences {
        hits.extend(scanner.scan_all(&db.fingerprints, seq)?);
    }

    match format {
        OutputFormat::Text => print_text(&hits),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Tsv => print_tsv(&hits),
    }

    Ok(())
}

fn print_text(hits: &[MatchHit]) {
    println!("Hits: {}", hits.len());
    let mut current: Option<(&str, &str)> = None;
    for hit in hits {
        let key = (hit.seq_name.as_str(), hit.pattern.as_str());
        if current != Some(key) {
            current = Some(key);
            println!();
            println!(
                "{}  {} {} {}",
                hit.seq_name,
                hit.pattern,
                hit.accession.as_deref().unwrap_or(""),
                hit.title.as_deref().unwrap_or("")
            );
        }
        if let Some(info) = &hit.fingerprint {
            println!(
                "  element {}  position {}  length {}  score {}%{}",
                info.element + 1,
                hit.position,
                hit.length,
                info.percent,
                if info.elements_in_order { "" } else { "  (out of order)" }
            );
        }
    }
}

fn print_tsv(hits: &[MatchHit]) {
    println!("sequence\tfingerprint\taccession\telement\tposition\tlength\tpercent\telements_hit\tall_elements\tin_order");
    for hit in hits {
        if let Some(info) = &hit.fingerprint {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                hit.seq_name,
                hit.pattern,
                hit.accession.as_deref().unwrap_or(""),
                info.element + 1,
                hit.position,
                hit.length,
                info.percent,
                info.hits_per_motif,
                info.all_elements_matched,
                info.elements_in_order
            );
        }
    }
}
