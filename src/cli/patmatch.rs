use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sequences, OutputFormat};
use crate::core::alphabet::SeqType;
use crate::core::hit::{MatchHit, Strand};
use crate::core::iupac::reverse_complement;
use crate::matching::CompiledPattern;
use crate::pattern::Pattern;

#[derive(Args)]
pub struct PatmatchArgs {
    /// Input FASTA file (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Pattern to search for, e.g. "C-x(2,4)-C"
    #[arg(short, long)]
    pub pattern: String,

    /// Number of substitutions allowed
    #[arg(short, long, default_value = "0")]
    pub mismatches: usize,

    /// Treat pattern and sequences as protein (default: nucleic)
    #[arg(long)]
    pub protein: bool,

    /// Also search the reverse complement strand
    #[arg(long, conflicts_with = "protein")]
    pub both_strands: bool,
}

pub fn run(args: PatmatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let seq_type = if args.protein {
        SeqType::Protein
    } else {
        SeqType::Nucleic
    };
    let pattern = Pattern::parse(&args.pattern, seq_type)?;
    let compiled = CompiledPattern::new(pattern, args.mismatches)?;

    if verbose {
        eprintln!(
            "Pattern {} ({} residues{}), {} algorithm",
            compiled.pattern(),
            compiled.pattern().min_length(),
            if compiled.pattern().properties.has_range {
                format!("-{}", compiled.pattern().max_length())
            } else {
                String::new()
            },
            compiled.kind()
        );
    }

    let sequences = read_sequences(&args.input, verbose)?;
    let mut hits = Vec::new();
    for seq in &sequences {
        let found = if args.both_strands {
            compiled.search_both_strands(seq)?
        } else {
            compiled.search(seq)?
        };
        hits.extend(found.into_iter().map(|hit| {
            let region = &seq.residues()[hit.start..hit.end()];
            let matched = match hit.strand {
                Strand::Forward => region.to_vec(),
                Strand::Reverse => reverse_complement(region),
            };
            (hit, String::from_utf8_lossy(&matched).to_string())
        }));
    }

    match format {
        OutputFormat::Text => print_text(&compiled, &hits),
        OutputFormat::Json => print_json(&compiled, &hits)?,
        OutputFormat::Tsv => print_tsv(&hits),
    }

    Ok(())
}

fn print_text(compiled: &CompiledPattern, hits: &[(MatchHit, String)]) {
    println!("Pattern: {}", compiled.pattern());
    println!("Mismatches: {}", compiled.mismatches());
    println!("Algorithm: {}", compiled.kind());
    println!("Hits: {}", hits.len());

    if hits.is_empty() {
        return;
    }
    println!();
    for (hit, matched) in hits {
        println!(
            "  {}\t{}-{}\t{}\tmismatches={}\t{}",
            hit.seq_name,
            hit.position,
            hit.position + hit.length - 1,
            hit.strand,
            hit.mismatches,
            matched
        );
    }
}

fn print_json(compiled: &CompiledPattern, hits: &[(MatchHit, String)]) -> anyhow::Result<()> {
    let mut records = Vec::with_capacity(hits.len());
    for (hit, matched) in hits {
        let mut value = serde_json::to_value(hit)?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert("matched".to_string(), matched.clone().into());
        }
        records.push(value);
    }

    let output = serde_json::json!({
        "pattern": compiled.pattern().to_string(),
        "mismatches": compiled.mismatches(),
        "algorithm": compiled.kind(),
        "hits": records,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(hits: &[(MatchHit, String)]) {
    println!("sequence\tstart\tend\tstrand\tmismatches\tmatched");
    for (hit, matched) in hits {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            hit.seq_name,
            hit.position,
            hit.position + hit.length - 1,
            hit.strand,
            hit.mismatches,
            matched
        );
    }
}
