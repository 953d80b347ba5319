use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{read_sequences, OutputFormat};
use crate::core::sequence::Sequence;
use crate::parsing::enzyme_db::parse_enzyme_file;
use crate::parsing::equivalence::parse_equivalence_file;
use crate::parsing::RecordPolicy;
use crate::restriction::{
    fragment_lengths, DigestConfig, EnzymeDatabase, RestrictionDigester, RestrictionHit,
};

#[derive(Args)]
pub struct RestrictArgs {
    /// Input FASTA file (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Enzyme database (default: embedded database)
    #[arg(long)]
    pub enzyme_db: Option<PathBuf>,

    /// Table of preferred enzyme names
    #[arg(long)]
    pub equivalences: Option<PathBuf>,

    /// JSON file with digest settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only use these enzymes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub enzymes: Option<Vec<String>>,

    /// Treat sequences as circular
    #[arg(long)]
    pub circular: bool,

    /// Compare sites literally instead of expanding ambiguity codes
    #[arg(long)]
    pub no_ambiguity: bool,

    /// Report isoschizomers separately
    #[arg(long)]
    pub keep_isoschizomers: bool,

    /// Minimum number of sites per enzyme
    #[arg(long)]
    pub min_hits: Option<usize>,

    /// Maximum number of sites per enzyme
    #[arg(long)]
    pub max_hits: Option<usize>,

    /// Exclude blunt cutters
    #[arg(long)]
    pub no_blunt: bool,

    /// Exclude sticky cutters
    #[arg(long)]
    pub no_sticky: bool,

    /// Minimum recognition site length
    #[arg(long)]
    pub site_length: Option<usize>,

    /// Only commercially available enzymes
    #[arg(long)]
    pub commercial: bool,

    /// Order hits at the same position by enzyme name
    #[arg(long)]
    pub alphabetic: bool,

    /// Also report fragment lengths
    #[arg(long)]
    pub fragments: bool,

    /// Skip malformed database records instead of failing
    #[arg(long)]
    pub lenient: bool,
}

impl RestrictArgs {
    fn digest_config(&self) -> anyhow::Result<DigestConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid digest config {}", path.display()))?
            }
            None => DigestConfig::default(),
        };

        if let Some(enzymes) = &self.enzymes {
            config.enzymes = Some(enzymes.clone());
        }
        if self.circular {
            config.circular = Some(true);
        }
        if self.no_ambiguity {
            config.ambiguity = false;
        }
        if self.keep_isoschizomers {
            config.suppress_isoschizomers = false;
        }
        if let Some(min) = self.min_hits {
            config.min_hits = min;
        }
        if self.max_hits.is_some() {
            config.max_hits = self.max_hits;
        }
        if self.no_blunt {
            config.allow_blunt = false;
        }
        if self.no_sticky {
            config.allow_sticky = false;
        }
        if let Some(len) = self.site_length {
            config.min_site_length = len;
        }
        if self.commercial {
            config.commercial_only = true;
        }
        if self.alphabetic {
            config.alphabetic = true;
        }
        Ok(config)
    }
}

struct SequenceDigest<'a> {
    seq: &'a Sequence,
    circular: bool,
    hits: Vec<RestrictionHit>,
}

pub fn run(args: RestrictArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let policy = if args.lenient {
        RecordPolicy::Skip
    } else {
        RecordPolicy::Abort
    };
    let db = match &args.enzyme_db {
        Some(path) => parse_enzyme_file(path, policy)?,
        None => EnzymeDatabase::load_embedded()?,
    };
    if !db.skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} malformed enzyme record(s)",
            db.skipped.len()
        );
    }

    let mut digester = RestrictionDigester::new(&db, args.digest_config()?)?;
    if let Some(path) = &args.equivalences {
        digester = digester.with_equivalences(parse_equivalence_file(path)?);
    }
    if verbose {
        eprintln!(
            "Using {} of {} enzymes",
            digester.enzymes().count(),
            db.len()
        );
    }

    let sequences = read_sequences(&args.input, verbose)?;
    let mut results = Vec::with_capacity(sequences.len());
    for seq in &sequences {
        results.push(SequenceDigest {
            seq,
            circular: digester.is_circular(seq),
            hits: digester.digest(seq)?,
        });
    }

    match format {
        OutputFormat::Text => print_text(&results, args.fragments),
        OutputFormat::Json => print_json(&results, args.fragments)?,
        OutputFormat::Tsv => print_tsv(&results),
    }

    Ok(())
}

fn format_cuts(hit: &RestrictionHit) -> String {
    hit.cuts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_text(results: &[SequenceDigest<'_>], fragments: bool) {
    for result in results {
        println!(
            "Sequence: {} ({} bp, {})",
            result.seq.name,
            result.seq.len(),
            if result.circular { "circular" } else { "linear" }
        );
        println!("Hits: {}", result.hits.len());

        for hit in &result.hits {
            let aliases = if hit.aliases.is_empty() {
                String::new()
            } else {
                format!(" ({})", hit.aliases.join(", "))
            };
            println!(
                "  {:>8}  {}{}\t{}\t{}\tcuts={}",
                hit.position,
                hit.enzyme,
                aliases,
                hit.site,
                hit.strand,
                format_cuts(hit)
            );
        }

        if fragments {
            let sizes = fragment_lengths(&result.hits, result.seq.len(), result.circular);
            println!(
                "Fragments: {}",
                sizes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        println!();
    }
}

fn print_json(results: &[SequenceDigest<'_>], fragments: bool) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = results
        .iter()
        .map(|result| {
            let mut value = serde_json::json!({
                "sequence": result.seq.name,
                "length": result.seq.len(),
                "circular": result.circular,
                "hits": result.hits,
            });
            if fragments {
                value["fragments"] = serde_json::json!(fragment_lengths(
                    &result.hits,
                    result.seq.len(),
                    result.circular
                ));
            }
            value
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(results: &[SequenceDigest<'_>]) {
    println!("sequence\tposition\tenzyme\taliases\tsite\tstrand\tcuts");
    for result in results {
        for hit in &result.hits {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                hit.seq_name,
                hit.position,
                hit.enzyme,
                hit.aliases.join(","),
                hit.site,
                hit.strand,
                format_cuts(hit)
            );
        }
    }
}
