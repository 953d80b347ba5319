use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::alphabet::SeqType;
use crate::core::hit::Strand;
use crate::core::iupac::{reverse_complement, IupacCode};
use crate::core::sequence::Sequence;
use crate::matching::{CompiledPattern, ScanError};
use crate::parsing::equivalence::Equivalences;
use crate::pattern::{Pattern, PatternError};
use crate::restriction::enzyme::{EnzymeDatabase, RestrictionEnzyme};
use crate::restriction::reconcile::{
    filter_hit_counts, group_isoschizomers, mirror_dedup, order_hits,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Unknown enzyme '{0}'")]
    UnknownEnzyme(String),
}

/// Configuration for a restriction digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Match IUB ambiguity letters in sites against any compatible base;
    /// when off, sites are compared as literal text
    pub ambiguity: bool,

    /// Report enzymes with identical site and cuts as one hit with aliases
    pub suppress_isoschizomers: bool,

    /// Fewest sites an enzyme must have in the sequence to be reported
    pub min_hits: usize,

    /// Most sites an enzyme may have in the sequence to be reported
    pub max_hits: Option<usize>,

    pub allow_blunt: bool,

    pub allow_sticky: bool,

    /// Shortest recognition site considered
    pub min_site_length: usize,

    /// Restrict the digest to these enzymes (case-insensitive)
    pub enzymes: Option<Vec<String>>,

    /// Only enzymes with at least one supplier
    pub commercial_only: bool,

    /// Order hits at the same position by enzyme name
    pub alphabetic: bool,

    /// Overrides the sequence's own topology when set
    pub circular: Option<bool>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            ambiguity: true,
            suppress_isoschizomers: true,
            min_hits: 1,
            max_hits: None,
            allow_blunt: true,
            allow_sticky: true,
            min_site_length: 4,
            enzymes: None,
            commercial_only: false,
            alphabetic: false,
            circular: None,
        }
    }
}

/// One enzyme cutting one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionHit {
    pub seq_name: String,

    pub enzyme: String,

    /// Isoschizomers merged into this hit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Recognition site as stored for the enzyme
    pub site: String,

    /// 0-based start of the recognition site in forward coordinates
    pub start: usize,

    /// Caller-facing coordinate of `start`
    pub position: usize,

    pub length: usize,

    /// Cut boundaries in forward coordinates, as (top, bottom) pairs
    pub cuts: Vec<usize>,

    pub strand: Strand,

    pub blunt: bool,
}

impl RestrictionHit {
    /// Boundaries where the top strand is cut
    pub fn top_cuts(&self) -> impl Iterator<Item = usize> + '_ {
        self.cuts.iter().step_by(2).copied()
    }
}

/// How a site is recognised in text
#[derive(Debug, Clone)]
enum SiteMatcher {
    /// Nibble codes; a position matches when the codes share a base
    Ambiguous(Vec<IupacCode>),
    /// Literal comparison through a compiled exact pattern
    Exact(Box<CompiledPattern>),
}

impl SiteMatcher {
    fn new(site: &[u8], ambiguity: bool) -> Result<Self, PatternError> {
        if ambiguity {
            Ok(Self::Ambiguous(
                site.iter().copied().map(IupacCode::from_letter).collect(),
            ))
        } else {
            let pattern = Pattern::literal(site, SeqType::Nucleic)?;
            Ok(Self::Exact(Box::new(CompiledPattern::new(pattern, 0)?)))
        }
    }

    /// Starts of every occurrence in `text` (and `codes`, its nibble form)
    fn starts(&self, text: &[u8], codes: &[IupacCode]) -> Result<Vec<usize>, ScanError> {
        match self {
            Self::Ambiguous(site) => {
                let m = site.len();
                if m == 0 || codes.len() < m {
                    return Ok(Vec::new());
                }
                Ok(codes
                    .windows(m)
                    .enumerate()
                    .filter(|(_, window)| site.iter().zip(*window).all(|(p, t)| p.overlaps(*t)))
                    .map(|(start, _)| start)
                    .collect())
            }
            Self::Exact(compiled) => Ok(compiled
                .scan_raw(text)?
                .into_iter()
                .map(|h| h.start)
                .collect()),
        }
    }
}

#[derive(Debug, Clone)]
struct PreparedEnzyme {
    enzyme: RestrictionEnzyme,
    forward: SiteMatcher,
    /// Matches the site as it reads on the bottom strand
    reverse: SiteMatcher,
}

/// Restriction digest of sequences against a selection of enzymes.
///
/// Enzyme selection (allow-list, blunt/sticky, site length, commercial
/// availability) happens once at construction; the per-sequence site-count
/// filter happens after isoschizomer grouping.
#[derive(Debug, Clone)]
pub struct RestrictionDigester {
    enzymes: Vec<PreparedEnzyme>,
    config: DigestConfig,
    equivalences: Equivalences,
}

impl RestrictionDigester {
    /// Select enzymes from `db` and prepare their matchers.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::UnknownEnzyme` if the allow-list names an
    /// enzyme missing from the database, or `DigestError::Pattern` if a
    /// site cannot be compiled.
    pub fn new(db: &EnzymeDatabase, config: DigestConfig) -> Result<Self, DigestError> {
        if let Some(names) = &config.enzymes {
            if let Some(missing) = names.iter().find(|n| db.get(n).is_none()) {
                return Err(DigestError::UnknownEnzyme(missing.clone()));
            }
        }

        let mut enzymes = Vec::new();
        for enzyme in db.iter().filter(|e| selects(&config, e)) {
            let site = enzyme.site.as_bytes();
            enzymes.push(PreparedEnzyme {
                forward: SiteMatcher::new(site, config.ambiguity)?,
                reverse: SiteMatcher::new(&reverse_complement(site), config.ambiguity)?,
                enzyme: enzyme.clone(),
            });
        }
        if enzymes.is_empty() {
            warn!("No enzymes left after selection");
        }
        debug!(
            selected = enzymes.len(),
            available = db.len(),
            palindromic = enzymes.iter().filter(|p| p.enzyme.is_palindromic()).count(),
            "Prepared restriction enzymes"
        );

        Ok(Self {
            enzymes,
            config,
            equivalences: Equivalences::default(),
        })
    }

    /// Report groups under preferred names from `equivalences`
    #[must_use]
    pub fn with_equivalences(mut self, equivalences: Equivalences) -> Self {
        self.equivalences = equivalences;
        self
    }

    /// The selected enzymes, in database order
    pub fn enzymes(&self) -> impl Iterator<Item = &RestrictionEnzyme> {
        self.enzymes.iter().map(|p| &p.enzyme)
    }

    #[must_use]
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Whether `seq` is digested as a circular molecule
    #[must_use]
    pub fn is_circular(&self, seq: &Sequence) -> bool {
        self.config.circular.unwrap_or(seq.circular)
    }

    /// Find and reconcile every cut site in `seq`.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Scan` for an empty sequence.
    pub fn digest(&self, seq: &Sequence) -> Result<Vec<RestrictionHit>, DigestError> {
        if seq.is_empty() {
            return Err(ScanError::EmptySequence(seq.name.clone()).into());
        }
        let circular = self.is_circular(seq);
        let len = seq.len();

        let longest = self
            .enzymes
            .iter()
            .map(|p| p.enzyme.site_length())
            .max()
            .unwrap_or(0);
        let buffer = scan_buffer(seq.residues(), longest, circular);
        let buffer_codes: Vec<IupacCode> = if self.config.ambiguity {
            buffer.iter().copied().map(IupacCode::from_letter).collect()
        } else {
            Vec::new()
        };

        let mut hits = Vec::new();
        for prepared in &self.enzymes {
            let site_len = prepared.enzyme.site_length();
            let end = len + wrap_length(len, site_len, circular);
            let text = &buffer[..end];
            let codes = buffer_codes.get(..end).unwrap_or_default();

            let before = hits.len();
            for (matcher, strand) in [
                (&prepared.forward, Strand::Forward),
                (&prepared.reverse, Strand::Reverse),
            ] {
                for start in matcher.starts(text, codes)? {
                    if start >= len {
                        continue;
                    }
                    if let Some(cuts) = cut_positions(&prepared.enzyme, start, strand, len, circular)
                    {
                        hits.push(RestrictionHit {
                            seq_name: seq.name.clone(),
                            enzyme: prepared.enzyme.name.clone(),
                            aliases: Vec::new(),
                            site: prepared.enzyme.site.clone(),
                            start,
                            position: seq.position(start),
                            length: site_len,
                            cuts,
                            strand,
                            blunt: prepared.enzyme.blunt,
                        });
                    }
                }
            }
            debug!(
                enzyme = %prepared.enzyme.name,
                sequence = %seq.name,
                sites = hits.len() - before,
                "Scanned enzyme"
            );
        }

        Ok(self.reconcile(hits))
    }

    fn reconcile(&self, mut hits: Vec<RestrictionHit>) -> Vec<RestrictionHit> {
        // database order is the tie-break when not ordering alphabetically
        let rank = |name: &str| {
            self.enzymes
                .iter()
                .position(|p| p.enzyme.name == name)
                .unwrap_or(usize::MAX)
        };

        mirror_dedup(&mut hits);
        if self.config.suppress_isoschizomers {
            hits = group_isoschizomers(hits, &self.equivalences);
        }
        filter_hit_counts(&mut hits, self.config.min_hits, self.config.max_hits);
        hits.sort_by_cached_key(|h| (rank(&h.enzyme), h.start, h.strand));
        order_hits(&mut hits, self.config.alphabetic);
        hits
    }
}

/// Enzyme-property filters applied before scanning
fn selects(config: &DigestConfig, enzyme: &RestrictionEnzyme) -> bool {
    if let Some(names) = &config.enzymes {
        if !names.iter().any(|n| n.eq_ignore_ascii_case(&enzyme.name)) {
            return false;
        }
    }
    (if enzyme.blunt {
        config.allow_blunt
    } else {
        config.allow_sticky
    }) && enzyme.site_length() >= config.min_site_length
        && (!config.commercial_only || enzyme.is_commercial())
}

/// Text to scan: the sequence, followed for circular molecules by enough of
/// its start for sites spanning the origin to be seen.
fn scan_buffer(residues: &[u8], site_len: usize, circular: bool) -> Vec<u8> {
    let mut text = residues.to_vec();
    text.extend_from_slice(&residues[..wrap_length(residues.len(), site_len, circular)]);
    text
}

/// Residues copied from the origin so a site may straddle it
fn wrap_length(len: usize, site_len: usize, circular: bool) -> usize {
    if circular {
        site_len.saturating_sub(1).min(len.saturating_sub(1))
    } else {
        0
    }
}

/// Absolute cut boundaries for a site at `start`, or `None` when a linear
/// molecule does not contain them all.
fn cut_positions(
    enzyme: &RestrictionEnzyme,
    start: usize,
    strand: Strand,
    len: usize,
    circular: bool,
) -> Option<Vec<usize>> {
    let start = i64::try_from(start).ok()?;
    let len_i = i64::try_from(len).ok()?;
    let end = start + i64::try_from(enzyme.site_length()).ok()?;

    let raw: Vec<i64> = match strand {
        Strand::Forward => enzyme.cuts.iter().map(|c| start + c).collect(),
        Strand::Reverse => enzyme.cuts.iter().rev().map(|c| end - c).collect(),
    };

    if circular {
        raw.into_iter()
            .map(|c| usize::try_from(c.rem_euclid(len_i)).ok())
            .collect()
    } else {
        raw.into_iter()
            .map(|c| {
                if (0..=len_i).contains(&c) {
                    usize::try_from(c).ok()
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Fragment sizes left by the top-strand cuts of `hits`, in positional
/// order.
///
/// Linear molecules include both ends; circular ones wrap from the last cut
/// back to the first. Without cuts the whole molecule is one fragment.
#[must_use]
pub fn fragment_lengths(hits: &[RestrictionHit], len: usize, circular: bool) -> Vec<usize> {
    let mut cuts: Vec<usize> = hits
        .iter()
        .flat_map(RestrictionHit::top_cuts)
        .filter(|&c| circular || (c > 0 && c < len))
        .map(|c| if circular { c % len.max(1) } else { c })
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let Some((&first, &last)) = cuts.first().zip(cuts.last()) else {
        return vec![len];
    };

    if circular {
        let mut fragments: Vec<usize> = cuts.windows(2).map(|w| w[1] - w[0]).collect();
        fragments.push(len - last + first);
        fragments
    } else {
        let mut fragments = vec![first];
        fragments.extend(cuts.windows(2).map(|w| w[1] - w[0]));
        fragments.push(len - last);
        fragments
    }
}
