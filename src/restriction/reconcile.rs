//! Post-scan reconciliation of restriction hits.
//!
//! Applied in order by the digester: mirror dedup, isoschizomer grouping,
//! hit-count filtering and final ordering. Each step is a plain function
//! over a hit list so it can be tested on its own.

use std::collections::HashMap;

use crate::parsing::equivalence::Equivalences;
use crate::restriction::digest::RestrictionHit;

/// Drop repeated hits of the same enzyme at the same site with the same
/// cuts, as produced by a site that is its own reverse complement.
///
/// The first hit in `(enzyme, start, cuts, strand)` order is kept, so the
/// forward-strand copy survives.
pub fn mirror_dedup(hits: &mut Vec<RestrictionHit>) {
    hits.sort_by(|a, b| {
        (&a.enzyme, a.start, &a.cuts, a.strand).cmp(&(&b.enzyme, b.start, &b.cuts, b.strand))
    });
    hits.dedup_by(|b, a| a.enzyme == b.enzyme && a.start == b.start && a.cuts == b.cuts);
}

/// Merge hits of different enzymes that share site, position and cuts.
///
/// The alphabetically first name represents the group, replaced by its
/// preferred name when `equivalences` lists one; every other name becomes
/// an alias.
#[must_use]
pub fn group_isoschizomers(
    mut hits: Vec<RestrictionHit>,
    equivalences: &Equivalences,
) -> Vec<RestrictionHit> {
    hits.sort_by(|a, b| {
        (a.start, &a.cuts, &a.site, &a.enzyme).cmp(&(b.start, &b.cuts, &b.site, &b.enzyme))
    });

    let mut grouped: Vec<RestrictionHit> = Vec::with_capacity(hits.len());
    let mut members: Vec<Vec<String>> = Vec::with_capacity(hits.len());
    for hit in hits {
        match grouped.last() {
            Some(last) if last.start == hit.start && last.cuts == hit.cuts && last.site == hit.site => {
                if let Some(names) = members.last_mut() {
                    names.push(hit.enzyme);
                }
            }
            _ => {
                members.push(vec![hit.enzyme.clone()]);
                grouped.push(hit);
            }
        }
    }

    for (hit, names) in grouped.iter_mut().zip(members) {
        let representative = equivalences.preferred(&names[0]).to_string();
        hit.aliases = names
            .into_iter()
            .filter(|n| *n != representative)
            .collect();
        hit.enzyme = representative;
    }
    grouped
}

/// Keep only enzymes (or enzyme groups) with `min..=max` hits in the sequence
pub fn filter_hit_counts(hits: &mut Vec<RestrictionHit>, min: usize, max: Option<usize>) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for hit in hits.iter() {
        *counts.entry(hit.enzyme.clone()).or_default() += 1;
    }
    hits.retain(|hit| {
        let n = counts.get(&hit.enzyme).copied().unwrap_or(0);
        n >= min && max.map_or(true, |max| n <= max)
    });
}

/// Order by site start; ties by enzyme name when `alphabetic`, otherwise
/// by the order the hits arrive in.
pub fn order_hits(hits: &mut [RestrictionHit], alphabetic: bool) {
    if alphabetic {
        hits.sort_by(|a, b| (a.start, &a.enzyme).cmp(&(b.start, &b.enzyme)));
    } else {
        hits.sort_by_key(|h| h.start);
    }
}
