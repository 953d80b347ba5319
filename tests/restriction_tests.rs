//! Restriction digest tests: strand handling, circular molecules and
//! reconciliation of mirrored and isoschizomer hits.

use motifscan::core::hit::Strand;
use motifscan::parsing::enzyme_db::parse_enzyme_text;
use motifscan::parsing::equivalence::parse_equivalence_text;
use motifscan::parsing::RecordPolicy;
use motifscan::restriction::{
    fragment_lengths, DigestConfig, EnzymeDatabase, RestrictionDigester, RestrictionEnzyme,
};
use motifscan::Sequence;

fn digester(enzymes: Vec<RestrictionEnzyme>, config: DigestConfig) -> RestrictionDigester {
    RestrictionDigester::new(&EnzymeDatabase::new(enzymes), config).unwrap()
}

/// A palindromic site matched on both strands is reported once
#[test]
fn test_palindromic_site_reported_once() {
    let d = digester(
        vec![RestrictionEnzyme::new("EcoRI", "GAATTC", &[1, 5]).unwrap()],
        DigestConfig::default(),
    );
    let hits = d.digest(&Sequence::new("s", "GAATTC")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].start, 0);
    assert_eq!(hits[0].cuts, vec![1, 5]);
}

/// Enzymes with identical site and cuts are grouped unless asked not to
#[test]
fn test_isoschizomer_grouping() {
    let enzymes = || {
        vec![
            RestrictionEnzyme::new("EcoRI", "GAATTC", &[1, 5]).unwrap(),
            RestrictionEnzyme::new("FunII", "GAATTC", &[1, 5]).unwrap(),
        ]
    };
    let seq = Sequence::new("s", "AAGAATTCAA");

    let grouped = digester(enzymes(), DigestConfig::default())
        .digest(&seq)
        .unwrap();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].enzyme, "EcoRI");
    assert_eq!(grouped[0].aliases, vec!["FunII"]);

    let separate = digester(
        enzymes(),
        DigestConfig {
            suppress_isoschizomers: false,
            ..DigestConfig::default()
        },
    )
    .digest(&seq)
    .unwrap();
    assert_eq!(separate.len(), 2);
    assert!(separate.iter().all(|h| h.aliases.is_empty()));
}

/// Neoschizomers share a site but not cuts, so they stay separate
#[test]
fn test_neoschizomers_not_grouped() {
    let d = digester(
        vec![
            RestrictionEnzyme::new("KpnI", "GGTACC", &[5, 1]).unwrap(),
            RestrictionEnzyme::new("Acc65I", "GGTACC", &[1, 5]).unwrap(),
        ],
        DigestConfig::default(),
    );
    let hits = d.digest(&Sequence::new("s", "TTGGTACCTT")).unwrap();
    assert_eq!(hits.len(), 2);
}

/// A site spanning the origin is only found on a circular molecule
#[test]
fn test_circular_wraparound() {
    let enzymes = || vec![RestrictionEnzyme::new("MseI", "TTAA", &[1, 3]).unwrap()];

    let linear = digester(enzymes(), DigestConfig::default())
        .digest(&Sequence::new("s", "AATT"))
        .unwrap();
    assert!(linear.is_empty());

    let circular = digester(enzymes(), DigestConfig::default())
        .digest(&Sequence::new("s", "AATT").with_circular(true))
        .unwrap();
    assert_eq!(circular.len(), 1);
    assert_eq!(circular[0].start, 2);
    assert_eq!(circular[0].cuts, vec![3, 1]);
}

/// Non-palindromic sites are found on the bottom strand too
#[test]
fn test_reverse_strand_hit() {
    let d = digester(
        vec![RestrictionEnzyme::new("BsaI", "GGTCTC", &[7, 11]).unwrap()],
        DigestConfig::default(),
    );
    // forward site at 2, bottom-strand site (GAGACC) at 20
    let seq = Sequence::new("s", "AAGGTCTCAAAAAAAAAAAAGAGACCAA");
    let hits = d.digest(&seq).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].start, hits[0].strand), (2, Strand::Forward));
    assert_eq!(hits[0].cuts, vec![9, 13]);
    assert_eq!((hits[1].start, hits[1].strand), (20, Strand::Reverse));
    assert_eq!(hits[1].cuts, vec![15, 19]);
}

/// Enzymes cutting on both sides of their site carry four cuts
#[test]
fn test_four_cut_enzyme() {
    let d = digester(
        vec![RestrictionEnzyme::new("BaeI", "ACNNNNGTAYC", &[-10, -15, 23, 18]).unwrap()],
        DigestConfig::default(),
    );
    let flank = "T".repeat(20);
    let seq = Sequence::new("s", format!("{flank}ACGGCCGTATC{flank}"));
    let hits = d.digest(&seq).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].cuts, vec![10, 5, 43, 38]);
    assert_eq!(hits[0].top_cuts().collect::<Vec<_>>(), vec![10, 43]);
}

/// Preferred names replace the group representative
#[test]
fn test_equivalence_names() {
    let equivalences = parse_equivalence_text("PaeR7I XhoI\n").unwrap();
    let d = digester(
        vec![RestrictionEnzyme::new("PaeR7I", "CTCGAG", &[1, 5]).unwrap()],
        DigestConfig::default(),
    )
    .with_equivalences(equivalences);
    let hits = d.digest(&Sequence::new("s", "AACTCGAGAA")).unwrap();
    assert_eq!(hits[0].enzyme, "XhoI");
    assert_eq!(hits[0].aliases, vec!["PaeR7I"]);
}

/// Site-count limits apply per enzyme
#[test]
fn test_hit_count_limits() {
    let enzymes = || {
        vec![
            RestrictionEnzyme::new("EcoRI", "GAATTC", &[1, 5]).unwrap(),
            RestrictionEnzyme::new("BamHI", "GGATCC", &[1, 5]).unwrap(),
        ]
    };
    let seq = Sequence::new("s", "GAATTCAAGGATCCAAGAATTC");

    let single_cutters = digester(
        enzymes(),
        DigestConfig {
            max_hits: Some(1),
            ..DigestConfig::default()
        },
    )
    .digest(&seq)
    .unwrap();
    assert_eq!(single_cutters.len(), 1);
    assert_eq!(single_cutters[0].enzyme, "BamHI");

    let double_cutters = digester(
        enzymes(),
        DigestConfig {
            min_hits: 2,
            ..DigestConfig::default()
        },
    )
    .digest(&seq)
    .unwrap();
    assert_eq!(double_cutters.len(), 2);
    assert!(double_cutters.iter().all(|h| h.enzyme == "EcoRI"));
}

/// The embedded database digests a small plasmid-like sequence
#[test]
fn test_embedded_database_digest() {
    let db = EnzymeDatabase::load_embedded().unwrap();
    let config = DigestConfig {
        enzymes: Some(vec!["MboI".to_string(), "DpnII".to_string(), "Sau3AI".to_string()]),
        ..DigestConfig::default()
    };
    let d = RestrictionDigester::new(&db, config).unwrap();
    let seq = Sequence::new("p", "AAGATCAAAAGATCAA");
    let hits = d.digest(&seq).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].enzyme, "DpnII");
    assert_eq!(hits[0].aliases, vec!["MboI", "Sau3AI"]);
    assert_eq!(fragment_lengths(&hits, seq.len(), false), vec![2, 8, 6]);
}

/// Malformed records are either fatal or skipped, as configured
#[test]
fn test_record_policy() {
    let text = "EcoRI\tGAATTC\t6\t2\t0\t1\t5\t0\t0\nBroken\tGAATTC\n";
    assert!(parse_enzyme_text(text, RecordPolicy::Abort).is_err());

    let db = parse_enzyme_text(text, RecordPolicy::Skip).unwrap();
    assert_eq!(db.len(), 1);
    assert_eq!(db.skipped.len(), 1);
    assert_eq!(db.skipped[0].line, 2);
}
