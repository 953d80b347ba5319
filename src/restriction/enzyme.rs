use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::iupac::IupacCode;
use crate::parsing::enzyme_db::{parse_enzyme_text, SkippedRecord};
use crate::parsing::{ParseError, RecordPolicy};
use crate::utils::validation::is_valid_name;

/// Embedded default enzyme database (validated by build.rs)
const EMBEDDED_ENZYMES: &str = include_str!("../../data/enzymes.enz");

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnzymeError {
    #[error("Invalid enzyme name '{0}'")]
    InvalidName(String),

    #[error("Recognition site '{0}' is empty or contains non-IUB letters")]
    InvalidSite(String),

    #[error("Expected 2 or 4 cut offsets, got {0}")]
    CutCount(usize),
}

/// A restriction enzyme and its cut geometry.
///
/// Cut offsets are boundaries relative to the first base of the site on the
/// top strand: `0` lies before the first base, `length` after the last, and
/// negative values upstream. Offsets come in (top, bottom) pairs; a second
/// pair describes enzymes that cut on both sides of their site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,

    /// Recognition site as uppercase IUB letters
    pub site: String,

    /// One ambiguity code per site position
    #[serde(skip)]
    pub codes: Vec<IupacCode>,

    pub blunt: bool,

    pub cuts: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,

    /// Isoschizomers as listed by the database record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isoschizomers: Vec<String>,

    /// Supplier codes; empty when not commercially available
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suppliers: String,

    /// Other database enzymes with identical site and cut geometry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl RestrictionEnzyme {
    /// Create an enzyme from its site and cut offsets.
    ///
    /// Blunt-ness is derived from the offsets: every (top, bottom) pair
    /// cuts at the same boundary.
    ///
    /// # Errors
    ///
    /// Returns an [`EnzymeError`] for an empty name, a site with non-IUB
    /// letters, or a cut count other than 2 or 4.
    pub fn new(name: &str, site: &str, cuts: &[i64]) -> Result<Self, EnzymeError> {
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(EnzymeError::InvalidName(name.to_string()));
        }
        let site = site.trim().to_ascii_uppercase();
        if site.is_empty() || !site.bytes().all(IupacCode::is_valid_letter) {
            return Err(EnzymeError::InvalidSite(site));
        }
        if cuts.len() != 2 && cuts.len() != 4 {
            return Err(EnzymeError::CutCount(cuts.len()));
        }
        let codes = site.bytes().map(IupacCode::from_letter).collect();
        let blunt = cuts.chunks(2).all(|pair| pair[0] == pair[1]);
        Ok(Self {
            name: name.to_string(),
            site,
            codes,
            blunt,
            cuts: cuts.to_vec(),
            organism: None,
            isoschizomers: Vec::new(),
            suppliers: String::new(),
            aliases: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_suppliers(mut self, suppliers: &str) -> Self {
        self.suppliers = suppliers.to_string();
        self
    }

    #[must_use]
    pub fn site_length(&self) -> usize {
        self.site.len()
    }

    #[must_use]
    pub fn is_commercial(&self) -> bool {
        !self.suppliers.is_empty()
    }

    /// Key under which enzymes count as isoschizomers of each other
    #[must_use]
    pub fn geometry(&self) -> (&str, &[i64]) {
        (&self.site, &self.cuts)
    }

    /// True when the site reads the same on both strands
    #[must_use]
    pub fn is_palindromic(&self) -> bool {
        crate::core::iupac::reverse_complement(self.site.as_bytes()) == self.site.as_bytes()
    }
}

/// A loaded set of restriction enzymes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnzymeDatabase {
    pub enzymes: Vec<RestrictionEnzyme>,

    /// Records dropped under [`RecordPolicy::Skip`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRecord>,
}

impl EnzymeDatabase {
    /// Build a database and fill in each enzyme's alias list
    #[must_use]
    pub fn new(enzymes: Vec<RestrictionEnzyme>) -> Self {
        let mut db = Self {
            enzymes,
            skipped: Vec::new(),
        };
        db.assign_aliases();
        db
    }

    /// Load the embedded default database
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the embedded data cannot be parsed.
    pub fn load_embedded() -> Result<Self, ParseError> {
        let db = parse_enzyme_text(EMBEDDED_ENZYMES, RecordPolicy::Abort)?;
        info!(enzymes = db.len(), "Loaded embedded enzyme database");
        Ok(db)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enzymes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enzymes.is_empty()
    }

    /// Look up an enzyme by name, ignoring case
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RestrictionEnzyme> {
        self.enzymes
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestrictionEnzyme> {
        self.enzymes.iter()
    }

    fn assign_aliases(&mut self) {
        let mut groups: BTreeMap<(&str, &[i64]), Vec<String>> = BTreeMap::new();
        for enzyme in &self.enzymes {
            groups
                .entry(enzyme.geometry())
                .or_default()
                .push(enzyme.name.clone());
        }
        let aliases: Vec<Vec<String>> = self
            .enzymes
            .iter()
            .map(|enzyme| {
                let mut names = groups.get(&enzyme.geometry()).cloned().unwrap_or_default();
                names.sort();
                names.retain(|n| *n != enzyme.name);
                names
            })
            .collect();
        for (enzyme, names) in self.enzymes.iter_mut().zip(aliases) {
            enzyme.aliases = names;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enzyme() {
        let ecori = RestrictionEnzyme::new("EcoRI", "gaattc", &[1, 5]).unwrap();
        assert_eq!(ecori.site, "GAATTC");
        assert_eq!(ecori.site_length(), 6);
        assert!(!ecori.blunt);
        assert!(ecori.is_palindromic());
        assert!(!ecori.is_commercial());

        let ecorv = RestrictionEnzyme::new("EcoRV", "GATATC", &[3, 3]).unwrap();
        assert!(ecorv.blunt);
    }

    #[test]
    fn test_invalid_enzymes() {
        assert!(matches!(
            RestrictionEnzyme::new("", "GAATTC", &[1, 5]),
            Err(EnzymeError::InvalidName(_))
        ));
        assert!(matches!(
            RestrictionEnzyme::new("Eco RI", "GAATTC", &[1, 5]),
            Err(EnzymeError::InvalidName(_))
        ));
        assert!(matches!(
            RestrictionEnzyme::new("Bad", "GAXTTC", &[1, 5]),
            Err(EnzymeError::InvalidSite(_))
        ));
        assert_eq!(
            RestrictionEnzyme::new("Bad", "GAATTC", &[1, 5, 2]),
            Err(EnzymeError::CutCount(3))
        );
    }

    #[test]
    fn test_aliases() {
        let db = EnzymeDatabase::new(vec![
            RestrictionEnzyme::new("XhoI", "CTCGAG", &[1, 5]).unwrap(),
            RestrictionEnzyme::new("PaeR7I", "CTCGAG", &[1, 5]).unwrap(),
            RestrictionEnzyme::new("EcoRI", "GAATTC", &[1, 5]).unwrap(),
        ]);
        assert_eq!(db.get("xhoi").unwrap().aliases, vec!["PaeR7I"]);
        assert_eq!(db.get("PaeR7I").unwrap().aliases, vec!["XhoI"]);
        assert!(db.get("EcoRI").unwrap().aliases.is_empty());
    }

    #[test]
    fn test_load_embedded() {
        let db = EnzymeDatabase::load_embedded().unwrap();
        assert!(db.len() > 20);
        let ecori = db.get("EcoRI").unwrap();
        assert_eq!(ecori.cuts, vec![1, 5]);
        assert!(ecori.is_commercial());
        assert!(db.skipped.is_empty());
    }
}
