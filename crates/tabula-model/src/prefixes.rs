//! IRI 省略表記 (プレフィックス表)

use crate::ModelError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// IRIs minted by the normalizer rather than taken from the ontology start with this.
pub const INTERNAL_IRI_PREFIX: &str = "internal:";

/// Whether an IRI was generated internally (and is not part of the user's signature).
pub fn is_internal_iri(iri: &str) -> bool {
    iri.starts_with(INTERNAL_IRI_PREFIX)
}

const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf:", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs:", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl:", "http://www.w3.org/2002/07/owl#"),
    ("xsd:", "http://www.w3.org/2001/XMLSchema#"),
    ("swrl:", "http://www.w3.org/2003/11/swrl#"),
    ("swrlb:", "http://www.w3.org/2003/11/swrlb#"),
    ("swrlx:", "http://www.w3.org/2003/11/swrlx#"),
    ("ruleml:", "http://www.w3.org/2003/11/ruleml#"),
];

const INTERNAL_PREFIXES: &[(&str, &str)] = &[
    ("def:", "internal:def#"),
    ("nom:", "internal:nom#"),
    ("q:", "internal:q#"),
    ("nnq:", "internal:nnq#"),
    ("all:", "internal:all#"),
    ("dq:", "internal:dq#"),
    ("pdq:", "internal:pdq#"),
    ("ndq:", "internal:ndq#"),
];

lazy_static! {
    static ref STANDARD: Prefixes = {
        let mut prefixes = Prefixes::new();
        for (name, iri) in STANDARD_PREFIXES.iter().chain(INTERNAL_PREFIXES) {
            prefixes.by_name.insert(name.to_string(), iri.to_string());
        }
        prefixes
    };
}

/// Prefix table used to abbreviate IRIs when rendering.
///
/// Prefix names carry their trailing colon (`owl:`); the empty name `:`
/// is the default prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    by_name: BTreeMap<String, String>,
}

impl Prefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The well-known semantic-web and internal prefixes.
    pub fn standard() -> &'static Prefixes {
        &STANDARD
    }

    /// Declare (or redeclare) a prefix; returns true when the name was new.
    pub fn declare_prefix(&mut self, name: &str, iri: &str) -> Result<bool, ModelError> {
        let valid_name = name.ends_with(':')
            && name[..name.len() - 1].chars().all(is_name_char)
            && !name.starts_with(['-', '.']);
        if !valid_name {
            return Err(ModelError::InvalidPrefix(format!("'{name}' is not a valid prefix name")));
        }
        if iri.is_empty() || iri.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidPrefix(format!("'{iri}' is not a valid prefix IRI")));
        }
        Ok(self.by_name.insert(name.to_string(), iri.to_string()).is_none())
    }

    /// Extend this table with every prefix of another one; existing names win.
    pub fn with_defaults(mut self, other: &Prefixes) -> Self {
        for (name, iri) in &other.by_name {
            self.by_name.entry(name.clone()).or_insert_with(|| iri.clone());
        }
        self
    }

    pub fn prefix_iri(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name.iter().map(|(name, iri)| (name.as_str(), iri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Abbreviate using the longest matching prefix; `<iri>` when none applies.
    pub fn abbreviate_iri(&self, iri: &str) -> String {
        let mut best: Option<(&str, &str)> = None;
        for (name, prefix_iri) in &self.by_name {
            if let Some(local) = iri.strip_prefix(prefix_iri.as_str()) {
                let longer = best.map_or(true, |(_, current)| prefix_iri.len() > current.len());
                if longer && is_local_name(local) {
                    best = Some((name.as_str(), prefix_iri.as_str()));
                }
            }
        }
        match best {
            Some((name, prefix_iri)) => format!("{name}{}", &iri[prefix_iri.len()..]),
            None => format!("<{iri}>"),
        }
    }

    /// Inverse of [`Prefixes::abbreviate_iri`].
    pub fn expand_abbreviated_iri(&self, abbreviated: &str) -> Option<String> {
        if let Some(full) = abbreviated.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            return Some(full.to_string());
        }
        let colon = abbreviated.find(':')?;
        let (name, local) = abbreviated.split_at(colon + 1);
        self.by_name.get(name).map(|iri| format!("{iri}{local}"))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_local_name(local: &str) -> bool {
    local.chars().all(is_name_char) && !local.starts_with(['-', '.'])
}
