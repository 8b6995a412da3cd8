//! データ型の値正規化
//!
//! このクレートはリテラル値の正規形を提供します:
//! - rdf:XMLLiteral の排他的正規化 (Exclusive XML Canonicalization, コメント付き)
//! - 正規形による値の等価性

pub mod xml_literal;

pub use xml_literal::XmlLiteral;

use thiserror::Error;

/// Datatype IRI of XML literals.
pub const RDF_XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatatypeError {
    #[error("Cannot parse '{lexical_form}' as an XML literal: {message}")]
    Parse {
        lexical_form: String,
        message: String,
    },
}

impl DatatypeError {
    /// The lexical form that failed to normalize.
    pub fn lexical_form(&self) -> &str {
        match self {
            DatatypeError::Parse { lexical_form, .. } => lexical_form,
        }
    }
}

/// Normalize a lexical form of the given datatype.
///
/// Only XML literals have a canonical form distinct from their lexical form;
/// every other datatype is returned unchanged.
pub fn normalize_lexical_form(lexical_form: &str, datatype_iri: &str) -> Result<String, DatatypeError> {
    if datatype_iri == RDF_XML_LITERAL {
        Ok(XmlLiteral::parse(lexical_form)?.into_xml())
    } else {
        Ok(lexical_form.to_string())
    }
}
