//! 正規化オントロジーモデル
//!
//! このクレートはテーブルロー推論器の入力モデルを提供します:
//! - DL 節 (body ⇒ head) と基底事実
//! - 語彙の intern テーブルとハンドル
//! - シグネチャ索引・Horn 判定・データ値アサーション索引
//! - テキスト表示・統計・バイナリ永続化

pub mod model;
pub mod ontology;
pub mod persistence;
pub mod prefixes;
pub mod render;
pub mod signature;
pub mod vocabulary;

mod interner;

pub use model::{AtLeastConcept, Atom, DlClause, DlPredicate, LiteralConcept, Role, Term, Variable};
pub use ontology::{close_over_clauses, DataPropertyAssertions, NormalizedOntology, OntologyFeatures, OntologyParts};
pub use persistence::{PersistenceError, FORMAT_VERSION, MAGIC};
pub use prefixes::{is_internal_iri, Prefixes, INTERNAL_IRI_PREFIX};
pub use render::OntologyStatistics;
pub use signature::{PrebuiltSignature, SetOrdering, Signature, SignatureSet};
pub use vocabulary::{
    AtomicConcept, AtomicRole, Constant, ConstantValue, DatatypeRestriction, DatatypeRestrictionId, DescriptionGraph,
    DescriptionGraphId, Edge, Individual, Vocabulary,
};

// Error types
use tabula_datatypes::DatatypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Fact has arity {arity}, expected 1 or 2: {fact}")]
    InvalidFactArity { arity: usize, fact: String },

    #[error("Atom {atom} has {found} arguments, its predicate takes {expected}")]
    ArityMismatch { expected: usize, found: usize, atom: String },

    #[error("Invalid fact argument: {0}")]
    InvalidFactArgument(String),

    #[error("Fact is not ground: {0}")]
    NonGroundFact(String),

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("Datatype error: {0}")]
    Datatype(#[from] DatatypeError),
}
