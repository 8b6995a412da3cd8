//! # Tabula - Normalized Ontology Model & Reasoning Statistics
//!
//! Tabula is the input model and instrumentation layer of a tableau-based
//! description-logic reasoner. A front end clausifies an OWL ontology into
//! DL-clauses and ground facts; Tabula indexes that result once and records
//! statistics about the tableau procedure that consumes it.
//!
//! ## Features
//!
//! - **Normalized ontology**: DL-clauses, facts, signature index, Horn flag and data-value index
//! - **Shared read-only model**: one `NormalizedOntology` behind an `Arc`, many sessions
//! - **Reasoning statistics**: per-test timings, backtracks, node counts and blocking validations
//! - **Persistence**: versioned binary snapshots of a built ontology
//!
//! ## Quick Start
//!
//! ```rust
//! use tabula::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let mut vocabulary = Vocabulary::new();
//!     let person = vocabulary.atomic_concept("http://example.org/Person");
//!     let alice = vocabulary.individual("http://example.org/alice");
//!
//!     let parts = OntologyParts::new("http://example.org/family", vocabulary)
//!         .with_positive_facts(vec![Atom::unary(DlPredicate::AtomicConcept(person), Term::Individual(alice))]);
//!     let ontology = Arc::new(NormalizedOntology::new(parts)?);
//!
//!     let mut session = ReasoningSession::new(Arc::clone(&ontology));
//!     let nodes = vec![NodeStatus::active()];
//!     session.monitor_mut().is_abox_satisfiable_started()?;
//!     let record = session.monitor_mut().is_abox_satisfiable_finished(true, &nodes)?;
//!
//!     assert!(ontology.is_horn());
//!     assert!(record.result());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`tabula-datatypes`**: literal normalization (rdf:XMLLiteral canonical form)
//! - **`tabula-model`**: terms, predicates, clauses, vocabulary, `NormalizedOntology`, rendering, persistence
//! - **`tabula-monitor`**: `ReasoningStatisticsMonitor`, test records, reports
//!
//! ## Feature Flags
//!
//! - `full` (default): all crates included
//! - `datatypes`: literal normalization only
//! - `model`: ontology model
//! - `monitor`: reasoning statistics monitor

// Re-export all public APIs from sub-crates (feature-gated)

#[cfg(feature = "tabula-datatypes")]
pub use tabula_datatypes as datatypes;

#[cfg(feature = "tabula-model")]
pub use tabula_model as model;

#[cfg(feature = "tabula-monitor")]
pub use tabula_monitor as monitor;

#[cfg(all(feature = "tabula-model", feature = "tabula-monitor"))]
pub mod session;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "tabula-model")]
pub use tabula_model::{ModelError, NormalizedOntology, OntologyParts, PersistenceError, Vocabulary};

#[cfg(feature = "tabula-monitor")]
pub use tabula_monitor::{MonitorError, ReasoningStatisticsMonitor, TestRecord, TestType};

#[cfg(all(feature = "tabula-model", feature = "tabula-monitor"))]
pub use session::ReasoningSession;

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use tabula::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "tabula-model")]
    pub use tabula_model::{
        Atom, AtomicConcept, AtomicRole, DlClause, DlPredicate, Individual, NormalizedOntology, OntologyParts,
        Prefixes, Term, Variable, Vocabulary,
    };

    #[cfg(feature = "tabula-monitor")]
    pub use tabula_monitor::{
        ManualClock, MonitorConfig, NodeStatus, ReasoningStatisticsMonitor, TableauNode, TableauView, TestRecord,
        TestType,
    };

    #[cfg(all(feature = "tabula-model", feature = "tabula-monitor"))]
    pub use crate::session::ReasoningSession;

    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names of the sub-crates compiled into this build.
pub fn enabled_components() -> Vec<&'static str> {
    let mut components = Vec::new();
    if cfg!(feature = "tabula-datatypes") {
        components.push("datatypes");
    }
    if cfg!(feature = "tabula-model") {
        components.push("model");
    }
    if cfg!(feature = "tabula-monitor") {
        components.push("monitor");
    }
    components
}
