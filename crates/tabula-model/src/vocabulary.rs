//! 語彙 (エンティティの intern テーブル)

use crate::interner::Interner;
use crate::ModelError;
use serde::{Deserialize, Serialize};

macro_rules! entity_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Position of the entity in its vocabulary table.
            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

entity_handle!(
    /// Handle of an atomic concept (a class name).
    AtomicConcept
);
entity_handle!(
    /// Handle of an atomic role; object and data roles share one table.
    AtomicRole
);
entity_handle!(
    /// Handle of a named individual.
    Individual
);
entity_handle!(
    /// Handle of a data constant.
    Constant
);
entity_handle!(DescriptionGraphId);
entity_handle!(DatatypeRestrictionId);

/// Display name used when a handle does not belong to the vocabulary.
pub const UNKNOWN_ENTITY: &str = "internal:unknown";

/// A data value: lexical form (canonical where the datatype has one) plus datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstantValue {
    pub lexical_form: String,
    pub datatype_iri: String,
}

/// A restriction of a datatype by facets, e.g. xsd:int[>= 5].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatatypeRestriction {
    pub datatype_iri: String,
    pub facet_iris: Vec<String>,
    pub facet_values: Vec<Constant>,
}

impl DatatypeRestriction {
    pub fn new(datatype_iri: impl Into<String>) -> Self {
        Self {
            datatype_iri: datatype_iri.into(),
            facet_iris: Vec::new(),
            facet_values: Vec::new(),
        }
    }

    pub fn with_facet(mut self, facet_iri: impl Into<String>, value: Constant) -> Self {
        self.facet_iris.push(facet_iri.into());
        self.facet_values.push(value);
        self
    }
}

/// Labelled edge of a description graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub role: AtomicRole,
    pub from_vertex: u32,
    pub to_vertex: u32,
}

/// A named structural template: vertices labelled by concepts, joined by role edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescriptionGraph {
    pub name: String,
    pub vertex_labels: Vec<AtomicConcept>,
    pub edges: Vec<Edge>,
    pub start_concepts: Vec<AtomicConcept>,
}

impl DescriptionGraph {
    pub fn number_of_vertices(&self) -> usize {
        self.vertex_labels.len()
    }
}

/// Interned entities of one ontology.
///
/// Interning a key twice yields the same handle, so handle equality is
/// entity identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    concepts: Interner<String>,
    roles: Interner<String>,
    individuals: Interner<String>,
    constants: Interner<ConstantValue>,
    datatype_restrictions: Interner<DatatypeRestriction>,
    description_graphs: Interner<DescriptionGraph>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atomic_concept(&mut self, iri: impl Into<String>) -> AtomicConcept {
        AtomicConcept(self.concepts.intern(iri.into()))
    }

    pub fn atomic_role(&mut self, iri: impl Into<String>) -> AtomicRole {
        AtomicRole(self.roles.intern(iri.into()))
    }

    pub fn individual(&mut self, iri: impl Into<String>) -> Individual {
        Individual(self.individuals.intern(iri.into()))
    }

    /// Intern a constant, normalizing its lexical form first.
    ///
    /// XML literals are canonicalized, so lexically different but
    /// canonically equal literals share a handle.
    pub fn constant(&mut self, lexical_form: &str, datatype_iri: &str) -> Result<Constant, ModelError> {
        let lexical_form = tabula_datatypes::normalize_lexical_form(lexical_form, datatype_iri)?;
        let value = ConstantValue {
            lexical_form,
            datatype_iri: datatype_iri.to_string(),
        };
        Ok(Constant(self.constants.intern(value)))
    }

    pub fn datatype_restriction(&mut self, restriction: DatatypeRestriction) -> DatatypeRestrictionId {
        DatatypeRestrictionId(self.datatype_restrictions.intern(restriction))
    }

    pub fn description_graph(&mut self, graph: DescriptionGraph) -> DescriptionGraphId {
        DescriptionGraphId(self.description_graphs.intern(graph))
    }

    pub fn find_atomic_concept(&self, iri: &str) -> Option<AtomicConcept> {
        self.concepts.lookup(iri).map(AtomicConcept)
    }

    pub fn find_atomic_role(&self, iri: &str) -> Option<AtomicRole> {
        self.roles.lookup(iri).map(AtomicRole)
    }

    pub fn find_individual(&self, iri: &str) -> Option<Individual> {
        self.individuals.lookup(iri).map(Individual)
    }

    pub fn concept_iri(&self, concept: AtomicConcept) -> &str {
        self.concepts.get(concept.0).map(String::as_str).unwrap_or(UNKNOWN_ENTITY)
    }

    pub fn role_iri(&self, role: AtomicRole) -> &str {
        self.roles.get(role.0).map(String::as_str).unwrap_or(UNKNOWN_ENTITY)
    }

    pub fn individual_iri(&self, individual: Individual) -> &str {
        self.individuals.get(individual.0).map(String::as_str).unwrap_or(UNKNOWN_ENTITY)
    }

    pub fn constant_value(&self, constant: Constant) -> Option<&ConstantValue> {
        self.constants.get(constant.0)
    }

    pub fn datatype_restriction_value(&self, id: DatatypeRestrictionId) -> Option<&DatatypeRestriction> {
        self.datatype_restrictions.get(id.0)
    }

    pub fn description_graph_value(&self, id: DescriptionGraphId) -> Option<&DescriptionGraph> {
        self.description_graphs.get(id.0)
    }

    pub fn number_of_concepts(&self) -> usize {
        self.concepts.len()
    }

    pub fn number_of_roles(&self) -> usize {
        self.roles.len()
    }

    pub fn number_of_individuals(&self) -> usize {
        self.individuals.len()
    }
}
