//! シグネチャ索引

use crate::model::{DlPredicate, LiteralConcept, Role};
use crate::vocabulary::{AtomicConcept, AtomicRole, DatatypeRestrictionId, DescriptionGraphId, Individual, Vocabulary};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// How the members of a [`SignatureSet`] are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOrdering {
    /// Caller-supplied members, kept in the order they were given.
    Supplied,
    /// Built from the clauses and facts, sorted by IRI.
    Canonical,
}

/// A set of entity handles with deterministic iteration order.
#[derive(Debug, Clone)]
pub struct SignatureSet<H> {
    members: Vec<H>,
    index: HashSet<H>,
    ordering: SetOrdering,
}

impl<H: Copy + Eq + Hash> SignatureSet<H> {
    pub fn canonical() -> Self {
        Self {
            members: Vec::new(),
            index: HashSet::new(),
            ordering: SetOrdering::Canonical,
        }
    }

    /// Seed a set from caller-supplied members; duplicates are dropped.
    pub fn supplied(members: impl IntoIterator<Item = H>) -> Self {
        let mut set = Self {
            members: Vec::new(),
            index: HashSet::new(),
            ordering: SetOrdering::Supplied,
        };
        set.extend(members);
        set
    }

    pub fn insert(&mut self, member: H) -> bool {
        if self.index.insert(member) {
            self.members.push(member);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, member: &H) -> bool {
        self.index.contains(member)
    }

    pub fn iter(&self) -> impl Iterator<Item = H> + '_ {
        self.members.iter().copied()
    }

    pub fn as_slice(&self) -> &[H] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ordering(&self) -> SetOrdering {
        self.ordering
    }

    /// Sort canonical sets; supplied sets keep their order.
    pub(crate) fn sort_canonically_by(&mut self, compare: impl FnMut(&H, &H) -> Ordering) {
        if self.ordering == SetOrdering::Canonical {
            self.members.sort_by(compare);
        }
    }
}

impl<H: Copy + Eq + Hash> Default for SignatureSet<H> {
    fn default() -> Self {
        Self::canonical()
    }
}

impl<H: Copy + Eq + Hash> Extend<H> for SignatureSet<H> {
    fn extend<I: IntoIterator<Item = H>>(&mut self, members: I) {
        for member in members {
            self.insert(member);
        }
    }
}

impl<H: PartialEq> PartialEq for SignatureSet<H> {
    fn eq(&self, other: &Self) -> bool {
        self.ordering == other.ordering && self.members == other.members
    }
}

impl<H: Eq> Eq for SignatureSet<H> {}

impl<H: Serialize> Serialize for SignatureSet<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.ordering, &self.members).serialize(serializer)
    }
}

impl<'de, H> Deserialize<'de> for SignatureSet<H>
where
    H: Deserialize<'de> + Copy + Eq + Hash,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (ordering, members) = <(SetOrdering, Vec<H>)>::deserialize(deserializer)?;
        let index: HashSet<H> = members.iter().copied().collect();
        if index.len() != members.len() {
            return Err(D::Error::custom("duplicate member in signature set"));
        }
        Ok(Self { members, index, ordering })
    }
}

/// Signature sets supplied by the front-end.
///
/// `None` means "build it from the clauses and facts" for concepts and
/// individuals, and "empty" for the role, datatype and restriction sets.
#[derive(Debug, Clone, Default)]
pub struct PrebuiltSignature {
    pub atomic_concepts: Option<Vec<AtomicConcept>>,
    pub atomic_object_roles: Option<Vec<AtomicRole>>,
    pub complex_object_roles: Option<Vec<Role>>,
    pub atomic_data_roles: Option<Vec<AtomicRole>>,
    pub unknown_datatype_restrictions: Option<Vec<DatatypeRestrictionId>>,
    pub defined_datatype_iris: Option<Vec<String>>,
    pub individuals: Option<Vec<Individual>>,
}

/// Entities referenced by an ontology's clauses and facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    atomic_concepts: SignatureSet<AtomicConcept>,
    atomic_object_roles: SignatureSet<AtomicRole>,
    complex_object_roles: SignatureSet<Role>,
    atomic_data_roles: SignatureSet<AtomicRole>,
    unknown_datatype_restrictions: SignatureSet<DatatypeRestrictionId>,
    defined_datatype_iris: BTreeSet<String>,
    individuals: SignatureSet<Individual>,
    description_graphs: SignatureSet<DescriptionGraphId>,
}

impl Signature {
    pub fn atomic_concepts(&self) -> &SignatureSet<AtomicConcept> {
        &self.atomic_concepts
    }

    pub fn atomic_object_roles(&self) -> &SignatureSet<AtomicRole> {
        &self.atomic_object_roles
    }

    pub fn complex_object_roles(&self) -> &SignatureSet<Role> {
        &self.complex_object_roles
    }

    pub fn atomic_data_roles(&self) -> &SignatureSet<AtomicRole> {
        &self.atomic_data_roles
    }

    pub fn unknown_datatype_restrictions(&self) -> &SignatureSet<DatatypeRestrictionId> {
        &self.unknown_datatype_restrictions
    }

    pub fn defined_datatype_iris(&self) -> &BTreeSet<String> {
        &self.defined_datatype_iris
    }

    pub fn individuals(&self) -> &SignatureSet<Individual> {
        &self.individuals
    }

    pub fn description_graphs(&self) -> &SignatureSet<DescriptionGraphId> {
        &self.description_graphs
    }
}

fn seed<H: Copy + Eq + Hash>(prebuilt: Option<Vec<H>>) -> SignatureSet<H> {
    match prebuilt {
        Some(members) => SignatureSet::supplied(members),
        None => SignatureSet::canonical(),
    }
}

/// Accumulates a [`Signature`] while the ontology's clauses and facts are scanned.
///
/// Role sets are never extended here; they hold exactly what the caller supplied.
pub(crate) struct SignatureBuilder {
    signature: Signature,
}

impl SignatureBuilder {
    pub(crate) fn new(prebuilt: PrebuiltSignature) -> Self {
        let signature = Signature {
            atomic_concepts: seed(prebuilt.atomic_concepts),
            atomic_object_roles: seed(prebuilt.atomic_object_roles),
            complex_object_roles: seed(prebuilt.complex_object_roles),
            atomic_data_roles: seed(prebuilt.atomic_data_roles),
            unknown_datatype_restrictions: seed(prebuilt.unknown_datatype_restrictions),
            defined_datatype_iris: prebuilt.defined_datatype_iris.unwrap_or_default().into_iter().collect(),
            individuals: seed(prebuilt.individuals),
            description_graphs: SignatureSet::canonical(),
        };
        Self { signature }
    }

    /// Register the concepts and description graphs a predicate refers to.
    pub(crate) fn register_predicate(&mut self, predicate: &DlPredicate) {
        match predicate {
            DlPredicate::AtomicConcept(concept) => {
                self.signature.atomic_concepts.insert(*concept);
            }
            DlPredicate::AtLeastConcept(at_least) => {
                if let LiteralConcept::Atomic(concept) = at_least.to_concept {
                    self.signature.atomic_concepts.insert(concept);
                }
            }
            DlPredicate::DescriptionGraph(graph) => {
                self.signature.description_graphs.insert(*graph);
            }
            DlPredicate::ExistsDescriptionGraph { graph, .. } => {
                self.signature.description_graphs.insert(*graph);
            }
            DlPredicate::AtomicRole(_)
            | DlPredicate::DatatypeRestriction(_)
            | DlPredicate::Equality
            | DlPredicate::Inequality
            | DlPredicate::NodeIdsAscendingOrEqual => {}
        }
    }

    pub(crate) fn register_individual(&mut self, individual: Individual) {
        self.signature.individuals.insert(individual);
    }

    /// Sort the canonical sets.
    pub(crate) fn finish(self, vocabulary: &Vocabulary) -> Signature {
        let Self { mut signature } = self;

        signature
            .atomic_concepts
            .sort_canonically_by(|a, b| vocabulary.concept_iri(*a).cmp(vocabulary.concept_iri(*b)));
        signature
            .atomic_object_roles
            .sort_canonically_by(|a, b| vocabulary.role_iri(*a).cmp(vocabulary.role_iri(*b)));
        signature
            .atomic_data_roles
            .sort_canonically_by(|a, b| vocabulary.role_iri(*a).cmp(vocabulary.role_iri(*b)));
        signature.complex_object_roles.sort_canonically_by(|a, b| {
            let key = |role: &Role| (vocabulary.role_iri(role.atomic_role()), matches!(role, Role::Inverse(_)));
            key(a).cmp(&key(b))
        });
        signature.unknown_datatype_restrictions.sort_canonically_by(|a, b| {
            let key = |id: &DatatypeRestrictionId| {
                vocabulary
                    .datatype_restriction_value(*id)
                    .map(|restriction| (restriction.datatype_iri.as_str(), restriction.facet_iris.as_slice()))
            };
            key(a).cmp(&key(b)).then(a.cmp(b))
        });
        signature
            .individuals
            .sort_canonically_by(|a, b| vocabulary.individual_iri(*a).cmp(vocabulary.individual_iri(*b)));
        signature.description_graphs.sort_canonically_by(|a, b| {
            let name = |id: &DescriptionGraphId| vocabulary.description_graph_value(*id).map(|graph| graph.name.as_str());
            name(a).cmp(&name(b)).then(a.cmp(b))
        });

        signature
    }
}
