//! 正規化オントロジー

use crate::model::{Atom, DlClause, DlPredicate, LiteralConcept, Role, Term};
use crate::prefixes::{is_internal_iri, Prefixes};
use crate::signature::{PrebuiltSignature, SetOrdering, Signature, SignatureBuilder, SignatureSet};
use crate::vocabulary::{
    AtomicConcept, AtomicRole, Constant, DatatypeRestrictionId, DescriptionGraphId, Individual, Vocabulary,
};
use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Expressivity flags reported by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntologyFeatures {
    pub has_inverse_roles: bool,
    pub has_at_most_restrictions: bool,
    pub has_nominals: bool,
    pub has_datatypes: bool,
}

/// Front-end output that a [`NormalizedOntology`] is built from.
#[derive(Debug, Clone, Default)]
pub struct OntologyParts {
    pub ontology_iri: String,
    pub vocabulary: Vocabulary,
    pub clauses: Vec<DlClause>,
    pub positive_facts: Vec<Atom>,
    pub negative_facts: Vec<Atom>,
    pub signature: PrebuiltSignature,
    pub features: OntologyFeatures,
}

impl OntologyParts {
    pub fn new(ontology_iri: impl Into<String>, vocabulary: Vocabulary) -> Self {
        Self {
            ontology_iri: ontology_iri.into(),
            vocabulary,
            ..Default::default()
        }
    }

    pub fn with_clauses(mut self, clauses: Vec<DlClause>) -> Self {
        self.clauses = clauses;
        self
    }

    pub fn with_positive_facts(mut self, facts: Vec<Atom>) -> Self {
        self.positive_facts = facts;
        self
    }

    pub fn with_negative_facts(mut self, facts: Vec<Atom>) -> Self {
        self.negative_facts = facts;
        self
    }

    pub fn with_signature(mut self, signature: PrebuiltSignature) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_features(mut self, features: OntologyFeatures) -> Self {
        self.features = features;
        self
    }
}

/// Data property assertions: role → subject → asserted constants.
pub type DataPropertyAssertions = BTreeMap<AtomicRole, BTreeMap<Individual, BTreeSet<Constant>>>;

/// A clausified ontology with its derived indices.
///
/// Built once by [`NormalizedOntology::new`] and never mutated afterwards,
/// so one instance can be shared by concurrent reasoning sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOntology {
    ontology_iri: String,
    vocabulary: Vocabulary,
    clauses: Vec<DlClause>,
    positive_facts: Vec<Atom>,
    negative_facts: Vec<Atom>,
    features: OntologyFeatures,
    is_horn: bool,
    signature: Signature,
    number_of_external_concepts: usize,
    data_property_assertions: DataPropertyAssertions,
}

/// How a ground fact is treated once validated.
enum FactShape {
    /// Unary fact or binary fact between individuals.
    Plain,
    /// Binary fact whose object is a constant.
    DataAssertion {
        role: AtomicRole,
        subject: Individual,
        value: Constant,
    },
}

impl NormalizedOntology {
    /// Validate the facts and derive every index in one pass over each collection.
    pub fn new(parts: OntologyParts) -> Result<Self, ModelError> {
        let OntologyParts {
            ontology_iri,
            vocabulary,
            clauses,
            positive_facts,
            negative_facts,
            signature,
            features,
        } = parts;

        let positive_facts = deduplicate(positive_facts);
        let negative_facts = deduplicate(negative_facts);

        let positive_shapes = positive_facts
            .iter()
            .map(|fact| classify_fact(fact, true, &vocabulary))
            .collect::<Result<Vec<_>, _>>()?;
        for fact in &negative_facts {
            classify_fact(fact, false, &vocabulary)?;
        }

        let mut builder = SignatureBuilder::new(signature);

        let mut is_horn = true;
        for clause in &clauses {
            if clause.head_len() > 1 {
                is_horn = false;
            }
            for atom in clause.atoms() {
                check_arity(atom, &vocabulary)?;
                builder.register_predicate(atom.predicate());
            }
        }

        let mut data_property_assertions = DataPropertyAssertions::new();
        for (fact, shape) in positive_facts.iter().zip(positive_shapes) {
            register_fact(&mut builder, fact);
            if let FactShape::DataAssertion { role, subject, value } = shape {
                data_property_assertions
                    .entry(role)
                    .or_default()
                    .entry(subject)
                    .or_default()
                    .insert(value);
            }
        }
        for fact in &negative_facts {
            register_fact(&mut builder, fact);
        }

        let signature = builder.finish(&vocabulary);
        let number_of_external_concepts = count_external_concepts(&signature, &vocabulary);

        debug!(
            ontology = %ontology_iri,
            clauses = clauses.len(),
            positive_facts = positive_facts.len(),
            negative_facts = negative_facts.len(),
            is_horn,
            atomic_concepts = signature.atomic_concepts().len(),
            object_roles = signature.atomic_object_roles().len(),
            data_roles = signature.atomic_data_roles().len(),
            individuals = signature.individuals().len(),
            "Normalized ontology built"
        );

        Ok(Self {
            ontology_iri,
            vocabulary,
            clauses,
            positive_facts,
            negative_facts,
            features,
            is_horn,
            signature,
            number_of_external_concepts,
            data_property_assertions,
        })
    }

    pub fn ontology_iri(&self) -> &str {
        &self.ontology_iri
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn clauses(&self) -> &[DlClause] {
        &self.clauses
    }

    pub fn positive_facts(&self) -> &[Atom] {
        &self.positive_facts
    }

    pub fn negative_facts(&self) -> &[Atom] {
        &self.negative_facts
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn features(&self) -> OntologyFeatures {
        self.features
    }

    /// True when no clause has more than one head atom.
    pub fn is_horn(&self) -> bool {
        self.is_horn
    }

    pub fn has_inverse_roles(&self) -> bool {
        self.features.has_inverse_roles
    }

    pub fn has_at_most_restrictions(&self) -> bool {
        self.features.has_at_most_restrictions
    }

    pub fn has_nominals(&self) -> bool {
        self.features.has_nominals
    }

    pub fn has_datatypes(&self) -> bool {
        self.features.has_datatypes
    }

    pub fn atomic_concepts(&self) -> &SignatureSet<AtomicConcept> {
        self.signature.atomic_concepts()
    }

    pub fn contains_atomic_concept(&self, concept: AtomicConcept) -> bool {
        self.signature.atomic_concepts().contains(&concept)
    }

    /// Atomic concepts whose IRI was not minted by the normalizer.
    pub fn number_of_external_concepts(&self) -> usize {
        self.number_of_external_concepts
    }

    pub fn atomic_object_roles(&self) -> &SignatureSet<AtomicRole> {
        self.signature.atomic_object_roles()
    }

    pub fn contains_object_role(&self, role: AtomicRole) -> bool {
        self.signature.atomic_object_roles().contains(&role)
    }

    pub fn complex_object_roles(&self) -> &SignatureSet<Role> {
        self.signature.complex_object_roles()
    }

    pub fn is_complex_object_role(&self, role: Role) -> bool {
        self.signature.complex_object_roles().contains(&role)
    }

    pub fn atomic_data_roles(&self) -> &SignatureSet<AtomicRole> {
        self.signature.atomic_data_roles()
    }

    pub fn contains_data_role(&self, role: AtomicRole) -> bool {
        self.signature.atomic_data_roles().contains(&role)
    }

    pub fn unknown_datatype_restrictions(&self) -> &SignatureSet<DatatypeRestrictionId> {
        self.signature.unknown_datatype_restrictions()
    }

    pub fn has_unknown_datatype_restrictions(&self) -> bool {
        !self.signature.unknown_datatype_restrictions().is_empty()
    }

    pub fn defined_datatype_iris(&self) -> &BTreeSet<String> {
        self.signature.defined_datatype_iris()
    }

    pub fn individuals(&self) -> &SignatureSet<Individual> {
        self.signature.individuals()
    }

    pub fn contains_individual(&self, individual: Individual) -> bool {
        self.signature.individuals().contains(&individual)
    }

    pub fn description_graphs(&self) -> &SignatureSet<DescriptionGraphId> {
        self.signature.description_graphs()
    }

    pub fn data_property_assertions(&self) -> &DataPropertyAssertions {
        &self.data_property_assertions
    }

    /// Constants asserted for `role` on `subject`, if any.
    pub fn data_property_values(&self, role: AtomicRole, subject: Individual) -> Option<&BTreeSet<Constant>> {
        self.data_property_assertions.get(&role)?.get(&subject)
    }

    /// Signature concepts that never occur in a clause head, neither directly
    /// nor as the filler of a head at-least restriction. Signature order.
    pub fn body_only_atomic_concepts(&self) -> Vec<AtomicConcept> {
        let mut in_head = HashSet::new();
        for clause in &self.clauses {
            for atom in clause.head() {
                match atom.predicate() {
                    DlPredicate::AtomicConcept(concept) => {
                        in_head.insert(*concept);
                    }
                    DlPredicate::AtLeastConcept(at_least) => {
                        if let LiteralConcept::Atomic(concept) = at_least.to_concept {
                            in_head.insert(concept);
                        }
                    }
                    _ => {}
                }
            }
        }
        self.atomic_concepts()
            .iter()
            .filter(|concept| !in_head.contains(concept))
            .collect()
    }

    /// Roles labelling description-graph edges, closed under co-occurrence in clauses.
    pub fn graph_atomic_roles(&self) -> BTreeSet<AtomicRole> {
        let seed = self
            .description_graphs()
            .iter()
            .filter_map(|id| self.vocabulary.description_graph_value(id))
            .flat_map(|graph| graph.edges.iter().map(|edge| edge.role))
            .collect();
        close_over_clauses(&self.clauses, seed)
    }

    /// Whether rebuilding from the stored clauses, facts and supplied
    /// signature sets reproduces this ontology exactly.
    pub(crate) fn derived_fields_agree(&self) -> bool {
        let signature = &self.signature;
        let prebuilt = PrebuiltSignature {
            atomic_concepts: supplied_members(signature.atomic_concepts()),
            atomic_object_roles: supplied_members(signature.atomic_object_roles()),
            complex_object_roles: supplied_members(signature.complex_object_roles()),
            atomic_data_roles: supplied_members(signature.atomic_data_roles()),
            unknown_datatype_restrictions: supplied_members(signature.unknown_datatype_restrictions()),
            defined_datatype_iris: Some(signature.defined_datatype_iris().iter().cloned().collect()),
            individuals: supplied_members(signature.individuals()),
        };
        let parts = OntologyParts {
            ontology_iri: self.ontology_iri.clone(),
            vocabulary: self.vocabulary.clone(),
            clauses: self.clauses.clone(),
            positive_facts: self.positive_facts.clone(),
            negative_facts: self.negative_facts.clone(),
            signature: prebuilt,
            features: self.features,
        };
        NormalizedOntology::new(parts).map_or(false, |rebuilt| rebuilt == *self)
    }
}

fn supplied_members<H: Copy + Eq + Hash>(set: &SignatureSet<H>) -> Option<Vec<H>> {
    (set.ordering() == SetOrdering::Supplied).then(|| set.as_slice().to_vec())
}

/// Least fixpoint of `roles` under "a clause mentioning one of the roles
/// contributes all of its atomic roles".
pub fn close_over_clauses(clauses: &[DlClause], mut roles: BTreeSet<AtomicRole>) -> BTreeSet<AtomicRole> {
    let mut changed = true;
    while changed {
        changed = false;
        for clause in clauses {
            let clause_roles: Vec<AtomicRole> = clause
                .atoms()
                .filter_map(|atom| match atom.predicate() {
                    DlPredicate::AtomicRole(role) => Some(*role),
                    _ => None,
                })
                .collect();
            if clause_roles.iter().any(|role| roles.contains(role)) {
                for role in clause_roles {
                    changed |= roles.insert(role);
                }
            }
        }
    }
    roles
}

fn deduplicate(facts: Vec<Atom>) -> Vec<Atom> {
    let mut seen = HashSet::with_capacity(facts.len());
    facts.into_iter().filter(|fact| seen.insert(fact.clone())).collect()
}

fn count_external_concepts(signature: &Signature, vocabulary: &Vocabulary) -> usize {
    signature
        .atomic_concepts()
        .iter()
        .filter(|concept| !is_internal_iri(vocabulary.concept_iri(*concept)))
        .count()
}

fn classify_fact(fact: &Atom, positive: bool, vocabulary: &Vocabulary) -> Result<FactShape, ModelError> {
    let arity = fact.arity();
    if !(1..=2).contains(&arity) {
        return Err(ModelError::InvalidFactArity {
            arity,
            fact: fact.render(vocabulary, Prefixes::standard()),
        });
    }
    check_arity(fact, vocabulary)?;
    if positive && arity == 2 && matches!(fact.argument(1), Some(Term::Variable(_))) {
        return Err(ModelError::InvalidFactArgument(format!(
            "object of {} is neither an individual nor a constant",
            fact.render(vocabulary, Prefixes::standard())
        )));
    }
    if !fact.is_ground() {
        return Err(ModelError::NonGroundFact(fact.render(vocabulary, Prefixes::standard())));
    }
    if !positive || arity != 2 {
        return Ok(FactShape::Plain);
    }

    match (fact.predicate(), fact.argument(0), fact.argument(1)) {
        (DlPredicate::AtomicRole(role), Some(Term::Individual(subject)), Some(Term::Constant(value))) => {
            Ok(FactShape::DataAssertion {
                role: *role,
                subject,
                value,
            })
        }
        (_, _, Some(Term::Constant(_))) => Err(ModelError::InvalidFactArgument(format!(
            "data assertion {} needs an atomic role and an individual subject",
            fact.render(vocabulary, Prefixes::standard())
        ))),
        _ => Ok(FactShape::Plain),
    }
}

fn check_arity(atom: &Atom, vocabulary: &Vocabulary) -> Result<(), ModelError> {
    if atom.matches_predicate_arity(vocabulary) {
        return Ok(());
    }
    Err(ModelError::ArityMismatch {
        expected: atom.predicate().arity(vocabulary),
        found: atom.arity(),
        atom: atom.render(vocabulary, Prefixes::standard()),
    })
}

fn register_fact(builder: &mut SignatureBuilder, fact: &Atom) {
    builder.register_predicate(fact.predicate());
    for individual in fact.arguments().iter().filter_map(|term| term.as_individual()) {
        builder.register_individual(individual);
    }
}
