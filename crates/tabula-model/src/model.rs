//! DL 節データモデル

use crate::vocabulary::{
    AtomicConcept, AtomicRole, Constant, DatatypeRestrictionId, DescriptionGraphId, Individual, Vocabulary,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Clause variable, identified by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable(pub u32);

impl Variable {
    /// Conventional display name: X, Y, Z, then X3, X4, ...
    pub fn name(self) -> String {
        match self.0 {
            0 => "X".to_string(),
            1 => "Y".to_string(),
            2 => "Z".to_string(),
            n => format!("X{n}"),
        }
    }
}

/// Argument of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Individual(Individual),
    Constant(Constant),
    Variable(Variable),
}

impl Term {
    pub fn as_individual(self) -> Option<Individual> {
        match self {
            Term::Individual(individual) => Some(individual),
            _ => None,
        }
    }

    pub fn as_constant(self) -> Option<Constant> {
        match self {
            Term::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn is_ground(self) -> bool {
        !matches!(self, Term::Variable(_))
    }
}

impl From<Individual> for Term {
    fn from(individual: Individual) -> Self {
        Term::Individual(individual)
    }
}

impl From<Constant> for Term {
    fn from(constant: Constant) -> Self {
        Term::Constant(constant)
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term::Variable(variable)
    }
}

/// Object role: an atomic role or its inverse (R⁻)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Atomic(AtomicRole),
    Inverse(AtomicRole),
}

impl Role {
    pub fn atomic_role(self) -> AtomicRole {
        match self {
            Role::Atomic(role) | Role::Inverse(role) => role,
        }
    }

    pub fn inverse(self) -> Role {
        match self {
            Role::Atomic(role) => Role::Inverse(role),
            Role::Inverse(role) => Role::Atomic(role),
        }
    }
}

/// Atomic concept or its negation (¬A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiteralConcept {
    Atomic(AtomicConcept),
    Negated(AtomicConcept),
}

impl LiteralConcept {
    pub fn atomic_concept(self) -> AtomicConcept {
        match self {
            LiteralConcept::Atomic(concept) | LiteralConcept::Negated(concept) => concept,
        }
    }
}

/// Qualified minimum cardinality: ≥n R.C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtLeastConcept {
    pub number: u32,
    pub on_role: Role,
    pub to_concept: LiteralConcept,
}

/// Predicate of a DL atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DlPredicate {
    AtomicConcept(AtomicConcept),
    AtomicRole(AtomicRole),
    AtLeastConcept(AtLeastConcept),
    DescriptionGraph(DescriptionGraphId),
    /// Instantiates a description graph with the argument at `vertex`.
    ExistsDescriptionGraph {
        graph: DescriptionGraphId,
        vertex: u32,
    },
    DatatypeRestriction(DatatypeRestrictionId),
    Equality,
    Inequality,
    NodeIdsAscendingOrEqual,
}

impl DlPredicate {
    /// Number of arguments an atom over this predicate takes.
    pub fn arity(&self, vocabulary: &Vocabulary) -> usize {
        match self {
            DlPredicate::AtomicConcept(_)
            | DlPredicate::AtLeastConcept(_)
            | DlPredicate::ExistsDescriptionGraph { .. }
            | DlPredicate::DatatypeRestriction(_) => 1,
            DlPredicate::AtomicRole(_) | DlPredicate::Equality | DlPredicate::Inequality => 2,
            DlPredicate::NodeIdsAscendingOrEqual => 2,
            DlPredicate::DescriptionGraph(graph) => vocabulary
                .description_graph_value(*graph)
                .map(|graph| graph.number_of_vertices())
                .unwrap_or(0),
        }
    }
}

impl From<AtomicConcept> for DlPredicate {
    fn from(concept: AtomicConcept) -> Self {
        DlPredicate::AtomicConcept(concept)
    }
}

impl From<AtomicRole> for DlPredicate {
    fn from(role: AtomicRole) -> Self {
        DlPredicate::AtomicRole(role)
    }
}

impl From<AtLeastConcept> for DlPredicate {
    fn from(at_least: AtLeastConcept) -> Self {
        DlPredicate::AtLeastConcept(at_least)
    }
}

/// A predicate applied to an ordered list of terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    predicate: DlPredicate,
    arguments: SmallVec<[Term; 2]>,
}

impl Atom {
    pub fn new(predicate: impl Into<DlPredicate>, arguments: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate: predicate.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn unary(predicate: impl Into<DlPredicate>, argument: impl Into<Term>) -> Self {
        Self::new(predicate, [argument.into()])
    }

    pub fn binary(predicate: impl Into<DlPredicate>, first: impl Into<Term>, second: impl Into<Term>) -> Self {
        Self::new(predicate, [first.into(), second.into()])
    }

    pub fn predicate(&self) -> &DlPredicate {
        &self.predicate
    }

    /// Whether the argument count equals the predicate's arity.
    pub fn matches_predicate_arity(&self, vocabulary: &Vocabulary) -> bool {
        self.arguments.len() == self.predicate.arity(vocabulary)
    }

    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<Term> {
        self.arguments.get(index).copied()
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_ground(&self) -> bool {
        self.arguments.iter().all(|term| term.is_ground())
    }
}

/// A universally quantified rule: body₁ ∧ ... ∧ bodyₙ → head₁ ∨ ... ∨ headₘ
///
/// An empty head is an integrity constraint, a single head atom a
/// deterministic rule and several head atoms a disjunction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DlClause {
    body: Vec<Atom>,
    head: Vec<Atom>,
}

impl DlClause {
    pub fn new(body: Vec<Atom>, head: Vec<Atom>) -> Self {
        Self { body, head }
    }

    pub fn body(&self) -> &[Atom] {
        &self.body
    }

    pub fn head(&self) -> &[Atom] {
        &self.head
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn head_len(&self) -> usize {
        self.head.len()
    }

    /// Head length ≤ 1.
    pub fn is_deterministic(&self) -> bool {
        self.head.len() <= 1
    }

    pub fn is_constraint(&self) -> bool {
        self.head.is_empty()
    }

    /// Body atoms followed by head atoms.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.body.iter().chain(self.head.iter())
    }
}
