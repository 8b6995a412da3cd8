//! テキスト表示と統計

use crate::model::{Atom, DlClause, DlPredicate, LiteralConcept, Role, Term};
use crate::ontology::NormalizedOntology;
use crate::prefixes::Prefixes;
use crate::vocabulary::{Constant, Vocabulary, UNKNOWN_ENTITY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

fn render_role(role: Role, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
    match role {
        Role::Atomic(role) => prefixes.abbreviate_iri(vocabulary.role_iri(role)),
        Role::Inverse(role) => format!("inv({})", prefixes.abbreviate_iri(vocabulary.role_iri(role))),
    }
}

fn render_literal_concept(concept: LiteralConcept, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
    match concept {
        LiteralConcept::Atomic(concept) => prefixes.abbreviate_iri(vocabulary.concept_iri(concept)),
        LiteralConcept::Negated(concept) => format!("not({})", prefixes.abbreviate_iri(vocabulary.concept_iri(concept))),
    }
}

fn render_constant(constant: Constant, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
    match vocabulary.constant_value(constant) {
        Some(value) => format!(
            "\"{}\"^^{}",
            value.lexical_form.replace('\\', "\\\\").replace('"', "\\\""),
            prefixes.abbreviate_iri(&value.datatype_iri)
        ),
        None => UNKNOWN_ENTITY.to_string(),
    }
}

fn render_term(term: Term, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
    match term {
        Term::Individual(individual) => prefixes.abbreviate_iri(vocabulary.individual_iri(individual)),
        Term::Constant(constant) => render_constant(constant, vocabulary, prefixes),
        Term::Variable(variable) => variable.name(),
    }
}

impl DlPredicate {
    pub fn render(&self, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
        match self {
            DlPredicate::AtomicConcept(concept) => prefixes.abbreviate_iri(vocabulary.concept_iri(*concept)),
            DlPredicate::AtomicRole(role) => prefixes.abbreviate_iri(vocabulary.role_iri(*role)),
            DlPredicate::AtLeastConcept(at_least) => format!(
                "atLeast({} {} {})",
                at_least.number,
                render_role(at_least.on_role, vocabulary, prefixes),
                render_literal_concept(at_least.to_concept, vocabulary, prefixes)
            ),
            DlPredicate::DescriptionGraph(graph) => vocabulary
                .description_graph_value(*graph)
                .map(|graph| graph.name.clone())
                .unwrap_or_else(|| UNKNOWN_ENTITY.to_string()),
            DlPredicate::ExistsDescriptionGraph { graph, vertex } => {
                let name = vocabulary
                    .description_graph_value(*graph)
                    .map(|graph| graph.name.as_str())
                    .unwrap_or(UNKNOWN_ENTITY);
                format!("exists({vertex}|{name})")
            }
            DlPredicate::DatatypeRestriction(id) => match vocabulary.datatype_restriction_value(*id) {
                Some(restriction) => {
                    let mut text = prefixes.abbreviate_iri(&restriction.datatype_iri);
                    if !restriction.facet_iris.is_empty() {
                        let facets: Vec<String> = restriction
                            .facet_iris
                            .iter()
                            .zip(&restriction.facet_values)
                            .map(|(facet, value)| {
                                format!(
                                    "{} {}",
                                    prefixes.abbreviate_iri(facet),
                                    render_constant(*value, vocabulary, prefixes)
                                )
                            })
                            .collect();
                        let _ = write!(text, "[{}]", facets.join(", "));
                    }
                    text
                }
                None => UNKNOWN_ENTITY.to_string(),
            },
            DlPredicate::Equality => "==".to_string(),
            DlPredicate::Inequality => "!=".to_string(),
            DlPredicate::NodeIdsAscendingOrEqual => "<=".to_string(),
        }
    }
}

impl Atom {
    /// `P(t1,t2)` with IRIs abbreviated by `prefixes`.
    pub fn render(&self, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
        let arguments: Vec<String> = self
            .arguments()
            .iter()
            .map(|term| render_term(*term, vocabulary, prefixes))
            .collect();
        format!("{}({})", self.predicate().render(vocabulary, prefixes), arguments.join(","))
    }
}

impl DlClause {
    /// `H1 v H2 :- B1, B2`; a constraint renders with nothing before `:-`.
    pub fn render(&self, vocabulary: &Vocabulary, prefixes: &Prefixes) -> String {
        let head: Vec<String> = self.head().iter().map(|atom| atom.render(vocabulary, prefixes)).collect();
        let body: Vec<String> = self.body().iter().map(|atom| atom.render(vocabulary, prefixes)).collect();
        format!("{} :- {}", head.join(" v "), body.join(", "))
    }
}

/// Counts describing a [`NormalizedOntology`], without clause text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyStatistics {
    pub deterministic_clauses: usize,
    pub nondeterministic_clauses: usize,
    pub disjunctions: usize,
    pub positive_facts: usize,
    pub negative_facts: usize,
    pub has_inverse_roles: bool,
    pub has_at_most_restrictions: bool,
    pub has_datatypes: bool,
    pub has_nominals: bool,
    pub atomic_concepts: usize,
    pub object_properties: usize,
    pub data_properties: usize,
    pub individuals: usize,
}

impl fmt::Display for OntologyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DL clauses statistics: [")?;
        writeln!(f, "  Number of deterministic clauses: {}", self.deterministic_clauses)?;
        writeln!(f, "  Number of nondeterministic clauses: {}", self.nondeterministic_clauses)?;
        writeln!(f, "  Overall number of disjunctions: {}", self.disjunctions)?;
        writeln!(f, "  Number of positive facts: {}", self.positive_facts)?;
        writeln!(f, "  Number of negative facts: {}", self.negative_facts)?;
        writeln!(f, "  Inverses: {}", self.has_inverse_roles)?;
        writeln!(f, "  At-Mosts: {}", self.has_at_most_restrictions)?;
        writeln!(f, "  Datatypes: {}", self.has_datatypes)?;
        writeln!(f, "  Nominals: {}", self.has_nominals)?;
        writeln!(f, "  Number of atomic concepts: {}", self.atomic_concepts)?;
        writeln!(f, "  Number of object properties: {}", self.object_properties)?;
        writeln!(f, "  Number of data properties: {}", self.data_properties)?;
        writeln!(f, "  Number of individuals: {}", self.individuals)?;
        write!(f, "]")
    }
}

impl NormalizedOntology {
    pub fn statistics(&self) -> OntologyStatistics {
        let mut statistics = OntologyStatistics {
            positive_facts: self.positive_facts().len(),
            negative_facts: self.negative_facts().len(),
            has_inverse_roles: self.has_inverse_roles(),
            has_at_most_restrictions: self.has_at_most_restrictions(),
            has_datatypes: self.has_datatypes(),
            has_nominals: self.has_nominals(),
            atomic_concepts: self.atomic_concepts().len(),
            object_properties: self.atomic_object_roles().len(),
            data_properties: self.atomic_data_roles().len(),
            individuals: self.individuals().len(),
            ..Default::default()
        };
        for clause in self.clauses() {
            if clause.is_deterministic() {
                statistics.deterministic_clauses += 1;
            } else {
                statistics.nondeterministic_clauses += 1;
                statistics.disjunctions += clause.head_len();
            }
        }
        statistics
    }

    /// Full listing: prefixes, clauses grouped by determinism, ABox, counts.
    pub fn render(&self, prefixes: &Prefixes) -> String {
        let vocabulary = self.vocabulary();
        let statistics = self.statistics();
        let mut out = String::from("Prefixes: [\n");
        for (name, iri) in prefixes.prefixes() {
            let _ = writeln!(out, "  {name} = <{iri}>");
        }
        out.push_str("]\nDeterministic DL-clauses: [\n");
        for clause in self.clauses().iter().filter(|clause| clause.is_deterministic()) {
            let _ = writeln!(out, "  {}", clause.render(vocabulary, prefixes));
        }
        out.push_str("]\nDisjunctive DL-clauses: [\n");
        for clause in self.clauses().iter().filter(|clause| !clause.is_deterministic()) {
            let _ = writeln!(out, "  {}", clause.render(vocabulary, prefixes));
        }
        out.push_str("]\nABox: [\n");
        for fact in self.positive_facts() {
            let _ = writeln!(out, "  {}", fact.render(vocabulary, prefixes));
        }
        for fact in self.negative_facts() {
            let _ = writeln!(out, "  !{}", fact.render(vocabulary, prefixes));
        }
        out.push_str("]\nStatistics: [\n");
        let _ = writeln!(out, "  Number of deterministic clauses: {}", statistics.deterministic_clauses);
        let _ = writeln!(out, "  Number of nondeterministic clauses: {}", statistics.nondeterministic_clauses);
        let _ = writeln!(out, "  Number of disjunctions: {}", statistics.disjunctions);
        let _ = writeln!(out, "  Number of positive facts: {}", statistics.positive_facts);
        let _ = writeln!(out, "  Number of negative facts: {}", statistics.negative_facts);
        out.push(']');
        out
    }
}

impl fmt::Display for NormalizedOntology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Prefixes::standard()))
    }
}
