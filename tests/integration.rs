// Integration tests for Tabula components
// These tests verify end-to-end behaviour across the model, datatypes and monitor crates

use std::sync::Arc;
use std::thread;

use tabula::datatypes::RDF_XML_LITERAL;
use tabula::model::{AtLeastConcept, LiteralConcept, PrebuiltSignature, Role};
use tabula::monitor::StatisticsReport;
use tabula::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const EX: &str = "http://example.org/";

/// Small family ontology with one disjunctive clause, an existential and an XML-literal annotation.
/// Role sets come from the front end, as they do for a real OWL translation.
fn family_ontology() -> Result<NormalizedOntology> {
    let mut vocabulary = Vocabulary::new();
    let person = vocabulary.atomic_concept(format!("{EX}Person"));
    let parent = vocabulary.atomic_concept(format!("{EX}Parent"));
    let mother = vocabulary.atomic_concept(format!("{EX}Mother"));
    let father = vocabulary.atomic_concept(format!("{EX}Father"));
    let has_child = vocabulary.atomic_role(format!("{EX}hasChild"));
    let bio = vocabulary.atomic_role(format!("{EX}bio"));
    let alice = vocabulary.individual(format!("{EX}alice"));
    let bob = vocabulary.individual(format!("{EX}bob"));
    let first = vocabulary.constant("<b z='1' a='2'/>", RDF_XML_LITERAL)?;
    let second = vocabulary.constant("<b a=\"2\" z=\"1\"></b>", RDF_XML_LITERAL)?;

    let x = Term::Variable(Variable(0));
    let y = Term::Variable(Variable(1));
    let clauses = vec![
        // Parent(X) -> Mother(X) v Father(X)
        DlClause::new(
            vec![Atom::unary(DlPredicate::AtomicConcept(parent), x)],
            vec![
                Atom::unary(DlPredicate::AtomicConcept(mother), x),
                Atom::unary(DlPredicate::AtomicConcept(father), x),
            ],
        ),
        // hasChild(X, Y) -> Parent(X)
        DlClause::new(
            vec![Atom::binary(DlPredicate::AtomicRole(has_child), x, y)],
            vec![Atom::unary(DlPredicate::AtomicConcept(parent), x)],
        ),
        // Parent(X) -> atLeast(1 hasChild Person)(X)
        DlClause::new(
            vec![Atom::unary(DlPredicate::AtomicConcept(parent), x)],
            vec![Atom::unary(
                DlPredicate::AtLeastConcept(AtLeastConcept {
                    number: 1,
                    on_role: Role::Atomic(has_child),
                    to_concept: LiteralConcept::Atomic(person),
                }),
                x,
            )],
        ),
    ];
    let positive_facts = vec![
        Atom::binary(DlPredicate::AtomicRole(has_child), alice, bob),
        Atom::binary(DlPredicate::AtomicRole(bio), alice, first),
        Atom::binary(DlPredicate::AtomicRole(bio), alice, second),
    ];
    let negative_facts = vec![Atom::unary(DlPredicate::AtomicConcept(father), alice)];

    let parts = OntologyParts::new(format!("{EX}family"), vocabulary)
        .with_clauses(clauses)
        .with_positive_facts(positive_facts)
        .with_negative_facts(negative_facts)
        .with_signature(PrebuiltSignature {
            atomic_object_roles: Some(vec![has_child]),
            atomic_data_roles: Some(vec![bio]),
            ..Default::default()
        });
    Ok(NormalizedOntology::new(parts)?)
}

#[test]
fn test_family_ontology_indices() -> Result<()> {
    init_tracing();
    let ontology = family_ontology()?;
    let vocabulary = ontology.vocabulary();
    let has_child = vocabulary.find_atomic_role(&format!("{EX}hasChild")).unwrap();
    let bio = vocabulary.find_atomic_role(&format!("{EX}bio")).unwrap();
    let alice = vocabulary.find_individual(&format!("{EX}alice")).unwrap();

    assert!(!ontology.is_horn());
    assert!(ontology.contains_object_role(has_child));
    assert!(ontology.contains_data_role(bio));
    assert!(!ontology.contains_object_role(bio));
    assert_eq!(ontology.individuals().len(), 2);

    // the two XML literals are canonically equal, so alice has one bio value
    let values = ontology.data_property_values(bio, alice).unwrap();
    assert_eq!(values.len(), 1);
    let value = vocabulary.constant_value(*values.iter().next().unwrap()).unwrap();
    assert_eq!(value.lexical_form, "<b a=\"2\" z=\"1\"></b>");
    assert_eq!(ontology.positive_facts().len(), 2);

    // Person only ever appears as an atLeast filler in a head
    let body_only: Vec<&str> = ontology
        .body_only_atomic_concepts()
        .into_iter()
        .map(|concept| vocabulary.concept_iri(concept))
        .collect();
    assert!(body_only.is_empty());

    let statistics = ontology.statistics();
    assert_eq!(statistics.deterministic_clauses, 2);
    assert_eq!(statistics.nondeterministic_clauses, 1);
    assert_eq!(statistics.disjunctions, 2);
    assert_eq!(statistics.positive_facts, 2);
    assert_eq!(statistics.negative_facts, 1);
    Ok(())
}

#[test]
fn test_persisted_ontology_renders_identically() -> Result<()> {
    init_tracing();
    let ontology = family_ontology()?;
    let bytes = ontology.to_bytes()?;
    let restored = NormalizedOntology::from_bytes(&bytes)?;

    assert_eq!(restored, ontology);
    assert_eq!(restored.to_string(), ontology.to_string());
    assert_eq!(restored.number_of_external_concepts(), ontology.number_of_external_concepts());

    let mut truncated = bytes.clone();
    truncated.truncate(bytes.len() / 2);
    let err = NormalizedOntology::from_bytes(&truncated).unwrap_err();
    assert!(err.is_load_error());
    Ok(())
}

#[test]
fn test_concurrent_sessions_share_one_ontology() -> Result<()> {
    init_tracing();
    let ontology = Arc::new(family_ontology()?);
    let concepts: Vec<String> = ontology
        .atomic_concepts()
        .iter()
        .map(|concept| ontology.vocabulary().concept_iri(concept).to_string())
        .collect();

    let reports: Vec<StatisticsReport> = thread::scope(|scope| {
        let handles: Vec<_> = concepts
            .iter()
            .map(|concept| {
                let ontology = Arc::clone(&ontology);
                scope.spawn(move || -> Result<StatisticsReport> {
                    let clock = ManualClock::new();
                    let mut session =
                        ReasoningSession::with_monitor(ontology, ReasoningStatisticsMonitor::with_clock(clock.clone()));
                    let nodes = vec![NodeStatus::active(), NodeStatus::blocked_pending()];

                    let monitor = session.monitor_mut();
                    monitor.is_satisfiable_started(concept)?;
                    monitor.backtrack_finished()?;
                    monitor.blocking_validation_started(&nodes)?;
                    clock.advance(4);
                    monitor.blocking_validation_finished(1)?;
                    clock.advance(6);
                    monitor.is_satisfiable_finished(true, &nodes)?;
                    Ok(session.finish())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| anyhow::anyhow!("session thread panicked"))?)
            .collect::<Result<Vec<_>>>()
    })?;

    assert_eq!(reports.len(), concepts.len());
    for report in &reports {
        assert_eq!(report.overall.tests, 1);
        assert_eq!(report.overall.satisfiability_tests, 1);
        assert_eq!(report.overall.backtrackings, 1);
        assert_eq!(report.overall.time_ms, 10);
        assert_eq!(report.overall.validation_time_ms, 4);
        assert_eq!(report.overall.initially_blocked, 1);
        assert_eq!(report.overall.initially_invalid, 1);
    }
    // every session read the same instance, which nothing mutated
    assert_eq!(Arc::strong_count(&ontology), 1);
    assert_eq!(*ontology, family_ontology()?);
    Ok(())
}

#[test]
fn test_report_serializes_to_json() -> Result<()> {
    init_tracing();
    let ontology = Arc::new(family_ontology()?);
    let clock = ManualClock::new();
    let config = MonitorConfig::from_json(r#"{"report_record_limit": 1}"#)?;
    let mut session =
        ReasoningSession::with_monitor(ontology, ReasoningStatisticsMonitor::with_clock(clock.clone())).with_config(config);
    let nodes: Vec<NodeStatus> = Vec::new();

    for (elapsed, concept) in [(5, "Person"), (50, "Parent")] {
        session.monitor_mut().is_satisfiable_started(&format!("{EX}{concept}"))?;
        clock.advance(elapsed);
        session.monitor_mut().is_satisfiable_finished(true, &nodes)?;
    }

    let report = session.finish();
    assert_eq!(report.slowest_tests.len(), 1);
    assert_eq!(report.slowest_tests[0].description(), format!("{EX}Parent"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert_eq!(json["overall"]["tests"], 2);
    assert_eq!(json["slowest_tests"][0]["test_type"], "SATISFIABILITY");
    Ok(())
}
