use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabula_model::{Atom, DlClause, NormalizedOntology, OntologyParts, Variable, Vocabulary};

fn create_test_parts(size: usize) -> OntologyParts {
    let mut vocabulary = Vocabulary::new();
    let (x, y) = (Variable(0), Variable(1));
    let mut clauses = Vec::new();
    let mut facts = Vec::new();

    for i in 0..size {
        let class = vocabulary.atomic_concept(format!("http://example.org/Class{}", i));
        let role = vocabulary.atomic_role(format!("http://example.org/property{}", i));
        let data_role = vocabulary.atomic_role(format!("http://example.org/value{}", i));
        let individual = vocabulary.individual(format!("http://example.org/ind{}", i));
        let value = vocabulary
            .constant(&i.to_string(), "http://www.w3.org/2001/XMLSchema#int")
            .unwrap();

        // Subclass chain plus one disjunction every tenth class
        if i > 0 {
            let parent = vocabulary.atomic_concept(format!("http://example.org/Class{}", i - 1));
            let mut head = vec![Atom::unary(parent, x)];
            if i % 10 == 0 {
                head.push(Atom::unary(class, x));
            }
            clauses.push(DlClause::new(vec![Atom::unary(class, x), Atom::binary(role, x, y)], head));
        }

        facts.push(Atom::unary(class, individual));
        facts.push(Atom::binary(data_role, individual, value));
    }

    OntologyParts::new("http://example.org/bench", vocabulary)
        .with_clauses(clauses)
        .with_positive_facts(facts)
}

fn benchmark_ontology_construction(c: &mut Criterion) {
    let sizes = vec![100, 1_000, 10_000];

    for size in sizes {
        let parts = create_test_parts(size);
        c.bench_function(&format!("ontology_construction_{}_entities", size), |b| {
            b.iter(|| {
                let ontology = NormalizedOntology::new(black_box(parts.clone())).unwrap();
                black_box(ontology);
            });
        });
    }
}

fn benchmark_derived_analyses(c: &mut Criterion) {
    let ontology = NormalizedOntology::new(create_test_parts(1_000)).unwrap();

    c.bench_function("body_only_atomic_concepts_1000", |b| {
        b.iter(|| black_box(ontology.body_only_atomic_concepts()));
    });

    c.bench_function("graph_atomic_roles_1000", |b| {
        b.iter(|| black_box(ontology.graph_atomic_roles()));
    });
}

fn benchmark_persistence(c: &mut Criterion) {
    let ontology = NormalizedOntology::new(create_test_parts(1_000)).unwrap();
    let bytes = ontology.to_bytes().unwrap();

    c.bench_function("ontology_save_1000", |b| {
        b.iter(|| black_box(ontology.to_bytes().unwrap()));
    });

    c.bench_function("ontology_load_1000", |b| {
        b.iter(|| black_box(NormalizedOntology::from_bytes(black_box(&bytes)).unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_ontology_construction,
    benchmark_derived_analyses,
    benchmark_persistence
);
criterion_main!(benches);
