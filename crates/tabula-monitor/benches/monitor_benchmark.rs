use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabula_monitor::{ManualClock, NodeStatus, ReasoningStatisticsMonitor, TestType};

fn create_test_monitor(size: usize) -> ReasoningStatisticsMonitor<ManualClock> {
    let clock = ManualClock::new();
    let mut monitor = ReasoningStatisticsMonitor::with_clock(clock.clone());
    let nodes: Vec<NodeStatus> = Vec::new();

    for i in 0..size {
        monitor
            .is_satisfiable_started(&format!("http://example.org/Class{}", i))
            .unwrap();
        clock.advance((i * 7919 % 1000) as u64);
        monitor.is_satisfiable_finished(i % 2 == 0, &nodes).unwrap();
    }
    monitor
}

fn benchmark_sorted_records(c: &mut Criterion) {
    let sizes = vec![100, 1_000, 10_000];

    for size in sizes {
        let monitor = create_test_monitor(size);
        c.bench_function(&format!("time_sorted_records_{}_tests", size), |b| {
            b.iter(|| black_box(monitor.time_sorted_test_records(10, Some(TestType::Satisfiability))));
        });
    }
}

fn benchmark_test_lifecycle(c: &mut Criterion) {
    let nodes: Vec<NodeStatus> = (0..1_000)
        .map(|i| if i % 10 == 0 { NodeStatus::blocked_pending() } else { NodeStatus::active() })
        .collect();

    c.bench_function("test_lifecycle_1000_nodes", |b| {
        let clock = ManualClock::new();
        let mut monitor = ReasoningStatisticsMonitor::with_clock(clock.clone());
        b.iter(|| {
            monitor.is_abox_satisfiable_started().unwrap();
            monitor.blocking_validation_started(&nodes).unwrap();
            clock.advance(1);
            monitor.blocking_validation_finished(0).unwrap();
            black_box(monitor.is_abox_satisfiable_finished(true, &nodes).unwrap());
        });
    });
}

criterion_group!(benches, benchmark_sorted_records, benchmark_test_lifecycle);
criterion_main!(benches);
