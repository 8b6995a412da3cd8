//! Scenario tests driving the monitor the way a tableau engine does.

use anyhow::Result;
use tabula_monitor::{
    ManualClock, MonitorConfig, MonitorError, NodeStatus, ReasoningStatisticsMonitor, TableauNode, TableauView,
    TestPhase, TestType,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Minimal engine-side node list, linked the way a tableau keeps its nodes.
struct Engine {
    nodes: Vec<EngineNode>,
}

struct EngineNode {
    merged: bool,
    blocker: Option<usize>,
    pending_existentials: usize,
}

impl TableauNode for EngineNode {
    fn is_active(&self) -> bool {
        !self.merged
    }

    fn is_blocked(&self) -> bool {
        self.blocker.is_some()
    }

    fn has_unprocessed_existentials(&self) -> bool {
        self.pending_existentials > 0
    }
}

impl TableauView for Engine {
    type Node = EngineNode;

    fn nodes(&self) -> impl Iterator<Item = &EngineNode> {
        self.nodes.iter()
    }
}

#[test]
fn test_engine_session() -> Result<()> {
    init_tracing();
    let clock = ManualClock::new();
    let mut monitor = ReasoningStatisticsMonitor::with_clock(clock.clone()).with_config(MonitorConfig::from_json(
        r#"{"slow_test_threshold_ms": 100, "report_record_limit": 5}"#,
    )?);

    let mut engine = Engine {
        nodes: vec![
            EngineNode {
                merged: false,
                blocker: None,
                pending_existentials: 1,
            },
            EngineNode {
                merged: false,
                blocker: Some(0),
                pending_existentials: 2,
            },
        ],
    };

    monitor.is_subsumed_by_started("http://example.org/Dog", "http://example.org/Animal")?;
    monitor.saturate_finished(false);
    monitor.backtrack_finished()?;
    monitor.blocking_validation_started(&engine)?;
    clock.advance(3);
    monitor.blocking_validation_finished(1)?;

    engine.nodes.push(EngineNode {
        merged: true,
        blocker: None,
        pending_existentials: 0,
    });
    engine.nodes[1].blocker = None;
    clock.advance(200);
    let record = monitor.is_subsumed_by_finished(true, &engine)?;

    assert_eq!(record.test_type(), TestType::Subsumption);
    assert_eq!(record.elapsed_ms(), 203);
    assert_eq!(
        record.to_string(),
        "203 ms for http://example.org/Dog -> http://example.org/Animal (result: true)"
    );

    let current = monitor.current_test();
    assert_eq!(current.initial_model_size, 2);
    assert_eq!(current.initially_blocked, 1);
    assert_eq!(current.initially_invalid, 1);
    assert_eq!(current.nodes, 2);
    assert_eq!(current.blocked_nodes, 0);

    let report = monitor.report();
    assert_eq!(report.overall.clashes, 1);
    assert_eq!(report.slowest_tests, vec![record]);
    assert!(report.to_string().contains("Clashes: 1"));
    Ok(())
}

#[test]
fn test_abandoned_session_stays_readable() -> Result<()> {
    init_tracing();
    let clock = ManualClock::new();
    let mut monitor = ReasoningStatisticsMonitor::with_clock(clock.clone());
    let nodes = vec![NodeStatus::active()];

    monitor.is_satisfiable_started("http://example.org/A")?;
    clock.advance(10);
    monitor.is_satisfiable_finished(true, &nodes)?;
    monitor.is_instance_of_started("http://example.org/A", "http://example.org/a")?;
    monitor.backtrack_finished()?;

    // the session is dropped here without finishing its second test
    assert_eq!(monitor.phase(), TestPhase::Running);
    assert_eq!(monitor.test_records().len(), 1);
    assert_eq!(monitor.overall().tests, 2);
    assert_eq!(monitor.overall().backtrackings, 0);
    assert_eq!(monitor.time_sorted_test_records(10, None).len(), 1);

    let err = monitor.is_abox_satisfiable_started().unwrap_err();
    assert!(matches!(err, MonitorError::LifecycleViolation { phase: TestPhase::Running, .. }));
    Ok(())
}
