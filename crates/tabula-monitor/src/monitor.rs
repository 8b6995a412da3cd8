//! 推論統計モニター

use crate::clock::{Clock, MonotonicClock};
use crate::config::MonitorConfig;
use crate::record::{TestRecord, TestType};
use crate::report::StatisticsReport;
use crate::statistics::{OverallStatistics, TestStatistics};
use crate::tableau::{NodeCensus, TableauView};
use crate::MonitorError;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Where the monitor is in the test lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestPhase {
    Idle,
    Running,
    Completed,
}

impl fmt::Display for TestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestPhase::Idle => "idle",
            TestPhase::Running => "running",
            TestPhase::Completed => "completed",
        })
    }
}

/// Observer of one reasoning session's tableau lifecycle.
///
/// Callbacks must arrive in lifecycle order: a test is started, may
/// backtrack and run blocking validations, and is finished with the same
/// kind it was started with. A callback that arrives out of order changes
/// nothing and returns [`MonitorError`].
///
/// The monitor is `Send` but not `Sync`: each session owns its own.
#[derive(Debug)]
pub struct ReasoningStatisticsMonitor<C: Clock = MonotonicClock> {
    config: MonitorConfig,
    clock: C,
    phase: TestPhase,
    test_started_at: u64,
    validation_started_at: Option<u64>,
    current: TestStatistics,
    overall: OverallStatistics,
    records: Vec<TestRecord>,
    _single_session: PhantomData<Cell<()>>,
}

impl ReasoningStatisticsMonitor<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for ReasoningStatisticsMonitor<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReasoningStatisticsMonitor<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            config: MonitorConfig::default(),
            clock,
            phase: TestPhase::Idle,
            test_started_at: 0,
            validation_started_at: None,
            current: TestStatistics::default(),
            overall: OverallStatistics::default(),
            records: Vec::new(),
            _single_session: PhantomData,
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    /// Counters of the running test, or of the last completed one.
    pub fn current_test(&self) -> &TestStatistics {
        &self.current
    }

    pub fn overall(&self) -> &OverallStatistics {
        &self.overall
    }

    /// Every completed test, in completion order.
    pub fn test_records(&self) -> &[TestRecord] {
        &self.records
    }

    // -- test start/finish ------------------------------------------------

    pub fn is_satisfiable_started(&mut self, concept_iri: &str) -> Result<(), MonitorError> {
        self.start("is_satisfiable_started", TestType::Satisfiability, concept_iri.to_string())
    }

    pub fn is_satisfiable_finished<T>(&mut self, result: bool, tableau: &T) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        self.finish("is_satisfiable_finished", TestType::Satisfiability, result, tableau)
    }

    pub fn is_role_satisfiable_started(&mut self, role: &str) -> Result<(), MonitorError> {
        self.start("is_role_satisfiable_started", TestType::PropertySatisfiability, role.to_string())
    }

    pub fn is_role_satisfiable_finished<T>(&mut self, result: bool, tableau: &T) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        self.finish("is_role_satisfiable_finished", TestType::PropertySatisfiability, result, tableau)
    }

    pub fn is_subsumed_by_started(&mut self, subconcept_iri: &str, superconcept_iri: &str) -> Result<(), MonitorError> {
        self.start(
            "is_subsumed_by_started",
            TestType::Subsumption,
            format!("{subconcept_iri} -> {superconcept_iri}"),
        )
    }

    pub fn is_subsumed_by_finished<T>(&mut self, result: bool, tableau: &T) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        self.finish("is_subsumed_by_finished", TestType::Subsumption, result, tableau)
    }

    pub fn is_abox_satisfiable_started(&mut self) -> Result<(), MonitorError> {
        self.start("is_abox_satisfiable_started", TestType::AboxSatisfiability, "ABox sat test".to_string())
    }

    pub fn is_abox_satisfiable_finished<T>(&mut self, result: bool, tableau: &T) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        self.finish("is_abox_satisfiable_finished", TestType::AboxSatisfiability, result, tableau)
    }

    pub fn is_instance_of_started(&mut self, concept_iri: &str, individual_iri: &str) -> Result<(), MonitorError> {
        self.start(
            "is_instance_of_started",
            TestType::InstanceOf,
            format!("{concept_iri}({individual_iri})"),
        )
    }

    pub fn is_instance_of_finished<T>(&mut self, result: bool, tableau: &T) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        self.finish("is_instance_of_finished", TestType::InstanceOf, result, tableau)
    }

    // -- events inside a test ---------------------------------------------

    pub fn backtrack_finished(&mut self) -> Result<(), MonitorError> {
        if self.phase != TestPhase::Running {
            return Err(self.violation("backtrack_finished"));
        }
        self.current.backtrackings += 1;
        trace!(backtrackings = self.current.backtrackings, "Backtrack");
        Ok(())
    }

    /// Counts a clash when saturation failed to find a model. Not tied to a test.
    pub fn saturate_finished(&mut self, model_found: bool) {
        if !model_found {
            self.overall.clashes += 1;
        }
    }

    /// Start of a blocking validation; the first one of a test also
    /// snapshots the model size and the blocked node count.
    pub fn blocking_validation_started<T>(&mut self, tableau: &T) -> Result<(), MonitorError>
    where
        T: TableauView + ?Sized,
    {
        if self.phase != TestPhase::Running {
            return Err(self.violation("blocking_validation_started"));
        }
        if self.validation_started_at.is_some() {
            return Err(self.validation_open("blocking_validation_started"));
        }
        self.current.validations += 1;
        if self.current.validations == 1 {
            let census = NodeCensus::take(tableau);
            self.current.initial_model_size = census.active;
            self.current.initially_blocked = census.blocked_pending;
        }
        self.validation_started_at = Some(self.clock.now_millis());
        trace!(validation = self.current.validations, "Blocking validation started");
        Ok(())
    }

    /// End of a blocking validation; only the first one of a test records
    /// `invalidly_blocked`.
    pub fn blocking_validation_finished(&mut self, invalidly_blocked: u64) -> Result<(), MonitorError> {
        let Some(started_at) = self.validation_started_at else {
            return Err(self.violation("blocking_validation_finished"));
        };
        self.current.validation_time_ms += self.clock.now_millis().saturating_sub(started_at);
        if self.current.validations == 1 {
            self.current.initially_invalid = invalidly_blocked;
        }
        self.validation_started_at = None;
        trace!(invalidly_blocked, "Blocking validation finished");
        Ok(())
    }

    // -- reporting ---------------------------------------------------------

    /// At most `limit` records, slowest first, optionally of one kind only.
    ///
    /// The returned records are a copy; later tests do not change them.
    pub fn time_sorted_test_records(&self, limit: usize, filter: Option<TestType>) -> Vec<TestRecord> {
        let mut matching: Vec<&TestRecord> = self
            .records
            .iter()
            .filter(|record| filter.map_or(true, |test_type| record.test_type() == test_type))
            .collect();
        matching.sort();
        matching.into_iter().take(limit).cloned().collect()
    }

    pub fn report(&self) -> StatisticsReport {
        StatisticsReport::new(
            self.overall.clone(),
            self.time_sorted_test_records(self.config.report_record_limit, None),
        )
    }

    // -- lifecycle ---------------------------------------------------------

    fn start(&mut self, event: &'static str, test_type: TestType, description: String) -> Result<(), MonitorError> {
        if self.phase == TestPhase::Running {
            return Err(self.violation(event));
        }
        self.overall.count_start(test_type);
        self.current = TestStatistics {
            test_type: Some(test_type),
            description,
            ..Default::default()
        };
        self.validation_started_at = None;
        self.test_started_at = self.clock.now_millis();
        self.phase = TestPhase::Running;
        trace!(test_type = %test_type, description = %self.current.description, "Test started");
        Ok(())
    }

    fn finish<T>(
        &mut self,
        event: &'static str,
        test_type: TestType,
        result: bool,
        tableau: &T,
    ) -> Result<TestRecord, MonitorError>
    where
        T: TableauView + ?Sized,
    {
        if self.phase != TestPhase::Running || self.current.test_type != Some(test_type) {
            return Err(self.violation(event));
        }
        if self.validation_started_at.is_some() {
            return Err(self.validation_open(event));
        }

        let elapsed_ms = self.clock.now_millis().saturating_sub(self.test_started_at);
        let census = NodeCensus::take(tableau);
        self.current.time_ms = elapsed_ms;
        self.current.result = result;
        self.current.nodes = census.active;
        self.current.blocked_nodes = census.blocked_pending;

        let record = TestRecord::new(test_type, elapsed_ms, self.current.description.clone(), result);
        self.records.push(record.clone());
        self.overall.absorb(&self.current);
        self.phase = TestPhase::Completed;

        debug!(
            test_type = %test_type,
            description = %record.description(),
            elapsed_ms,
            result,
            nodes = census.active,
            backtrackings = self.current.backtrackings,
            "Test finished"
        );
        if let Some(threshold) = self.config.slow_test_threshold_ms {
            if elapsed_ms > threshold {
                warn!(threshold_ms = threshold, "Slow test: {}", record);
            }
        }
        Ok(record)
    }

    fn violation(&self, event: &'static str) -> MonitorError {
        warn!(event, phase = %self.phase, "Monitor lifecycle violation");
        MonitorError::LifecycleViolation {
            event,
            phase: self.phase,
        }
    }

    fn validation_open(&self, event: &'static str) -> MonitorError {
        warn!(event, "Blocking validation still open");
        MonitorError::ValidationInProgress { event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::tableau::NodeStatus;

    fn monitor() -> (ReasoningStatisticsMonitor<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (ReasoningStatisticsMonitor::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_satisfiability_lifecycle() {
        let (mut monitor, clock) = monitor();
        let tableau = vec![NodeStatus::active(), NodeStatus::blocked_pending(), NodeStatus::inactive()];

        assert_eq!(monitor.phase(), TestPhase::Idle);
        monitor.is_satisfiable_started("http://example.org/C").unwrap();
        assert_eq!(monitor.phase(), TestPhase::Running);
        clock.advance(42);
        monitor.backtrack_finished().unwrap();
        monitor.backtrack_finished().unwrap();
        let record = monitor.is_satisfiable_finished(true, &tableau).unwrap();

        assert_eq!(record, TestRecord::new(TestType::Satisfiability, 42, "http://example.org/C", true));
        assert_eq!(monitor.phase(), TestPhase::Completed);
        let current = monitor.current_test();
        assert_eq!(current.time_ms, 42);
        assert_eq!(current.backtrackings, 2);
        assert_eq!(current.nodes, 2);
        assert_eq!(current.blocked_nodes, 1);
        assert_eq!(monitor.overall().tests, 1);
        assert_eq!(monitor.overall().satisfiability_tests, 1);
        assert_eq!(monitor.overall().backtrackings, 2);
        assert_eq!(monitor.test_records().len(), 1);
    }

    #[test]
    fn test_descriptions_per_kind() {
        let (mut monitor, _) = monitor();
        let tableau: Vec<NodeStatus> = Vec::new();

        monitor.is_role_satisfiable_started("inv(r)").unwrap();
        monitor.is_role_satisfiable_finished(true, &tableau).unwrap();
        monitor.is_subsumed_by_started("A", "B").unwrap();
        monitor.is_subsumed_by_finished(false, &tableau).unwrap();
        monitor.is_abox_satisfiable_started().unwrap();
        monitor.is_abox_satisfiable_finished(true, &tableau).unwrap();
        monitor.is_instance_of_started("C", "i").unwrap();
        monitor.is_instance_of_finished(true, &tableau).unwrap();

        let descriptions: Vec<&str> = monitor.test_records().iter().map(|r| r.description()).collect();
        assert_eq!(descriptions, vec!["inv(r)", "A -> B", "ABox sat test", "C(i)"]);
        let overall = monitor.overall();
        assert_eq!(overall.tests, 4);
        assert_eq!(overall.satisfiability_tests, 1);
        assert_eq!(overall.subsumption_tests, 1);
        assert_eq!(overall.abox_satisfiability_tests, 1);
        assert_eq!(overall.instance_of_tests, 1);
    }

    #[test]
    fn test_blocking_validation_baseline_is_first_validation_only() {
        let (mut monitor, clock) = monitor();
        let before = vec![NodeStatus::active(), NodeStatus::blocked_pending(), NodeStatus::blocked_pending()];
        let after = vec![NodeStatus::active(); 10];

        monitor.is_abox_satisfiable_started().unwrap();
        monitor.blocking_validation_started(&before).unwrap();
        clock.advance(5);
        monitor.blocking_validation_finished(2).unwrap();
        monitor.blocking_validation_started(&after).unwrap();
        clock.advance(7);
        monitor.blocking_validation_finished(9).unwrap();

        let current = monitor.current_test();
        assert_eq!(current.validations, 2);
        assert_eq!(current.validation_time_ms, 12);
        assert_eq!(current.initial_model_size, 3);
        assert_eq!(current.initially_blocked, 2);
        assert_eq!(current.initially_invalid, 2);

        monitor.is_abox_satisfiable_finished(true, &after).unwrap();
        assert_eq!(monitor.overall().validations, 2);
        assert_eq!(monitor.overall().validation_time_ms, 12);
        assert_eq!(monitor.overall().initial_model_size, 3);
    }

    #[test]
    fn test_counters_reset_between_tests() {
        let (mut monitor, _) = monitor();
        let tableau = vec![NodeStatus::blocked_pending()];

        monitor.is_satisfiable_started("A").unwrap();
        monitor.backtrack_finished().unwrap();
        monitor.blocking_validation_started(&tableau).unwrap();
        monitor.blocking_validation_finished(1).unwrap();
        monitor.is_satisfiable_finished(false, &tableau).unwrap();

        monitor.is_satisfiable_started("B").unwrap();
        let current = monitor.current_test();
        assert_eq!(current.backtrackings, 0);
        assert_eq!(current.validations, 0);
        assert_eq!(current.initially_invalid, 0);
        assert_eq!(current.description, "B");
    }

    #[test]
    fn test_clashes_are_global() {
        let (mut monitor, _) = monitor();
        monitor.saturate_finished(false);
        monitor.is_satisfiable_started("A").unwrap();
        monitor.saturate_finished(false);
        monitor.saturate_finished(true);
        monitor.is_satisfiable_finished(false, &Vec::<NodeStatus>::new()).unwrap();
        assert_eq!(monitor.overall().clashes, 2);
    }

    #[test]
    fn test_lifecycle_violations_change_nothing() {
        let (mut monitor, _) = monitor();
        let tableau: Vec<NodeStatus> = Vec::new();

        let err = monitor.is_satisfiable_finished(true, &tableau).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::LifecycleViolation {
                event: "is_satisfiable_finished",
                phase: TestPhase::Idle
            }
        ));
        assert!(monitor.backtrack_finished().is_err());
        assert!(monitor.blocking_validation_finished(0).is_err());

        monitor.is_satisfiable_started("A").unwrap();
        assert!(monitor.is_subsumed_by_started("A", "B").is_err());
        assert!(monitor.is_subsumed_by_finished(true, &tableau).is_err());
        monitor.blocking_validation_started(&tableau).unwrap();
        assert!(matches!(
            monitor.is_satisfiable_finished(true, &tableau),
            Err(MonitorError::ValidationInProgress { .. })
        ));
        assert!(monitor.blocking_validation_started(&tableau).is_err());
        monitor.blocking_validation_finished(0).unwrap();
        monitor.is_satisfiable_finished(true, &tableau).unwrap();

        assert_eq!(monitor.overall().tests, 1);
        assert_eq!(monitor.overall().subsumption_tests, 0);
        assert_eq!(monitor.test_records().len(), 1);
    }

    #[test]
    fn test_time_sorted_records() {
        let (mut monitor, clock) = monitor();
        let tableau: Vec<NodeStatus> = Vec::new();
        for (test_type, elapsed, description) in [
            (TestType::Subsumption, 50, "A -> B"),
            (TestType::Satisfiability, 50, "C"),
            (TestType::Satisfiability, 10, "D"),
        ] {
            match test_type {
                TestType::Subsumption => {
                    monitor.is_subsumed_by_started("A", "B").unwrap();
                    clock.advance(elapsed);
                    monitor.is_subsumed_by_finished(true, &tableau).unwrap();
                }
                _ => {
                    monitor.is_satisfiable_started(description).unwrap();
                    clock.advance(elapsed);
                    monitor.is_satisfiable_finished(true, &tableau).unwrap();
                }
            }
        }

        let sorted = monitor.time_sorted_test_records(10, None);
        let order: Vec<(u64, TestType)> = sorted.iter().map(|r| (r.elapsed_ms(), r.test_type())).collect();
        assert_eq!(
            order,
            vec![
                (50, TestType::Satisfiability),
                (50, TestType::Subsumption),
                (10, TestType::Satisfiability),
            ]
        );
        assert_eq!(monitor.time_sorted_test_records(1, None).len(), 1);
        assert_eq!(monitor.time_sorted_test_records(0, None).len(), 0);

        let satisfiability = monitor.time_sorted_test_records(10, Some(TestType::Satisfiability));
        assert_eq!(satisfiability.len(), 2);
        assert!(monitor.time_sorted_test_records(10, Some(TestType::InstanceOf)).is_empty());

        monitor.is_satisfiable_started("E").unwrap();
        clock.advance(500);
        monitor.is_satisfiable_finished(true, &tableau).unwrap();
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0].description(), "C");
        assert_eq!(monitor.test_records().len(), 4);
    }

    #[test]
    fn test_report_uses_record_limit() {
        let clock = ManualClock::new();
        let mut monitor = ReasoningStatisticsMonitor::with_clock(clock.clone()).with_config(MonitorConfig {
            slow_test_threshold_ms: Some(1),
            report_record_limit: 2,
        });
        let tableau: Vec<NodeStatus> = Vec::new();
        for concept in ["A", "B", "C"] {
            monitor.is_satisfiable_started(concept).unwrap();
            clock.advance(3);
            monitor.is_satisfiable_finished(true, &tableau).unwrap();
        }
        let report = monitor.report();
        assert_eq!(report.slowest_tests.len(), 2);
        assert_eq!(report.overall.tests, 3);
        assert_eq!(report.overall.time_ms, 9);
    }

    fn assert_send<T: Send>() {}

    #[test]
    fn test_monitor_is_send() {
        assert_send::<ReasoningStatisticsMonitor>();
        assert_send::<ReasoningStatisticsMonitor<ManualClock>>();
    }
}
