//! 統計カウンタ

use crate::record::TestType;
use serde::{Deserialize, Serialize};

/// Measurements of the current (or most recently completed) test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStatistics {
    pub test_type: Option<TestType>,
    pub description: String,
    pub result: bool,
    pub time_ms: u64,
    pub backtrackings: u64,
    /// Active nodes when the test finished.
    pub nodes: u64,
    /// Active nodes blocked with unprocessed existentials when the test finished.
    pub blocked_nodes: u64,
    pub validations: u64,
    pub validation_time_ms: u64,
    /// Active nodes at the first blocking validation.
    pub initial_model_size: u64,
    pub initially_blocked: u64,
    pub initially_invalid: u64,
}

/// Totals across every test seen by one monitor. Never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub tests: u64,
    /// Concept and role satisfiability tests.
    pub satisfiability_tests: u64,
    pub subsumption_tests: u64,
    pub abox_satisfiability_tests: u64,
    pub instance_of_tests: u64,
    pub clashes: u64,
    pub time_ms: u64,
    pub backtrackings: u64,
    pub nodes: u64,
    pub blocked_nodes: u64,
    pub validations: u64,
    pub validation_time_ms: u64,
    pub initial_model_size: u64,
    pub initially_blocked: u64,
    pub initially_invalid: u64,
}

impl OverallStatistics {
    pub(crate) fn count_start(&mut self, test_type: TestType) {
        self.tests += 1;
        match test_type {
            TestType::Satisfiability | TestType::PropertySatisfiability => self.satisfiability_tests += 1,
            TestType::Subsumption => self.subsumption_tests += 1,
            TestType::AboxSatisfiability => self.abox_satisfiability_tests += 1,
            TestType::InstanceOf => self.instance_of_tests += 1,
        }
    }

    /// Fold a completed test into the totals.
    pub(crate) fn absorb(&mut self, test: &TestStatistics) {
        self.time_ms += test.time_ms;
        self.backtrackings += test.backtrackings;
        self.nodes += test.nodes;
        self.blocked_nodes += test.blocked_nodes;
        self.validations += test.validations;
        self.validation_time_ms += test.validation_time_ms;
        self.initial_model_size += test.initial_model_size;
        self.initially_blocked += test.initially_blocked;
        self.initially_invalid += test.initially_invalid;
    }
}
