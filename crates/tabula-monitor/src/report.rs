//! 統計レポート

use crate::duration::format_duration;
use crate::record::TestRecord;
use crate::statistics::OverallStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a monitor's totals and its slowest tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub generated_at: DateTime<Utc>,
    pub overall: OverallStatistics,
    pub slowest_tests: Vec<TestRecord>,
}

impl StatisticsReport {
    pub fn new(overall: OverallStatistics, slowest_tests: Vec<TestRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            overall,
            slowest_tests,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overall = &self.overall;
        writeln!(f, "Reasoning statistics ({}): [", self.generated_at.to_rfc3339())?;
        writeln!(
            f,
            "  Tests: {} (satisfiability: {}, subsumption: {}, ABox satisfiability: {}, instance-of: {})",
            overall.tests,
            overall.satisfiability_tests,
            overall.subsumption_tests,
            overall.abox_satisfiability_tests,
            overall.instance_of_tests
        )?;
        writeln!(f, "  Time: {} ({} ms)", format_duration(overall.time_ms), overall.time_ms)?;
        writeln!(f, "  Backtrackings: {}", overall.backtrackings)?;
        writeln!(f, "  Clashes: {}", overall.clashes)?;
        writeln!(f, "  Nodes: {} (blocked: {})", overall.nodes, overall.blocked_nodes)?;
        writeln!(
            f,
            "  Blocking validations: {} in {} (initial model size: {}, initially blocked: {}, initially invalid: {})",
            overall.validations,
            format_duration(overall.validation_time_ms),
            overall.initial_model_size,
            overall.initially_blocked,
            overall.initially_invalid
        )?;
        writeln!(f, "  Slowest tests: [")?;
        for record in &self.slowest_tests {
            writeln!(f, "    {record}")?;
        }
        writeln!(f, "  ]")?;
        write!(f, "]")
    }
}
