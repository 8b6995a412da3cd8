//! テスト記録

use crate::duration::format_duration;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Kind of decision-procedure invocation; declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    Satisfiability,
    PropertySatisfiability,
    Subsumption,
    AboxSatisfiability,
    InstanceOf,
}

impl TestType {
    pub const ALL: [TestType; 5] = [
        TestType::Satisfiability,
        TestType::PropertySatisfiability,
        TestType::Subsumption,
        TestType::AboxSatisfiability,
        TestType::InstanceOf,
    ];
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestType::Satisfiability => "SATISFIABILITY",
            TestType::PropertySatisfiability => "PROPERTY_SATISFIABILITY",
            TestType::Subsumption => "SUBSUMPTION",
            TestType::AboxSatisfiability => "ABOXSATISFIABILITY",
            TestType::InstanceOf => "INSTANCEOF",
        };
        f.write_str(name)
    }
}

/// One completed test. Immutable once created.
///
/// Records order slowest first, then by [`TestType`], then by description
/// ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestRecord {
    test_type: TestType,
    elapsed_ms: u64,
    description: String,
    result: bool,
}

impl TestRecord {
    pub fn new(test_type: TestType, elapsed_ms: u64, description: impl Into<String>, result: bool) -> Self {
        Self {
            test_type,
            elapsed_ms,
            description: description.into(),
            result,
        }
    }

    pub fn test_type(&self) -> TestType {
        self.test_type
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn result(&self) -> bool {
        self.result
    }
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

impl Ord for TestRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .elapsed_ms
            .cmp(&self.elapsed_ms)
            .then(self.test_type.cmp(&other.test_type))
            .then_with(|| compare_ignore_case(&self.description, &other.description))
            .then_with(|| self.description.cmp(&other.description))
            .then(self.result.cmp(&other.result))
    }
}

impl PartialOrd for TestRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.elapsed_ms)?;
        if self.elapsed_ms > 1000 {
            write!(f, " ({})", format_duration(self.elapsed_ms))?;
        }
        write!(f, " for {} (result: {})", self.description, self.result)
    }
}
