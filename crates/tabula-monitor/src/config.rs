//! モニター設定

use crate::MonitorError;
use serde::{Deserialize, Serialize};

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Completed tests slower than this are logged as warnings.
    pub slow_test_threshold_ms: Option<u64>,
    /// Number of slowest records included in a report.
    pub report_record_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            slow_test_threshold_ms: None,
            report_record_limit: 10,
        }
    }
}

impl MonitorConfig {
    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        Ok(serde_json::from_str(json)?)
    }
}
