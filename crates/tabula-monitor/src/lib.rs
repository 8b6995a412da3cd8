//! 推論統計モニター
//!
//! このクレートはテーブルロー推論の実行統計を提供します:
//! - テストごとの時間・バックトラック・ノード数
//! - ブロッキング検証の初回ベースライン
//! - 時間順のテスト記録とレポート

pub mod clock;
pub mod config;
pub mod duration;
pub mod monitor;
pub mod record;
pub mod report;
pub mod statistics;
pub mod tableau;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::MonitorConfig;
pub use duration::format_duration;
pub use monitor::{ReasoningStatisticsMonitor, TestPhase};
pub use record::{TestRecord, TestType};
pub use report::StatisticsReport;
pub use statistics::{OverallStatistics, TestStatistics};
pub use tableau::{NodeCensus, NodeStatus, TableauNode, TableauView};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Lifecycle violation: {event} while {phase}")]
    LifecycleViolation { event: &'static str, phase: TestPhase },

    #[error("Lifecycle violation: {event} while a blocking validation is open")]
    ValidationInProgress { event: &'static str },

    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
