//! 推論セッション

use std::sync::Arc;
use tabula_model::NormalizedOntology;
use tabula_monitor::{Clock, MonitorConfig, MonotonicClock, ReasoningStatisticsMonitor, StatisticsReport};
use tracing::debug;

/// One reasoning session: a shared, read-only ontology and a monitor owned by this session alone.
///
/// Sessions are `Send` but the monitor is not `Sync`, so a session can move to a worker
/// thread while its statistics can never be written from two threads at once.
#[derive(Debug)]
pub struct ReasoningSession<C: Clock = MonotonicClock> {
    ontology: Arc<NormalizedOntology>,
    monitor: ReasoningStatisticsMonitor<C>,
}

impl ReasoningSession<MonotonicClock> {
    pub fn new(ontology: Arc<NormalizedOntology>) -> Self {
        Self::with_monitor(ontology, ReasoningStatisticsMonitor::new())
    }
}

impl<C: Clock> ReasoningSession<C> {
    pub fn with_monitor(ontology: Arc<NormalizedOntology>, monitor: ReasoningStatisticsMonitor<C>) -> Self {
        debug!(
            ontology = ontology.ontology_iri(),
            clauses = ontology.clauses().len(),
            "reasoning session opened"
        );
        Self { ontology, monitor }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.monitor = self.monitor.with_config(config);
        self
    }

    pub fn ontology(&self) -> &NormalizedOntology {
        &self.ontology
    }

    /// Another handle to the shared ontology, for opening further sessions.
    pub fn shared_ontology(&self) -> Arc<NormalizedOntology> {
        Arc::clone(&self.ontology)
    }

    pub fn monitor(&self) -> &ReasoningStatisticsMonitor<C> {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut ReasoningStatisticsMonitor<C> {
        &mut self.monitor
    }

    /// Close the session, keeping only its statistics.
    pub fn finish(self) -> StatisticsReport {
        let report = self.monitor.report();
        debug!(
            ontology = self.ontology.ontology_iri(),
            tests = report.overall.tests,
            "reasoning session closed"
        );
        report
    }
}
