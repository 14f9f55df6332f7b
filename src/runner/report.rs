//! Run-report assembly.

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::Category;
use crate::errors::{Result, SweepError};
use crate::models::{ProducedArtifact, RunEntry, RunReport, SkippedPreset};

/// Accumulates artifacts and per-operation metadata during a run and
/// finalizes them into the report, enforcing the non-empty-result
/// invariant.
pub struct ReportBuilder {
    run_id: String,
    started: String,
    selection: Vec<Category>,
    artifacts: Vec<ProducedArtifact>,
    results: Vec<RunEntry>,
    skipped: Vec<SkippedPreset>,
    executed: Vec<String>,
}

impl ReportBuilder {
    pub fn new(selection: Vec<Category>) -> Self {
        ReportBuilder {
            run_id: Uuid::new_v4().to_string(),
            started: Utc::now().to_rfc3339(),
            selection,
            artifacts: Vec::new(),
            results: Vec::new(),
            skipped: Vec::new(),
            executed: Vec::new(),
        }
    }

    pub fn record_skip(&mut self, skip: SkippedPreset) {
        self.skipped.push(skip);
    }

    pub fn record_skips(&mut self, skips: Vec<SkippedPreset>) {
        self.skipped.extend(skips);
    }

    /// Note a preset as part of the executed set, de-duplicated by name in
    /// selection order.
    pub fn record_executed(&mut self, name: &str) {
        if !self.executed.iter().any(|seen| seen == name) {
            self.executed.push(name.to_string());
        }
    }

    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    pub fn record_result(&mut self, artifact: ProducedArtifact, entry: RunEntry) {
        self.artifacts.push(artifact);
        self.results.push(entry);
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Finalize the report. Fails with [`SweepError::EmptyResult`] when no
    /// artifact was produced, covering both an empty selection that slipped
    /// through and a run whose every preset was skipped.
    pub fn finish(self, command: String) -> Result<RunReport> {
        if self.artifacts.is_empty() {
            return Err(SweepError::EmptyResult);
        }

        Ok(RunReport {
            run_id: self.run_id,
            started: self.started,
            command,
            artifacts: self.artifacts,
            presets: self.executed,
            skipped_presets: self.skipped,
            results: self.results,
            selection: self.selection.iter().map(|c| c.id().to_string()).collect(),
            selection_labels: self
                .selection
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
        })
    }
}
