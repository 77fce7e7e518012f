//! Scenario outcomes and report rendering.
//!
//! The runner produces one [`ScenarioRecord`] per scenario; a [`RunReport`]
//! aggregates them and renders the line summary plus the JUnit XML and JSON
//! files CI consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::result::ConducirResult;

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed after all retries
    Failed,
    /// Scenario was skipped
    Skipped,
}

impl ScenarioStatus {
    /// Check if the status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if the status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Status name as rendered in reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of one scenario, across all of its attempts
#[derive(Debug, Clone)]
pub struct ScenarioRecord {
    /// Suite the scenario belongs to
    pub suite: String,
    /// Scenario name
    pub name: String,
    /// Final status
    pub status: ScenarioStatus,
    /// Total duration across attempts
    pub duration: Duration,
    /// Error message of the last failed attempt
    pub error: Option<String>,
    /// Number of attempts made
    pub attempts: u32,
    /// Failure screenshot, when the engine could capture one
    pub screenshot: Option<PathBuf>,
}

impl ScenarioRecord {
    /// Create a passing record
    #[must_use]
    pub fn passed(
        suite: impl Into<String>,
        name: impl Into<String>,
        duration: Duration,
        attempts: u32,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration,
            error: None,
            attempts,
            screenshot: None,
        }
    }

    /// Create a failing record
    #[must_use]
    pub fn failed(
        suite: impl Into<String>,
        name: impl Into<String>,
        duration: Duration,
        attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration,
            error: Some(error.into()),
            attempts,
            screenshot: None,
        }
    }

    /// Create a skipped record
    #[must_use]
    pub fn skipped(suite: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            status: ScenarioStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            attempts: 0,
            screenshot: None,
        }
    }

    /// Attach a failure screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }
}

/// Aggregated results of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    name: String,
    started: DateTime<Utc>,
    records: Vec<ScenarioRecord>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new("conducir")
    }
}

impl RunReport {
    /// Create an empty report
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Append one record
    pub fn record(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    /// Append many records
    pub fn extend(&mut self, records: impl IntoIterator<Item = ScenarioRecord>) {
        self.records.extend(records);
    }

    /// All records in execution order
    #[must_use]
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Records that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioRecord> {
        self.records.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status.is_passed())
            .count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().len()
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == ScenarioStatus::Skipped)
            .count()
    }

    /// Total number of scenarios
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// Whether every non-skipped scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Total wall-clock duration across scenarios
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Human-readable line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {} passed, {} failed, {} skipped in {:.2}s\n",
            self.name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64(),
        );
        for failure in self.failures() {
            out.push_str(&format!(
                "  FAILED {} > {} ({} attempts): {}\n",
                failure.suite,
                failure.name,
                failure.attempts,
                failure.error.as_deref().unwrap_or("unknown error"),
            ));
        }
        out
    }

    /// Render JUnit XML for CI integration
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuites name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64(),
        ));
        xml.push('\n');

        let mut suites: Vec<&str> = self.records.iter().map(|r| r.suite.as_str()).collect();
        suites.dedup();
        for suite in suites {
            let records: Vec<&ScenarioRecord> =
                self.records.iter().filter(|r| r.suite == suite).collect();
            let failures = records.iter().filter(|r| r.status.is_failed()).count();
            let time: f64 = records.iter().map(|r| r.duration.as_secs_f64()).sum();
            xml.push_str(&format!(
                r#"  <testsuite name="{}" tests="{}" failures="{}" time="{time:.3}">"#,
                escape_xml(suite),
                records.len(),
                failures,
            ));
            xml.push('\n');
            for record in records {
                xml.push_str(&format!(
                    r#"    <testcase name="{}" classname="{}" time="{:.3}">"#,
                    escape_xml(&record.name),
                    escape_xml(&record.suite),
                    record.duration.as_secs_f64(),
                ));
                match record.status {
                    ScenarioStatus::Passed => {}
                    ScenarioStatus::Failed => {
                        xml.push_str(&format!(
                            r#"<failure message="{}"/>"#,
                            escape_xml(record.error.as_deref().unwrap_or("unknown error")),
                        ));
                    }
                    ScenarioStatus::Skipped => xml.push_str("<skipped/>"),
                }
                xml.push_str("</testcase>\n");
            }
            xml.push_str("  </testsuite>\n");
        }
        xml.push_str("</testsuites>\n");
        xml
    }

    /// Write the JUnit XML report
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_junit(&self, path: &Path) -> ConducirResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render_junit())?;
        Ok(())
    }

    /// Render the machine-readable JSON report
    #[must_use]
    pub fn render_json(&self) -> String {
        let records: Vec<serde_json::Value> = self
            .records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "suite": r.suite,
                    "name": r.name,
                    "status": r.status.as_str(),
                    "duration_ms": u64::try_from(r.duration.as_millis()).unwrap_or(u64::MAX),
                    "attempts": r.attempts,
                    "error": r.error,
                    "screenshot": r.screenshot,
                })
            })
            .collect();
        let report = serde_json::json!({
            "name": self.name,
            "started": self.started.to_rfc3339(),
            "passed": self.passed_count(),
            "failed": self.failed_count(),
            "skipped": self.skipped_count(),
            "scenarios": records,
        });
        serde_json::to_string_pretty(&report).unwrap_or_default()
    }

    /// Write the JSON report
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_json(&self, path: &Path) -> ConducirResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render_json())?;
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
