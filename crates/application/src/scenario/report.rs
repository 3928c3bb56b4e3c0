//! Scenario run report

use std::time::Duration;

use chrono::{DateTime, Utc};
use restcheck_domain::AssertionResult;
use serde::{Serialize, Serializer};

use crate::error::{ApplicationError, ApplicationResult, ScenarioError};

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,
    /// Check results from every step that ran, in order.
    pub results: Vec<AssertionResult>,
    /// Set when the scenario stopped early.
    #[serde(serialize_with = "serialize_fatal")]
    pub fatal: Option<ScenarioError>,
    /// Number of steps whose request was sent.
    pub steps_run: usize,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall time of the run.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ScenarioReport {
    /// Creates an empty report for `scenario`, stamped now.
    #[must_use]
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            results: Vec::new(),
            fatal: None,
            steps_run: 0,
            started_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// Number of checks recorded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Number of checks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Failed checks, in order.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// True when every check passed and nothing aborted the run.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.fatal.is_none() && self.results.iter().all(|r| r.passed)
    }

    /// Share of checks that passed, between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.passed() as f64 / self.total() as f64
    }

    /// Converts the report into an error when anything went wrong.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Scenario`] if the run was aborted
    /// - [`ApplicationError::ChecksFailed`] if any check failed
    pub fn into_result(self) -> ApplicationResult<Self> {
        if let Some(fatal) = self.fatal {
            return Err(ApplicationError::Scenario(fatal));
        }
        let failed = self.failed();
        if failed > 0 {
            return Err(ApplicationError::ChecksFailed {
                scenario: self.scenario,
                failed,
                total: self.results.len(),
            });
        }
        Ok(self)
    }
}

#[allow(clippy::ref_option)]
fn serialize_fatal<S: Serializer>(
    fatal: &Option<ScenarioError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match fatal {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
