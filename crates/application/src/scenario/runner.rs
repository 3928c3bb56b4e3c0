//! Scenario runner
//!
//! Runs the steps of a scenario in order. Each step resolves its parameters
//! against the variables bound so far, builds and sends its request, runs its
//! checks, and binds new variables from the response.
//!
//! Failed checks and failed bindings are recorded and the run continues.
//! Build errors (missing parameter, unbound variable, bad URL) and transport
//! errors stop the scenario. References that can never resolve are rejected
//! before the first request goes out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use restcheck_domain::request::build;
use restcheck_domain::{
    AssertionResult, ClientConfig, RequestDescriptor, ResponseSpec, check_all, extract,
};
use tracing::Instrument;

use super::model::{Binding, Scenario, Step};
use super::report::ScenarioReport;
use super::variables::Variables;
use crate::error::ScenarioError;
use crate::ports::{Transport, TransportError};

/// Use case for running scenarios against a transport.
///
/// # Example
///
/// ```ignore
/// let runner = ScenarioRunner::new(Arc::new(ReqwestTransport::new(&config)?), config);
/// let report = runner.run(&scenario).await;
/// assert!(report.all_passed());
/// ```
pub struct ScenarioRunner<T: Transport> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T: Transport> ScenarioRunner<T> {
    /// Creates a runner sending through `transport` with `config`.
    pub const fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// The client configuration requests are built with.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs one scenario with a fresh set of variables.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let span = tracing::info_span!("scenario", name = %scenario.name);
        self.run_inner(scenario).instrument(span).await
    }

    async fn run_inner(&self, scenario: &Scenario) -> ScenarioReport {
        let started = Instant::now();
        let mut report = ScenarioReport::new(&scenario.name);
        let mut variables = Variables::new();

        if let Err(error) = scenario.validate() {
            tracing::warn!(step = error.step(), %error, "scenario rejected before sending");
            report.fatal = Some(error);
            return report;
        }

        for step in &scenario.steps {
            let span = tracing::debug_span!("step", name = %step.name);
            let outcome = self
                .run_step(step, &mut variables)
                .instrument(span)
                .await;

            match outcome {
                Ok(results) => {
                    report.steps_run += 1;
                    report.results.extend(results);
                }
                Err(error) => {
                    tracing::warn!(step = %step.name, %error, "scenario aborted");
                    report.fatal = Some(error);
                    break;
                }
            }
        }

        report.duration = started.elapsed();
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            aborted = report.fatal.is_some(),
            "scenario finished"
        );
        report
    }

    async fn run_step(
        &self,
        step: &Step,
        variables: &mut Variables,
    ) -> Result<Vec<AssertionResult>, ScenarioError> {
        let build_error = |source| ScenarioError::Build {
            step: step.name.clone(),
            source,
        };

        let params = variables.resolve(&step.params).map_err(build_error)?;
        let request = build(&self.config, &step.endpoint, &params).map_err(build_error)?;

        tracing::debug!(%request, "sending");
        let response = self.send(&request).await.map_err(|source| ScenarioError::Transport {
            step: step.name.clone(),
            request: Box::new(request.clone()),
            source,
        })?;
        tracing::debug!(
            status = response.status,
            body = %format!("{:#}", response.body),
            "received"
        );

        let mut results = check_all(&step.assertions, &response);
        for binding in &step.bindings {
            if let Some(failure) = bind(&response, binding, variables) {
                results.push(failure);
            }
        }

        Ok(results)
    }

    /// Sends through the transport, enforcing the request timeout even if
    /// the transport does not.
    async fn send(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseSpec, TransportError> {
        let timeout_ms = request.timeout_ms;
        tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.transport.send(request),
        )
        .await
        .map_err(|_| TransportError::Timeout { timeout_ms })?
    }

    /// Runs `build_scenario` once per row, each with fresh variables.
    pub async fn run_table<R, F>(&self, rows: &[R], build_scenario: F) -> Vec<ScenarioReport>
    where
        F: Fn(&R) -> Scenario,
    {
        let mut reports = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let scenario = build_scenario(row);
            tracing::debug!(row = index, scenario = %scenario.name, "running table row");
            reports.push(self.run(&scenario).await);
        }
        reports
    }

    /// Runs scenarios one after another.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(self.run(scenario).await);
        }
        reports
    }
}

/// Extracts one binding. A failed extraction leaves the variable unbound and
/// comes back as a failed result.
fn bind(
    response: &ResponseSpec,
    binding: &Binding,
    variables: &mut Variables,
) -> Option<AssertionResult> {
    match extract(response, &binding.path) {
        Ok(value) => {
            tracing::debug!(variable = %binding.variable, %value, "bound");
            variables.bind(binding.variable.clone(), value);
            None
        }
        Err(error) => Some(AssertionResult::fail(
            format!("Bind {} from {}", binding.variable, binding.path),
            error.to_string(),
        )),
    }
}
