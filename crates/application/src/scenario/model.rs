//! Scenario and step definitions

use std::collections::HashSet;

use restcheck_domain::{
    Assertion, DomainError, Endpoint, ParamKind, ScalarValue, StatusExpectation,
};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// Where a parameter's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    /// A fixed value.
    Literal(ScalarValue),
    /// A value bound by an earlier step.
    Variable(String),
}

/// A parameter whose value may be resolved at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepParam {
    /// Placeholder name (path) or query key.
    pub name: String,
    /// Path or query.
    pub kind: ParamKind,
    /// Value or variable reference.
    pub source: ParamSource,
}

/// Binds a variable to a field of a step's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Variable name for later steps.
    pub variable: String,
    /// Field path to extract.
    pub path: String,
}

/// One request in a scenario, with its checks and bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Name used in reports and logs.
    pub name: String,
    /// Request target.
    pub endpoint: Endpoint,
    /// Parameters, in declaration order.
    #[serde(default)]
    pub params: Vec<StepParam>,
    /// Checks run against the response, in order.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Values to extract after the checks.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl Step {
    /// Creates a step for `endpoint` with nothing attached.
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
            params: Vec::new(),
            assertions: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Creates a GET step.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Endpoint::get(path))
    }

    fn param(mut self, name: impl Into<String>, kind: ParamKind, source: ParamSource) -> Self {
        self.params.push(StepParam {
            name: name.into(),
            kind,
            source,
        });
        self
    }

    /// Adds a literal path parameter.
    #[must_use]
    pub fn path_param(self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.param(name, ParamKind::Path, ParamSource::Literal(value.into()))
    }

    /// Adds a path parameter taken from a bound variable.
    #[must_use]
    pub fn path_var(self, name: impl Into<String>, variable: impl Into<String>) -> Self {
        self.param(name, ParamKind::Path, ParamSource::Variable(variable.into()))
    }

    /// Adds a literal query parameter.
    #[must_use]
    pub fn query_param(self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.param(name, ParamKind::Query, ParamSource::Literal(value.into()))
    }

    /// Adds a query parameter taken from a bound variable.
    #[must_use]
    pub fn query_var(self, name: impl Into<String>, variable: impl Into<String>) -> Self {
        self.param(name, ParamKind::Query, ParamSource::Variable(variable.into()))
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.endpoint = self.endpoint.with_header(name, value);
        self
    }

    /// Appends a check.
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Appends a status check.
    #[must_use]
    pub fn expect_status(self, expected: impl Into<StatusExpectation>) -> Self {
        self.expect(Assertion::StatusCode {
            expected: expected.into(),
        })
    }

    /// Appends a field equality check.
    #[must_use]
    pub fn expect_field(self, path: impl Into<String>, expected: impl Into<ScalarValue>) -> Self {
        self.expect(Assertion::field(path, expected))
    }

    /// Extracts `path` into `variable` once the checks have run.
    #[must_use]
    pub fn bind(mut self, variable: impl Into<String>, path: impl Into<String>) -> Self {
        self.bindings.push(Binding {
            variable: variable.into(),
            path: path.into(),
        });
        self
    }
}

/// An ordered list of steps sharing one set of variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name used in reports and logs.
    pub name: String,
    /// Steps, run in order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of checks declared across all steps.
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.steps.iter().map(|s| s.assertions.len()).sum()
    }

    /// Finds the reference errors visible without sending anything: a
    /// variable that no earlier step binds, or a placeholder with no path
    /// parameter.
    ///
    /// A binding that is declared but fails to extract is only caught when
    /// the scenario runs.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Build`] for the first offending step.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut declared: HashSet<&str> = HashSet::new();

        for step in &self.steps {
            let reject = |source| ScenarioError::Build {
                step: step.name.clone(),
                source,
            };

            for param in &step.params {
                if let ParamSource::Variable(name) = &param.source
                    && !declared.contains(name.as_str())
                {
                    return Err(reject(DomainError::UnboundVariable(name.clone())));
                }
            }

            for placeholder in step.endpoint.placeholders() {
                let supplied = step
                    .params
                    .iter()
                    .any(|p| p.kind == ParamKind::Path && p.name == placeholder);
                if !supplied {
                    return Err(reject(DomainError::MissingParameter(placeholder)));
                }
            }

            declared.extend(step.bindings.iter().map(|b| b.variable.as_str()));
        }

        Ok(())
    }
}
