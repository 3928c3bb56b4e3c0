//! Application error types

use restcheck_domain::{DomainError, RequestDescriptor};
use thiserror::Error;

use crate::ports::TransportError;

/// A failure that stops a scenario before its remaining steps run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScenarioError {
    /// The step's request could not be built: a missing or duplicate
    /// parameter, an unbound variable or an invalid URL.
    #[error("step '{step}': {source}")]
    Build {
        /// Name of the failing step.
        step: String,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// The request was built but could not be exchanged.
    #[error("step '{step}': {request} failed: {source}")]
    Transport {
        /// Name of the failing step.
        step: String,
        /// The request that was being sent.
        request: Box<RequestDescriptor>,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
}

impl ScenarioError {
    /// Name of the step that failed.
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::Build { step, .. } | Self::Transport { step, .. } => step,
        }
    }
}

/// Why a finished scenario counts as failed.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A scenario was aborted.
    #[error("scenario aborted: {0}")]
    Scenario(#[from] ScenarioError),

    /// A scenario ran to completion but some checks failed.
    #[error("scenario '{scenario}': {failed} of {total} checks failed")]
    ChecksFailed {
        /// Scenario name.
        scenario: String,
        /// Number of failed checks.
        failed: usize,
        /// Number of checks run.
        total: usize,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
