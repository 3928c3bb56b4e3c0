//! Restcheck Application - Ports and use cases
//!
//! This crate runs scenarios: it resolves step parameters, builds requests,
//! sends them through a [`ports::Transport`] and collects check results.
//! It depends only on the domain layer.

pub mod error;
pub mod ports;
pub mod scenario;

pub use error::{ApplicationError, ApplicationResult, ScenarioError};
pub use ports::{Transport, TransportError};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, Step};
