//! Scenarios: ordered steps that share variables

mod model;
mod report;
mod runner;
mod variables;

pub use model::{Binding, ParamSource, Scenario, Step, StepParam};
pub use report::ScenarioReport;
pub use runner::ScenarioRunner;
pub use variables::Variables;
