//! restcheck - REST API checks against reqres.in
//!
//! Library half of the `restcheck` binary: the check suite, recorded
//! fixtures for offline runs, command line options and report output.

pub mod cli;
pub mod fixtures;
pub mod render;
pub mod suite;

pub use cli::Cli;
pub use suite::run_suite;
