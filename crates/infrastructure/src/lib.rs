//! Restcheck Infrastructure - Adapters and implementations
//!
//! Concrete implementations of the ports defined in the application layer,
//! plus config file loading.

pub mod adapters;
pub mod config;

pub use adapters::{ReqwestTransport, StubTransport};
pub use config::{ConfigError, ConfigFormat, load_config, parse_config};
