//! Port definitions (interfaces)
//!
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod transport;

pub use transport::{Transport, TransportError};
