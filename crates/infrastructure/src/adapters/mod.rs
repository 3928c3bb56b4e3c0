//! Transport adapters

mod reqwest_transport;
mod stub_transport;

pub use reqwest_transport::ReqwestTransport;
pub use stub_transport::StubTransport;
