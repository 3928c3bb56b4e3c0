//! HTTP Request domain types

mod builder;
mod endpoint;
mod header;
mod method;
mod param;
pub mod template;

pub use builder::{RequestBuilder, RequestDescriptor, build};
pub use endpoint::Endpoint;
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use param::{ParamKind, Parameter};
