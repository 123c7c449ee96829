//! HTTP request domain types

mod method;
mod query;
mod spec;

pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::{ApiRequest, DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT};
