//! Request types for simulated HTTP exchanges.

mod method;
mod spec;

pub use method::HttpMethod;
pub use spec::{Header, RequestSpec};
