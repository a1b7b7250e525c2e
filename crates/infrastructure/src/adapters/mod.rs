//! Adapters implementing the application ports.

mod reqwest_client;
mod router_client;
mod system_clock;

pub use reqwest_client::ReqwestHttpClient;
pub use router_client::RouterClient;
pub use system_clock::SystemClock;
