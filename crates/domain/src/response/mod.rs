//! Response side of a simulated HTTP exchange.

mod exchange;

pub use exchange::HttpExchange;
