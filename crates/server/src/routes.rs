//! HTTP routes.

use axum::Router;
use axum::routing::get;

/// Body of `GET /`.
pub const GREETING: &str = "Hello, world!";

pub(crate) fn router() -> Router {
    Router::new().route("/", get(hello))
}

async fn hello() -> &'static str {
    GREETING
}
