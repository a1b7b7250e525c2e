//! The smoke cases.

use std::sync::Arc;

use hello_application::ports::{Clock, HttpClient};
use hello_application::{ApplicationResult, Harness, TestContext};
use hello_domain::{CaseOptions, HttpExchange};
use hello_infrastructure::RequestTest;

/// Name of the arithmetic sanity case.
pub const EXAMPLE_TEST: &str = "example test";

/// Name of the HTTP smoke case.
pub const SERVER_TEST: &str = "server test";

/// Time the HTTP smoke case has to signal completion.
pub const SERVER_TEST_TIMEOUT_MS: u64 = 500;

/// `1 + 1` should be `2`.
pub async fn example_test(t: TestContext) {
    t.equal(1 + 1, 2, "should be 2");
    t.end();
}

/// `GET /` should answer `200 Hello, world!`.
pub async fn server_test(agent: RequestTest, t: TestContext) {
    let res = agent.get("/").expect_status(200).end().await;

    t.error(res.as_ref().err(), "");
    let text = match &res {
        Ok(exchange) => exchange.text(),
        Err(err) => err.exchange().map(HttpExchange::text).unwrap_or_default(),
    };
    t.equals(text, "Hello, world!", "");
    t.end();
}

/// Builds the harness with both cases, targeting the application behind
/// `client`.
///
/// # Errors
///
/// Fails only if case names collide.
pub fn smoke_suite(
    client: impl HttpClient + 'static,
    clock: Arc<dyn Clock>,
) -> ApplicationResult<Harness> {
    let agent = RequestTest::new(client);
    let mut harness = Harness::new(clock);
    harness
        .case(EXAMPLE_TEST, CaseOptions::default(), example_test)?
        .case(
            SERVER_TEST,
            CaseOptions::timeout_ms(SERVER_TEST_TIMEOUT_MS),
            move |t| server_test(agent.clone(), t),
        )?;
    Ok(harness)
}
