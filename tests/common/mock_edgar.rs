//! wiremock stand-in for www.sec.gov and data.sec.gov

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures;

pub const TICKERS_PATH: &str = "/files/company_tickers.json";
pub const EXCHANGE_PATH: &str = "/files/company_tickers_exchange.json";
pub const MUTUAL_FUNDS_PATH: &str = "/files/company_tickers_mf.json";
pub const CIK_LOOKUP_PATH: &str = "/Archives/edgar/cik-lookup-data.txt";
pub const APPLE_FACTS_PATH: &str = "/api/xbrl/companyfacts/CIK0000320193.json";
pub const APPLE_SUBMISSIONS_PATH: &str = "/submissions/CIK0000320193.json";

/// Serve `body` as JSON, only to clients sending the test user agent
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("user-agent", fixtures::TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Server answering every request a download of Apple makes
pub async fn edgar_server() -> MockServer {
    let server = MockServer::start().await;
    mount_json(&server, TICKERS_PATH, fixtures::company_tickers_json()).await;
    mount_json(&server, APPLE_FACTS_PATH, fixtures::company_facts_json()).await;
    mount_json(&server, APPLE_SUBMISSIONS_PATH, fixtures::submissions_json()).await;
    server
}
