//! Common test utilities for ofactest integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use chrono::{Duration, Utc};
use ofactest_client::OfacClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock OFAC service plus a client pointed at it.
pub struct MockOfac {
    /// The mock server.
    pub server: MockServer,
    /// Client for the mock server.
    pub client: OfacClient,
}

impl MockOfac {
    /// Start an empty mock service.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = OfacClient::new(server.uri()).expect("Failed to build client");
        Self { server, client }
    }

    /// Answer `/ping` with `status`.
    pub async fn ping(&self, status: u16) -> &Self {
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(status).set_body_string("PONG"))
            .mount(&self.server)
            .await;
        self
    }

    /// Answer `/downloads?limit=1` with `body`.
    pub async fn downloads(&self, body: Value) -> &Self {
        Mock::given(method("GET"))
            .and(path("/downloads"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
        self
    }

    /// Answer `/search?name=<name>` with `body`.
    pub async fn search(&self, name: &str, body: Value) -> &Self {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
        self
    }

    /// Number of requests received for `request_path`.
    pub async fn hits(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }
}

/// Download list whose only record is `hours_ago` old.
pub fn downloads_from(hours_ago: i64) -> Value {
    let timestamp = Utc::now() - Duration::hours(hours_ago);
    json!([{
        "SDNs": 7379,
        "altNames": 9682,
        "addresses": 11784,
        "deniedPersons": 548,
        "timestamp": timestamp.to_rfc3339(),
    }])
}

/// Search response whose only SDN is `entity_id` scoring `score`.
pub fn sdn_hit(entity_id: &str, score: f64) -> Value {
    json!({
        "SDNs": [{
            "entityID": entity_id,
            "sdnName": "TEST ENTRY",
            "sdnType": "individual",
            "programs": ["SDGT"],
            "match": score,
        }],
        "altNames": [],
    })
}
