//! Client integration tests against a mock OFAC service.

use ofactest_client::{ClientError, ClientOptions, OfacClient, SearchOptions};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn ping_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("PONG"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    client.ping().await.unwrap();
}

#[tokio::test]
async fn ping_reports_status_on_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    let err = client.ping().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn api_error_body_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    let err = client.latest_downloads(1).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 500, ref message } if message == "db down"));
}

#[tokio::test]
async fn latest_downloads_sends_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"SDNs": 7379, "altNames": 9682, "addresses": 11784, "timestamp": "2024-03-01T12:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    let downloads = client.latest_downloads(1).await.unwrap();

    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].alt_names, 9682);
    assert!(downloads[0].refreshed_at().is_some());
}

#[tokio::test]
async fn malformed_body_is_a_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    let err = client.latest_downloads(1).await.unwrap_err();

    assert!(matches!(err, ClientError::Serialization(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn search_sends_name_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Nicolas Maduro"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "SDNs": [{"entityID": "22790", "sdnName": "MADURO MOROS, Nicolas", "sdnType": "individual", "programs": ["VENEZUELA"], "match": 0.97}],
            "altNames": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OfacClient::new(server.uri()).unwrap();
    let results = client
        .search(&SearchOptions::new("Nicolas Maduro", 5))
        .await
        .unwrap();

    assert_eq!(results.top_candidate(), Some(("22790", 0.97)));
    assert_eq!(results.sdns[0].programs, vec!["VENEZUELA".to_string()]);
}

#[tokio::test]
async fn bearer_token_and_user_agent_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ofac/ping"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("user-agent", "ofactest-suite"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions {
        user_agent: "ofactest-suite".to_string(),
        ..ClientOptions::with_bearer_token("secret-token")
    };
    let client = OfacClient::with_options(format!("{}/v1/ofac/", server.uri()), options).unwrap();

    client.ping().await.unwrap();
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = OfacClient::new(format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.ping().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}
