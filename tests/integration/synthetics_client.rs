//! Wire-level tests for the Synthetics REST client
//!
//! These tests verify the requests the client sends and how it maps the
//! service's answers:
//! - Location header on create
//! - 404 on read and delete
//! - Error bodies in both shapes the service uses

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};
use synthetics_provider::error::ApiError;
use synthetics_provider::resource::SyntheticsMonitorResource;
use synthetics_provider::resource::monitor::build_monitor;
use synthetics_provider::synthetics::{MonitorStatus, SyntheticsApi};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

async fn last_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests.last().expect("no request received");
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test]
async fn test_create_takes_id_from_location_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .and(header("Api-Key", TEST_API_KEY))
        .and(body_partial_json(json!({
            "name": "check-1",
            "type": "SIMPLE",
            "frequency": 5,
            "locations": ["US_EAST"],
            "status": "ENABLED",
            "slaThreshold": 7.0
        })))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}/v3/monitors/abc-123", mock_server.uri()).as_str(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    let created = client
        .create_monitor(build_monitor(&create_test_record()))
        .await
        .unwrap();

    assert_eq!(created.id.as_deref(), Some("abc-123"));
}

#[tokio::test]
async fn test_create_without_location_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    let result = client
        .create_monitor(build_monitor(&create_test_record()))
        .await;

    assert_matches!(result, Err(ApiError::MissingId));
}

#[tokio::test]
async fn test_unset_options_are_not_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/v3/monitors/a"))
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    client
        .create_monitor(build_monitor(&create_test_record()))
        .await
        .unwrap();

    let body = last_request_body(&mock_server).await;
    assert!(body.get("options").is_none(), "unexpected options: {body}");
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_explicit_false_option_is_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/v3/monitors/a"))
        .mount(&mock_server)
        .await;

    let mut record = create_test_record();
    record.verify_ssl = Some(false);

    let client = create_synthetics_client(&mock_server);
    client.create_monitor(build_monitor(&record)).await.unwrap();

    let body = last_request_body(&mock_server).await;
    assert_eq!(body["options"], json!({ "verifySSL": false }));
}

#[tokio::test]
async fn test_get_decodes_monitor() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/monitors/abc-123"))
        .and(header("Api-Key", TEST_API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(create_mock_monitor_json("abc-123", "MUTED")),
        )
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    let monitor = client.get_monitor("abc-123").await.unwrap();

    assert_eq!(monitor.id.as_deref(), Some("abc-123"));
    assert_eq!(monitor.status, MonitorStatus::Muted);
    assert_eq!(monitor.api_version.as_deref(), Some("0.6.0"));
    assert!(monitor.options.is_empty());
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/monitors/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    let result = client.get_monitor("missing").await;

    assert_matches!(result, Err(ApiError::NotFound(id)) if id == "missing");
}

#[tokio::test]
async fn test_error_body_is_propagated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "errors": [{ "error": "Invalid frequency" }] })),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/monitors/abc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);

    let result = client
        .create_monitor(build_monitor(&create_test_record()))
        .await;
    assert_matches!(
        result,
        Err(ApiError::UnexpectedStatus { status: StatusCode::BAD_REQUEST, message })
            if message == "Invalid frequency"
    );

    let result = client.get_monitor("abc").await;
    assert_matches!(
        result,
        Err(ApiError::UnexpectedStatus { status: StatusCode::INTERNAL_SERVER_ERROR, message })
            if message == "upstream exploded"
    );
}

#[tokio::test]
async fn test_update_puts_full_monitor() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v3/monitors/abc-123"))
        .and(body_partial_json(json!({
            "id": "abc-123",
            "name": "check-1",
            "status": "MUTED"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut monitor = build_monitor(&create_test_record());
    monitor.id = Some("abc-123".into());
    monitor.status = MonitorStatus::Muted;

    let client = create_synthetics_client(&mock_server);
    let updated = client.update_monitor(monitor).await.unwrap();

    assert_eq!(updated.status, MonitorStatus::Muted);
}

#[tokio::test]
async fn test_update_without_id_sends_nothing() {
    let mock_server = MockServer::start().await;

    let client = create_synthetics_client(&mock_server);
    let result = client
        .update_monitor(build_monitor(&create_test_record()))
        .await;

    assert_matches!(result, Err(ApiError::MissingId));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v3/monitors/abc-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v3/monitors/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_synthetics_client(&mock_server);
    client.delete_monitor("abc-123").await.unwrap();

    assert_matches!(
        client.delete_monitor("gone").await,
        Err(ApiError::NotFound(_))
    );
}

#[tokio::test]
async fn test_resource_create_reads_back_through_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/monitors"))
        .respond_with(
            ResponseTemplate::new(201).insert_header("Location", "/v3/monitors/abc-123"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/monitors/abc-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(create_mock_monitor_json("abc-123", "ENABLED")),
        )
        .mount(&mock_server)
        .await;

    let resource =
        SyntheticsMonitorResource::new(std::sync::Arc::new(create_synthetics_client(&mock_server)));
    let current = resource
        .create(&create_test_record(), &CancellationToken::new())
        .await
        .unwrap();

    let mut expected = create_test_record();
    expected.id = Some("abc-123".into());
    assert_eq!(current, expected);
}
