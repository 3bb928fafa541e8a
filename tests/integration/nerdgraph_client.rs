//! Wire-level tests for the NerdGraph cloud integrations client

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use synthetics_provider::cloud::CloudApi;
use synthetics_provider::error::ApiError;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_link_gcp_account() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("API-Key", TEST_API_KEY))
        .and(body_string_contains("cloudLinkAccount"))
        .and(body_partial_json(json!({
            "variables": {
                "accountId": 1,
                "accounts": { "gcp": [{ "name": "gcp", "projectId": "project-a" }] }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "cloudLinkAccount": {
                    "linkedAccounts": [create_mock_linked_account_json(42, "gcp", "project-a")],
                    "errors": []
                }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let linked = client.link_gcp_account(1, "gcp", "project-a").await.unwrap();

    assert_eq!(linked.id, 42);
    assert_eq!(linked.external_id, "project-a");
}

#[tokio::test]
async fn test_mutation_errors_are_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "cloudLinkAccount": {
                    "linkedAccounts": [],
                    "errors": [{ "message": "project already linked" }]
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let result = client.link_gcp_account(1, "gcp", "project-a").await;

    assert_matches!(result, Err(ApiError::GraphQl(messages)) => {
        assert_eq!(messages, vec!["project already linked".to_string()]);
    });
}

#[tokio::test]
async fn test_top_level_errors_are_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Access denied" }, { "message": "Try again" }]
        })))
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let err = client.get_linked_account(1, 42).await.unwrap_err();

    assert_eq!(err.to_string(), "graphql errors: Access denied; Try again");
}

#[tokio::test]
async fn test_get_linked_account() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "accountId": 1, "id": 42 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "actor": {
                    "account": {
                        "cloud": {
                            "linkedAccount": create_mock_linked_account_json(42, "gcp", "project-a")
                        }
                    }
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let linked = client.get_linked_account(1, 42).await.unwrap();

    assert_eq!(linked.name, "gcp");
}

#[tokio::test]
async fn test_missing_linked_account_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "actor": { "account": { "cloud": { "linkedAccount": null } } } }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let result = client.get_linked_account(1, 42).await;

    assert_matches!(result, Err(ApiError::NotFound(id)) if id == "42");
}

#[tokio::test]
async fn test_rename_and_unlink() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("cloudRenameAccount"))
        .and(body_partial_json(json!({
            "variables": { "accounts": [{ "id": 42, "name": "renamed" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "cloudRenameAccount": {
                    "linkedAccounts": [create_mock_linked_account_json(42, "renamed", "project-a")],
                    "errors": []
                }
            }
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("cloudUnlinkAccount"))
        .and(body_partial_json(json!({
            "variables": { "accounts": [{ "linkedAccountId": 42 }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "cloudUnlinkAccount": {
                    "unlinkedAccounts": [{ "id": 42, "name": "renamed" }],
                    "errors": []
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);

    let renamed = client.rename_account(1, 42, "renamed").await.unwrap();
    assert_eq!(renamed.name, "renamed");

    client.unlink_account(1, 42).await.unwrap();
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key" })),
        )
        .mount(&mock_server)
        .await;

    let client = create_nerdgraph_client(&mock_server);
    let result = client.unlink_account(1, 42).await;

    assert_matches!(
        result,
        Err(ApiError::UnexpectedStatus { message, .. }) if message == "Invalid API key"
    );
}
