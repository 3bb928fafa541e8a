//! NerdGraph (GraphQL) client for the cloud integrations API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, trace};
use url::Url;

use super::{CloudApi, LinkedAccount};
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, parse_base_url, status_error};

const API_KEY_HEADER: &str = "API-Key";

const LINK_ACCOUNT: &str = r#"
mutation($accountId: Int!, $accounts: CloudLinkCloudAccountsInput!) {
  cloudLinkAccount(accountId: $accountId, accounts: $accounts) {
    linkedAccounts { id name externalId nrAccountId }
    errors { message }
  }
}"#;

const GET_LINKED_ACCOUNT: &str = r#"
query($accountId: Int!, $id: Int!) {
  actor {
    account(id: $accountId) {
      cloud {
        linkedAccount(id: $id) { id name externalId nrAccountId }
      }
    }
  }
}"#;

const RENAME_ACCOUNT: &str = r#"
mutation($accountId: Int!, $accounts: [CloudRenameAccountsInput!]!) {
  cloudRenameAccount(accountId: $accountId, accounts: $accounts) {
    linkedAccounts { id name externalId nrAccountId }
    errors { message }
  }
}"#;

const UNLINK_ACCOUNT: &str = r#"
mutation($accountId: Int!, $accounts: [CloudUnlinkAccountsInput!]!) {
  cloudUnlinkAccount(accountId: $accountId, accounts: $accounts) {
    unlinkedAccounts { id name }
    errors { message }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

fn check_errors(errors: Vec<GraphQlError>) -> ApiResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::GraphQl(
            errors.into_iter().map(|e| e.message).collect(),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkData {
    cloud_link_account: LinkedAccountsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameData {
    cloud_rename_account: LinkedAccountsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedAccountsPayload {
    #[serde(default)]
    linked_accounts: Vec<LinkedAccount>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnlinkData {
    cloud_unlink_account: UnlinkPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnlinkPayload {
    #[serde(default)]
    unlinked_accounts: Vec<UnlinkedAccount>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct UnlinkedAccount {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ActorData {
    actor: Actor,
}

#[derive(Debug, Deserialize)]
struct Actor {
    account: Option<AccountCloud>,
}

#[derive(Debug, Deserialize)]
struct AccountCloud {
    cloud: Option<Cloud>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cloud {
    linked_account: Option<LinkedAccount>,
}

/// Cloud integrations client speaking GraphQL to NerdGraph
#[derive(Debug, Clone)]
pub struct NerdGraphClient {
    client: Client,
    url: Url,
}

impl NerdGraphClient {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            client: build_client(API_KEY_HEADER, api_key, timeout)?,
            url: parse_base_url(url)?,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> ApiResult<T> {
        trace!("POST {} variables={variables}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        let response: GraphQlResponse<T> = serde_json::from_str(&body)?;
        check_errors(response.errors)?;

        response
            .data
            .ok_or_else(|| ApiError::GraphQl(vec!["response contained no data".to_string()]))
    }
}

#[async_trait]
impl CloudApi for NerdGraphClient {
    #[instrument(skip(self))]
    async fn link_gcp_account(
        &self,
        account_id: i64,
        name: &str,
        project_id: &str,
    ) -> ApiResult<LinkedAccount> {
        let variables = json!({
            "accountId": account_id,
            "accounts": { "gcp": [{ "name": name, "projectId": project_id }] }
        });

        let data: LinkData = self.execute(LINK_ACCOUNT, variables).await?;
        check_errors(data.cloud_link_account.errors)?;

        let linked = data
            .cloud_link_account
            .linked_accounts
            .into_iter()
            .next()
            .ok_or(ApiError::MissingId)?;
        debug!("linked gcp project {project_id} as account {}", linked.id);

        Ok(linked)
    }

    #[instrument(skip(self))]
    async fn get_linked_account(&self, account_id: i64, id: i64) -> ApiResult<LinkedAccount> {
        let variables = json!({ "accountId": account_id, "id": id });

        let data: ActorData = self.execute(GET_LINKED_ACCOUNT, variables).await?;
        data.actor
            .account
            .and_then(|account| account.cloud)
            .and_then(|cloud| cloud.linked_account)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    async fn rename_account(
        &self,
        account_id: i64,
        id: i64,
        name: &str,
    ) -> ApiResult<LinkedAccount> {
        let variables = json!({
            "accountId": account_id,
            "accounts": [{ "id": id, "name": name }]
        });

        let data: RenameData = self.execute(RENAME_ACCOUNT, variables).await?;
        check_errors(data.cloud_rename_account.errors)?;

        data.cloud_rename_account
            .linked_accounts
            .into_iter()
            .find(|account| account.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    async fn unlink_account(&self, account_id: i64, id: i64) -> ApiResult<()> {
        let variables = json!({
            "accountId": account_id,
            "accounts": [{ "linkedAccountId": id }]
        });

        let data: UnlinkData = self.execute(UNLINK_ACCOUNT, variables).await?;
        check_errors(data.cloud_unlink_account.errors)?;

        if data
            .cloud_unlink_account
            .unlinked_accounts
            .iter()
            .any(|account| account.id == id)
        {
            Ok(())
        } else {
            Err(ApiError::NotFound(id.to_string()))
        }
    }
}
