//! GCP link account resource
//!
//! Links a GCP project to a monitoring account. Only the display name can be
//! changed in place; a different project means a new link.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::{PlanAction, ResourceError, ResourceResult, cancellable, read_after_create};
use crate::cloud::{CloudApi, LinkedAccount};
use crate::diagnostics::Diagnostic;
use crate::schema::{Attribute, AttributeType, ResourceSchema, Validator};

pub const GCP_LINK_ACCOUNT_RESOURCE_TYPE: &str = "newrelic_gcp_link_account";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcpLinkAccountRecord {
    /// Linked account id assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owning account; the provider's account when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,

    pub name: String,

    pub project_id: String,
}

impl GcpLinkAccountRecord {
    pub fn new(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: None,
            account_id: None,
            name: name.into(),
            project_id: project_id.into(),
        }
    }

    pub fn from_config(config: Value) -> Result<Self, Vec<Diagnostic>> {
        let diagnostics = gcp_link_account_schema().validate_config(&config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Err(diagnostics);
        }
        serde_json::from_value(config).map_err(|e| vec![Diagnostic::error(e)])
    }
}

pub fn gcp_link_account_schema() -> ResourceSchema {
    ResourceSchema::new(GCP_LINK_ACCOUNT_RESOURCE_TYPE)
        .with_attribute(
            Attribute::computed("id", AttributeType::String)
                .description("The linked account id."),
        )
        .with_attribute(
            Attribute::optional("account_id", AttributeType::Int)
                .force_new()
                .description(
                    "The account to link the project to. Defaults to the provider account.",
                ),
        )
        .with_attribute(
            Attribute::required("name", AttributeType::String)
                .validator(Validator::NotBlank)
                .description("The name of the linked account."),
        )
        .with_attribute(
            Attribute::required("project_id", AttributeType::String)
                .force_new()
                .validator(Validator::NotBlank)
                .description("The GCP project id."),
        )
}

fn parse_id(id: &str) -> ResourceResult<i64> {
    id.parse().map_err(|_| {
        ResourceError::Invalid(vec![
            Diagnostic::error(format!("expected a numeric linked account id, got `{id}`"))
                .with_attribute("id"),
        ])
    })
}

fn check(record: &GcpLinkAccountRecord) -> ResourceResult<()> {
    let mut diagnostics = Vec::new();
    if record.name.trim().is_empty() {
        diagnostics.push(Diagnostic::error("must not be empty").with_attribute("name"));
    }
    if record.project_id.trim().is_empty() {
        diagnostics.push(Diagnostic::error("must not be empty").with_attribute("project_id"));
    }

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(ResourceError::Invalid(diagnostics))
    }
}

pub struct GcpLinkAccountResource<A: ?Sized> {
    api: Arc<A>,
    default_account_id: i64,
}

impl<A: ?Sized> Clone for GcpLinkAccountResource<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            default_account_id: self.default_account_id,
        }
    }
}

impl<A: CloudApi + ?Sized> GcpLinkAccountResource<A> {
    pub fn new(api: Arc<A>, default_account_id: i64) -> Self {
        Self {
            api,
            default_account_id,
        }
    }

    pub fn schema() -> ResourceSchema {
        gcp_link_account_schema()
    }

    fn account_id(&self, record: &GcpLinkAccountRecord) -> i64 {
        record.account_id.unwrap_or(self.default_account_id)
    }

    fn flatten(&self, account_id: i64, linked: LinkedAccount) -> GcpLinkAccountRecord {
        GcpLinkAccountRecord {
            id: Some(linked.id.to_string()),
            account_id: Some(account_id),
            name: linked.name,
            project_id: linked.external_id,
        }
    }

    pub fn plan(
        prior: Option<&GcpLinkAccountRecord>,
        desired: &GcpLinkAccountRecord,
    ) -> PlanAction {
        let Some(prior) = prior.filter(|p| p.id.is_some()) else {
            return PlanAction::Create;
        };

        let mut replace = Vec::new();
        if prior.project_id != desired.project_id {
            replace.push("project_id");
        }
        if desired.account_id.is_some() && desired.account_id != prior.account_id {
            replace.push("account_id");
        }
        if !replace.is_empty() {
            return PlanAction::Replace {
                attributes: replace,
            };
        }

        if prior.name != desired.name {
            PlanAction::Update {
                attributes: vec!["name"],
            }
        } else {
            PlanAction::NoOp
        }
    }

    #[instrument(skip_all, fields(project_id = %record.project_id))]
    pub async fn create(
        &self,
        record: &GcpLinkAccountRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<GcpLinkAccountRecord> {
        check(record)?;
        let account_id = self.account_id(record);

        info!("linking gcp project {} as {}", record.project_id, record.name);
        let linked = cancellable(
            cancel,
            self.api
                .link_gcp_account(account_id, &record.name, &record.project_id),
        )
        .await??;

        let id = linked.id.to_string();
        let created = GcpLinkAccountRecord {
            id: Some(id.clone()),
            account_id: Some(account_id),
            ..record.clone()
        };

        let read = self.read(&created, cancel).await;
        read_after_create("gcp link account", id, read)
    }

    /// `Ok(None)` when the link no longer exists
    #[instrument(skip_all, fields(id = ?record.id))]
    pub async fn read(
        &self,
        record: &GcpLinkAccountRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<Option<GcpLinkAccountRecord>> {
        let id = parse_id(record.id.as_deref().ok_or(ResourceError::MissingId)?)?;
        let account_id = self.account_id(record);

        info!("reading gcp link account {id}");
        match cancellable(cancel, self.api.get_linked_account(account_id, id)).await? {
            Ok(linked) => Ok(Some(self.flatten(account_id, linked))),
            Err(e) if e.is_not_found() => {
                info!("gcp link account {id} no longer exists");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename the link; other attributes need a replacement
    #[instrument(skip_all, fields(id = ?record.id))]
    pub async fn update(
        &self,
        record: &GcpLinkAccountRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<GcpLinkAccountRecord> {
        let raw_id = record.id.as_deref().ok_or(ResourceError::MissingId)?;
        let id = parse_id(raw_id)?;
        check(record)?;
        let account_id = self.account_id(record);

        info!("renaming gcp link account {id} to {}", record.name);
        cancellable(
            cancel,
            self.api.rename_account(account_id, id, &record.name),
        )
        .await??;

        self.read(record, cancel)
            .await?
            .ok_or_else(|| ResourceError::Vanished {
                kind: "gcp link account",
                id: raw_id.to_string(),
            })
    }

    #[instrument(skip_all, fields(id = ?record.id))]
    pub async fn delete(
        &self,
        record: &GcpLinkAccountRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<()> {
        let id = parse_id(record.id.as_deref().ok_or(ResourceError::MissingId)?)?;
        let account_id = self.account_id(record);

        info!("unlinking gcp link account {id}");
        cancellable(cancel, self.api.unlink_account(account_id, id)).await??;
        Ok(())
    }
}
