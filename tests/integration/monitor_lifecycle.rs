//! Integration tests for the monitor resource lifecycle
//!
//! These tests drive the adapter against the in-memory backend:
//! - Create, read back, update, delete
//! - Every monitor type and every allowed frequency
//! - Optional HTTP options left unset versus explicitly false

use pretty_assertions::assert_eq;
use synthetics_provider::resource::monitor::VALID_FREQUENCIES;
use synthetics_provider::resource::{MonitorRecord, PlanAction, SyntheticsMonitorResource};
use synthetics_provider::synthetics::memory::RecordedCall;
use synthetics_provider::synthetics::{MemorySynthetics, MonitorStatus, MonitorType};
use tokio_util::sync::CancellationToken;

use crate::helpers::*;

#[tokio::test]
async fn test_create_then_read_matches_desired() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let current = resource
        .create(&create_test_record(), &cancel)
        .await
        .unwrap();

    let id = current.id.clone().expect("create should assign an id");
    assert!(!id.is_empty());

    let read = resource.read(&id, &cancel).await.unwrap().unwrap();
    assert_eq!(read, current);
    assert_eq!(read.name, "check-1");
    assert_eq!(read.frequency, 5);
    assert_eq!(read.uri.as_deref(), Some("https://example.com"));
    assert_eq!(read.locations.iter().collect::<Vec<_>>(), vec!["US_EAST"]);
    assert_eq!(read.status, MonitorStatus::Enabled);
    assert_eq!(read.sla_threshold, 7.0);

    assert_eq!(backend.len().await, 1);
}

#[tokio::test]
async fn test_update_status_keeps_everything_else() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let created = resource
        .create(&create_test_record(), &cancel)
        .await
        .unwrap();

    let desired = MonitorRecord {
        status: MonitorStatus::Muted,
        ..created.clone()
    };
    assert_eq!(
        SyntheticsMonitorResource::<MemorySynthetics>::plan(Some(&created), &desired),
        PlanAction::Update {
            attributes: vec!["status"]
        }
    );

    let updated = resource.update(&desired, &cancel).await.unwrap();

    assert_eq!(updated.status, MonitorStatus::Muted);
    assert_eq!(
        MonitorRecord {
            status: MonitorStatus::Enabled,
            ..updated.clone()
        },
        created
    );

    // the update request carried the existing id
    let update_ids: Vec<_> = backend
        .calls()
        .await
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::Update(monitor) => monitor.id,
            _ => None,
        })
        .collect();
    assert_eq!(update_ids, vec![created.id.clone().unwrap()]);
    assert_eq!(backend.len().await, 1);
}

#[tokio::test]
async fn test_delete_then_read_is_absent() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let created = resource
        .create(&create_test_record(), &cancel)
        .await
        .unwrap();
    let id = created.id.unwrap();

    resource.delete(&id, &cancel).await.unwrap();

    assert_eq!(resource.read(&id, &cancel).await.unwrap(), None);
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_import_adopts_existing_monitor() {
    let (resource, _backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let created = resource
        .create(&create_test_record(), &cancel)
        .await
        .unwrap();
    let id = created.id.clone().unwrap();

    let imported = resource.import(&id, &cancel).await.unwrap();
    assert_eq!(imported, Some(created));

    assert_eq!(resource.import("no-such-id", &cancel).await.unwrap(), None);
}

#[tokio::test]
async fn test_every_monitor_type_round_trips() {
    let (resource, _backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    for monitor_type in MonitorType::ALL {
        let desired = create_test_record_with(monitor_type, 15, &["US_EAST", "EU_WEST"]);
        let current = resource.create(&desired, &cancel).await.unwrap();

        assert_eq!(current.monitor_type, monitor_type);
        assert_eq!(
            MonitorRecord {
                id: None,
                ..current
            },
            desired,
            "{monitor_type} did not round-trip"
        );
    }
}

#[tokio::test]
async fn test_every_allowed_frequency_round_trips() {
    let (resource, _backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    for frequency in VALID_FREQUENCIES {
        let desired = create_test_record_with(MonitorType::Simple, frequency, &["US_EAST"]);
        let current = resource.create(&desired, &cancel).await.unwrap();
        assert_eq!(current.frequency, frequency);
    }
}

#[tokio::test]
async fn test_unset_verify_ssl_stays_unset() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let current = resource
        .create(&create_test_record(), &cancel)
        .await
        .unwrap();
    assert_eq!(current.verify_ssl, None);

    let sent = backend.stored(current.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(sent.options.verify_ssl, None);
}

#[tokio::test]
async fn test_explicit_false_verify_ssl_is_kept() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let desired = MonitorRecord {
        verify_ssl: Some(false),
        treat_redirect_as_failure: Some(true),
        validation_string: Some("Welcome".into()),
        ..create_test_record()
    };
    let current = resource.create(&desired, &cancel).await.unwrap();

    assert_eq!(current.verify_ssl, Some(false));
    assert_eq!(current.treat_redirect_as_failure, Some(true));
    assert_eq!(current.validation_string.as_deref(), Some("Welcome"));
    assert_eq!(current.bypass_head_request, None);

    let sent = backend.stored(current.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(sent.options.verify_ssl, Some(false));
}

#[tokio::test]
async fn test_locations_are_sent_in_set_order() {
    let (resource, backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let desired =
        create_test_record_with(MonitorType::Simple, 5, &["US_WEST", "AP_SOUTH", "EU_WEST"]);
    let current = resource.create(&desired, &cancel).await.unwrap();

    let sent = backend.stored(current.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(sent.locations, vec!["AP_SOUTH", "EU_WEST", "US_WEST"]);
}

#[tokio::test]
async fn test_missing_uri_on_simple_monitor_is_only_a_warning() {
    let (resource, _backend) = create_memory_resource();
    let cancel = CancellationToken::new();

    let desired = MonitorRecord {
        uri: None,
        ..create_test_record()
    };
    let diagnostics = desired.validate();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| !d.is_error()));

    let current = resource.create(&desired, &cancel).await.unwrap();
    assert_eq!(current.uri, None);
}
