//! Conversion between [`MonitorRecord`] and the API's [`Monitor`]

use super::record::MonitorRecord;
use crate::synthetics::{Monitor, MonitorOptions};

/// Build the domain object for a create call
///
/// Required attributes are copied as they are. Optional ones only make it into
/// the request when the record carries a value, so an unset `verify_ssl`
/// never overrides the service default with `false`. Locations go out in the
/// set's iteration order.
pub fn build_monitor(record: &MonitorRecord) -> Monitor {
    Monitor {
        id: None,
        name: record.name.clone(),
        monitor_type: record.monitor_type,
        frequency: record.frequency,
        uri: record.uri.clone(),
        locations: record.locations.iter().cloned().collect(),
        status: record.status,
        sla_threshold: record.sla_threshold,
        options: MonitorOptions {
            validation_string: record.validation_string.clone(),
            verify_ssl: record.verify_ssl,
            bypass_head_request: record.bypass_head_request,
            treat_redirect_as_failure: record.treat_redirect_as_failure,
        },
        user_id: None,
        api_version: None,
        created_at: None,
        modified_at: None,
    }
}

/// Build the domain object for an update call, carrying the existing id
pub fn build_update_monitor(id: &str, record: &MonitorRecord) -> Monitor {
    Monitor {
        id: Some(id.to_string()),
        ..build_monitor(record)
    }
}

/// Flatten a monitor returned by the service into a record with the given id
pub fn flatten_monitor(id: &str, monitor: Monitor) -> MonitorRecord {
    let Monitor {
        name,
        monitor_type,
        frequency,
        uri,
        locations,
        status,
        sla_threshold,
        options,
        ..
    } = monitor;

    MonitorRecord {
        id: Some(id.to_string()),
        monitor_type,
        name,
        frequency,
        uri: uri.filter(|uri| !uri.is_empty()),
        locations: locations.into_iter().collect(),
        status,
        sla_threshold,
        validation_string: options.validation_string,
        verify_ssl: options.verify_ssl,
        bypass_head_request: options.bypass_head_request,
        treat_redirect_as_failure: options.treat_redirect_as_failure,
    }
}
