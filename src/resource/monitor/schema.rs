use crate::schema::{Attribute, AttributeType, ResourceSchema, Validator};

pub const MONITOR_RESOURCE_TYPE: &str = "newrelic_synthetics_monitor";

const MONITOR_TYPES: &[&str] = &["SIMPLE", "BROWSER", "SCRIPT_API", "SCRIPT_BROWSER", "CERT_CHECK"];
const MONITOR_STATUSES: &[&str] = &["ENABLED", "MUTED", "DISABLED"];
const FREQUENCIES: &[i64] = &[1, 5, 10, 15, 30, 60, 360, 720, 1440];

pub fn monitor_schema() -> ResourceSchema {
    ResourceSchema::new(MONITOR_RESOURCE_TYPE)
        .with_attribute(
            Attribute::computed("id", AttributeType::String)
                .description("The monitor id assigned by the service."),
        )
        .with_attribute(
            Attribute::required("type", AttributeType::String)
                .force_new()
                .validator(Validator::StringIn(MONITOR_TYPES))
                .description(
                    "The monitor type. Valid values are SIMPLE, BROWSER, SCRIPT_API, \
                     SCRIPT_BROWSER and CERT_CHECK.",
                ),
        )
        .with_attribute(
            Attribute::required("name", AttributeType::String)
                .validator(Validator::NotBlank)
                .description("The title of this monitor."),
        )
        .with_attribute(
            Attribute::required("frequency", AttributeType::Int)
                .validator(Validator::IntIn(FREQUENCIES))
                .description(
                    "The interval (in minutes) at which this monitor should run. Valid values \
                     are 1, 5, 10, 15, 30, 60, 360, 720, or 1440.",
                ),
        )
        .with_attribute(
            Attribute::optional("uri", AttributeType::String)
                .description("The URI for the monitor to hit."),
        )
        .with_attribute(
            Attribute::required("locations", AttributeType::StringSet)
                .validator(Validator::MinItems(1))
                .description("The locations in which this monitor should be run."),
        )
        .with_attribute(
            Attribute::required("status", AttributeType::String)
                .validator(Validator::StringIn(MONITOR_STATUSES))
                .description("The monitor status (i.e. ENABLED, MUTED, DISABLED)."),
        )
        .with_attribute(
            Attribute::optional("sla_threshold", AttributeType::Float)
                .default_value(super::record::DEFAULT_SLA_THRESHOLD)
                .description(
                    "The base threshold (in seconds) to calculate the apdex score for use in \
                     the SLA report. (Default 7 seconds)",
                ),
        )
        .with_attribute(
            Attribute::optional("validation_string", AttributeType::String)
                .description("The string to validate against in the response."),
        )
        .with_attribute(
            Attribute::optional("verify_ssl", AttributeType::Bool).description("Verify SSL."),
        )
        .with_attribute(
            Attribute::optional("bypass_head_request", AttributeType::Bool)
                .description("Bypass HEAD request."),
        )
        .with_attribute(
            Attribute::optional("treat_redirect_as_failure", AttributeType::Bool)
                .description("Fail the monitor check if redirected."),
        )
}
