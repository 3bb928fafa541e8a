//! Declarative attribute schemas for resources
//!
//! A [`ResourceSchema`] describes every orchestrator-visible attribute of a
//! resource: its type, whether it must be set, whether changing it forces a
//! new resource, its default and documentation. The same description drives
//! validation of raw JSON configuration before it is decoded into a typed
//! record.

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    StringSet,
}

impl AttributeType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int => value.is_i64() || value.is_u64(),
            AttributeType::Float => value.is_number(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::StringSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            AttributeType::String => "a string",
            AttributeType::Int => "an integer",
            AttributeType::Float => "a number",
            AttributeType::Bool => "a boolean",
            AttributeType::StringSet => "a list of strings",
        }
    }
}

/// Constraint checked after the type matches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum Validator {
    StringIn(&'static [&'static str]),
    IntIn(&'static [i64]),
    MinItems(usize),
    NotBlank,
}

impl Validator {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Validator::StringIn(allowed) => {
                let s = value.as_str().unwrap_or_default();
                if allowed.iter().any(|candidate| *candidate == s) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected one of [{}], got `{s}`",
                        allowed.join(", ")
                    ))
                }
            }
            Validator::IntIn(allowed) => match value.as_i64() {
                Some(n) if allowed.contains(&n) => Ok(()),
                _ => Err(format!(
                    "expected one of [{}], got {value}",
                    allowed
                        .iter()
                        .map(i64::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            },
            Validator::MinItems(min) => {
                let len = value.as_array().map(Vec::len).unwrap_or_default();
                if len >= *min {
                    Ok(())
                } else {
                    Err(format!("expected at least {min} item(s), got {len}"))
                }
            }
            Validator::NotBlank => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err("must not be empty".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Set by the service, never by configuration
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub presence: Presence,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            force_new: false,
            default: None,
            description: "",
            validators: Vec::new(),
        }
    }

    pub fn required(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Required)
    }

    pub fn optional(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Optional)
    }

    pub fn computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Computed)
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub version: u32,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            version: 0,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration document against this schema
    ///
    /// Returns one diagnostic per problem; an empty vector means the document
    /// can be decoded. `null` is treated the same as an absent attribute.
    pub fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let Some(object) = config.as_object() else {
            return vec![Diagnostic::error(format!(
                "{} configuration must be an object",
                self.type_name
            ))];
        };

        let mut diagnostics = Vec::new();

        for key in object.keys() {
            match self.attribute(key) {
                None => diagnostics.push(
                    Diagnostic::error("unsupported attribute").with_attribute(key),
                ),
                Some(attribute)
                    if attribute.presence == Presence::Computed && !object[key].is_null() =>
                {
                    diagnostics.push(
                        Diagnostic::error("attribute is computed and cannot be configured")
                            .with_attribute(key),
                    )
                }
                Some(_) => {}
            }
        }

        for attribute in &self.attributes {
            let value = object.get(attribute.name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if attribute.presence == Presence::Required {
                    diagnostics.push(
                        Diagnostic::error("missing required attribute")
                            .with_attribute(attribute.name),
                    );
                }
                continue;
            };

            if attribute.presence == Presence::Computed {
                continue;
            }

            if !attribute.kind.matches(value) {
                diagnostics.push(
                    Diagnostic::error(format!("expected {}", attribute.kind.describe()))
                        .with_attribute(attribute.name),
                );
                continue;
            }

            for validator in &attribute.validators {
                if let Err(message) = validator.check(value) {
                    diagnostics.push(Diagnostic::error(message).with_attribute(attribute.name));
                }
            }
        }

        diagnostics
    }
}
