//! Attribute values and late-bound placeholders.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Regex for `${resource.attribute}` placeholders; the attribute follows the last dot.
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([^}\s]+)\.([A-Za-z0-9_]+)\}").expect("Invalid Regex")
    })
}

/// List the `(resource, attribute)` pairs a template refers to, in order.
pub fn placeholders(template: &str) -> Vec<(String, String)> {
    placeholder_regex()
        .captures_iter(template)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// Value of a resource attribute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Known at plan time.
    Literal(String),
    /// Output of another resource, known once that resource exists.
    Ref { resource: String, attribute: String },
    /// Text with `${resource.attribute}` placeholders, e.g. boot scripts.
    Template(String),
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Value {
        Value::Literal(text.into())
    }

    pub fn reference(resource: impl Into<String>, attribute: impl Into<String>) -> Value {
        Value::Ref {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Reference to another resource's `id` output.
    pub fn id_of(resource: impl Into<String>) -> Value {
        Value::reference(resource, "id")
    }

    pub fn template(text: impl Into<String>) -> Value {
        Value::Template(text.into())
    }

    /// Every `(resource, attribute)` this value needs before it can be resolved.
    pub fn references(&self) -> Vec<(String, String)> {
        match self {
            Value::Literal(_) => vec![],
            Value::Ref {
                resource,
                attribute,
            } => vec![(resource.clone(), attribute.clone())],
            Value::Template(text) => placeholders(text),
        }
    }
}
