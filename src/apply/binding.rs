//! Late binding of attribute values.
//!
//! Turns a declared [`Resource`] into a [`ResolvedResource`] by reading the
//! outputs of resources created earlier in the same apply.

use super::State;
use crate::error::PlanError;
use crate::graph::{placeholder_regex, Resource, ResourceKind, Value};
use regex::Captures;
use std::collections::BTreeMap;

/// A resource whose attributes are all plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub name: String,
    pub kind: ResourceKind,
    pub attributes: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

impl ResolvedResource {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute that the provisioner cannot do without.
    pub fn require(&self, key: &str) -> Result<&str, String> {
        self.attribute(key)
            .ok_or_else(|| format!("{} {} has no {key}", self.kind, self.name))
    }
}

/// Resolve every attribute of `resource` against `state`.
pub fn resolve(resource: &Resource, state: &State) -> Result<ResolvedResource, PlanError> {
    let attributes = resource
        .attributes
        .iter()
        .map(|(key, value)| {
            resolve_value(&resource.name, value, state).map(|text| (key.clone(), text))
        })
        .collect::<Result<BTreeMap<_, _>, PlanError>>()?;

    Ok(ResolvedResource {
        name: resource.name.clone(),
        kind: resource.kind,
        attributes,
        tags: resource.tags.clone(),
    })
}

fn resolve_value(consumer: &str, value: &Value, state: &State) -> Result<String, PlanError> {
    // Check every reference first so the error names the missing one.
    for (resource, attribute) in value.references() {
        if state.output(&resource, &attribute).is_none() {
            return Err(PlanError::UnresolvedReference {
                consumer: consumer.to_string(),
                resource,
                attribute,
            });
        }
    }

    let text = match value {
        Value::Literal(text) => text.clone(),
        Value::Ref {
            resource,
            attribute,
        } => state
            .output(resource, attribute)
            .unwrap_or_default()
            .to_string(),
        Value::Template(text) => placeholder_regex()
            .replace_all(text, |caps: &Captures| {
                state.output(&caps[1], &caps[2]).unwrap_or_default().to_string()
            })
            .into_owned(),
    };
    Ok(text)
}
