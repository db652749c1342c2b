//! Declared resources and the graph that orders them.

use super::Value;
use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Kinds of AWS resources the planner declares.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    InternetGateway,
    Subnet,
    RouteTable,
    RouteTableAssociation,
}

impl ResourceKind {
    /// Prefix AWS uses for identifiers of this kind.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::InternetGateway => "igw",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTable => "rtb",
            ResourceKind::RouteTableAssociation => "rtbassoc",
        }
    }

    /// `ResourceType` used in EC2 tag specifications, if the kind can be tagged.
    pub fn tag_resource_type(self) -> Option<&'static str> {
        match self {
            ResourceKind::Vpc => Some("vpc"),
            ResourceKind::InternetGateway => Some("internet-gateway"),
            ResourceKind::Subnet => Some("subnet"),
            ResourceKind::RouteTable => Some("route-table"),
            ResourceKind::RouteTableAssociation => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::InternetGateway => "internet_gateway",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTable => "route_table",
            ResourceKind::RouteTableAssociation => "route_table_association",
        };
        write!(f, "{name}")
    }
}

/// One declared resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    pub attributes: BTreeMap<String, Value>,
    pub tags: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Resource {
        Resource {
            name: name.into(),
            kind,
            attributes: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Resource {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Resource {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Names of the resources this one depends on, without duplicates, in attribute order.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for value in self.attributes.values() {
            for (resource, _) in value.references() {
                if !deps.contains(&resource) {
                    deps.push(resource);
                }
            }
        }
        deps
    }
}

/// Resources in declaration order.
///
/// Every reference points at a resource declared earlier, so walking the
/// graph front to back always creates dependencies first.
#[derive(Debug, Default, Clone)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> ResourceGraph {
        ResourceGraph::default()
    }

    /// Declare a resource; its name must be new and its references already declared.
    pub fn add(&mut self, resource: Resource) -> Result<(), PlanError> {
        if self.index.contains_key(&resource.name) {
            return Err(PlanError::Graph(format!(
                "{} is declared twice",
                resource.name
            )));
        }
        for dep in resource.dependencies() {
            if !self.index.contains_key(&dep) {
                return Err(PlanError::Graph(format!(
                    "{} references undeclared resource {dep}",
                    resource.name
                )));
            }
        }
        log::trace!("declare {} {}", resource.kind, resource.name);
        self.index.insert(resource.name.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Number of resources of each kind.
    pub fn count_by_kind(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.resources {
            *counts.entry(r.kind.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_in_order() {
        let mut graph = ResourceGraph::new();
        graph
            .add(
                Resource::new("vpc", ResourceKind::Vpc)
                    .with_attribute("cidr_block", Value::literal("10.0.0.0/16")),
            )
            .unwrap();
        graph
            .add(
                Resource::new("igw", ResourceKind::InternetGateway)
                    .with_attribute("vpc_id", Value::id_of("vpc")),
            )
            .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("igw").unwrap().dependencies(), vec!["vpc"]);
        assert!(graph.get("nope").is_none());
    }

    #[test]
    fn test_rejects_forward_reference() {
        let mut graph = ResourceGraph::new();
        let err = graph
            .add(
                Resource::new("igw", ResourceKind::InternetGateway)
                    .with_attribute("vpc_id", Value::id_of("vpc")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::Graph("igw references undeclared resource vpc".to_string())
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_rejects_template_forward_reference() {
        let mut graph = ResourceGraph::new();
        let result = graph.add(
            Resource::new("rt", ResourceKind::RouteTable)
                .with_attribute("description", Value::template("for ${vpc.id}")),
        );
        assert!(matches!(result, Err(PlanError::Graph(_))));
    }

    #[test]
    fn test_rejects_duplicate() {
        let mut graph = ResourceGraph::new();
        graph.add(Resource::new("vpc", ResourceKind::Vpc)).unwrap();
        assert!(graph.add(Resource::new("vpc", ResourceKind::Vpc)).is_err());
    }

    #[test]
    fn test_dependencies_dedup() {
        let r = Resource::new("assoc", ResourceKind::RouteTableAssociation)
            .with_attribute("route_table_id", Value::id_of("rt"))
            .with_attribute("subnet_id", Value::id_of("subnet"))
            .with_attribute("note", Value::template("${rt.id}/${subnet.id}"));
        assert_eq!(r.dependencies(), vec!["rt", "subnet"]);
    }
}
