//! Declared resource graph.
//!
//! - [`value`] - Attribute values, references and `${resource.attribute}` placeholders
//! - [`resource`] - Resources and the ordered graph holding them
//! - [`builder`] - The VPC graph for a network plan

mod builder;
mod resource;
mod value;

pub use builder::{
    association_name, build_network_graph, internet_gateway_name, route_table_name, vpc_name,
    DEFAULT_ROUTE,
};
pub use resource::{Resource, ResourceGraph, ResourceKind};
pub(crate) use value::placeholder_regex;
pub use value::{placeholders, Value};
