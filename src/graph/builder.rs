//! Resource graph for a network plan.
//!
//! Declares the VPC, its internet gateway, one subnet per planned block, a
//! public and a private route table, and one route table association per
//! subnet.

use super::{Resource, ResourceGraph, ResourceKind, Value};
use crate::error::PlanError;
use crate::models::{NetworkPlan, Role};

/// Destination of the public route table's default route.
pub const DEFAULT_ROUTE: &str = "0.0.0.0/0";

pub fn vpc_name(plan: &NetworkPlan) -> String {
    format!("{}-vpc", plan.name)
}

pub fn internet_gateway_name(plan: &NetworkPlan) -> String {
    format!("{}-igw", plan.name)
}

pub fn route_table_name(plan: &NetworkPlan, role: Role) -> String {
    format!("{}-{role}-rt", plan.name)
}

pub fn association_name(subnet_name: &str) -> String {
    format!("{subnet_name}-rt-assoc")
}

/// Declare every resource of `plan`, dependencies first.
pub fn build_network_graph(plan: &NetworkPlan) -> Result<ResourceGraph, PlanError> {
    let mut graph = ResourceGraph::new();
    let vpc = vpc_name(plan);
    let igw = internet_gateway_name(plan);

    graph.add(
        Resource::new(&vpc, ResourceKind::Vpc)
            .with_attribute("cidr_block", Value::literal(plan.vpc_cidr.to_string()))
            .with_tag("Name", &vpc),
    )?;
    graph.add(
        Resource::new(&igw, ResourceKind::InternetGateway)
            .with_attribute("vpc_id", Value::id_of(&vpc))
            .with_tag("Name", &igw),
    )?;

    for subnet in &plan.subnets {
        graph.add(
            Resource::new(&subnet.name, ResourceKind::Subnet)
                .with_attribute("vpc_id", Value::id_of(&vpc))
                .with_attribute("cidr_block", Value::literal(subnet.cidr.to_string()))
                .with_attribute("availability_zone", Value::literal(&subnet.zone))
                .with_attribute(
                    "map_public_ip_on_launch",
                    Value::literal(subnet.role.map_public_ip_on_launch().to_string()),
                )
                .with_tag("Name", &subnet.name)
                .with_tag("Role", subnet.role.to_string())
                .with_tag("Zone", &subnet.zone),
        )?;
    }

    let public_rt = route_table_name(plan, Role::Public);
    let private_rt = route_table_name(plan, Role::Private);
    graph.add(
        Resource::new(&public_rt, ResourceKind::RouteTable)
            .with_attribute("vpc_id", Value::id_of(&vpc))
            .with_attribute("destination_cidr_block", Value::literal(DEFAULT_ROUTE))
            .with_attribute("gateway_id", Value::id_of(&igw))
            .with_tag("Name", &public_rt),
    )?;
    graph.add(
        Resource::new(&private_rt, ResourceKind::RouteTable)
            .with_attribute("vpc_id", Value::id_of(&vpc))
            .with_tag("Name", &private_rt),
    )?;

    for subnet in &plan.subnets {
        let route_table = match subnet.role {
            Role::Public => &public_rt,
            Role::Private => &private_rt,
        };
        graph.add(
            Resource::new(association_name(&subnet.name), ResourceKind::RouteTableAssociation)
                .with_attribute("route_table_id", Value::id_of(route_table))
                .with_attribute("subnet_id", Value::id_of(&subnet.name)),
        )?;
    }

    log::info!(
        "Resource graph for {}: {} resources {:?}",
        plan.name,
        graph.len(),
        graph.count_by_kind()
    );
    Ok(graph)
}
