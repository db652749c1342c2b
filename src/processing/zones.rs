//! Availability zone and role assignment.
//!
//! Every zone gets one consecutive pair of blocks: index `2k` is the public
//! subnet of zone `k`, index `2k + 1` its private subnet.

use crate::error::PlanError;
use crate::models::{Ipv4, Role, SubnetPlan};
use crate::processing::{check_partition, partition};

/// Number of subnets each availability zone receives.
pub const SUBNETS_PER_ZONE: usize = 2;

/// Subnet name for a zone and role.
pub fn subnet_name(name_prefix: &str, role: Role, zone: &str) -> String {
    format!("{name_prefix}-{role}-{zone}")
}

/// Pair partitioned blocks with zones and roles.
///
/// `blocks` must hold exactly two blocks per zone, in partition order.
pub fn assign_zones(
    blocks: &[Ipv4],
    zones: &[String],
    name_prefix: &str,
) -> Result<Vec<SubnetPlan>, PlanError> {
    if blocks.len() != zones.len() * SUBNETS_PER_ZONE {
        return Err(PlanError::ZoneMismatch {
            blocks: blocks.len(),
            zones: zones.len(),
        });
    }

    let subnets = blocks
        .iter()
        .enumerate()
        .map(|(index, cidr)| {
            let zone_index = index / SUBNETS_PER_ZONE;
            let zone = &zones[zone_index];
            let role = Role::for_index(index);
            SubnetPlan {
                index,
                name: subnet_name(name_prefix, role, zone),
                cidr: *cidr,
                zone: zone.clone(),
                zone_index,
                role,
            }
        })
        .collect();
    Ok(subnets)
}

/// Partition `vpc_cidr` into one public and one private subnet per zone.
pub fn plan_subnets(
    vpc_cidr: Ipv4,
    zones: &[String],
    name_prefix: &str,
) -> Result<Vec<SubnetPlan>, PlanError> {
    if zones.is_empty() {
        return Err(PlanError::EmptyRequest);
    }
    let count = zones.len() * SUBNETS_PER_ZONE;
    let blocks = partition(vpc_cidr, count)?;
    check_partition(vpc_cidr, count, &blocks)?;

    let subnets = assign_zones(&blocks, zones, name_prefix)?;
    for s in &subnets {
        log::debug!("planned {s}");
    }
    log::info!(
        "Planned {} subnets in {} zones from {vpc_cidr}",
        subnets.len(),
        zones.len()
    );
    Ok(subnets)
}
