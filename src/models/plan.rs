//! Network plan: the VPC block and everything carved from it.

use super::{Ipv4, Role, SubnetPlan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Planned VPC with its subnets, ready to be turned into a resource graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlan {
    /// Prefix used for every resource name.
    pub name: String,
    /// CIDR block of the VPC.
    pub vpc_cidr: Ipv4,
    /// Availability zones, in the order subnets were paired with them.
    pub zones: Vec<String>,
    /// Subnets ordered by partition index.
    pub subnets: Vec<SubnetPlan>,
    /// Address space of the VPC left unallocated.
    pub reserved: Vec<Ipv4>,
}

impl NetworkPlan {
    /// Subnets with the given role, in index order.
    pub fn subnets_with_role(&self, role: Role) -> impl Iterator<Item = &SubnetPlan> {
        self.subnets.iter().filter(move |s| s.role == role)
    }

    /// Subnets placed in the given zone, public first.
    pub fn subnets_in_zone<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a SubnetPlan> {
        self.subnets.iter().filter(move |s| s.zone == zone)
    }
}

impl fmt::Display for NetworkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} ({} subnets in {} zones, {} reserved)",
            self.name,
            self.vpc_cidr,
            self.subnets.len(),
            self.zones.len(),
            self.reserved.len()
        )?;
        for subnet in &self.subnets {
            writeln!(f, "  - {subnet}")?;
        }
        Ok(())
    }
}
