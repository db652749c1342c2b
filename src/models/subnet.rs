//! Planned subnet data model.

use super::Ipv4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing role of a subnet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Routes 0.0.0.0/0 through the internet gateway.
    Public,
    /// No gateway route.
    Private,
}

impl Role {
    /// Even partition indexes are public, odd ones private.
    pub fn for_index(index: usize) -> Role {
        if index % 2 == 0 {
            Role::Public
        } else {
            Role::Private
        }
    }

    /// Whether instances launched in the subnet get a public IP.
    pub fn map_public_ip_on_launch(self) -> bool {
        self == Role::Public
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Public => write!(f, "public"),
            Role::Private => write!(f, "private"),
        }
    }
}

/// One subnet of a network plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetPlan {
    /// Position in the partition result.
    pub index: usize,
    /// Resource name of the subnet.
    pub name: String,
    /// CIDR block carved from the VPC block.
    pub cidr: Ipv4,
    /// Availability zone name.
    pub zone: String,
    /// Position of the zone in the zone list.
    pub zone_index: usize,
    pub role: Role,
}

impl fmt::Display for SubnetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} ({}, {})",
            self.index, self.name, self.cidr, self.zone, self.role
        )
    }
}
