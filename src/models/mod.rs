//! Domain models for VPC subnet planning.
//!
//! This module contains the value types used throughout the crate:
//! - [`Ipv4`] - IPv4 network block with CIDR notation support
//! - [`SubnetPlan`] and [`Role`] - a planned subnet and its routing role
//! - [`NetworkPlan`] - the VPC block with all subnets carved from it

mod ipv4;
mod plan;
mod subnet;

// Re-export public types
pub use ipv4::{block_size, lo_mask, usable_hosts, Ipv4, MAX_LENGTH};
pub use plan::NetworkPlan;
pub use subnet::{Role, SubnetPlan};
