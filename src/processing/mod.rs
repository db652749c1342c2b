//! Subnet planning logic.
//!
//! This module contains the pure planning steps:
//! - [`partition`] - Splitting a block into equally sized subnets
//! - [`validate`] - Checking a partition result
//! - [`zones`] - Pairing subnets with availability zones and roles
//! - [`gap_finder`] - Finding the address space left unused

mod gap_finder;
mod partition;
mod validate;
mod zones;

// Re-export public functions
pub use gap_finder::find_reserved;
pub use partition::{extra_bits, partition, MAX_SUBNET_PREFIX};
pub use validate::check_partition;
pub use zones::{assign_zones, plan_subnets, subnet_name, SUBNETS_PER_ZONE};
