//! AWS CLI interaction.
//!
//! This module handles everything that talks to AWS:
//! - [`cli`] - Command execution for the AWS CLI
//! - [`provisioner`] - Creating graph resources with `aws ec2`
//! - [`zones`] - Availability zone discovery

mod cli;
mod provisioner;
mod zones;

// Re-export public types and functions
pub use cli::{run, CommandRunner, ShellRunner, MAX_OUTPUT_BYTES};
pub use provisioner::AwsCliProvisioner;
pub use zones::discover_zones;
