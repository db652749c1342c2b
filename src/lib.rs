// cargo watch -x 'fmt' -x 'run'

pub mod apply;
pub mod aws;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod output;
pub mod processing;

pub use error::PlanError;

use apply::{apply, read_state, write_state, ApplySummary, DryRunProvisioner, Provisioner, State};
use aws::{discover_zones, AwsCliProvisioner, CommandRunner, ShellRunner};
use config::{Config, ProvisionerKind};
use graph::ResourceGraph;
use models::{Ipv4, NetworkPlan};
use processing::{find_reserved, plan_subnets};
use std::error::Error;

/// Plan one public and one private subnet per zone inside `vpc_cidr`.
pub fn plan_network(
    name_prefix: &str,
    vpc_cidr: Ipv4,
    zones: &[String],
) -> Result<NetworkPlan, PlanError> {
    let subnets = plan_subnets(vpc_cidr, zones, name_prefix)?;
    let blocks: Vec<Ipv4> = subnets.iter().map(|s| s.cidr).collect();
    let reserved = find_reserved(vpc_cidr, &blocks)?;
    Ok(NetworkPlan {
        name: name_prefix.to_string(),
        vpc_cidr,
        zones: zones.to_vec(),
        subnets,
        reserved,
    })
}

/// Configured zones, or the region's available zones when none are configured.
pub fn resolve_zones<R: CommandRunner>(
    config: &Config,
    runner: &mut R,
) -> Result<Vec<String>, Box<dyn Error>> {
    match &config.availability_zones {
        Some(zones) => Ok(zones.clone()),
        None => discover_zones(runner, config.region.as_deref(), config.max_zones),
    }
}

/// The provisioner selected by the configuration.
pub fn make_provisioner(config: &Config) -> Box<dyn Provisioner> {
    match config.provisioner {
        ProvisionerKind::DryRun => Box::new(DryRunProvisioner::new()),
        ProvisionerKind::AwsCli => Box::new(AwsCliProvisioner::new(
            ShellRunner,
            config.region.clone(),
            config.sleep_msec,
        )),
    }
}

/// Apply `graph` against the configured state file.
///
/// The state is written back even when apply fails part way, so a rerun
/// continues where this one stopped.
pub fn apply_graph(
    config: &Config,
    graph: &ResourceGraph,
    provisioner: &mut dyn Provisioner,
) -> Result<(ApplySummary, State), Box<dyn Error>> {
    let state_file = config.state_file.as_deref();
    let mut state = read_state(state_file)?;
    let result = apply(graph, provisioner, &mut state);
    if let Err(e) = &result {
        log::error!("Apply failed, saving partial state: {e}");
    }
    write_state(&mut state, state_file, config.timezone)?;
    let summary = result?;
    Ok((summary, state))
}
