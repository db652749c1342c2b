//! Apply phase.
//!
//! Walks a [`ResourceGraph`] in declaration order and creates what the state
//! does not hold yet:
//! - [`binding`] - Resolving references and placeholders from created resources
//! - [`state`] - The record of created resources and its JSON file
//! - [`dry_run`] - A provisioner that only pretends

mod binding;
mod dry_run;
mod state;

pub use binding::{resolve, ResolvedResource};
pub use dry_run::DryRunProvisioner;
pub use state::{read_state, write_state, Outputs, ResourceState, State};

use crate::error::PlanError;
use crate::graph::ResourceGraph;
use colored::Colorize;
use std::error::Error;

/// Creates resolved resources.
///
/// `apply` records the outputs of [`Provisioner::create`] before it calls
/// [`Provisioner::finish`], so a resource whose follow-up calls fail is still
/// in the state and is only finished, not created again, on the next run.
pub trait Provisioner {
    /// Called once with the state loaded before anything is created.
    fn resume(&mut self, _state: &State) {}

    /// Create `resource` and report its outputs (at least `id`).
    fn create(&mut self, resource: &ResolvedResource) -> Result<Outputs, Box<dyn Error>>;

    /// Extra calls needed once the resource exists.
    fn finish(
        &mut self,
        _resource: &ResolvedResource,
        _outputs: &Outputs,
    ) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// What an apply did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub created: Vec<String>,
    /// Created by an earlier run whose follow-up calls failed, finished now.
    pub finished: Vec<String>,
    pub skipped: Vec<String>,
}

fn provision_error(resource: &str, e: Box<dyn Error>) -> PlanError {
    PlanError::Provision {
        resource: resource.to_string(),
        message: e.to_string(),
    }
}

/// Create every resource of `graph` missing from `state`, recording each in `state`.
///
/// Stops at the first failure; everything created up to that point stays in
/// `state` so the caller can persist it.
pub fn apply(
    graph: &ResourceGraph,
    provisioner: &mut dyn Provisioner,
    state: &mut State,
) -> Result<ApplySummary, PlanError> {
    let mut summary = ApplySummary::default();
    provisioner.resume(state);

    for resource in graph.iter() {
        let existing = state.get(&resource.name).cloned();
        if let Some(existing) = &existing {
            if existing.kind != resource.kind {
                return Err(PlanError::Graph(format!(
                    "{} is a {} in the state but a {} in the graph",
                    resource.name, existing.kind, resource.kind
                )));
            }
            if !existing.pending {
                log::debug!("skip {} {}, already created", resource.kind, resource.name);
                summary.skipped.push(resource.name.clone());
                continue;
            }
        }

        let resolved = resolve(resource, state)?;
        let resumed = existing.is_some();
        let outputs = match existing {
            Some(existing) => {
                log::info!("finish {} {}", resource.kind, resource.name.on_blue());
                existing.outputs
            }
            None => {
                log::info!("create {} {}", resource.kind, resource.name.on_blue());
                let outputs = provisioner
                    .create(&resolved)
                    .map_err(|e| provision_error(&resource.name, e))?;
                if !outputs.contains_key("id") {
                    return Err(PlanError::Provision {
                        resource: resource.name.clone(),
                        message: "provisioner returned no id".to_string(),
                    });
                }
                log::debug!("created {} => {:?}", resource.name, outputs);
                state.record_pending(&resource.name, resource.kind, outputs.clone());
                outputs
            }
        };

        provisioner
            .finish(&resolved, &outputs)
            .map_err(|e| provision_error(&resource.name, e))?;
        state.mark_finished(&resource.name);
        if resumed {
            summary.finished.push(resource.name.clone());
        } else {
            summary.created.push(resource.name.clone());
        }
    }

    log::info!(
        "Apply done: {} created, {} finished, {} already present",
        summary.created.len(),
        summary.finished.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
