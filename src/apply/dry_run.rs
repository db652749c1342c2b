//! Provisioner that creates nothing.

use super::{Outputs, Provisioner, ResolvedResource, State};
use std::error::Error;

const ID_MARKER: &str = "-dryrun";

/// Hands out sequential fake identifiers, e.g. `subnet-dryrun0003`.
#[derive(Debug, Default)]
pub struct DryRunProvisioner {
    count: usize,
}

impl DryRunProvisioner {
    pub fn new() -> DryRunProvisioner {
        DryRunProvisioner::default()
    }
}

/// Sequence number of a dry-run id, e.g. 3 for `subnet-dryrun0003`.
fn dry_run_number(id: &str) -> Option<usize> {
    id.rsplit_once(ID_MARKER)
        .and_then(|(_, number)| number.parse().ok())
}

impl Provisioner for DryRunProvisioner {
    /// Continue numbering after the highest id already in the state.
    fn resume(&mut self, state: &State) {
        let highest = state
            .resources
            .values()
            .filter_map(|r| r.outputs.get("id"))
            .filter_map(|id| dry_run_number(id))
            .max()
            .unwrap_or(0);
        self.count = self.count.max(highest);
    }

    fn create(&mut self, resource: &ResolvedResource) -> Result<Outputs, Box<dyn Error>> {
        self.count += 1;
        let id = format!("{}{ID_MARKER}{:04}", resource.kind.id_prefix(), self.count);
        log::info!("dry-run: {} {} => {id}", resource.kind, resource.name);

        let mut outputs = Outputs::new();
        outputs.insert("id".to_string(), id);
        if let Some(cidr) = resource.attribute("cidr_block") {
            outputs.insert("cidr_block".to_string(), cidr.to_string());
        }
        Ok(outputs)
    }
}
