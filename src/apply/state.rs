//! State file management.
//!
//! Records what apply created so reapplying the same graph skips it.

use crate::config::DEFAULT_STATE_FILE;
use crate::graph::ResourceKind;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

/// Outputs reported by a provisioner; always holds `id`.
pub type Outputs = BTreeMap<String, String>;

/// A created resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    pub kind: ResourceKind,
    pub outputs: Outputs,
    /// Created, but its follow-up calls have not all succeeded yet.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

/// Every created resource keyed by name.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct State {
    pub resources: BTreeMap<String, ResourceState>,
    /// Time of the last write, in the configured timezone.
    #[serde(default)]
    pub updated: Option<String>,
}

impl State {
    pub fn get(&self, name: &str) -> Option<&ResourceState> {
        self.resources.get(name)
    }

    /// Output `attribute` of resource `name`, if it exists.
    pub fn output(&self, name: &str, attribute: &str) -> Option<&str> {
        self.resources
            .get(name)
            .and_then(|r| r.outputs.get(attribute))
            .map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<&str> {
        self.output(name, "id")
    }

    pub fn record(&mut self, name: &str, kind: ResourceKind, outputs: Outputs) {
        self.insert(name, kind, outputs, false);
    }

    /// Record a resource that exists but still needs [`State::mark_finished`].
    pub fn record_pending(&mut self, name: &str, kind: ResourceKind, outputs: Outputs) {
        self.insert(name, kind, outputs, true);
    }

    pub fn mark_finished(&mut self, name: &str) {
        if let Some(resource) = self.resources.get_mut(name) {
            resource.pending = false;
        }
    }

    fn insert(&mut self, name: &str, kind: ResourceKind, outputs: Outputs, pending: bool) {
        self.resources.insert(
            name.to_string(),
            ResourceState {
                kind,
                outputs,
                pending,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Read the state file.
///
/// # Arguments
/// * `state_file` - Optional path to a specific state file. If None, uses the default name.
///
/// # Returns
/// * `Ok(State)` - The stored state, or an empty state if the file does not exist yet
/// * `Err` - If the file can't be read or parsed
pub fn read_state(state_file: Option<&str>) -> Result<State, Box<dyn Error>> {
    let state_file = state_file.unwrap_or(DEFAULT_STATE_FILE);
    if !Path::new(state_file).exists() {
        log::warn!("State file not found: {state_file}, starting empty");
        return Ok(State::default());
    }

    let json = std::fs::read_to_string(state_file)
        .map_err(|e| format!("Error reading state file {state_file}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let state: State = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing state file {state_file}: path={} error={}",
            e.path(),
            e
        )
    })?;
    log::info!(
        "Read {} resources from state file: {state_file}",
        state.resources.len()
    );
    Ok(state)
}

/// Stamp and write the state file, creating it if needed.
pub fn write_state(
    state: &mut State,
    state_file: Option<&str>,
    timezone: Tz,
) -> Result<(), Box<dyn Error>> {
    let state_file = state_file.unwrap_or(DEFAULT_STATE_FILE);
    let now = chrono::Utc::now().with_timezone(&timezone);
    state.updated = Some(now.to_rfc3339());

    let json = serde_json::to_string_pretty(state)
        .map_err(|e| format!("Error serializing state: {e}"))?;
    log::info!(
        "Writing {} resources to state file: {state_file}",
        state.resources.len()
    );
    std::fs::write(state_file, json)
        .map_err(|e| format!("Error writing state file {state_file}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_state() {
        let state = read_state(Some("src/tests/test_data/state_test_01.json"))
            .expect("Error reading state file");
        assert_eq!(state.len(), 3, "Expected 3 resources in test sample.");
        assert_eq!(state.id("demo-vpc"), Some("vpc-0a1b2c3d4e5f60718"));
        assert_eq!(
            state.output("demo-vpc", "cidr_block"),
            Some("10.0.0.0/16")
        );
        assert_eq!(state.get("demo-igw").unwrap().kind, ResourceKind::InternetGateway);
        assert_eq!(state.id("demo-missing"), None);
        assert!(!state.get("demo-vpc").unwrap().pending);
    }

    #[test]
    fn test_read_state_missing_file() {
        let state = read_state(Some("src/tests/test_data/no_such_state.json")).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.updated, None);
    }

    #[test]
    fn test_read_state_bad_json() {
        let err = read_state(Some("src/tests/test_data/state_test_bad.json")).unwrap_err();
        assert!(err.to_string().contains("path=resources.demo-vpc.kind"), "{err}");
    }

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir().join(format!(
            "vpc_plan_state_test_{}.json",
            std::process::id()
        ));
        let path = path.to_str().unwrap().to_string();

        let mut state = State::default();
        let mut outputs = Outputs::new();
        outputs.insert("id".to_string(), "vpc-123".to_string());
        state.record("demo-vpc", ResourceKind::Vpc, outputs);

        write_state(&mut state, Some(&path), chrono_tz::Pacific::Auckland).unwrap();
        let updated = state.updated.clone().unwrap();
        assert!(updated.ends_with("+13:00") || updated.ends_with("+12:00"), "{updated}");

        let back = read_state(Some(&path)).unwrap();
        assert_eq!(back, state);

        let mut outputs = Outputs::new();
        outputs.insert("id".to_string(), "igw-9".to_string());
        state.record_pending("demo-igw", ResourceKind::InternetGateway, outputs);
        write_state(&mut state, Some(&path), chrono_tz::UTC).unwrap();
        let back = read_state(Some(&path)).unwrap();
        assert!(back.get("demo-igw").unwrap().pending);
        assert!(!back.get("demo-vpc").unwrap().pending);
        std::fs::remove_file(&path).ok();
    }
}
