//! Runtime configuration.
//!
//! Read once at startup from the environment (after `dotenv` has loaded any
//! `.env` file) and validated as a whole.
//!
//! | key                  | default               |
//! |----------------------|-----------------------|
//! | `VPC_CIDR`           | required              |
//! | `AVAILABILITY_ZONES` | required for dry-run, discovered with `aws-cli` |
//! | `MAX_ZONES`          | `3`                   |
//! | `NAME_PREFIX`        | `vpc-plan`            |
//! | `AWS_REGION`         | unset                 |
//! | `PLAN_MODE`          | `plan`                |
//! | `PROVISIONER`        | `dry-run`             |
//! | `STATE_FILE`         | `vpc_plan_state.json` |
//! | `STATE_TIMEZONE`     | `UTC`                 |
//! | `SLEEP_MSEC`         | `200`                 |

use crate::error::PlanError;
use crate::models::Ipv4;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::str::FromStr;

pub const DEFAULT_NAME_PREFIX: &str = "vpc-plan";
pub const DEFAULT_STATE_FILE: &str = "vpc_plan_state.json";
pub const DEFAULT_MAX_ZONES: usize = 3;
/// Pause between AWS CLI calls.
pub const SLEEP_MSEC: u64 = 200;

/// What the binary does after planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the plan and resource graph only.
    Plan,
    /// Also create the resources.
    Apply,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plan" => Ok(Mode::Plan),
            "apply" => Ok(Mode::Apply),
            other => Err(format!("PLAN_MODE must be plan or apply, got '{other}'")),
        }
    }
}

/// Which provisioner creates resources in apply mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionerKind {
    DryRun,
    AwsCli,
}

impl FromStr for ProvisionerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dry-run" | "dryrun" => Ok(ProvisionerKind::DryRun),
            "aws-cli" | "aws" => Ok(ProvisionerKind::AwsCli),
            other => Err(format!(
                "PROVISIONER must be dry-run or aws-cli, got '{other}'"
            )),
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parent block for the VPC.
    pub vpc_cidr: Ipv4,
    /// Zones to spread subnets over; `None` means discover them.
    pub availability_zones: Option<Vec<String>>,
    /// Upper bound on discovered zones.
    pub max_zones: usize,
    pub name_prefix: String,
    pub region: Option<String>,
    pub mode: Mode,
    pub provisioner: ProvisionerKind,
    /// Explicit state file; `None` uses [`DEFAULT_STATE_FILE`].
    pub state_file: Option<String>,
    /// Timezone used to stamp the state file.
    pub timezone: Tz,
    pub sleep_msec: u64,
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Config, PlanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, reporting every problem at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, PlanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut problems: Vec<String> = Vec::new();

        let vpc_cidr = match get("VPC_CIDR") {
            Some(text) => match Ipv4::new(&text) {
                Ok(cidr) if cidr.is_canonical() => Some(cidr),
                Ok(cidr) => {
                    problems.push(format!(
                        "VPC_CIDR {cidr} has host bits set, use {}",
                        cidr.network()
                    ));
                    None
                }
                Err(e) => {
                    problems.push(format!("VPC_CIDR: {e}"));
                    None
                }
            },
            None => {
                problems.push("VPC_CIDR is required".to_string());
                None
            }
        };

        let provisioner = parse_or(&get, "PROVISIONER", ProvisionerKind::DryRun, &mut problems);
        let mode = parse_or(&get, "PLAN_MODE", Mode::Plan, &mut problems);
        let max_zones = parse_or(&get, "MAX_ZONES", DEFAULT_MAX_ZONES, &mut problems);
        if max_zones == 0 {
            problems.push("MAX_ZONES must be at least 1".to_string());
        }
        let sleep_msec = parse_or(&get, "SLEEP_MSEC", SLEEP_MSEC, &mut problems);
        let timezone = parse_or(&get, "STATE_TIMEZONE", Tz::UTC, &mut problems);

        let availability_zones = get("AVAILABILITY_ZONES").map(|list| split_zones(&list));
        match &availability_zones {
            Some(zones) => {
                let mut seen = HashSet::new();
                for zone in zones {
                    check_name("AVAILABILITY_ZONES", zone, &mut problems);
                    if !seen.insert(zone) {
                        problems.push(format!("AVAILABILITY_ZONES lists {zone} twice"));
                    }
                }
                if zones.is_empty() {
                    problems.push("AVAILABILITY_ZONES is empty".to_string());
                }
            }
            None if provisioner != ProvisionerKind::AwsCli => {
                problems.push(
                    "AVAILABILITY_ZONES is required unless PROVISIONER=aws-cli".to_string(),
                );
            }
            None => {}
        }

        let name_prefix = get("NAME_PREFIX").unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string());
        check_name("NAME_PREFIX", &name_prefix, &mut problems);

        match vpc_cidr {
            Some(vpc_cidr) if problems.is_empty() => Ok(Config {
                vpc_cidr,
                availability_zones,
                max_zones,
                name_prefix,
                region: get("AWS_REGION"),
                mode,
                provisioner,
                state_file: get("STATE_FILE"),
                timezone,
                sleep_msec,
            }),
            _ => Err(PlanError::Config(problems.join("; "))),
        }
    }
}

/// Parse an optional key, falling back to `default` and recording parse failures.
fn parse_or<T, G>(get: &G, key: &str, default: T, problems: &mut Vec<String>) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(text) => text.parse().unwrap_or_else(|e| {
            problems.push(format!("{key}='{text}': {e}"));
            default
        }),
        None => default,
    }
}

/// Characters that would split a CLI argument or break the EC2 tag shorthand.
const FORBIDDEN_IN_NAMES: &str = ",{}[]'\"=";

/// Record a problem when `value` can't be passed through as one CLI word.
fn check_name(key: &str, value: &str, problems: &mut Vec<String>) {
    if let Some(c) = value
        .chars()
        .find(|c| c.is_whitespace() || FORBIDDEN_IN_NAMES.contains(*c))
    {
        problems.push(format!("{key} value '{value}' must not contain {c:?}"));
    }
}

fn split_zones(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map(str::to_string)
        .collect()
}
