//! Availability zone discovery.

use super::cli::CommandRunner;
use super::provisioner::parse_reply;
use serde::Deserialize;
use std::error::Error;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeZonesReply {
    availability_zones: Vec<ZoneReply>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ZoneReply {
    zone_name: String,
    state: Option<String>,
}

/// List up to `max_zones` available zones of the region, sorted by name.
pub fn discover_zones<R: CommandRunner>(
    runner: &mut R,
    region: Option<&str>,
    max_zones: usize,
) -> Result<Vec<String>, Box<dyn Error>> {
    let region_arg = region.map(|r| format!(" --region {r}")).unwrap_or_default();
    let cmd = format!(
        "aws ec2 describe-availability-zones --filters Name=state,Values=available{region_arg} --output json"
    );
    let output = runner.run(&cmd)?;
    let reply: DescribeZonesReply = parse_reply(&output, "describe-availability-zones")?;

    let mut zones: Vec<String> = reply
        .availability_zones
        .into_iter()
        .filter(|z| z.state.as_deref().unwrap_or("available") == "available")
        .map(|z| z.zone_name)
        .collect();
    zones.sort();
    zones.dedup();
    zones.truncate(max_zones);

    if zones.is_empty() {
        return Err(format!("No available zones found for region {region:?}").into());
    }
    log::info!("Discovered zones {zones:?}");
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str, Vec<String>);

    impl CommandRunner for Canned {
        fn run(&mut self, cmd: &str) -> Result<String, Box<dyn Error>> {
            self.1.push(cmd.to_string());
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_discover_zones() {
        let mut runner = Canned(
            r#"{"AvailabilityZones": [
                {"ZoneName": "us-east-1c", "State": "available", "ZoneId": "use1-az4"},
                {"ZoneName": "us-east-1a", "State": "available", "ZoneId": "use1-az2"},
                {"ZoneName": "us-east-1e", "State": "impaired"},
                {"ZoneName": "us-east-1b", "State": "available"},
                {"ZoneName": "us-east-1d", "State": "available"}
            ]}"#,
            vec![],
        );
        let zones = discover_zones(&mut runner, Some("us-east-1"), 3).unwrap();
        assert_eq!(zones, vec!["us-east-1a", "us-east-1b", "us-east-1c"]);
        assert_eq!(
            runner.1[0],
            "aws ec2 describe-availability-zones --filters Name=state,Values=available --region us-east-1 --output json"
        );
    }

    #[test]
    fn test_no_zones() {
        let mut runner = Canned(r#"{"AvailabilityZones": []}"#, vec![]);
        assert!(discover_zones(&mut runner, None, 3).is_err());
    }
}
