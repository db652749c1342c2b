//! Provisioner backed by `aws ec2` commands.
//!
//! Each resource is one create call whose JSON reply yields the new id,
//! followed by whatever extra calls finish it (attach the gateway, enable
//! public IPs, add the default route).

use super::cli::CommandRunner;
use crate::apply::{Outputs, Provisioner, ResolvedResource};
use crate::graph::ResourceKind;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CreateVpcReply {
    vpc: VpcReply,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VpcReply {
    vpc_id: String,
    cidr_block: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CreateInternetGatewayReply {
    internet_gateway: InternetGatewayReply,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InternetGatewayReply {
    internet_gateway_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CreateSubnetReply {
    subnet: SubnetReply,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SubnetReply {
    subnet_id: String,
    cidr_block: Option<String>,
    availability_zone: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CreateRouteTableReply {
    route_table: RouteTableReply,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RouteTableReply {
    route_table_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct AssociateRouteTableReply {
    association_id: String,
}

/// Parse a JSON reply, reporting the failing path on error.
pub(crate) fn parse_reply<T: DeserializeOwned>(output: &str, what: &str) -> Result<T, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!("Error parsing {what} reply: path={} error={}", e.path(), e).into()
    })
}

/// Build the `--tag-specifications` argument, or nothing for untaggable kinds.
fn tag_specification(kind: ResourceKind, tags: &BTreeMap<String, String>) -> Option<String> {
    let resource_type = kind.tag_resource_type()?;
    if tags.is_empty() {
        return None;
    }
    let tags = tags
        .iter()
        .map(|(k, v)| format!("{{Key={},Value={}}}", k.replace('\'', ""), v.replace('\'', "")))
        .collect::<Vec<String>>()
        .join(",");
    Some(format!(
        "--tag-specifications 'ResourceType={resource_type},Tags=[{tags}]'"
    ))
}

/// Creates resources by running the AWS CLI through a [`CommandRunner`].
pub struct AwsCliProvisioner<R: CommandRunner> {
    runner: R,
    region: Option<String>,
    sleep_msec: u64,
}

impl<R: CommandRunner> AwsCliProvisioner<R> {
    pub fn new(runner: R, region: Option<String>, sleep_msec: u64) -> AwsCliProvisioner<R> {
        AwsCliProvisioner {
            runner,
            region,
            sleep_msec,
        }
    }

    /// Full command line for an `aws ec2` subcommand with JSON output.
    pub fn ec2_command(&self, args: &str) -> String {
        match &self.region {
            Some(region) => format!("aws ec2 {args} --region {region} --output json"),
            None => format!("aws ec2 {args} --output json"),
        }
    }

    /// The create call for `resource`.
    pub fn create_command(&self, resource: &ResolvedResource) -> Result<String, String> {
        let args = match resource.kind {
            ResourceKind::Vpc => {
                format!("create-vpc --cidr-block {}", resource.require("cidr_block")?)
            }
            ResourceKind::InternetGateway => "create-internet-gateway".to_string(),
            ResourceKind::Subnet => format!(
                "create-subnet --vpc-id {} --cidr-block {} --availability-zone {}",
                resource.require("vpc_id")?,
                resource.require("cidr_block")?,
                resource.require("availability_zone")?
            ),
            ResourceKind::RouteTable => {
                format!("create-route-table --vpc-id {}", resource.require("vpc_id")?)
            }
            ResourceKind::RouteTableAssociation => format!(
                "associate-route-table --route-table-id {} --subnet-id {}",
                resource.require("route_table_id")?,
                resource.require("subnet_id")?
            ),
        };
        let args = match tag_specification(resource.kind, &resource.tags) {
            Some(tags) => format!("{args} {tags}"),
            None => args,
        };
        Ok(self.ec2_command(&args))
    }

    /// Calls that finish `resource` once it has `id`.
    pub fn follow_up_commands(
        &self,
        resource: &ResolvedResource,
        id: &str,
    ) -> Result<Vec<String>, String> {
        let mut cmds = Vec::new();
        match resource.kind {
            ResourceKind::InternetGateway => {
                if let Some(vpc_id) = resource.attribute("vpc_id") {
                    cmds.push(self.ec2_command(&format!(
                        "attach-internet-gateway --internet-gateway-id {id} --vpc-id {vpc_id}"
                    )));
                }
            }
            ResourceKind::Subnet => {
                if resource.attribute("map_public_ip_on_launch") == Some("true") {
                    cmds.push(self.ec2_command(&format!(
                        "modify-subnet-attribute --subnet-id {id} --map-public-ip-on-launch"
                    )));
                }
            }
            ResourceKind::RouteTable => {
                if let Some(gateway_id) = resource.attribute("gateway_id") {
                    cmds.push(self.ec2_command(&format!(
                        "create-route --route-table-id {id} --destination-cidr-block {} --gateway-id {gateway_id}",
                        resource.require("destination_cidr_block")?
                    )));
                }
            }
            ResourceKind::Vpc | ResourceKind::RouteTableAssociation => {}
        }
        Ok(cmds)
    }

    fn pause(&self) {
        if self.sleep_msec > 0 {
            std::thread::sleep(std::time::Duration::from_millis(self.sleep_msec));
        }
    }
}

/// Pull the outputs of a create reply.
fn parse_outputs(kind: ResourceKind, output: &str) -> Result<Outputs, Box<dyn Error>> {
    let mut outputs = Outputs::new();
    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            outputs.insert(key.to_string(), value);
        }
    };
    match kind {
        ResourceKind::Vpc => {
            let reply: CreateVpcReply = parse_reply(output, "create-vpc")?;
            put("id", Some(reply.vpc.vpc_id));
            put("cidr_block", reply.vpc.cidr_block);
        }
        ResourceKind::InternetGateway => {
            let reply: CreateInternetGatewayReply =
                parse_reply(output, "create-internet-gateway")?;
            put("id", Some(reply.internet_gateway.internet_gateway_id));
        }
        ResourceKind::Subnet => {
            let reply: CreateSubnetReply = parse_reply(output, "create-subnet")?;
            put("id", Some(reply.subnet.subnet_id));
            put("cidr_block", reply.subnet.cidr_block);
            put("availability_zone", reply.subnet.availability_zone);
        }
        ResourceKind::RouteTable => {
            let reply: CreateRouteTableReply = parse_reply(output, "create-route-table")?;
            put("id", Some(reply.route_table.route_table_id));
        }
        ResourceKind::RouteTableAssociation => {
            let reply: AssociateRouteTableReply = parse_reply(output, "associate-route-table")?;
            put("id", Some(reply.association_id));
        }
    }
    Ok(outputs)
}

impl<R: CommandRunner> Provisioner for AwsCliProvisioner<R> {
    fn create(&mut self, resource: &ResolvedResource) -> Result<Outputs, Box<dyn Error>> {
        let cmd = self.create_command(resource)?;
        let output = self.runner.run(&cmd)?;
        let outputs = parse_outputs(resource.kind, &output)?;
        log::info!(
            "{} {} => {}",
            resource.kind,
            resource.name,
            outputs.get("id").map(String::as_str).unwrap_or("?")
        );
        self.pause();
        Ok(outputs)
    }

    fn finish(&mut self, resource: &ResolvedResource, outputs: &Outputs) -> Result<(), Box<dyn Error>> {
        let id = outputs
            .get("id")
            .ok_or_else(|| format!("{} has no id to finish", resource.name))?;
        for cmd in self.follow_up_commands(resource, id)? {
            self.runner.run(&cmd)?;
            self.pause();
        }
        Ok(())
    }
}
