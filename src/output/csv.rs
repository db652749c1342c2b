//! CSV output for network plans.

use crate::models::{usable_hosts, Ipv4, NetworkPlan};
use colored::Colorize;

use super::terminal::format_field;

/// Marker in the role column for unallocated ranges.
pub const RESERVED: &str = "-reserved-";

/// A row of plan data for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPrintRow {
    /// Partition index + 1 (0 for reserved ranges).
    pub j: usize,
    /// `public`, `private` or [`RESERVED`].
    pub role: String,
    pub zone: String,
    pub subnet_cidr: String,
    pub broadcast: String,
    /// Usable AWS hosts, `n/a` for blocks too small to have any.
    pub hosts: String,
    pub subnet_name: String,
    pub vpc_cidr: String,
}

fn hosts(cidr: &Ipv4) -> String {
    usable_hosts(cidr.mask)
        .map(|h| h.to_string())
        .unwrap_or_else(|_| "n/a".to_string())
}

/// Build the output rows of a plan: subnets in index order, then reserved ranges.
pub fn plan_rows(plan: &NetworkPlan) -> Vec<PlanPrintRow> {
    let vpc_cidr = plan.vpc_cidr.to_string();
    let subnets = plan.subnets.iter().map(|s| PlanPrintRow {
        j: s.index + 1,
        role: s.role.to_string(),
        zone: s.zone.clone(),
        subnet_cidr: s.cidr.to_string(),
        broadcast: s.cidr.hi().to_string(),
        hosts: hosts(&s.cidr),
        subnet_name: s.name.clone(),
        vpc_cidr: vpc_cidr.clone(),
    });
    let reserved = plan.reserved.iter().map(|r| PlanPrintRow {
        j: 0,
        role: RESERVED.to_string(),
        zone: "None".to_string(),
        subnet_cidr: r.to_string(),
        broadcast: r.hi().to_string(),
        hosts: hosts(r),
        subnet_name: "None".to_string(),
        vpc_cidr: vpc_cidr.clone(),
    });
    subnets.chain(reserved).collect()
}

/// Print a plan as CSV to stdout.
pub fn plan_print(plan: &NetworkPlan) {
    log::info!(
        "#Start plan_print() {} subnets, {} reserved",
        plan.subnets.len(),
        plan.reserved.len()
    );

    println!(
        r#" "cnt",     "role",        "zone",     "subnet_cidr",         "broadcast",   "hosts",               "subnet_name",            "vpc_cidr""#
    );
    for row in plan_rows(plan) {
        print_csv_row(&row);
    }

    if !plan.reserved.is_empty() {
        println!(
            "#{}# {} reserved range(s) of {} are not assigned to any subnet",
            "NOTE".on_red(),
            plan.reserved.len(),
            plan.vpc_cidr
        );
    }
}

/// Format a single CSV row.
pub fn format_csv_row(row: &PlanPrintRow) -> String {
    format!(
        "{j},{role},{zone},{subnet_cidr},{broadcast},{hosts},{subnet_name},{vpc_cidr}",
        j = format_field(row.j, 6),
        role = format_field(&row.role, 12),
        zone = format_field(&row.zone, 14),
        subnet_cidr = format_field(&row.subnet_cidr, 18),
        broadcast = format_field(format!("{}_br", row.broadcast), 19),
        hosts = format_field(format!("{}_hosts", row.hosts), 12),
        subnet_name = format_field(&row.subnet_name, 30),
        vpc_cidr = format_field(format!("{}_vpc", row.vpc_cidr), 20),
    )
}

fn print_csv_row(row: &PlanPrintRow) {
    println!("{}", format_csv_row(row));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{find_reserved, plan_subnets};

    fn plan() -> NetworkPlan {
        let vpc_cidr = Ipv4::new("10.0.0.0/16").unwrap();
        let zones: Vec<String> = ["a", "b", "c"].iter().map(|z| z.to_string()).collect();
        let subnets = plan_subnets(vpc_cidr, &zones, "demo").unwrap();
        let blocks: Vec<Ipv4> = subnets.iter().map(|s| s.cidr).collect();
        NetworkPlan {
            name: "demo".to_string(),
            vpc_cidr,
            zones,
            reserved: find_reserved(vpc_cidr, &blocks).unwrap(),
            subnets,
        }
    }

    #[test]
    fn test_plan_rows() {
        let rows = plan_rows(&plan());
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].j, 1);
        assert_eq!(rows[0].role, "public");
        assert_eq!(rows[1].subnet_cidr, "10.0.32.0/19");
        assert_eq!(rows[1].broadcast, "10.0.63.255");
        assert_eq!(rows[1].hosts, "8187");
        assert_eq!(rows[6].role, RESERVED);
        assert_eq!(rows[6].subnet_cidr, "10.0.192.0/18");
        assert_eq!(rows[6].j, 0);
    }

    #[test]
    fn test_format_csv_row() {
        let rows = plan_rows(&plan());
        let line = format_csv_row(&rows[0]);
        assert!(line.starts_with(r#"   "1",    "public","#), "{line}");
        assert!(line.contains(r#""10.0.0.0/19""#), "{line}");
        assert!(line.ends_with(r#""10.0.0.0/16_vpc""#), "{line}");
    }

    #[test]
    fn test_tiny_subnet_hosts() {
        let cidr = Ipv4::new("10.0.0.0/30").unwrap();
        assert_eq!(hosts(&cidr), "n/a");
    }
}
