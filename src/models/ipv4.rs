//! IPv4 network blocks in CIDR notation.
//!
//! Provides [`Ipv4`], the address + prefix length pair every other module works
//! with, and the 32-bit integer helpers used to carve and compare blocks.

use crate::error::PlanError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Addresses AWS keeps back in every subnet (network, router, DNS, future use, broadcast).
pub const AWS_RESERVED_HOSTS: u64 = 5;

/// Netmask bits for a prefix length, clamped to /32.
fn netmask(len: u8) -> u32 {
    let len = len.min(MAX_LENGTH);
    if len == 0 {
        0
    } else {
        u32::MAX << (MAX_LENGTH - len)
    }
}

/// Number of addresses in a block of the given prefix length.
pub fn block_size(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Calculate the number of usable host addresses in an AWS subnet.
pub fn usable_hosts(len: u8) -> Result<u64, PlanError> {
    if len >= MAX_LENGTH - 2 {
        // /30 = 4 IPs, fewer than the 5 AWS keeps
        Err(PlanError::Format(format!(
            "prefix length /{len} leaves no usable hosts"
        )))
    } else {
        Ok(block_size(len) - AWS_RESERVED_HOSTS)
    }
}

/// Calculate the shortest prefix an address can start, based on trailing zeros.
pub fn lo_mask(ip: Ipv4Addr) -> u8 {
    let trailing_zeros = u32::from(ip).trailing_zeros() as u8;
    MAX_LENGTH - trailing_zeros
}

/// IPv4 network block: base address plus prefix length.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The base address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::from_str(&s).map_err(de::Error::custom)
    }
}

impl FromStr for Ipv4 {
    type Err = PlanError;

    fn from_str(addr_cidr: &str) -> Result<Self, Self::Err> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| PlanError::Format(format!("'{addr_cidr}' is not address/prefix")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| PlanError::Format(format!("invalid address '{addr}' in '{addr_cidr}'")))?;
        if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PlanError::Format(format!(
                "invalid prefix '{mask}' in '{addr_cidr}'"
            )));
        }
        let mask: u8 = mask
            .parse()
            .map_err(|_| PlanError::Format(format!("invalid prefix '{mask}' in '{addr_cidr}'")))?;
        if mask > MAX_LENGTH {
            return Err(PlanError::Format(format!(
                "prefix length /{mask} is too long in '{addr_cidr}'"
            )));
        }
        Ok(Ipv4 { addr, mask })
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/16").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, PlanError> {
        addr_cidr.parse()
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & netmask(self.mask))
    }

    /// Get the highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        let mask = netmask(self.mask);
        Ipv4Addr::from((u32::from(self.addr) & mask) | !mask)
    }

    /// The block with its host bits cleared.
    pub fn network(&self) -> Ipv4 {
        Ipv4 {
            addr: self.lo(),
            mask: self.mask,
        }
    }

    /// True when no host bits are set beyond the prefix.
    pub fn is_canonical(&self) -> bool {
        self.addr == self.lo()
    }

    /// Number of addresses covered by this block.
    pub fn size(&self) -> u64 {
        block_size(self.mask)
    }

    /// Check if an IP address is contained within this block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        ip >= self.lo() && ip <= self.hi()
    }

    /// Check if `other` lies entirely inside this block.
    pub fn contains_block(&self, other: &Ipv4) -> bool {
        other.mask >= self.mask && self.contains(other.lo()) && self.contains(other.hi())
    }

    /// Check if the two blocks share any address.
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_hosts() {
        assert_eq!(usable_hosts(16).unwrap(), 65531); // 2^16 - 5
        assert_eq!(usable_hosts(19).unwrap(), 8187); // 2^13 - 5
        assert_eq!(usable_hosts(24).unwrap(), 251); // 2^8 - 5
        assert_eq!(usable_hosts(28).unwrap(), 11); // 2^4 - 5
        assert_eq!(usable_hosts(29).unwrap(), 3); // 2^3 - 5
        assert!(usable_hosts(30).is_err());
        assert!(usable_hosts(33).is_err());
    }

    #[test]
    fn test_parse_cidr() {
        let ip = Ipv4::new(" 10.0.0.0/16 ").unwrap();
        assert_eq!(ip.addr, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(ip.mask, 16);
        assert_eq!(ip.to_string(), "10.0.0.0/16");

        assert!(matches!(Ipv4::new("10.0.0.0"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0/16"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.256/16"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/33"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/-1"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/1/2"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/+16"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/"), Err(PlanError::Format(_))));
        assert!(matches!(Ipv4::new("10.0.0.0/ 16"), Err(PlanError::Format(_))));
    }

    #[test]
    fn test_canonical() {
        assert!(Ipv4::new("10.0.0.0/16").unwrap().is_canonical());
        let loose = Ipv4::new("10.2.3.4/16").unwrap();
        assert!(!loose.is_canonical());
        assert_eq!(loose.network(), Ipv4::new("10.2.0.0/16").unwrap());
        assert!(Ipv4::new("0.0.0.0/0").unwrap().is_canonical());
    }

    #[test]
    fn test_contains_and_overlaps() {
        let vpc = Ipv4::new("10.0.0.0/16").unwrap();
        let a = Ipv4::new("10.0.32.0/19").unwrap();
        let b = Ipv4::new("10.0.64.0/19").unwrap();
        let outside = Ipv4::new("10.1.0.0/24").unwrap();

        assert!(vpc.contains_block(&a));
        assert!(!a.contains_block(&vpc));
        assert!(!vpc.contains_block(&outside));
        assert!(a.overlaps(&vpc));
        assert!(!a.overlaps(&b));
        assert_eq!(a.hi(), Ipv4Addr::new(10, 0, 63, 255));
        assert_eq!(vpc.size(), 65536);
    }

    #[test]
    fn test_ip4_cmp_overlap() {
        let ip1 = Ipv4::new("10.0.10.0/24").unwrap();
        let ip2 = Ipv4::new("10.0.0.0/8").unwrap();
        let ip3 = Ipv4::new("10.0.10.64/26").unwrap();

        assert!(ip1 > ip2);
        assert!(ip1 < ip3);
        assert!(ip2.lo() < ip1.lo());
        assert!(ip2.hi() > ip3.hi());
        assert_eq!(ip2.hi(), Ipv4Addr::new(10, 255, 255, 255));
    }

    #[test]
    fn test_serde_as_text() {
        let ip = Ipv4::new("10.0.32.0/19").unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"10.0.32.0/19\"");
        let back: Ipv4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Ipv4>("\"10.0.0.0/40\"").is_err());
    }

    #[test]
    fn test_lo_mask() {
        assert_eq!(lo_mask(Ipv4Addr::new(192, 168, 1, 1)), 32);
        assert_eq!(lo_mask(Ipv4Addr::new(10, 0, 192, 0)), 18);
        assert_eq!(lo_mask(Ipv4Addr::new(0, 0, 0, 0)), 0);
    }
}
