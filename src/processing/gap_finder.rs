//! Gap finding inside a partitioned block.
//!
//! Identifies the address ranges of the parent that no subnet uses, expressed
//! as the biggest aligned CIDR blocks that fit.

use crate::error::PlanError;
use crate::models::{block_size, lo_mask, Ipv4, MAX_LENGTH};
use std::net::Ipv4Addr;

/// List the unused parts of `parent` around the `allocated` blocks.
///
/// Allocated blocks must lie inside `parent` and must not overlap.
pub fn find_reserved(parent: Ipv4, allocated: &[Ipv4]) -> Result<Vec<Ipv4>, PlanError> {
    let mut sorted = allocated.to_vec();
    sorted.sort();

    let mut reserved = Vec::new();
    let mut next_ip = u64::from(u32::from(parent.lo()));
    let parent_end = next_ip + parent.size();

    for block in &sorted {
        if !parent.contains_block(block) {
            return Err(PlanError::InvalidPartition {
                parent,
                reason: format!("{block} is outside the parent"),
            });
        }
        let block_start = u64::from(u32::from(block.lo()));
        if block_start < next_ip {
            return Err(PlanError::InvalidPartition {
                parent,
                reason: format!("{block} overlaps an earlier block"),
            });
        }
        fill_gap(&mut reserved, next_ip, block_start, parent.mask);
        next_ip = block_start + block.size();
    }
    fill_gap(&mut reserved, next_ip, parent_end, parent.mask);

    log::debug!("{parent}: {} reserved blocks", reserved.len());
    Ok(reserved)
}

/// Cover `[start, end)` with the biggest aligned blocks, left to right.
fn fill_gap(reserved: &mut Vec<Ipv4>, mut start: u64, end: u64, start_mask: u8) {
    while start < end {
        let mask = find_biggest_subnet(start, start_mask, end);
        reserved.push(Ipv4 {
            addr: Ipv4Addr::from(start as u32),
            mask,
        });
        start += block_size(mask);
    }
}

/// Find the shortest prefix for a block starting at `start_ip` that ends before `end`.
///
/// The returned mask is constrained by:
/// 1. The `start_mask` parameter (won't return a shorter prefix)
/// 2. The IP alignment - `start_ip` must be a valid network address for the mask
/// 3. The block must not reach `end`
fn find_biggest_subnet(start_ip: u64, start_mask: u8, end: u64) -> u8 {
    let min_mask_for_alignment = lo_mask(Ipv4Addr::from(start_ip as u32));
    let mut next_mask = start_mask.max(min_mask_for_alignment);

    while next_mask < MAX_LENGTH && start_ip + block_size(next_mask) > end {
        next_mask += 1;
    }
    next_mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::partition;

    fn cidrs(blocks: &[Ipv4]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_find_biggest_subnet() {
        let start = u64::from(u32::from(Ipv4Addr::new(10, 0, 0, 0)));
        let end = u64::from(u32::from(Ipv4Addr::new(10, 0, 1, 0)));
        assert_eq!(24, find_biggest_subnet(start, 8, end));
        assert_eq!(28, find_biggest_subnet(start, 28, end));

        // 10.11.12.16 has 4 trailing zeros, so min mask = 28
        let start = u64::from(u32::from(Ipv4Addr::new(10, 11, 12, 16)));
        let end = u64::from(u32::from(Ipv4Addr::new(10, 11, 16, 0)));
        assert_eq!(28, find_biggest_subnet(start, 8, end));

        let start = u64::from(u32::from(Ipv4Addr::new(10, 11, 12, 0)));
        assert_eq!(22, find_biggest_subnet(start, 8, end));
    }

    #[test]
    fn test_reserved_after_six_subnets() {
        let parent = Ipv4::new("10.0.0.0/16").unwrap();
        let blocks = partition(parent, 6).unwrap();
        let reserved = find_reserved(parent, &blocks).unwrap();
        assert_eq!(cidrs(&reserved), vec!["10.0.192.0/18"]);
    }

    #[test]
    fn test_reserved_after_five_subnets() {
        let parent = Ipv4::new("10.0.0.0/16").unwrap();
        let blocks = partition(parent, 5).unwrap();
        let reserved = find_reserved(parent, &blocks).unwrap();
        assert_eq!(cidrs(&reserved), vec!["10.0.160.0/19", "10.0.192.0/18"]);
    }

    #[test]
    fn test_reserved_full_partition() {
        let parent = Ipv4::new("10.0.0.0/16").unwrap();
        let blocks = partition(parent, 4).unwrap();
        assert!(find_reserved(parent, &blocks).unwrap().is_empty());
    }

    #[test]
    fn test_reserved_gap_between_blocks() {
        let parent = Ipv4::new("10.0.0.0/24").unwrap();
        let blocks = vec![
            Ipv4::new("10.0.0.0/26").unwrap(),
            Ipv4::new("10.0.0.192/26").unwrap(),
        ];
        let reserved = find_reserved(parent, &blocks).unwrap();
        assert_eq!(cidrs(&reserved), vec!["10.0.0.64/26", "10.0.0.128/26"]);
    }

    #[test]
    fn test_reserved_top_of_space() {
        let parent = Ipv4::new("255.255.255.0/24").unwrap();
        let blocks = vec![Ipv4::new("255.255.255.0/25").unwrap()];
        let reserved = find_reserved(parent, &blocks).unwrap();
        assert_eq!(cidrs(&reserved), vec!["255.255.255.128/25"]);
    }

    #[test]
    fn test_reserved_rejects_outside_block() {
        let parent = Ipv4::new("10.0.0.0/24").unwrap();
        let blocks = vec![Ipv4::new("10.0.1.0/26").unwrap()];
        assert!(find_reserved(parent, &blocks).is_err());
    }
}
