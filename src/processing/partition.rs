//! Subnet partitioning.
//!
//! Splits one network block into `count` equally sized child blocks using
//! 32-bit integer arithmetic on the base address.

use crate::error::PlanError;
use crate::models::{block_size, Ipv4};
use std::net::Ipv4Addr;

/// Longest prefix a partition may produce. A /30 is the smallest block that
/// still has usable addresses under this scheme.
pub const MAX_SUBNET_PREFIX: u8 = 30;

/// Number of prefix bits needed to address `count` subnets: ceil(log2(count)).
///
/// Returns `None` when `count` has no power of two above it in `usize`.
pub fn extra_bits(count: usize) -> Option<u8> {
    count
        .checked_next_power_of_two()
        .map(|slots| slots.trailing_zeros() as u8)
}

/// Split `parent` into `count` non-overlapping blocks of one uniform size.
///
/// Blocks are returned in increasing address order; block `i` starts at
/// `parent + i * 2^(32 - child_prefix)`. When `count` is not a power of two
/// the trailing slots are left unallocated.
///
/// # Examples
/// ```
/// use vpc_subnet_plan::models::Ipv4;
/// use vpc_subnet_plan::processing::partition;
/// let blocks = partition(Ipv4::new("10.0.0.0/16").unwrap(), 6).unwrap();
/// assert_eq!(blocks[1].to_string(), "10.0.32.0/19");
/// ```
pub fn partition(parent: Ipv4, count: usize) -> Result<Vec<Ipv4>, PlanError> {
    if count == 0 {
        return Err(PlanError::EmptyRequest);
    }
    if !parent.is_canonical() {
        return Err(PlanError::Format(format!(
            "{parent} has host bits set, expected {}",
            parent.network()
        )));
    }

    let capacity_error = |prefix: u32| PlanError::Capacity {
        parent,
        count,
        prefix,
        max: MAX_SUBNET_PREFIX,
    };
    let extra = extra_bits(count).ok_or_else(|| capacity_error(u32::MAX))?;
    let child_prefix = u32::from(parent.mask) + u32::from(extra);
    if child_prefix > u32::from(MAX_SUBNET_PREFIX) {
        return Err(capacity_error(child_prefix));
    }

    let child_mask = child_prefix as u8;
    let step = block_size(child_mask);
    let base = u64::from(u32::from(parent.addr));

    let blocks: Vec<Ipv4> = (0..count as u64)
        .map(|i| Ipv4 {
            addr: Ipv4Addr::from((base + i * step) as u32),
            mask: child_mask,
        })
        .collect();

    log::debug!(
        "partition({parent}, {count}) => {} x /{child_mask} ({} slots unused)",
        blocks.len(),
        (1usize << extra) - count
    );
    Ok(blocks)
}
