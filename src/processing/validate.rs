//! Partition result checks.
//!
//! Verifies what the caller relies on before blocks are handed to zones.

use crate::error::PlanError;
use crate::models::Ipv4;

/// Return an error if `blocks` is not a valid partition of `parent` into `count` blocks.
///
/// Checks the count, uniform prefix length, canonical form, containment in
/// `parent` and that no two blocks overlap.
pub fn check_partition(parent: Ipv4, count: usize, blocks: &[Ipv4]) -> Result<(), PlanError> {
    let invalid = |reason: String| PlanError::InvalidPartition { parent, reason };

    if blocks.len() != count {
        return Err(invalid(format!(
            "expected {count} blocks, got {}",
            blocks.len()
        )));
    }
    let Some(first) = blocks.first() else {
        return Ok(());
    };
    for block in blocks {
        if block.mask != first.mask {
            return Err(invalid(format!(
                "{block} is not a /{} like {first}",
                first.mask
            )));
        }
        if !block.is_canonical() {
            return Err(invalid(format!("{block} has host bits set")));
        }
        if !parent.contains_block(block) {
            return Err(invalid(format!("{block} is outside the parent")));
        }
    }

    // Sort a copy by start address, then only neighbours can overlap.
    let mut sorted = blocks.to_vec();
    sorted.sort();
    for pair in sorted.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(invalid(format!("{} overlaps {}", pair[0], pair[1])));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(cidrs: &[&str]) -> Vec<Ipv4> {
        cidrs.iter().map(|c| Ipv4::new(c).unwrap()).collect()
    }

    #[test]
    fn test_check_partition_ok() {
        let parent = Ipv4::new("10.0.0.0/16").unwrap();
        let b = blocks(&["10.0.0.0/18", "10.0.64.0/18", "10.0.128.0/18"]);
        assert!(check_partition(parent, 3, &b).is_ok());
        assert!(check_partition(parent, 0, &[]).is_ok());
    }

    #[test]
    fn test_check_partition_failures() {
        let parent = Ipv4::new("10.0.0.0/16").unwrap();

        let b = blocks(&["10.0.0.0/18", "10.0.64.0/18"]);
        assert!(matches!(
            check_partition(parent, 3, &b),
            Err(PlanError::InvalidPartition { .. })
        ));

        let b = blocks(&["10.0.0.0/18", "10.0.64.0/19"]);
        assert!(check_partition(parent, 2, &b).is_err());

        let b = blocks(&["10.0.0.0/18", "10.0.64.1/18"]);
        assert!(check_partition(parent, 2, &b).is_err());

        let b = blocks(&["10.0.0.0/18", "10.1.0.0/18"]);
        assert!(check_partition(parent, 2, &b).is_err());

        let b = blocks(&["10.0.64.0/18", "10.0.0.0/18", "10.0.64.0/18"]);
        let err = check_partition(parent, 3, &b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid partition of 10.0.0.0/16: 10.0.64.0/18 overlaps 10.0.64.0/18"
        );
    }
}
