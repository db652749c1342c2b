//! Error type shared by planning, graph building and apply.

use crate::models::Ipv4;
use thiserror::Error as ThisError;

/// Errors raised while planning or applying a network.
///
/// None of these are retryable: the input (or the configuration) has to change.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PlanError {
    /// Malformed CIDR text, prefix length outside 0..=32 or host bits set.
    #[error("invalid CIDR: {0}")]
    Format(String),

    /// The parent block is too small for the requested number of subnets.
    #[error("cannot fit {count} subnets in {parent}: /{prefix} is smaller than the /{max} minimum")]
    Capacity {
        parent: Ipv4,
        count: usize,
        prefix: u32,
        max: u8,
    },

    #[error("no subnets requested")]
    EmptyRequest,

    #[error("invalid partition of {parent}: {reason}")]
    InvalidPartition { parent: Ipv4, reason: String },

    #[error("{blocks} subnet blocks cannot be paired with {zones} availability zones")]
    ZoneMismatch { blocks: usize, zones: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("resource graph error: {0}")]
    Graph(String),

    #[error("{consumer}: unresolved reference {resource}.{attribute}")]
    UnresolvedReference {
        consumer: String,
        resource: String,
        attribute: String,
    },

    #[error("failed to provision {resource}: {message}")]
    Provision { resource: String, message: String },
}
