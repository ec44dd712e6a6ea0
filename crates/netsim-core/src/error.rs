//! The error boundary of `netsim-core`: construction errors (fatal, raised by mutators),
//! validation errors (the aggregate report from [`crate::validate`]), and the wrapper a
//! [`simulate`](crate::Network::simulate) call returns when the post-tick validation fails.
//! Unroutable LSPs/demands are never errors here — they're data, inspected via `path`.

use crate::validate::ValidationError;

/// Raised by mutators (`add_node`, `add_circuit`, `add_demand`, `add_lsp`) that would otherwise
/// violate a uniqueness constraint.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ModelConstructionError {
    #[error("node {0:?} already exists")]
    DuplicateNodeName(String),
    #[error("node {node:?} already has an interface named {interface:?}")]
    DuplicateInterfaceName { node: String, interface: String },
    #[error("circuit id {0:?} is already in use")]
    DuplicateCircuitId(String),
    #[error("demand {0:?} already exists for this source")]
    DuplicateDemandName(String),
    #[error("lsp {0:?} already exists for this source")]
    DuplicateLspName(String),
    #[error("a circuit already connects {node_a:?} and {node_b:?}, and the simple-link model forbids parallel circuits")]
    ParallelCircuitForbidden { node_a: String, node_b: String },
}

/// Raised by [`Network::simulate`](crate::Network::simulate) when the post-tick validation pass
/// finds any structural defect.
#[derive(Debug, Clone, thiserror::Error)]
#[error("simulation tick produced an invalid network: {0}")]
pub struct SimulationError(#[from] pub ValidationError);
