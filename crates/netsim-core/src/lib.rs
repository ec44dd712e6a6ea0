#![warn(unreachable_pub, missing_debug_implementations)]
//! The simulation engine for a layer-3 IP/MPLS network: RSVP-TE LSP placement, IP ECMP demand
//! routing, and the topology validation that ties interfaces into circuits.
//!
//! [`Network`] is the arena holding every entity. Build one with mutators (`add_node`,
//! `add_circuit`, `add_demand`, `add_lsp`, SRLG helpers), then call [`Network::simulate`] to run
//! one tick of LSP placement, demand routing, and validation.

#[macro_use]
mod ident;

pub mod demand_router;
pub mod entities;
mod error;
pub mod graph;
pub mod lsp_placer;
pub mod pathenum;
mod simulation;
pub mod units;
pub mod validate;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod scenario_tests;

pub use entities::{
    BwState, Circuit, Demand, DemandId, DemandPath, Interface, InterfaceId, Lsp, LspId, LspPath,
    Node, NodeId, Srlg, SrlgId,
};
pub use error::{ModelConstructionError, SimulationError};
pub use simulation::{Network, ParallelLinkModel, PathQueryResult};
pub use units::{Bandwidth, Cost};
pub use validate::{ValidationError, ValidationIssue};
