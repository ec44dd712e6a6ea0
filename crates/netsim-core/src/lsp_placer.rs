//! RSVP-TE LSP placement: CSPF over reservable bandwidth, fewest-hops tie-break, and random
//! tie-break among the survivors, followed by commit of the interface-level reservation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Interface, InterfaceId, Lsp};
use crate::graph::TopologyGraph;
use crate::pathenum::ecmp_interface_paths_filtered;
use crate::units::Bandwidth;

/// The result of attempting to place one LSP: either a concrete path plus the setup bandwidth
/// that was actually reserved on it, or a failure to find any feasible path.
pub enum Placement {
    Routed {
        interfaces: Vec<InterfaceId>,
        setup_bandwidth: Bandwidth,
    },
    Unrouted,
}

/// Places a single LSP given its requested setup bandwidth. `interfaces` must reflect reservable
/// bandwidth *before* this LSP's own (stale) reservation is counted — callers release an LSP's
/// prior reservation before calling this again for the same LSP.
pub fn place_lsp(
    graph: &TopologyGraph,
    interfaces: &[Interface],
    lsp: &Lsp,
    requested_bandwidth: Bandwidth,
    rng: &mut impl Rng,
) -> Placement {
    let feasible = |iface: InterfaceId| {
        interfaces
            .get(iface.inner())
            .is_some_and(|i| i.rsvp_enabled && i.reservable_bandwidth() >= requested_bandwidth)
    };

    // Materialize every concrete feasible path first, then draw uniformly among the fewest-hop
    // ones. Picking a node-hop path and then an edge per hop independently would over-weight
    // paths whose hops have fewer parallel feasible edges.
    let mut candidates = ecmp_interface_paths_filtered(graph, lsp.source_node, lsp.dest_node, &feasible);
    if candidates.is_empty() {
        return Placement::Unrouted;
    }

    let fewest_hops = candidates.iter().map(|p| p.len()).min().unwrap();
    candidates.retain(|p| p.len() == fewest_hops);
    candidates.shuffle(rng);
    let chosen = candidates.swap_remove(0);

    Placement::Routed {
        interfaces: chosen,
        setup_bandwidth: requested_bandwidth,
    }
}
