//! Demand routing: an LSP mesh between a demand's endpoints always wins over IP ECMP, and traffic
//! is split evenly across whichever group of paths actually carries it.

use crate::entities::{Demand, DemandPath, InterfaceId, Lsp, LspId, NodeId};
use crate::graph::TopologyGraph;
use crate::pathenum::ecmp_interface_paths;
use crate::units::Bandwidth;

/// Routes one demand: prefers any routed LSPs between its endpoints, falling back to IP ECMP.
pub fn route_demand(
    graph: &TopologyGraph,
    lsps: &[Lsp],
    source: NodeId,
    dest: NodeId,
) -> DemandPath {
    let matching_lsps: Vec<LspId> = lsps
        .iter()
        .filter(|lsp| lsp.source_node == source && lsp.dest_node == dest && lsp.path.is_routed())
        .map(|lsp| lsp.id)
        .collect();

    if !matching_lsps.is_empty() {
        return DemandPath::ViaLsps(matching_lsps);
    }

    let ecmp = ecmp_interface_paths(graph, source, dest);
    if ecmp.is_empty() {
        DemandPath::Unrouted
    } else {
        DemandPath::ViaEcmp(ecmp)
    }
}

/// Resolves a routed demand's traffic into per-interface contributions, splitting evenly across
/// the group of LSPs or ECMP paths that carries it. A demand riding LSPs contributes along each
/// LSP's *entire* reserved interface sequence, not just its first hop.
pub fn demand_traffic_contributions(
    demand: &Demand,
    lsps: &[Lsp],
) -> Vec<(InterfaceId, Bandwidth)> {
    match &demand.path {
        DemandPath::Unrouted => Vec::new(),
        DemandPath::ViaLsps(ids) => {
            if ids.is_empty() {
                return Vec::new();
            }
            let share = demand.traffic.scale_by(1.0 / ids.len() as f64);
            ids.iter()
                .filter_map(|id| lsps.get(id.inner()))
                .flat_map(|lsp| lsp.path.interfaces().iter().map(move |&iface| (iface, share)))
                .collect()
        }
        DemandPath::ViaEcmp(paths) => {
            if paths.is_empty() {
                return Vec::new();
            }
            let share = demand.traffic.scale_by(1.0 / paths.len() as f64);
            paths
                .iter()
                .flat_map(|path| path.iter().map(move |&iface| (iface, share)))
                .collect()
        }
    }
}
