//! Expands shortest node-hop paths into concrete, interface-level ECMP path sets.
//!
//! Two node-hop paths through the same nodes can still correspond to many distinct interface
//! sequences when parallel circuits connect a pair of nodes at equal cost; this module takes the
//! per-hop Cartesian product of the minimum-cost edges to produce every one of them.

use itertools::Itertools;

use crate::entities::{InterfaceId, NodeId};
use crate::graph::{multi_predecessor_dijkstra, node_hop_paths, TopologyGraph};

/// All equal-cost-shortest interface-sequence paths from `source` to `dest` in `graph`.
///
/// Returns an empty vec if `dest` is unreachable from `source`, and `vec![vec![]]` if
/// `source == dest`.
pub fn ecmp_interface_paths(
    graph: &TopologyGraph,
    source: NodeId,
    dest: NodeId,
) -> Vec<Vec<InterfaceId>> {
    ecmp_interface_paths_filtered(graph, source, dest, &|_| true)
}

/// Like [`ecmp_interface_paths`], but only considering edges for which `edge_ok` holds — e.g. the
/// RSVP-bandwidth-feasible edges during LSP placement, which may admit a different (and
/// differently shortest) set of paths than the unfiltered topology.
pub fn ecmp_interface_paths_filtered(
    graph: &TopologyGraph,
    source: NodeId,
    dest: NodeId,
    edge_ok: &impl Fn(InterfaceId) -> bool,
) -> Vec<Vec<InterfaceId>> {
    if source == dest {
        return vec![Vec::new()];
    }
    let dijkstra = multi_predecessor_dijkstra(graph, source, edge_ok);
    let node_paths = node_hop_paths(&dijkstra, source, dest);

    let mut out = Vec::new();
    for node_path in node_paths {
        expand_node_path(graph, &node_path, edge_ok, &mut out);
    }
    out
}

/// Cartesian-products the per-hop minimum-cost *feasible* edge sets of one node-hop path into
/// every resulting interface sequence, appending each to `out`.
fn expand_node_path(
    graph: &TopologyGraph,
    node_path: &[NodeId],
    edge_ok: &impl Fn(InterfaceId) -> bool,
    out: &mut Vec<Vec<InterfaceId>>,
) {
    if node_path.len() < 2 {
        out.push(Vec::new());
        return;
    }
    let hop_edge_sets: Vec<Vec<InterfaceId>> = node_path
        .windows(2)
        .map(|pair| graph.min_cost_edges_filtered(pair[0], pair[1], edge_ok))
        .collect();

    if hop_edge_sets.iter().any(|set| set.is_empty()) {
        return;
    }

    out.extend(hop_edge_sets.into_iter().multi_cartesian_product());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Cost;

    fn node(n: usize) -> NodeId {
        NodeId::new(n)
    }

    fn iface(n: usize) -> InterfaceId {
        InterfaceId::new(n)
    }

    #[test]
    fn parallel_hops_cartesian_product_into_four_paths() {
        // 0 has two equal-cost edges to 1, and 1 has two equal-cost edges to 2: 2x2 = 4 paths.
        let mut b = TopologyGraph::builder();
        for n in 0..3 {
            b.add_node(node(n));
        }
        b.add_interface(iface(0), node(0), node(1), Cost::new(10));
        b.add_interface(iface(1), node(0), node(1), Cost::new(10));
        b.add_interface(iface(2), node(1), node(2), Cost::new(10));
        b.add_interface(iface(3), node(1), node(2), Cost::new(10));
        let g = b.build();

        let paths = ecmp_interface_paths(&g, node(0), node(2));
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn same_source_and_dest_yields_one_empty_path() {
        let g = TopologyGraph::builder().build();
        assert_eq!(ecmp_interface_paths(&g, node(0), node(0)), vec![Vec::new()]);
    }

    #[test]
    fn no_path_yields_empty_result() {
        let mut b = TopologyGraph::builder();
        b.add_node(node(0)).add_node(node(1));
        let g = b.build();
        assert!(ecmp_interface_paths(&g, node(0), node(1)).is_empty());
    }

    #[test]
    fn snapshot_of_a_diamond_topology_path_set() {
        // 0 -> {1, 2} -> 3, every edge cost 10: two node-disjoint equal-cost paths.
        let mut b = TopologyGraph::builder();
        for n in 0..4 {
            b.add_node(node(n));
        }
        b.add_interface(iface(0), node(0), node(1), Cost::new(10));
        b.add_interface(iface(1), node(1), node(3), Cost::new(10));
        b.add_interface(iface(2), node(0), node(2), Cost::new(10));
        b.add_interface(iface(3), node(2), node(3), Cost::new(10));
        let g = b.build();

        let mut paths = ecmp_interface_paths(&g, node(0), node(3));
        paths.sort();
        insta::assert_yaml_snapshot!("diamond_topology_paths", paths);
    }
}
