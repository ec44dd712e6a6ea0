//! The IGP topology graph and the generic multi-predecessor Dijkstra that both the ECMP path
//! enumerator and the LSP placer build on.
//!
//! The graph is a [`petgraph::graph::DiGraph`], which natively allows parallel edges between the
//! same node pair — exactly what's needed to represent parallel circuits between two nodes
//! without inventing a custom multigraph type.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::entities::{InterfaceId, NodeId};
use crate::units::Cost;

/// Directed multigraph of the currently-up topology. Each edge is one up interface; its weight is
/// `(InterfaceId, Cost)` so callers can recover both the routing cost and the concrete interface
/// that cost came from.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    graph: DiGraph<NodeId, (InterfaceId, Cost)>,
    index_of: FxHashMap<NodeId, NodeIndex>,
}

impl TopologyGraph {
    pub fn builder() -> TopologyGraphBuilder {
        TopologyGraphBuilder::default()
    }

    pub fn node_index(&self, node: NodeId) -> Option<NodeIndex> {
        self.index_of.get(&node).copied()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.index_of.contains_key(&node)
    }

    fn node_id(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx]
    }

    /// Every up edge from `u` directly to `v`, regardless of cost.
    fn edges_between(&self, u: NodeIndex, v: NodeIndex) -> Vec<(InterfaceId, Cost)> {
        self.graph
            .edges_connecting(u, v)
            .map(|e| *e.weight())
            .collect()
    }

    /// Of the edges from `u` to `v`, those at the minimum cost among them.
    pub fn min_cost_edges(&self, u: NodeId, v: NodeId) -> Vec<InterfaceId> {
        self.min_cost_edges_filtered(u, v, |_| true)
    }

    /// Like [`min_cost_edges`](Self::min_cost_edges), but only considering edges for which
    /// `edge_ok` holds. Used by LSP placement to find the minimum-cost *feasible* edges at a
    /// hop, which may differ from the minimum-cost edges overall.
    pub fn min_cost_edges_filtered(
        &self,
        u: NodeId,
        v: NodeId,
        edge_ok: impl Fn(InterfaceId) -> bool,
    ) -> Vec<InterfaceId> {
        let (Some(ui), Some(vi)) = (self.node_index(u), self.node_index(v)) else {
            return Vec::new();
        };
        let edges: Vec<(InterfaceId, Cost)> = self
            .edges_between(ui, vi)
            .into_iter()
            .filter(|(iface, _)| edge_ok(*iface))
            .collect();
        let Some(min) = edges.iter().map(|(_, c)| *c).min() else {
            return Vec::new();
        };
        edges
            .into_iter()
            .filter(|(_, c)| *c == min)
            .map(|(iface, _)| iface)
            .collect()
    }

    /// Every simple (no repeated node) interface-sequence path from `source` to `dest` with at
    /// most `max_hops` edges, via depth-first search. Unlike [`min_cost_edges`], cost plays no
    /// role: every edge is a candidate, not just minimum-cost ones.
    pub fn simple_paths(
        &self,
        source: NodeId,
        dest: NodeId,
        max_hops: usize,
    ) -> Vec<Vec<InterfaceId>> {
        let mut out = Vec::new();
        let Some(source_idx) = self.node_index(source) else {
            return out;
        };
        let Some(dest_idx) = self.node_index(dest) else {
            return out;
        };
        let mut visited = vec![false; self.graph.node_count()];
        let mut acc = Vec::new();
        self.dfs_simple_paths(source_idx, dest_idx, max_hops, &mut visited, &mut acc, &mut out);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs_simple_paths(
        &self,
        current: NodeIndex,
        dest: NodeIndex,
        hops_left: usize,
        visited: &mut [bool],
        acc: &mut Vec<InterfaceId>,
        out: &mut Vec<Vec<InterfaceId>>,
    ) {
        if current == dest {
            out.push(acc.clone());
            return;
        }
        if hops_left == 0 {
            return;
        }
        visited[current.index()] = true;
        for edge in self.graph.edges_directed(current, Direction::Outgoing) {
            let next = edge.target();
            if visited[next.index()] {
                continue;
            }
            let (iface, _) = *edge.weight();
            acc.push(iface);
            self.dfs_simple_paths(next, dest, hops_left - 1, visited, acc, out);
            acc.pop();
        }
        visited[current.index()] = false;
    }
}

/// Incrementally assembles a [`TopologyGraph`] from the set of currently-up nodes and interfaces.
#[derive(Debug, Default)]
pub struct TopologyGraphBuilder {
    graph: DiGraph<NodeId, (InterfaceId, Cost)>,
    index_of: FxHashMap<NodeId, NodeIndex>,
}

impl TopologyGraphBuilder {
    pub fn add_node(&mut self, node: NodeId) -> &mut Self {
        self.index_of
            .entry(node)
            .or_insert_with(|| self.graph.add_node(node));
        self
    }

    /// Adds one directed edge for an up interface. Both endpoints must already have been added
    /// with [`add_node`](Self::add_node).
    pub fn add_interface(
        &mut self,
        interface: InterfaceId,
        from: NodeId,
        to: NodeId,
        cost: Cost,
    ) -> &mut Self {
        let (Some(&a), Some(&b)) = (self.index_of.get(&from), self.index_of.get(&to)) else {
            return self;
        };
        self.graph.add_edge(a, b, (interface, cost));
        self
    }

    pub fn build(self) -> TopologyGraph {
        TopologyGraph {
            graph: self.graph,
            index_of: self.index_of,
        }
    }
}

/// Distances and multi-predecessor sets from a single source, as computed by
/// [`multi_predecessor_dijkstra`].
#[derive(Debug, Default)]
pub struct DijkstraResult {
    pub dist: FxHashMap<NodeId, Cost>,
    pub preds: FxHashMap<NodeId, Vec<NodeId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    cost: Cost,
    node: NodeIndex,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest cost pops first.
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `source` that records, for every reachable node, *every* predecessor that
/// achieves the minimum distance to it (not just one), so downstream callers can enumerate all
/// equal-cost node-hop paths rather than a single arbitrary shortest path.
///
/// `edge_ok` filters which interfaces may be traversed at all (e.g. bandwidth-feasible-only for
/// LSP placement); it is evaluated once per candidate edge.
pub fn multi_predecessor_dijkstra(
    graph: &TopologyGraph,
    source: NodeId,
    edge_ok: impl Fn(InterfaceId) -> bool,
) -> DijkstraResult {
    let mut result = DijkstraResult::default();
    let Some(source_idx) = graph.node_index(source) else {
        return result;
    };

    let mut dist_idx: FxHashMap<NodeIndex, Cost> = FxHashMap::default();
    let mut heap = BinaryHeap::new();
    dist_idx.insert(source_idx, Cost::ZERO);
    heap.push(HeapEntry {
        cost: Cost::ZERO,
        node: source_idx,
    });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if dist_idx.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }
        for edge in graph.graph.edges_directed(node, Direction::Outgoing) {
            let (iface, edge_cost) = *edge.weight();
            if !edge_ok(iface) {
                continue;
            }
            let next = edge.target();
            let candidate = cost + edge_cost;
            match dist_idx.get(&next).copied() {
                Some(best) if candidate > best => {}
                Some(best) if candidate == best => {
                    let preds = result.preds.entry(graph.node_id(next)).or_default();
                    let from = graph.node_id(node);
                    if !preds.contains(&from) {
                        preds.push(from);
                    }
                }
                _ => {
                    dist_idx.insert(next, candidate);
                    result.preds.insert(graph.node_id(next), vec![graph.node_id(node)]);
                    heap.push(HeapEntry {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }
    }

    for (idx, cost) in dist_idx {
        result.dist.insert(graph.node_id(idx), cost);
    }
    result
}

/// Enumerates every node-hop sequence from `source` to `dest` that attains the shortest distance
/// recorded in `result`, by walking the multi-predecessor sets backward from `dest`.
pub fn node_hop_paths(result: &DijkstraResult, source: NodeId, dest: NodeId) -> Vec<Vec<NodeId>> {
    if source == dest {
        return vec![vec![source]];
    }
    if !result.dist.contains_key(&dest) {
        return Vec::new();
    }

    fn walk(
        result: &DijkstraResult,
        source: NodeId,
        current: NodeId,
        acc: &mut Vec<NodeId>,
        out: &mut Vec<Vec<NodeId>>,
    ) {
        acc.push(current);
        if current == source {
            let mut path = acc.clone();
            path.reverse();
            out.push(path);
        } else if let Some(preds) = result.preds.get(&current) {
            for &pred in preds {
                walk(result, source, pred, acc, out);
            }
        }
        acc.pop();
    }

    let mut out = Vec::new();
    let mut acc = Vec::new();
    walk(result, source, dest, &mut acc, &mut out);
    out
}
