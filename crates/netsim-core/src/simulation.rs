//! [`Network`]: the arena holding every entity, the mutators that build and fail/unfail a
//! topology, and `simulate()` — the single entry point that re-runs C5 (LSP placement), C6
//! (demand routing) and C4 (validation) from scratch on every call.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::{FxHashMap, FxHashSet};
use typed_builder::TypedBuilder;

use crate::demand_router;
use crate::entities::{
    BwState, Circuit, Demand, DemandId, DemandPath, Interface, InterfaceId, Lsp, LspId, LspPath,
    Node, NodeId, Srlg, SrlgId,
};
use crate::error::{ModelConstructionError, SimulationError};
use crate::lsp_placer::{self, Placement};
use crate::pathenum::ecmp_interface_paths;
use crate::units::{Bandwidth, Cost};
use crate::validate;

/// One shortest-path query's result: the common cost of every returned path, and the concrete
/// interface sequences realizing it.
#[derive(Debug, Clone, Default)]
pub struct PathQueryResult {
    pub cost: Option<Cost>,
    pub paths: Vec<Vec<InterfaceId>>,
}

/// The full declarative topology plus its current simulated state. Cyclic references
/// (interface <-> node, circuit <-> interface) are represented as arena indices rather than
/// pointers, so there is nothing here that can form a reference cycle.
#[derive(Debug, TypedBuilder)]
pub struct Network {
    /// Seeds the tie-break RNG; reseeded at the start of every [`simulate`](Self::simulate) call
    /// so repeated ticks are bit-identical.
    #[builder(default = 0)]
    seed: u64,
    /// When true, `add_circuit` rejects a second circuit between a node pair already connected.
    #[builder(default = false)]
    simple_link_model: bool,

    #[builder(default, setter(skip))]
    nodes: Vec<Node>,
    #[builder(default, setter(skip))]
    interfaces: Vec<Interface>,
    #[builder(default, setter(skip))]
    circuits: Vec<Circuit>,
    #[builder(default, setter(skip))]
    demands: Vec<Demand>,
    #[builder(default, setter(skip))]
    lsps: Vec<Lsp>,
    #[builder(default, setter(skip))]
    srlgs: Vec<Srlg>,

    #[builder(default, setter(skip))]
    node_names: FxHashMap<String, NodeId>,
    #[builder(default, setter(skip))]
    circuit_ids: FxHashSet<String>,
    #[builder(default, setter(skip))]
    demand_names: FxHashSet<(NodeId, String)>,
    #[builder(default, setter(skip))]
    lsp_names: FxHashSet<(NodeId, String)>,

    #[builder(default = StdRng::seed_from_u64(0), setter(skip))]
    rng: StdRng,
}

/// Identical behavior to [`Network`]; the source material's `Parallel_Link_Model` is not a
/// distinct engine, just a name for this same parallel-link-capable core.
pub type ParallelLinkModel = Network;

impl Network {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn lsps(&self) -> &[Lsp] {
        &self.lsps
    }

    pub fn srlgs(&self) -> &[Srlg] {
        &self.srlgs
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn interface_by_name(&self, node: NodeId, name: &str) -> Option<InterfaceId> {
        self.interfaces
            .iter()
            .find(|i| i.node == node && i.name == name)
            .map(|i| i.id)
    }

    pub fn lsp_by_name(&self, source_node: NodeId, name: &str) -> Option<LspId> {
        self.lsps
            .iter()
            .find(|l| l.source_node == source_node && l.name == name)
            .map(|l| l.id)
    }

    fn node_name(&self, id: NodeId) -> String {
        self.nodes
            .get(id.inner())
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    fn interface_name_taken(&self, node: NodeId, name: &str) -> bool {
        self.interfaces
            .iter()
            .any(|i| i.node == node && i.name == name)
    }

    fn circuit_exists_between(&self, a: NodeId, b: NodeId) -> bool {
        self.interfaces
            .iter()
            .any(|i| (i.node == a && i.remote_node == b) || (i.node == b && i.remote_node == a))
    }

    // -- construction -----------------------------------------------------

    pub fn add_node(&mut self, name: impl Into<String>) -> Result<NodeId, ModelConstructionError> {
        let name = name.into();
        if self.node_names.contains_key(&name) {
            return Err(ModelConstructionError::DuplicateNodeName(name));
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(id, name.clone()));
        self.node_names.insert(name, id);
        Ok(id)
    }

    pub fn set_node_location(&mut self, id: NodeId, lon: f64, lat: f64) {
        if let Some(node) = self.nodes.get_mut(id.inner()) {
            node.lon = Some(lon);
            node.lat = Some(lat);
        }
    }

    /// Creates a circuit: two interfaces, one per endpoint, oriented opposite each other and
    /// bonded by `circuit_id`. `circuit_id` must not already be in use.
    #[allow(clippy::too_many_arguments)]
    pub fn add_circuit(
        &mut self,
        node_a: NodeId,
        node_b: NodeId,
        name_a: impl Into<String>,
        name_b: impl Into<String>,
        cost_a: Cost,
        cost_b: Cost,
        capacity: Bandwidth,
        failed: bool,
        circuit_id: impl Into<String>,
    ) -> Result<(InterfaceId, InterfaceId), ModelConstructionError> {
        let name_a = name_a.into();
        let name_b = name_b.into();
        let circuit_id = circuit_id.into();

        if self.circuit_ids.contains(&circuit_id) {
            return Err(ModelConstructionError::DuplicateCircuitId(circuit_id));
        }
        if self.simple_link_model && self.circuit_exists_between(node_a, node_b) {
            return Err(ModelConstructionError::ParallelCircuitForbidden {
                node_a: self.node_name(node_a),
                node_b: self.node_name(node_b),
            });
        }
        if self.interface_name_taken(node_a, &name_a) {
            return Err(ModelConstructionError::DuplicateInterfaceName {
                node: self.node_name(node_a),
                interface: name_a,
            });
        }
        if self.interface_name_taken(node_b, &name_b) {
            return Err(ModelConstructionError::DuplicateInterfaceName {
                node: self.node_name(node_b),
                interface: name_b,
            });
        }

        let id_a = InterfaceId::new(self.interfaces.len());
        self.interfaces.push(Interface {
            id: id_a,
            name: name_a,
            node: node_a,
            remote_node: node_b,
            cost: cost_a,
            capacity,
            circuit_id: circuit_id.clone(),
            rsvp_enabled: true,
            percent_reservable_bandwidth: 100.0,
            srlgs: FxHashSet::default(),
            independently_failed: failed,
            reserved_bandwidth: Bandwidth::ZERO,
            traffic: Bandwidth::ZERO,
        });
        let id_b = InterfaceId::new(self.interfaces.len());
        self.interfaces.push(Interface {
            id: id_b,
            name: name_b,
            node: node_b,
            remote_node: node_a,
            cost: cost_b,
            capacity,
            circuit_id: circuit_id.clone(),
            rsvp_enabled: true,
            percent_reservable_bandwidth: 100.0,
            srlgs: FxHashSet::default(),
            independently_failed: failed,
            reserved_bandwidth: Bandwidth::ZERO,
            traffic: Bandwidth::ZERO,
        });
        self.circuit_ids.insert(circuit_id);
        self.circuits.push(Circuit { a: id_a, b: id_b });
        Ok((id_a, id_b))
    }

    pub fn interface_mut(&mut self, id: InterfaceId) -> Option<&mut Interface> {
        self.interfaces.get_mut(id.inner())
    }

    pub fn add_demand(
        &mut self,
        name: impl Into<String>,
        source_node: NodeId,
        dest_node: NodeId,
        traffic: Bandwidth,
    ) -> Result<DemandId, ModelConstructionError> {
        let name = name.into();
        let key = (source_node, name.clone());
        if self.demand_names.contains(&key) {
            return Err(ModelConstructionError::DuplicateDemandName(name));
        }
        let id = DemandId::new(self.demands.len());
        self.demands.push(Demand {
            id,
            name: name.clone(),
            source_node,
            dest_node,
            traffic,
            path: DemandPath::Unrouted,
        });
        self.demand_names.insert(key);
        Ok(id)
    }

    pub fn add_lsp(
        &mut self,
        name: impl Into<String>,
        source_node: NodeId,
        dest_node: NodeId,
        configured_setup_bandwidth: Option<Bandwidth>,
    ) -> Result<LspId, ModelConstructionError> {
        let name = name.into();
        let key = (source_node, name.clone());
        if self.lsp_names.contains(&key) {
            return Err(ModelConstructionError::DuplicateLspName(name));
        }
        let id = LspId::new(self.lsps.len());
        self.lsps.push(Lsp {
            id,
            name: name.clone(),
            source_node,
            dest_node,
            configured_setup_bandwidth,
            path: LspPath::Unrouted,
            setup_bandwidth: BwState::Unrouted,
            reserved_bandwidth: BwState::Unrouted,
        });
        self.lsp_names.insert(key);
        Ok(id)
    }

    pub fn add_srlg(&mut self, name: impl Into<String>) -> SrlgId {
        let id = SrlgId::new(self.srlgs.len());
        self.srlgs.push(Srlg::new(id, name.into()));
        id
    }

    pub fn srlg_add_node(&mut self, srlg: SrlgId, node: NodeId) {
        if let Some(s) = self.srlgs.get_mut(srlg.inner()) {
            s.nodes.insert(node);
        }
        if let Some(n) = self.nodes.get_mut(node.inner()) {
            n.srlgs.insert(srlg);
        }
    }

    pub fn srlg_add_interface(&mut self, srlg: SrlgId, interface: InterfaceId) {
        if let Some(s) = self.srlgs.get_mut(srlg.inner()) {
            s.interfaces.insert(interface);
        }
        if let Some(i) = self.interfaces.get_mut(interface.inner()) {
            i.srlgs.insert(srlg);
        }
    }

    // -- failure injection -------------------------------------------------

    pub fn fail_interface(&mut self, id: InterfaceId) {
        if let Some(i) = self.interfaces.get_mut(id.inner()) {
            i.independently_failed = true;
        }
    }

    pub fn unfail_interface(&mut self, id: InterfaceId) {
        if let Some(i) = self.interfaces.get_mut(id.inner()) {
            i.independently_failed = false;
        }
    }

    pub fn fail_node(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id.inner()) {
            n.independently_failed = true;
        }
    }

    pub fn unfail_node(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id.inner()) {
            n.independently_failed = false;
        }
    }

    pub fn fail_srlg(&mut self, id: SrlgId) {
        if let Some(s) = self.srlgs.get_mut(id.inner()) {
            s.failed = true;
        }
    }

    pub fn unfail_srlg(&mut self, id: SrlgId) {
        if let Some(s) = self.srlgs.get_mut(id.inner()) {
            s.failed = false;
        }
    }

    fn node_failed(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id.inner()) else {
            return false;
        };
        node.independently_failed
            || node
                .srlgs
                .iter()
                .any(|s| self.srlgs.get(s.inner()).is_some_and(|s| s.failed))
    }

    fn interface_failed(&self, id: InterfaceId) -> bool {
        let Some(iface) = self.interfaces.get(id.inner()) else {
            return false;
        };
        if self.node_failed(iface.node) || self.node_failed(iface.remote_node) {
            return true;
        }
        iface.independently_failed
            || iface
                .srlgs
                .iter()
                .any(|s| self.srlgs.get(s.inner()).is_some_and(|s| s.failed))
    }

    // -- graph construction (C2) -------------------------------------------

    fn build_graph(
        &self,
        include_failed: bool,
        needed_bw: Bandwidth,
        rsvp_required: bool,
    ) -> crate::graph::TopologyGraph {
        let mut builder = crate::graph::TopologyGraph::builder();
        for node in &self.nodes {
            builder.add_node(node.id);
        }
        for iface in &self.interfaces {
            let eligible = (include_failed || !self.interface_failed(iface.id))
                && iface.reservable_bandwidth() >= needed_bw
                && (!rsvp_required || iface.rsvp_enabled);
            if eligible {
                builder.add_interface(iface.id, iface.node, iface.remote_node, iface.cost);
            }
        }
        builder.build()
    }

    // -- queries (§6) --------------------------------------------------------

    pub fn shortest_path(
        &self,
        source: NodeId,
        dest: NodeId,
        needed_bw: Bandwidth,
    ) -> PathQueryResult {
        let graph = self.build_graph(false, needed_bw, false);
        let paths = ecmp_interface_paths(&graph, source, dest);
        let cost = if source == dest {
            Some(Cost::ZERO)
        } else {
            paths
                .first()
                .map(|p| p.iter().map(|i| self.interfaces[i.inner()].cost).sum())
        };
        PathQueryResult { cost, paths }
    }

    pub fn all_paths_reservable_bw(
        &self,
        source: NodeId,
        dest: NodeId,
        include_failed: bool,
        cutoff_hops: usize,
        needed_bw: Bandwidth,
    ) -> Vec<Vec<InterfaceId>> {
        let graph = self.build_graph(include_failed, needed_bw, false);
        graph.simple_paths(source, dest, cutoff_hops)
    }

    // -- simulation driver (C7) ----------------------------------------------

    /// Runs one full simulation tick: reset, place LSPs (C5), route demands (C6), validate (C4).
    /// Every call is a full re-simulation; no state from a previous tick is carried forward
    /// except the declarative topology and failure/SRLG overrides.
    pub fn simulate(&mut self) -> Result<(), SimulationError> {
        self.rng = StdRng::seed_from_u64(self.seed);

        debug!("resetting interface counters and lsp/demand path state");
        for iface in &mut self.interfaces {
            iface.reserved_bandwidth = Bandwidth::ZERO;
            iface.traffic = Bandwidth::ZERO;
        }
        for lsp in &mut self.lsps {
            lsp.path = LspPath::Unrouted;
            lsp.setup_bandwidth = BwState::Unrouted;
            lsp.reserved_bandwidth = BwState::Unrouted;
        }
        for demand in &mut self.demands {
            demand.path = DemandPath::Unrouted;
        }

        info!("placing lsps");
        self.place_all_lsps();

        info!("routing demands");
        self.route_all_demands();

        debug!("validating");
        match validate::validate(&self.nodes, &self.interfaces, &self.demands, &self.lsps, &self.srlgs)
        {
            Ok(circuits) => {
                self.circuits = circuits;
                Ok(())
            }
            Err(err) => Err(SimulationError(err)),
        }
    }

    fn place_all_lsps(&mut self) {
        let mut groups: BTreeMap<(NodeId, NodeId), Vec<LspId>> = BTreeMap::new();
        for lsp in &self.lsps {
            groups
                .entry((lsp.source_node, lsp.dest_node))
                .or_default()
                .push(lsp.id);
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| self.lsps[a.inner()].name.cmp(&self.lsps[b.inner()].name));
        }

        for ((source, dest), group) in groups {
            let demand_total: Bandwidth = self
                .demands
                .iter()
                .filter(|d| d.source_node == source && d.dest_node == dest)
                .map(|d| d.traffic)
                .sum();
            // Only auto-bandwidth LSPs draw from the shared demand estimate; an LSP with a
            // configured_setup_bandwidth takes its own fixed share and isn't in the denominator.
            let auto_count = group
                .iter()
                .filter(|id| self.lsps[id.inner()].configured_setup_bandwidth.is_none())
                .count()
                .max(1);
            let per_lsp_traffic = demand_total.scale_by(1.0 / auto_count as f64);

            for lsp_id in group {
                let requested = self.lsps[lsp_id.inner()]
                    .configured_setup_bandwidth
                    .unwrap_or(per_lsp_traffic);
                let graph = self.build_graph(false, requested, true);
                let placement = lsp_placer::place_lsp(
                    &graph,
                    &self.interfaces,
                    &self.lsps[lsp_id.inner()],
                    requested,
                    &mut self.rng,
                );
                match placement {
                    Placement::Routed {
                        interfaces,
                        setup_bandwidth,
                    } => {
                        let baseline_path_cost: Cost =
                            interfaces.iter().map(|i| self.interfaces[i.inner()].cost).sum();
                        for &iface in &interfaces {
                            self.interfaces[iface.inner()].reserved_bandwidth += setup_bandwidth;
                        }
                        let lsp = &mut self.lsps[lsp_id.inner()];
                        info!(
                            "lsp {} routed via {} hops at setup_bandwidth {}",
                            lsp.name,
                            interfaces.len(),
                            setup_bandwidth
                        );
                        lsp.path = LspPath::Routed {
                            interfaces,
                            baseline_path_cost,
                        };
                        lsp.setup_bandwidth = BwState::Value(setup_bandwidth);
                        lsp.reserved_bandwidth = BwState::Value(setup_bandwidth);
                    }
                    Placement::Unrouted => {
                        let lsp = &mut self.lsps[lsp_id.inner()];
                        warn!("lsp {} unrouted (no eligible path)", lsp.name);
                        lsp.path = LspPath::Unrouted;
                        lsp.setup_bandwidth = BwState::Unrouted;
                        lsp.reserved_bandwidth = BwState::Unrouted;
                    }
                }
            }
        }
    }

    fn route_all_demands(&mut self) {
        let graph = self.build_graph(false, Bandwidth::ZERO, false);
        let demand_ids: Vec<DemandId> = self.demands.iter().map(|d| d.id).collect();
        for id in demand_ids {
            let (source, dest) = {
                let d = &self.demands[id.inner()];
                (d.source_node, d.dest_node)
            };
            let path = demand_router::route_demand(&graph, &self.lsps, source, dest);
            if matches!(path, DemandPath::Unrouted) {
                warn!("demand {} unrouted", self.demands[id.inner()].name);
            }
            self.demands[id.inner()].path = path;
        }

        let mut contributions: FxHashMap<InterfaceId, Bandwidth> = FxHashMap::default();
        for demand in &self.demands {
            for (iface, bw) in demand_router::demand_traffic_contributions(demand, &self.lsps) {
                *contributions.entry(iface).or_insert(Bandwidth::ZERO) += bw;
            }
        }
        for (iface, bw) in contributions {
            if let Some(i) = self.interfaces.get_mut(iface.inner()) {
                i.traffic = bw;
            }
        }
    }
}
