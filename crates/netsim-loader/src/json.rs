//! A JSON (de)serialization path for a [`Network`]'s declarative inputs — nodes, circuits,
//! demands, LSPs, SRLGs — for programmatic and test use, alongside the TSV loader. Only the
//! declarative inputs round-trip; derived state (`reserved_bandwidth`, `traffic`, routed `path`)
//! is not part of the document and is recomputed by the caller's next `simulate()` call, per §9's
//! "path as a variant" note: the document is a snapshot of inputs, not of simulated state.

use std::collections::HashMap;
use std::path::Path;

use netsim_core::{Bandwidth, Cost, Network, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// The declarative document form of a [`Network`]: everything needed to rebuild it, none of the
/// derived simulation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub nodes: Vec<NodeDoc>,
    pub circuits: Vec<CircuitDoc>,
    pub demands: Vec<DemandDoc>,
    pub lsps: Vec<LspDoc>,
    pub srlgs: Vec<SrlgDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    #[serde(default)]
    pub failed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitDoc {
    pub circuit_id: String,
    pub node_a: String,
    pub node_b: String,
    pub name_a: String,
    pub name_b: String,
    pub cost_a: u32,
    pub cost_b: u32,
    pub capacity: f64,
    #[serde(default)]
    pub failed: bool,
    #[serde(default = "default_true")]
    pub rsvp_enabled_a: bool,
    #[serde(default = "default_true")]
    pub rsvp_enabled_b: bool,
    #[serde(default = "default_hundred")]
    pub percent_reservable_bandwidth_a: f64,
    #[serde(default = "default_hundred")]
    pub percent_reservable_bandwidth_b: f64,
}

fn default_true() -> bool {
    true
}

fn default_hundred() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandDoc {
    pub name: String,
    pub source: String,
    pub dest: String,
    pub traffic: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LspDoc {
    pub name: String,
    pub source: String,
    pub dest: String,
    pub configured_setup_bandwidth: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrlgDoc {
    pub name: String,
    pub nodes: Vec<String>,
    /// `(node_name, interface_name)` pairs, since interface names are only unique per node.
    pub interfaces: Vec<(String, String)>,
    #[serde(default)]
    pub failed: bool,
}

/// Reads a [`NetworkDocument`] from `path` and builds a [`Network`] from it.
pub fn load_network_json(path: impl AsRef<Path>, seed: u64) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: NetworkDocument = serde_json::from_str(&contents)?;
    build_network(&doc, seed)
}

/// Builds a [`Network`] from an in-memory [`NetworkDocument`].
pub fn build_network(doc: &NetworkDocument, seed: u64) -> Result<Network, LoadError> {
    let mut network = Network::builder().seed(seed).build();
    let mut node_ids: HashMap<&str, NodeId> = HashMap::new();

    for node in &doc.nodes {
        let id = network.add_node(node.name.clone())?;
        node_ids.insert(&node.name, id);
        if let (Some(lon), Some(lat)) = (node.lon, node.lat) {
            network.set_node_location(id, lon, lat);
        }
        if node.failed {
            network.fail_node(id);
        }
    }

    for circuit in &doc.circuits {
        let node_a = lookup(&node_ids, &circuit.node_a)?;
        let node_b = lookup(&node_ids, &circuit.node_b)?;
        let (ia, ib) = network.add_circuit(
            node_a,
            node_b,
            circuit.name_a.clone(),
            circuit.name_b.clone(),
            Cost::new(circuit.cost_a),
            Cost::new(circuit.cost_b),
            Bandwidth::new(circuit.capacity),
            circuit.failed,
            circuit.circuit_id.clone(),
        )?;
        if let Some(iface) = network.interface_mut(ia) {
            iface.rsvp_enabled = circuit.rsvp_enabled_a;
            iface.percent_reservable_bandwidth = circuit.percent_reservable_bandwidth_a;
        }
        if let Some(iface) = network.interface_mut(ib) {
            iface.rsvp_enabled = circuit.rsvp_enabled_b;
            iface.percent_reservable_bandwidth = circuit.percent_reservable_bandwidth_b;
        }
    }

    for demand in &doc.demands {
        let source = lookup(&node_ids, &demand.source)?;
        let dest = lookup(&node_ids, &demand.dest)?;
        network.add_demand(demand.name.clone(), source, dest, Bandwidth::new(demand.traffic))?;
    }

    for lsp in &doc.lsps {
        let source = lookup(&node_ids, &lsp.source)?;
        let dest = lookup(&node_ids, &lsp.dest)?;
        network.add_lsp(
            lsp.name.clone(),
            source,
            dest,
            lsp.configured_setup_bandwidth.map(Bandwidth::new),
        )?;
    }

    for srlg in &doc.srlgs {
        let id = network.add_srlg(srlg.name.clone());
        for node_name in &srlg.nodes {
            network.srlg_add_node(id, lookup(&node_ids, node_name)?);
        }
        for (node_name, iface_name) in &srlg.interfaces {
            let node = lookup(&node_ids, node_name)?;
            let iface = network.interface_by_name(node, iface_name).ok_or_else(|| {
                LoadError::UnknownNode {
                    kind: "srlg interface",
                    name: srlg.name.clone(),
                    node: format!("{node_name}/{iface_name}"),
                }
            })?;
            network.srlg_add_interface(id, iface);
        }
        if srlg.failed {
            network.fail_srlg(id);
        }
    }

    Ok(network)
}

fn lookup(node_ids: &HashMap<&str, NodeId>, name: &str) -> Result<NodeId, LoadError> {
    node_ids.get(name).copied().ok_or_else(|| LoadError::UnknownNode {
        kind: "reference",
        name: name.to_string(),
        node: name.to_string(),
    })
}
