//! The tab-separated model-file reader (§6): `INTERFACES_TABLE`, `NODES_TABLE`, `DEMANDS_TABLE`,
//! and the optional `RSVP_LSP_TABLE`, each a header line, a tab-separated column line, and
//! tab-separated data rows, terminated by a blank line or end of file.
//!
//! Parsing (`parse_model_str`) is pure and filesystem-free so it can be unit tested directly;
//! [`load_model_file`] is the thin I/O wrapper callers actually use.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::info;
use netsim_core::{Bandwidth, Cost, Network, NodeId};

use crate::error::LoadError;

const INTERFACES: &str = "INTERFACES_TABLE";
const NODES: &str = "NODES_TABLE";
const DEMANDS: &str = "DEMANDS_TABLE";
const LSPS: &str = "RSVP_LSP_TABLE";

/// One row of `INTERFACES_TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRow {
    pub node: String,
    pub remote_node: String,
    pub name: String,
    pub cost: u32,
    pub capacity: f64,
    pub circuit_id: String,
    pub rsvp_enabled: bool,
    pub percent_reservable_bandwidth: f64,
}

/// One row of `NODES_TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub name: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

/// One row of `DEMANDS_TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRow {
    pub source: String,
    pub dest: String,
    pub traffic: f64,
    pub name: String,
}

/// One row of `RSVP_LSP_TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct LspRow {
    pub source: String,
    pub dest: String,
    pub name: String,
    pub configured_setup_bw: Option<f64>,
}

/// The parsed, not-yet-built contents of a model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDocument {
    pub interfaces: Vec<InterfaceRow>,
    pub nodes: Vec<NodeRow>,
    pub demands: Vec<DemandRow>,
    pub lsps: Vec<LspRow>,
}

/// Reads and parses a model file, then builds a [`Network`] from it. Does not call
/// [`Network::simulate`] — callers run that themselves once the model is loaded.
pub fn load_model_file(path: impl AsRef<Path>, seed: u64) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded model file {}", path.display());
    let doc = parse_model_str(&contents)?;
    build_network(&doc, seed)
}

/// Splits `contents` into blank-line-delimited blocks, each starting with a known section header,
/// and parses every row of every known table.
pub fn parse_model_str(contents: &str) -> Result<ModelDocument, LoadError> {
    let mut doc = ModelDocument::default();

    for block in blocks(contents) {
        let mut lines = block.iter();
        let Some(header) = lines.next() else {
            continue;
        };
        let columns: Vec<&str> = lines.next().map(|l| split_row(l)).unwrap_or_default();
        let rows: Vec<Vec<&str>> = lines.map(|l| split_row(l)).collect();

        match *header {
            INTERFACES => {
                for (i, row) in rows.iter().enumerate() {
                    doc.interfaces.push(parse_interface_row(&columns, row, i)?);
                }
            }
            NODES => {
                for (i, row) in rows.iter().enumerate() {
                    doc.nodes.push(parse_node_row(&columns, row, i)?);
                }
            }
            DEMANDS => {
                for (i, row) in rows.iter().enumerate() {
                    doc.demands.push(parse_demand_row(&columns, row, i)?);
                }
            }
            LSPS => {
                for (i, row) in rows.iter().enumerate() {
                    doc.lsps.push(parse_lsp_row(&columns, row, i)?);
                }
            }
            other => return Err(LoadError::UnknownSection(other.to_string())),
        }
    }

    Ok(doc)
}

/// Groups the non-blank lines of `contents` into one `Vec<&str>` per blank-line-separated block.
fn blocks(contents: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn split_row(line: &str) -> Vec<&str> {
    line.split('\t').map(|cell| cell.trim()).collect()
}

fn column_index(columns: &[&str], name: &str) -> Option<usize> {
    columns.iter().position(|c| *c == name)
}

fn required_cell<'a>(
    columns: &[&str],
    row: &[&'a str],
    section: &'static str,
    column: &'static str,
) -> Result<&'a str, LoadError> {
    let idx = column_index(columns, column).ok_or(LoadError::MissingColumn { section, column })?;
    Ok(row.get(idx).copied().unwrap_or(""))
}

fn optional_cell<'a>(columns: &[&str], row: &[&'a str], column: &str) -> Option<&'a str> {
    let idx = column_index(columns, column)?;
    row.get(idx).copied().filter(|c| !c.is_empty())
}

fn parse_f64(section: &'static str, row: usize, column: &'static str, value: &str) -> Result<f64, LoadError> {
    value.parse().map_err(|_| LoadError::BadValue {
        section,
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_u32(section: &'static str, row: usize, column: &'static str, value: &str) -> Result<u32, LoadError> {
    value.parse().map_err(|_| LoadError::BadValue {
        section,
        row,
        column,
        value: value.to_string(),
    })
}

/// `T`/`True`/`true` parse as true; everything else (including blank) is false, per §6.
fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "T"
}

fn parse_interface_row(columns: &[&str], row: &[&str], idx: usize) -> Result<InterfaceRow, LoadError> {
    let section = INTERFACES;
    let cost = parse_u32(section, idx, "cost", required_cell(columns, row, section, "cost")?)?;
    let capacity = parse_f64(
        section,
        idx,
        "capacity",
        required_cell(columns, row, section, "capacity")?,
    )?;
    let percent_reservable_bandwidth = match optional_cell(columns, row, "percent_reservable_bandwidth") {
        Some(v) => parse_f64(section, idx, "percent_reservable_bandwidth", v)?,
        None => 100.0,
    };
    Ok(InterfaceRow {
        node: required_cell(columns, row, section, "node_object_name")?.to_string(),
        remote_node: required_cell(columns, row, section, "remote_node_object_name")?.to_string(),
        name: required_cell(columns, row, section, "name")?.to_string(),
        cost,
        capacity,
        circuit_id: required_cell(columns, row, section, "circuit_id")?.to_string(),
        rsvp_enabled: optional_cell(columns, row, "rsvp_enabled")
            .map(parse_bool)
            .unwrap_or(true),
        percent_reservable_bandwidth,
    })
}

fn parse_node_row(columns: &[&str], row: &[&str], idx: usize) -> Result<NodeRow, LoadError> {
    let section = NODES;
    let lon = match optional_cell(columns, row, "lon") {
        Some(v) => Some(parse_f64(section, idx, "lon", v)?),
        None => None,
    };
    let lat = match optional_cell(columns, row, "lat") {
        Some(v) => Some(parse_f64(section, idx, "lat", v)?),
        None => None,
    };
    Ok(NodeRow {
        name: required_cell(columns, row, section, "name")?.to_string(),
        lon,
        lat,
    })
}

fn parse_demand_row(columns: &[&str], row: &[&str], idx: usize) -> Result<DemandRow, LoadError> {
    let section = DEMANDS;
    let traffic = parse_f64(
        section,
        idx,
        "traffic",
        required_cell(columns, row, section, "traffic")?,
    )?;
    Ok(DemandRow {
        source: required_cell(columns, row, section, "source")?.to_string(),
        dest: required_cell(columns, row, section, "dest")?.to_string(),
        traffic,
        name: required_cell(columns, row, section, "name")?.to_string(),
    })
}

fn parse_lsp_row(columns: &[&str], row: &[&str], idx: usize) -> Result<LspRow, LoadError> {
    let section = LSPS;
    let configured_setup_bw = match optional_cell(columns, row, "configured_setup_bw") {
        Some(v) => Some(parse_f64(section, idx, "configured_setup_bw", v)?),
        None => None,
    };
    Ok(LspRow {
        source: required_cell(columns, row, section, "source")?.to_string(),
        dest: required_cell(columns, row, section, "dest")?.to_string(),
        name: required_cell(columns, row, section, "name")?.to_string(),
        configured_setup_bw,
    })
}

/// Builds a [`Network`] from a parsed [`ModelDocument`]. Enforces the one load-time semantic
/// check named in §6 (every `circuit_id` appears exactly twice); everything else that could go
/// wrong with the resulting topology (mismatched capacities, asymmetric circuits, dangling
/// references) is left for [`Network::simulate`]'s validation pass to report, per §7's "construct
/// then validate" split.
pub fn build_network(doc: &ModelDocument, seed: u64) -> Result<Network, LoadError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &doc.interfaces {
        *counts.entry(row.circuit_id.as_str()).or_insert(0) += 1;
    }
    let violations: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count != 2)
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    if !violations.is_empty() {
        return Err(LoadError::BadCircuitArity(violations));
    }

    let mut network = Network::builder().seed(seed).build();
    let mut node_ids: BTreeMap<String, NodeId> = BTreeMap::new();

    let mut node_names: BTreeSet<String> = BTreeSet::new();
    for row in &doc.interfaces {
        node_names.insert(row.node.clone());
        node_names.insert(row.remote_node.clone());
    }
    for row in &doc.nodes {
        node_names.insert(row.name.clone());
    }
    for name in node_names {
        let id = network.add_node(name.clone())?;
        node_ids.insert(name, id);
    }

    for row in &doc.nodes {
        if let (Some(lon), Some(lat)) = (row.lon, row.lat) {
            network.set_node_location(node_ids[&row.name], lon, lat);
        }
    }

    let mut by_circuit: BTreeMap<&str, Vec<&InterfaceRow>> = BTreeMap::new();
    for row in &doc.interfaces {
        by_circuit.entry(row.circuit_id.as_str()).or_default().push(row);
    }
    for (circuit_id, rows) in by_circuit {
        let (r1, r2) = (rows[0], rows[1]);
        let node_a = node_ids[&r1.node];
        let node_b = node_ids[&r1.remote_node];
        let (ia, ib) = network.add_circuit(
            node_a,
            node_b,
            r1.name.clone(),
            r2.name.clone(),
            Cost::new(r1.cost),
            Cost::new(r2.cost),
            Bandwidth::new(r1.capacity),
            false,
            circuit_id.to_string(),
        )?;
        if let Some(iface) = network.interface_mut(ia) {
            iface.rsvp_enabled = r1.rsvp_enabled;
            iface.percent_reservable_bandwidth = r1.percent_reservable_bandwidth;
        }
        // r2 may not actually cross r1 (node/remote swapped) or may carry a different capacity;
        // both are left as-is for validate() to flag rather than silently normalized here.
        if let Some(iface) = network.interface_mut(ib) {
            iface.node = node_ids[&r2.node];
            iface.remote_node = node_ids[&r2.remote_node];
            iface.cost = Cost::new(r2.cost);
            iface.capacity = Bandwidth::new(r2.capacity);
            iface.rsvp_enabled = r2.rsvp_enabled;
            iface.percent_reservable_bandwidth = r2.percent_reservable_bandwidth;
        }
    }

    for row in &doc.demands {
        let source = lookup_node(&node_ids, &row.source, "demand", &row.name)?;
        let dest = lookup_node(&node_ids, &row.dest, "demand", &row.name)?;
        network.add_demand(row.name.clone(), source, dest, Bandwidth::new(row.traffic))?;
    }

    for row in &doc.lsps {
        let source = lookup_node(&node_ids, &row.source, "lsp", &row.name)?;
        let dest = lookup_node(&node_ids, &row.dest, "lsp", &row.name)?;
        network.add_lsp(
            row.name.clone(),
            source,
            dest,
            row.configured_setup_bw.map(Bandwidth::new),
        )?;
    }

    Ok(network)
}

fn lookup_node(
    node_ids: &BTreeMap<String, NodeId>,
    name: &str,
    kind: &'static str,
    owner: &str,
) -> Result<NodeId, LoadError> {
    node_ids.get(name).copied().ok_or_else(|| LoadError::UnknownNode {
        kind,
        name: owner.to_string(),
        node: name.to_string(),
    })
}
