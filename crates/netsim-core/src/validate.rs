//! Structural validation of a freshly-built [`Network`](crate::Network): dangling references,
//! malformed circuits, and duplicate names. Unlike the per-tick simulation errors, every problem
//! found here is collected rather than returned on the first failure, so a caller building a
//! model from a file sees every defect in one pass.

use rustc_hash::FxHashMap;

use crate::entities::{Circuit, Demand, Interface, InterfaceId, Lsp, Node, NodeId, Srlg};

/// One defect found while validating a network's static structure.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("interface {interface:?} on node {node:?} references nonexistent remote node {remote:?}")]
    DanglingRemoteNode {
        node: String,
        interface: String,
        remote: String,
    },
    #[error("demand {demand:?} references nonexistent node {node:?}")]
    DanglingDemandNode { demand: String, node: String },
    #[error("lsp {lsp:?} references nonexistent node {node:?}")]
    DanglingLspNode { lsp: String, node: String },
    #[error("srlg {srlg:?} references nonexistent node {node:?}")]
    DanglingSrlgNode { srlg: String, node: String },
    #[error("duplicate node name {0:?}")]
    DuplicateNodeName(String),
    #[error("node {node:?} has duplicate interface name {interface:?}")]
    DuplicateInterfaceName { node: String, interface: String },
    #[error("node {node:?} has more than one interface ({interfaces:?}) toward remote node {remote:?} on circuit {circuit_id:?}")]
    DuplicateCircuitEndpoint {
        node: String,
        remote: String,
        circuit_id: String,
        interfaces: Vec<String>,
    },
    #[error("circuit id {circuit_id:?} is used by {count} interfaces, must be exactly 2")]
    MalformedCircuitArity { circuit_id: String, count: usize },
    #[error("circuit id {circuit_id:?} pairs {a:?}/{b:?} but their node/remote_node ends don't cross")]
    MalformedCircuitEndpoints {
        circuit_id: String,
        a: String,
        b: String,
    },
    #[error("circuit id {circuit_id:?} pairs {a:?}/{b:?} with mismatched capacity ({a_capacity} vs {b_capacity})")]
    CircuitCapacityMismatch {
        circuit_id: String,
        a: String,
        b: String,
        a_capacity: f64,
        b_capacity: f64,
    },
    #[error("circuit id {circuit_id:?} pairs {a:?}/{b:?} with mismatched failed state")]
    CircuitFailedStateMismatch {
        circuit_id: String,
        a: String,
        b: String,
    },
    #[error("interface {node:?}/{interface:?} reserved_bandwidth {reserved} exceeds reservable ceiling {ceiling}")]
    ReservedBandwidthExceedsCeiling {
        node: String,
        interface: String,
        reserved: f64,
        ceiling: f64,
    },
    #[error("interface {node:?}/{interface:?} reserved_bandwidth {recorded} does not match sum of routed LSP reservations {summed}")]
    ReservedBandwidthInconsistent {
        node: String,
        interface: String,
        recorded: f64,
        summed: f64,
    },
    #[error("srlg {srlg:?} node {node:?} does not record membership in this srlg")]
    SrlgNodeMembershipAsymmetric { srlg: String, node: String },
    #[error("srlg {srlg:?} interface {node:?}/{interface:?} does not record membership in this srlg")]
    SrlgInterfaceMembershipAsymmetric {
        srlg: String,
        node: String,
        interface: String,
    },
}

/// The accumulated result of a failed [`validate`] call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("network failed validation with {} issue(s): {}", .0.len(), summarize(&.0))]
pub struct ValidationError(pub Vec<ValidationIssue>);

fn effectively_failed(iface: &Interface, srlgs: &[Srlg]) -> bool {
    iface.independently_failed
        || iface
            .srlgs()
            .any(|id| srlgs.get(id.inner()).is_some_and(|s| s.failed))
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks structural invariants and, on success, derives the [`Circuit`] list by pairing
/// interfaces that share a `circuit_id`.
pub fn validate(
    nodes: &[Node],
    interfaces: &[Interface],
    demands: &[Demand],
    lsps: &[Lsp],
    srlgs: &[Srlg],
) -> Result<Vec<Circuit>, ValidationError> {
    let mut issues = Vec::new();
    let mut node_names: FxHashMap<&str, usize> = FxHashMap::default();
    for node in nodes {
        *node_names.entry(node.name.as_str()).or_insert(0) += 1;
    }
    for (name, count) in &node_names {
        if *count > 1 {
            issues.push(ValidationIssue::DuplicateNodeName((*name).to_string()));
        }
    }

    let node_exists = |id: crate::entities::NodeId| nodes.get(id.inner()).is_some();

    let mut interface_names_by_node: FxHashMap<usize, FxHashMap<&str, usize>> =
        FxHashMap::default();
    let mut by_circuit_id: FxHashMap<&str, Vec<&Interface>> = FxHashMap::default();
    let mut by_endpoint: FxHashMap<(NodeId, NodeId, &str), Vec<&Interface>> = FxHashMap::default();

    for iface in interfaces {
        if !node_exists(iface.remote_node) {
            issues.push(ValidationIssue::DanglingRemoteNode {
                node: nodes
                    .get(iface.node.inner())
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                interface: iface.name.clone(),
                remote: format!("{:?}", iface.remote_node),
            });
        }
        interface_names_by_node
            .entry(iface.node.inner())
            .or_default()
            .entry(iface.name.as_str())
            .and_modify(|c| *c += 1)
            .or_insert(1);
        by_circuit_id
            .entry(iface.circuit_id.as_str())
            .or_default()
            .push(iface);
        by_endpoint
            .entry((iface.node, iface.remote_node, iface.circuit_id.as_str()))
            .or_default()
            .push(iface);
    }

    for (node_idx, names) in &interface_names_by_node {
        for (name, count) in names {
            if *count > 1 {
                issues.push(ValidationIssue::DuplicateInterfaceName {
                    node: nodes
                        .get(*node_idx)
                        .map(|n| n.name.clone())
                        .unwrap_or_default(),
                    interface: (*name).to_string(),
                });
            }
        }
    }

    for ((node, remote, circuit_id), members) in &by_endpoint {
        if members.len() > 1 {
            issues.push(ValidationIssue::DuplicateCircuitEndpoint {
                node: nodes
                    .get(node.inner())
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                remote: nodes
                    .get(remote.inner())
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                circuit_id: (*circuit_id).to_string(),
                interfaces: members.iter().map(|i| i.name.clone()).collect(),
            });
        }
    }

    let mut circuits = Vec::new();
    for (circuit_id, members) in &by_circuit_id {
        if members.len() != 2 {
            issues.push(ValidationIssue::MalformedCircuitArity {
                circuit_id: (*circuit_id).to_string(),
                count: members.len(),
            });
            continue;
        }
        let (a, b) = (members[0], members[1]);
        if a.node == b.remote_node && b.node == a.remote_node {
            circuits.push(Circuit { a: a.id, b: b.id });
            if a.capacity.into_f64() != b.capacity.into_f64() {
                issues.push(ValidationIssue::CircuitCapacityMismatch {
                    circuit_id: (*circuit_id).to_string(),
                    a: a.name.clone(),
                    b: b.name.clone(),
                    a_capacity: a.capacity.into_f64(),
                    b_capacity: b.capacity.into_f64(),
                });
            }
            if effectively_failed(a, srlgs) != effectively_failed(b, srlgs) {
                issues.push(ValidationIssue::CircuitFailedStateMismatch {
                    circuit_id: (*circuit_id).to_string(),
                    a: a.name.clone(),
                    b: b.name.clone(),
                });
            }
        } else {
            issues.push(ValidationIssue::MalformedCircuitEndpoints {
                circuit_id: (*circuit_id).to_string(),
                a: a.name.clone(),
                b: b.name.clone(),
            });
        }
    }

    for demand in demands {
        for node in [demand.source_node, demand.dest_node] {
            if !node_exists(node) {
                issues.push(ValidationIssue::DanglingDemandNode {
                    demand: demand.name.clone(),
                    node: format!("{node:?}"),
                });
            }
        }
    }

    for lsp in lsps {
        for node in [lsp.source_node, lsp.dest_node] {
            if !node_exists(node) {
                issues.push(ValidationIssue::DanglingLspNode {
                    lsp: lsp.name.clone(),
                    node: format!("{node:?}"),
                });
            }
        }
    }

    for srlg in srlgs {
        for &node in &srlg.nodes {
            if !node_exists(node) {
                issues.push(ValidationIssue::DanglingSrlgNode {
                    srlg: srlg.name.clone(),
                    node: format!("{node:?}"),
                });
            } else if !nodes[node.inner()].srlgs.contains(&srlg.id) {
                issues.push(ValidationIssue::SrlgNodeMembershipAsymmetric {
                    srlg: srlg.name.clone(),
                    node: nodes[node.inner()].name.clone(),
                });
            }
        }
        for &iface_id in &srlg.interfaces {
            if let Some(iface) = interfaces.get(iface_id.inner()) {
                if !iface.srlgs.contains(&srlg.id) {
                    issues.push(ValidationIssue::SrlgInterfaceMembershipAsymmetric {
                        srlg: srlg.name.clone(),
                        node: nodes
                            .get(iface.node.inner())
                            .map(|n| n.name.clone())
                            .unwrap_or_default(),
                        interface: iface.name.clone(),
                    });
                }
            }
        }
    }

    let mut reserved_by_interface: FxHashMap<InterfaceId, f64> = FxHashMap::default();
    for lsp in lsps {
        if let crate::entities::BwState::Value(bw) = lsp.reserved_bandwidth {
            for &iface in lsp.path.interfaces() {
                *reserved_by_interface.entry(iface).or_insert(0.0) += bw.into_f64();
            }
        }
    }
    for iface in interfaces {
        let ceiling = iface.capacity.into_f64() * iface.percent_reservable_bandwidth / 100.0;
        if iface.reserved_bandwidth.into_f64() > ceiling {
            issues.push(ValidationIssue::ReservedBandwidthExceedsCeiling {
                node: nodes
                    .get(iface.node.inner())
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                interface: iface.name.clone(),
                reserved: iface.reserved_bandwidth.into_f64(),
                ceiling,
            });
        }
        let summed = reserved_by_interface.get(&iface.id).copied().unwrap_or(0.0);
        if (iface.reserved_bandwidth.into_f64() - summed).abs() > 1e-6 {
            issues.push(ValidationIssue::ReservedBandwidthInconsistent {
                node: nodes
                    .get(iface.node.inner())
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                interface: iface.name.clone(),
                recorded: iface.reserved_bandwidth.into_f64(),
                summed,
            });
        }
    }

    if issues.is_empty() {
        Ok(circuits)
    } else {
        Err(ValidationError(issues))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::three_node_line;
    use crate::units::{Bandwidth, Cost};

    #[test]
    fn well_formed_fixture_validates_clean() {
        let fixture = three_node_line();
        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn mismatched_circuit_capacity_is_reported() {
        let mut fixture = three_node_line();
        let ab = fixture.network.interface_by_name(fixture.a, "to_b").unwrap();
        fixture.network.interface_mut(ab).unwrap().capacity = Bandwidth::new(999.0);

        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        let issues = result.unwrap_err().0;
        assert!(issues
            .iter()
            .any(|i| matches!(i, super::ValidationIssue::CircuitCapacityMismatch { .. })));
    }

    #[test]
    fn mismatched_circuit_endpoints_are_reported() {
        let mut fixture = three_node_line();
        let ab = fixture.network.interface_by_name(fixture.a, "to_b").unwrap();
        // Point "to_b" at C instead of B: the two interfaces sharing circuit "ab" no longer cross.
        fixture.network.interface_mut(ab).unwrap().remote_node = fixture.c;

        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        let issues = result.unwrap_err().0;
        assert!(issues
            .iter()
            .any(|i| matches!(i, super::ValidationIssue::MalformedCircuitEndpoints { .. })));
    }

    #[test]
    fn reserved_bandwidth_over_ceiling_is_reported() {
        let mut fixture = three_node_line();
        let ab = fixture.network.interface_by_name(fixture.a, "to_b").unwrap();
        let iface = fixture.network.interface_mut(ab).unwrap();
        iface.percent_reservable_bandwidth = 10.0;
        iface.reserved_bandwidth = Bandwidth::new(50.0);

        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        let issues = result.unwrap_err().0;
        assert!(issues.iter().any(|i| matches!(
            i,
            super::ValidationIssue::ReservedBandwidthExceedsCeiling { .. }
        ) || matches!(
            i,
            super::ValidationIssue::ReservedBandwidthInconsistent { .. }
        )));
    }

    #[test]
    fn duplicate_circuit_endpoint_is_reported() {
        let mut fixture = three_node_line();
        let ab = fixture.network.interface_by_name(fixture.a, "to_b").unwrap();
        // A second interface on A toward B reusing the same circuit_id as "to_b".
        let (a2, _) = fixture
            .network
            .add_circuit(
                fixture.a,
                fixture.b,
                "to_b_2",
                "to_a_2",
                Cost::new(10),
                Cost::new(10),
                Bandwidth::new(100.0),
                false,
                "ab-2",
            )
            .unwrap();
        let circuit_id = fixture.network.interfaces()[ab.inner()].circuit_id.clone();
        fixture.network.interface_mut(a2).unwrap().circuit_id = circuit_id;

        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        let issues = result.unwrap_err().0;
        assert!(issues
            .iter()
            .any(|i| matches!(i, super::ValidationIssue::DuplicateCircuitEndpoint { .. })));
    }

    #[test]
    fn dangling_remote_node_is_reported() {
        let mut fixture = three_node_line();
        let ab = fixture.network.interface_by_name(fixture.a, "to_b").unwrap();
        // B's own interface still points back at A, so this is now a one-way dangling reference.
        fixture.network.interface_mut(ab).unwrap().cost = Cost::new(10);
        let bogus = crate::entities::NodeId::new(fixture.network.nodes().len() + 5);
        fixture.network.interface_mut(ab).unwrap().remote_node = bogus;

        let result = super::validate(
            fixture.network.nodes(),
            fixture.network.interfaces(),
            fixture.network.demands(),
            fixture.network.lsps(),
            fixture.network.srlgs(),
        );
        let issues = result.unwrap_err().0;
        assert!(issues
            .iter()
            .any(|i| matches!(i, super::ValidationIssue::DanglingRemoteNode { .. })));
    }
}
