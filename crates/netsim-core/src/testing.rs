//! Small fixture topologies shared by the unit tests scattered through this crate and by the
//! end-to-end scenario tests in `scenario_tests.rs`.

use crate::entities::NodeId;
use crate::simulation::Network;
use crate::units::{Bandwidth, Cost};

pub struct ThreeNodeLine {
    pub network: Network,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
}

/// A--B--C, both circuits cost 10 cap 100.
pub fn three_node_line() -> ThreeNodeLine {
    let mut network = Network::builder().build();
    let a = network.add_node("A").unwrap();
    let b = network.add_node("B").unwrap();
    let c = network.add_node("C").unwrap();
    network
        .add_circuit(
            a,
            b,
            "to_b",
            "to_a",
            Cost::new(10),
            Cost::new(10),
            Bandwidth::new(100.0),
            false,
            "ab",
        )
        .unwrap();
    network
        .add_circuit(
            b,
            c,
            "to_c",
            "to_b",
            Cost::new(10),
            Cost::new(10),
            Bandwidth::new(100.0),
            false,
            "bc",
        )
        .unwrap();
    ThreeNodeLine { network, a, b, c }
}

pub struct ParallelLinks {
    pub network: Network,
    pub a: NodeId,
    pub b: NodeId,
}

/// Two parallel A-B circuits at equal cost 10, capacities 100 and 50.
pub fn parallel_links() -> ParallelLinks {
    let mut network = Network::builder().build();
    let a = network.add_node("A").unwrap();
    let b = network.add_node("B").unwrap();
    network
        .add_circuit(
            a,
            b,
            "to_b_1",
            "to_a_1",
            Cost::new(10),
            Cost::new(10),
            Bandwidth::new(100.0),
            false,
            "ab-1",
        )
        .unwrap();
    network
        .add_circuit(
            a,
            b,
            "to_b_2",
            "to_a_2",
            Cost::new(10),
            Cost::new(10),
            Bandwidth::new(50.0),
            false,
            "ab-2",
        )
        .unwrap();
    ParallelLinks { network, a, b }
}

pub struct SingleCircuit {
    pub network: Network,
    pub a: NodeId,
    pub b: NodeId,
}

/// One A-B circuit, cost 10 cap 100. Callers add demands/LSPs on top.
pub fn single_circuit(capacity: f64) -> SingleCircuit {
    let mut network = Network::builder().build();
    let a = network.add_node("A").unwrap();
    let b = network.add_node("B").unwrap();
    network
        .add_circuit(
            a,
            b,
            "to_b",
            "to_a",
            Cost::new(10),
            Cost::new(10),
            Bandwidth::new(capacity),
            false,
            "ab",
        )
        .unwrap();
    SingleCircuit { network, a, b }
}
