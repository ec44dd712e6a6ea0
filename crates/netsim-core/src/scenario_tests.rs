//! The end-to-end scenarios and quantified invariants: literal topologies with literal expected
//! outcomes (S1-S6), and property-style assertions run against the fixtures (P1-P7, R1-R2).

use crate::entities::{BwState, DemandPath, LspPath};
use crate::testing::{parallel_links, single_circuit, three_node_line};
use crate::units::{Bandwidth, Cost};

fn bw(v: f64) -> Bandwidth {
    Bandwidth::new(v)
}

#[test]
fn s1_two_hop_demand_routes_both_circuits() {
    let mut t = three_node_line();
    t.network.add_demand("d1", t.a, t.c, bw(50.0)).unwrap();
    t.network.simulate().unwrap();

    let demand = &t.network.demands()[0];
    match &demand.path {
        DemandPath::ViaEcmp(paths) => assert_eq!(paths.len(), 1),
        other => panic!("expected single ECMP path, got {other:?}"),
    }
    let ab = t.network.interface_by_name(t.a, "to_b").unwrap();
    let bc = t.network.interface_by_name(t.b, "to_c").unwrap();
    assert_eq!(t.network.interfaces()[ab.inner()].traffic, bw(50.0));
    assert_eq!(t.network.interfaces()[bc.inner()].traffic, bw(50.0));
}

#[test]
fn s2_parallel_links_split_traffic_evenly() {
    let mut p = parallel_links();
    p.network.add_demand("d1", p.a, p.b, bw(60.0)).unwrap();
    p.network.simulate().unwrap();

    match &p.network.demands()[0].path {
        DemandPath::ViaEcmp(paths) => assert_eq!(paths.len(), 2),
        other => panic!("expected 2 ECMP paths, got {other:?}"),
    }
    let a_to_b_1 = p.network.interface_by_name(p.a, "to_b_1").unwrap();
    let a_to_b_2 = p.network.interface_by_name(p.a, "to_b_2").unwrap();
    assert_eq!(p.network.interfaces()[a_to_b_1.inner()].traffic, bw(30.0));
    assert_eq!(p.network.interfaces()[a_to_b_2.inner()].traffic, bw(30.0));
}

#[test]
fn s3_demand_prefers_routed_lsp() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, None).unwrap();
    s.network.add_demand("d1", s.a, s.b, bw(40.0)).unwrap();
    s.network.simulate().unwrap();

    let lsp = &s.network.lsps()[0];
    assert_eq!(lsp.setup_bandwidth, BwState::Value(bw(40.0)));
    assert_eq!(lsp.reserved_bandwidth, BwState::Value(bw(40.0)));
    assert!(matches!(
        s.network.demands()[0].path,
        DemandPath::ViaLsps(ref ids) if ids.len() == 1
    ));
    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    let iface = &s.network.interfaces()[ab.inner()];
    assert_eq!(iface.reserved_bandwidth, bw(40.0));
    assert_eq!(iface.traffic, bw(40.0));
}

#[test]
fn s4_parallel_lsps_split_auto_bandwidth() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, None).unwrap();
    s.network.add_lsp("lsp2", s.a, s.b, None).unwrap();
    s.network.add_demand("d1", s.a, s.b, bw(80.0)).unwrap();
    s.network.simulate().unwrap();

    for lsp in s.network.lsps() {
        assert_eq!(lsp.setup_bandwidth, BwState::Value(bw(40.0)));
        assert!(lsp.path.is_routed());
    }
    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    let iface = &s.network.interfaces()[ab.inner()];
    assert_eq!(iface.reserved_bandwidth, bw(80.0));
    assert_eq!(iface.traffic, bw(80.0));
}

#[test]
fn s5_congestion_leaves_second_lsp_unrouted() {
    let mut s = single_circuit(100.0);
    s.network
        .add_lsp("lsp1", s.a, s.b, Some(bw(80.0)))
        .unwrap();
    s.network.add_lsp("lsp2", s.a, s.b, None).unwrap();
    s.network.add_demand("d1", s.a, s.b, bw(30.0)).unwrap();
    s.network.simulate().unwrap();

    let lsp1 = &s.network.lsps()[0];
    let lsp2 = &s.network.lsps()[1];
    assert_eq!(lsp1.setup_bandwidth, BwState::Value(bw(80.0)));
    assert!(matches!(lsp2.path, LspPath::Unrouted));
    assert_eq!(lsp2.reserved_bandwidth, BwState::Unrouted);

    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    assert_eq!(s.network.interfaces()[ab.inner()].reserved_bandwidth, bw(80.0));
}

#[test]
fn s6_failing_the_only_circuit_unroutes_the_demand() {
    let mut s = single_circuit(100.0);
    s.network.add_demand("d1", s.a, s.b, bw(10.0)).unwrap();
    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();

    s.network.fail_interface(ab);
    s.network.simulate().unwrap();
    assert!(matches!(s.network.demands()[0].path, DemandPath::Unrouted));

    s.network.unfail_interface(ab);
    s.network.simulate().unwrap();
    assert!(matches!(
        s.network.demands()[0].path,
        DemandPath::ViaEcmp(ref paths) if paths.len() == 1
    ));
}

#[test]
fn p1_reserved_bandwidth_never_exceeds_ceiling() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, Some(bw(80.0))).unwrap();
    s.network.add_lsp("lsp2", s.a, s.b, Some(bw(50.0))).unwrap();
    s.network.simulate().unwrap();

    for iface in s.network.interfaces() {
        let ceiling = iface.capacity.into_f64() * iface.percent_reservable_bandwidth / 100.0;
        assert!(iface.reserved_bandwidth.into_f64() <= ceiling + 1e-9);
    }
}

#[test]
fn p2_reserved_bandwidth_matches_routed_lsp_sum() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, Some(bw(30.0))).unwrap();
    s.network.add_lsp("lsp2", s.a, s.b, Some(bw(20.0))).unwrap();
    s.network.simulate().unwrap();

    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    let summed: f64 = s
        .network
        .lsps()
        .iter()
        .filter_map(|l| match (&l.path, l.reserved_bandwidth) {
            (LspPath::Routed { interfaces, .. }, BwState::Value(bw)) if interfaces.contains(&ab) => {
                Some(bw.into_f64())
            }
            _ => None,
        })
        .sum();
    assert_eq!(s.network.interfaces()[ab.inner()].reserved_bandwidth.into_f64(), summed);
}

#[test]
fn p4_ecmp_paths_share_equal_cost() {
    let mut p = parallel_links();
    p.network.add_demand("d1", p.a, p.b, bw(10.0)).unwrap();
    p.network.simulate().unwrap();

    let DemandPath::ViaEcmp(paths) = &p.network.demands()[0].path else {
        panic!("expected ECMP routing");
    };
    let costs: Vec<Cost> = paths
        .iter()
        .map(|path| path.iter().map(|i| p.network.interfaces()[i.inner()].cost).sum())
        .collect();
    assert!(costs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn p5_demand_with_routed_lsp_never_carries_an_ip_path() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, None).unwrap();
    s.network.add_demand("d1", s.a, s.b, bw(10.0)).unwrap();
    s.network.simulate().unwrap();

    assert!(matches!(
        s.network.demands()[0].path,
        DemandPath::ViaLsps(_)
    ));
}

#[test]
fn r1_repeated_simulate_is_idempotent_without_ties() {
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, Some(bw(40.0))).unwrap();
    s.network.add_demand("d1", s.a, s.b, bw(10.0)).unwrap();

    s.network.simulate().unwrap();
    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    let first = s.network.interfaces()[ab.inner()].traffic;

    s.network.simulate().unwrap();
    let second = s.network.interfaces()[ab.inner()].traffic;
    assert_eq!(first, second);
}

#[test]
fn r2_fail_then_unfail_restores_state() {
    let mut s = single_circuit(100.0);
    s.network.add_demand("d1", s.a, s.b, bw(10.0)).unwrap();
    s.network.simulate().unwrap();
    let ab = s.network.interface_by_name(s.a, "to_b").unwrap();
    let before = s.network.interfaces()[ab.inner()].traffic;

    s.network.fail_interface(ab);
    s.network.simulate().unwrap();
    s.network.unfail_interface(ab);
    s.network.simulate().unwrap();

    let after = s.network.interfaces()[ab.inner()].traffic;
    assert_eq!(before, after);
}

#[test]
fn p3_placed_lsp_never_exceeds_pre_reservation_headroom() {
    // Capacity 100, two sequential LSPs of 80 then 20: the second must still fit exactly,
    // leaving no interface ever asked to carry more than its reservable bandwidth.
    let mut s = single_circuit(100.0);
    s.network.add_lsp("lsp1", s.a, s.b, Some(bw(80.0))).unwrap();
    s.network.add_lsp("lsp2", s.a, s.b, Some(bw(20.0))).unwrap();
    s.network.simulate().unwrap();

    for lsp in s.network.lsps() {
        let LspPath::Routed { interfaces, .. } = &lsp.path else {
            panic!("expected {} to route", lsp.name);
        };
        let BwState::Value(setup) = lsp.setup_bandwidth else {
            panic!("routed lsp must carry a setup bandwidth");
        };
        for &iface_id in interfaces {
            let iface = &s.network.interfaces()[iface_id.inner()];
            let ceiling = iface.capacity.into_f64() * iface.percent_reservable_bandwidth / 100.0;
            assert!(iface.reserved_bandwidth.into_f64() <= ceiling + 1e-9);
            assert!(setup.into_f64() <= ceiling + 1e-9);
        }
    }
}

#[test]
fn p7_interface_traffic_equals_summed_demand_contributions() {
    let mut t = three_node_line();
    t.network.add_demand("d1", t.a, t.c, bw(30.0)).unwrap();
    t.network.add_demand("d2", t.a, t.b, bw(15.0)).unwrap();
    t.network.simulate().unwrap();

    let mut expected: std::collections::HashMap<crate::entities::InterfaceId, f64> =
        std::collections::HashMap::new();
    for demand in t.network.demands() {
        for (iface, share) in crate::demand_router::demand_traffic_contributions(
            demand,
            t.network.lsps(),
        ) {
            *expected.entry(iface).or_insert(0.0) += share.into_f64();
        }
    }
    for iface in t.network.interfaces() {
        let want = expected.get(&iface.id).copied().unwrap_or(0.0);
        assert!((iface.traffic.into_f64() - want).abs() < 1e-9);
    }
}
