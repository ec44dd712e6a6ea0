//! Value types for the network model: [`Node`], [`Interface`], [`Circuit`], [`Demand`], [`Lsp`],
//! and [`Srlg`]. Every cross-entity reference is a stable arena identifier rather than a pointer,
//! so the object graph has no cycles and equality reduces to identifier equality.

use rustc_hash::FxHashSet;

use crate::units::{Bandwidth, Cost};

identifier!(NodeId, usize);
identifier!(InterfaceId, usize);
identifier!(DemandId, usize);
identifier!(LspId, usize);
identifier!(SrlgId, usize);

/// A layer-3 device. Unique by `name` within a [`Network`](crate::Network).
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub(crate) srlgs: FxHashSet<SrlgId>,
    /// Set only by an explicit `fail_node` call, never by SRLG propagation. See the SRLG-unfail
    /// design note: this is what lets an SRLG-unfail restore members that were *only*
    /// SRLG-failed while leaving independently-failed members down.
    pub(crate) independently_failed: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            lon: None,
            lat: None,
            srlgs: FxHashSet::default(),
            independently_failed: false,
        }
    }

    /// Returns the SRLGs this node is a member of.
    pub fn srlgs(&self) -> impl Iterator<Item = SrlgId> + '_ {
        self.srlgs.iter().copied()
    }
}

/// A directed endpoint of a circuit, anchored on `node` and pointing at `remote_node`.
///
/// Identity for equality purposes is `(node, name)`; the triple `(node, remote_node, circuit_id)`
/// must also be unique (no two interfaces on the same node may share both a remote node and a
/// circuit ID).
#[derive(Debug, Clone)]
pub struct Interface {
    pub id: InterfaceId,
    pub name: String,
    pub node: NodeId,
    pub remote_node: NodeId,
    pub cost: Cost,
    pub capacity: Bandwidth,
    pub circuit_id: String,
    pub rsvp_enabled: bool,
    /// Percentage in `[0, 100]` of `capacity` that may ever be reserved by LSPs.
    pub percent_reservable_bandwidth: f64,
    pub(crate) srlgs: FxHashSet<SrlgId>,
    pub(crate) independently_failed: bool,
    /// Sum of `reserved_bandwidth` of every LSP currently routed over this interface.
    pub reserved_bandwidth: Bandwidth,
    /// Sum of demand traffic currently attributed to this interface.
    pub traffic: Bandwidth,
}

impl Interface {
    /// Headroom available to new LSP reservations: `capacity * pct/100 - reserved_bandwidth`.
    pub fn reservable_bandwidth(&self) -> Bandwidth {
        let ceiling = self.capacity.into_f64() * self.percent_reservable_bandwidth / 100.0;
        Bandwidth::new(ceiling) - self.reserved_bandwidth
    }

    /// `traffic / capacity`.
    pub fn utilization(&self) -> f64 {
        self.traffic.into_f64() / self.capacity.into_f64()
    }

    /// SRLGs this interface is a member of.
    pub fn srlgs(&self) -> impl Iterator<Item = SrlgId> + '_ {
        self.srlgs.iter().copied()
    }
}

/// A bidirectional link, derived at validation time by matching two interfaces with the same
/// `circuit_id`. Not user-declared directly.
#[derive(Debug, Clone, Copy)]
pub struct Circuit {
    pub a: InterfaceId,
    pub b: InterfaceId,
}

/// A traffic load from `source_node` to `dest_node`.
#[derive(Debug, Clone)]
pub struct Demand {
    pub id: DemandId,
    pub name: String,
    pub source_node: NodeId,
    pub dest_node: NodeId,
    pub traffic: Bandwidth,
    pub path: DemandPath,
}

/// The routed state of a [`Demand`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DemandPath {
    #[default]
    Unrouted,
    /// Rides every routed LSP between its endpoints, split equally.
    ViaLsps(Vec<LspId>),
    /// Rides every IP ECMP member path, split equally. Each inner `Vec` is one concrete
    /// interface sequence.
    ViaEcmp(Vec<Vec<InterfaceId>>),
}

/// An RSVP-TE label-switched path.
#[derive(Debug, Clone)]
pub struct Lsp {
    pub id: LspId,
    pub name: String,
    pub source_node: NodeId,
    pub dest_node: NodeId,
    pub configured_setup_bandwidth: Option<Bandwidth>,
    pub path: LspPath,
    pub setup_bandwidth: BwState,
    pub reserved_bandwidth: BwState,
}

/// The routed state of an [`Lsp`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LspPath {
    #[default]
    Unrouted,
    Routed {
        interfaces: Vec<InterfaceId>,
        baseline_path_cost: Cost,
    },
}

impl LspPath {
    pub fn interfaces(&self) -> &[InterfaceId] {
        match self {
            LspPath::Unrouted => &[],
            LspPath::Routed { interfaces, .. } => interfaces,
        }
    }

    pub fn is_routed(&self) -> bool {
        matches!(self, LspPath::Routed { .. })
    }
}

/// Either a concrete bandwidth value or the `"Unrouted"` sentinel, per §9's "path as a variant"
/// design note: the sentinel is a tagged-sum variant internally, preserved only at the JSON
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BwState {
    #[default]
    Unrouted,
    Value(Bandwidth),
}

impl BwState {
    pub fn value(&self) -> Option<Bandwidth> {
        match self {
            BwState::Unrouted => None,
            BwState::Value(bw) => Some(*bw),
        }
    }
}

/// A Shared Risk Link Group: a named bundle of nodes and/or interfaces that fail together.
#[derive(Debug, Clone)]
pub struct Srlg {
    pub id: SrlgId,
    pub name: String,
    pub nodes: FxHashSet<NodeId>,
    pub interfaces: FxHashSet<InterfaceId>,
    pub failed: bool,
}

impl Srlg {
    pub(crate) fn new(id: SrlgId, name: String) -> Self {
        Self {
            id,
            name,
            nodes: FxHashSet::default(),
            interfaces: FxHashSet::default(),
            failed: false,
        }
    }
}
