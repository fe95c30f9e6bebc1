//! The node arena: topology plus SoA state buffers.
//!
//! Positions and velocities live in Structure-of-Arrays layout so the wasm
//! facade can hand zero-copy views to a renderer, while petgraph's
//! `StableGraph` holds the topology for connectivity queries. Arena slots,
//! petgraph indices and SoA offsets all coincide: nodes are only ever added
//! in one batch and never removed individually (replacement is wholesale).

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use petgraph::stable_graph::{NodeIndex, StableUnGraph};

use crate::config::LayoutConfig;
use crate::error::LinkWarning;

use super::{mix64, unit_f32, Link, LinkSpec, NodeId, NodeSpec};

/// Spread of the deterministic placement spiral.
const INITIAL_RADIUS: f32 = 10.0;

/// Exclusive owner of all per-node state for one simulation.
pub struct GraphStore {
    graph: StableUnGraph<NodeId, ()>,
    slot_by_id: HashMap<String, NodeId>,
    ids: Vec<String>,
    groups: Vec<String>,
    pos_x: Vec<f32>,
    pos_y: Vec<f32>,
    vel_x: Vec<f32>,
    vel_y: Vec<f32>,
    radius: Vec<f32>,
    pins: Vec<Option<(f32, f32)>>,
}

impl GraphStore {
    /// Build the arena from caller specs, placing every node on a seeded
    /// phyllotaxis spiral around the configured center. Identical specs and
    /// seed reproduce identical positions bit-for-bit.
    pub fn build(specs: &[NodeSpec], config: &LayoutConfig) -> Self {
        let n = specs.len();
        let mut store = Self {
            graph: StableUnGraph::with_capacity(n, n),
            slot_by_id: HashMap::with_capacity(n),
            ids: Vec::with_capacity(n),
            groups: Vec::with_capacity(n),
            pos_x: Vec::with_capacity(n),
            pos_y: Vec::with_capacity(n),
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            radius: Vec::with_capacity(n),
            pins: vec![None; n],
        };

        for (i, spec) in specs.iter().enumerate() {
            let slot = NodeId::new(i as u32);
            store.graph.add_node(slot);
            // Duplicate external ids: the last occurrence wins for lookup.
            store.slot_by_id.insert(spec.id.clone(), slot);
            store.ids.push(spec.id.clone());
            store.groups.push(spec.group.clone());

            let (x, y) = seeded_position(i, config);
            store.pos_x.push(x);
            store.pos_y.push(y);
            store.radius.push(config.radius_for(spec.weight));
        }

        store
    }

    /// Resolve link specs against the arena, installing topology edges for
    /// the resolvable ones and reporting the rest. Strength and bias
    /// defaults are degree-derived, so edges must all be installed before
    /// either is computed.
    pub fn resolve_links(
        &mut self,
        specs: &[LinkSpec],
        config: &LayoutConfig,
    ) -> (Vec<Link>, Vec<LinkWarning>) {
        let mut warnings = Vec::new();
        let mut resolved: Vec<(NodeId, NodeId, Option<f32>, Option<f32>)> = Vec::new();

        for spec in specs {
            match (self.slot_of(&spec.source), self.slot_of(&spec.target)) {
                (Some(s), Some(t)) => {
                    self.graph
                        .add_edge(NodeIndex::new(s.index()), NodeIndex::new(t.index()), ());
                    resolved.push((s, t, spec.distance, spec.strength));
                }
                (s, _) => {
                    let missing = if s.is_none() { &spec.source } else { &spec.target };
                    log::warn!(
                        "dropping link {} -> {}: unknown node {missing}",
                        spec.source,
                        spec.target
                    );
                    warnings.push(LinkWarning::new(&spec.source, &spec.target, missing));
                }
            }
        }

        let links = resolved
            .into_iter()
            .map(|(source, target, distance, strength)| {
                let deg_s = self.degree(source) as f32;
                let deg_t = self.degree(target) as f32;
                Link {
                    source,
                    target,
                    distance: distance.unwrap_or(config.link_distance),
                    strength: strength
                        .or(config.link_strength)
                        .unwrap_or_else(|| 1.0 / deg_s.max(deg_t).max(1.0)),
                    bias: deg_s / (deg_s + deg_t).max(1.0),
                }
            })
            .collect();

        (links, warnings)
    }

    /// Copy position and velocity for every external id that also exists in
    /// `previous`, preserving layout continuity across a wholesale
    /// replacement. New ids keep their seeded placement.
    pub fn carry_state_from(&mut self, previous: &GraphStore) {
        for (i, id) in self.ids.iter().enumerate() {
            if let Some(old) = previous.slot_of(id) {
                let j = old.index();
                self.pos_x[i] = previous.pos_x[j];
                self.pos_y[i] = previous.pos_y[j];
                self.vel_x[i] = previous.vel_x[j];
                self.vel_y[i] = previous.vel_y[j];
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn slot_of(&self, id: &str) -> Option<NodeId> {
        self.slot_by_id.get(id).copied()
    }

    pub fn id_of(&self, slot: NodeId) -> &str {
        &self.ids[slot.index()]
    }

    pub fn group_of(&self, slot: NodeId) -> &str {
        &self.groups[slot.index()]
    }

    /// Incident edge count, counting each undirected edge once.
    pub fn degree(&self, slot: NodeId) -> usize {
        self.graph.edges(NodeIndex::new(slot.index())).count()
    }

    pub fn position(&self, slot: NodeId) -> (f32, f32) {
        (self.pos_x[slot.index()], self.pos_y[slot.index()])
    }

    pub fn velocity(&self, slot: NodeId) -> (f32, f32) {
        (self.vel_x[slot.index()], self.vel_y[slot.index()])
    }

    pub(crate) fn reset_velocity(&mut self, slot: NodeId) {
        self.vel_x[slot.index()] = 0.0;
        self.vel_y[slot.index()] = 0.0;
    }

    pub fn pin(&self, slot: NodeId) -> Option<(f32, f32)> {
        self.pins[slot.index()]
    }

    pub(crate) fn set_pin(&mut self, slot: NodeId, x: f32, y: f32) {
        self.pins[slot.index()] = Some((x, y));
    }

    pub(crate) fn clear_pin(&mut self, slot: NodeId) {
        self.pins[slot.index()] = None;
    }

    pub(crate) fn clear_all_pins(&mut self) {
        for pin in &mut self.pins {
            *pin = None;
        }
    }

    /// Mean of all node positions, `None` when the arena is empty.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f32;
        let sx: f32 = self.pos_x.iter().sum();
        let sy: f32 = self.pos_y.iter().sum();
        Some((sx / n, sy / n))
    }

    // SoA buffer access. The immutable slices back the facade's zero-copy
    // Float32Array views; the mutable ones are integrator-only.

    pub fn pos_x(&self) -> &[f32] {
        &self.pos_x
    }

    pub fn pos_y(&self) -> &[f32] {
        &self.pos_y
    }

    pub fn radii(&self) -> &[f32] {
        &self.radius
    }

    pub(crate) fn buffers_mut(
        &mut self,
    ) -> (&mut [f32], &mut [f32], &mut [f32], &mut [f32], &[Option<(f32, f32)>], &[f32]) {
        (
            &mut self.pos_x,
            &mut self.pos_y,
            &mut self.vel_x,
            &mut self.vel_y,
            &self.pins,
            &self.radius,
        )
    }
}

/// Deterministic placement: phyllotaxis spiral rotated by a seed-derived
/// angle, with a sub-unit jitter per slot so co-built simulations with
/// different seeds diverge immediately.
fn seeded_position(slot: usize, config: &LayoutConfig) -> (f32, f32) {
    let golden = PI * (3.0 - 5.0_f32.sqrt());
    let spin = unit_f32(mix64(config.seed)) * TAU;

    let r = INITIAL_RADIUS * (0.5 + slot as f32).sqrt();
    let a = slot as f32 * golden + spin;

    let jx = unit_f32(mix64(config.seed ^ ((slot as u64) << 1 | 1))) - 0.5;
    let jy = unit_f32(mix64(config.seed ^ ((slot as u64) << 1 | 1) ^ 0xd6e8_feb8_6659_fd93)) - 0.5;

    (
        config.center.0 + r * a.cos() + jx,
        config.center.1 + r * a.sin() + jy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(ids: &[&str]) -> Vec<NodeSpec> {
        ids.iter().map(|id| NodeSpec::new(*id, 100.0, "t1")).collect()
    }

    #[test]
    fn test_build_assigns_slots_and_radii() {
        let config = LayoutConfig::default();
        let store = GraphStore::build(&specs(&["a", "b", "c"]), &config);

        assert_eq!(store.len(), 3);
        assert_eq!(store.slot_of("b"), Some(NodeId(1)));
        assert_eq!(store.id_of(NodeId(2)), "c");
        assert_eq!(store.group_of(NodeId(0)), "t1");
        assert_eq!(store.radii()[0], 10.0); // weight 100 * scale 0.1
    }

    #[test]
    fn test_placement_is_seed_deterministic() {
        let config = LayoutConfig::default();
        let a = GraphStore::build(&specs(&["a", "b", "c"]), &config);
        let b = GraphStore::build(&specs(&["a", "b", "c"]), &config);
        assert_eq!(a.pos_x(), b.pos_x());
        assert_eq!(a.pos_y(), b.pos_y());

        let other = LayoutConfig {
            seed: 99,
            ..LayoutConfig::default()
        };
        let c = GraphStore::build(&specs(&["a", "b", "c"]), &other);
        assert_ne!(a.pos_x(), c.pos_x());
    }

    #[test]
    fn test_placement_is_bounded() {
        let config = LayoutConfig::default();
        let store = GraphStore::build(&specs(&["a", "b", "c", "d", "e"]), &config);
        let limit = INITIAL_RADIUS * (5.5_f32).sqrt() + 1.0;
        for i in 0..store.len() {
            assert!(store.pos_x()[i].abs() <= limit);
            assert!(store.pos_y()[i].abs() <= limit);
        }
    }

    #[test]
    fn test_link_resolution_reports_unknown_ids() {
        let config = LayoutConfig::default();
        let mut store = GraphStore::build(&specs(&["a", "b"]), &config);
        let (links, warnings) = store.resolve_links(
            &[LinkSpec::new("a", "b"), LinkSpec::new("a", "ghost")],
            &config,
        );

        assert_eq!(links.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].missing, "ghost");
        assert_eq!(links[0].distance, 100.0);
    }

    #[test]
    fn test_link_strength_defaults_to_inverse_max_degree() {
        let config = LayoutConfig::default();
        // Hub "h" linked to three leaves.
        let mut store = GraphStore::build(&specs(&["h", "l1", "l2", "l3"]), &config);
        let (links, warnings) = store.resolve_links(
            &[
                LinkSpec::new("h", "l1"),
                LinkSpec::new("h", "l2"),
                LinkSpec::new("h", "l3"),
            ],
            &config,
        );

        assert!(warnings.is_empty());
        for link in &links {
            assert!((link.strength - 1.0 / 3.0).abs() < 1e-6);
            // Hub degree 3 vs leaf degree 1: leaves absorb 3/4 of the pull.
            assert!((link.bias - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_carry_state_preserves_surviving_nodes() {
        let config = LayoutConfig::default();
        let mut old = GraphStore::build(&specs(&["a", "b"]), &config);
        old.pos_x[0] = 123.0;
        old.pos_y[0] = -7.0;

        let mut new = GraphStore::build(&specs(&["c", "a"]), &config);
        let fresh_c = (new.pos_x[0], new.pos_y[0]);
        new.carry_state_from(&old);

        assert_eq!(new.position(NodeId(1)), (123.0, -7.0));
        assert_eq!((new.pos_x[0], new.pos_y[0]), fresh_c);
    }

    #[test]
    fn test_pins_and_velocity_reset() {
        let config = LayoutConfig::default();
        let mut store = GraphStore::build(&specs(&["a"]), &config);
        store.set_pin(NodeId(0), 5.0, 6.0);
        assert_eq!(store.pin(NodeId(0)), Some((5.0, 6.0)));
        store.clear_pin(NodeId(0));
        assert_eq!(store.pin(NodeId(0)), None);

        store.vel_x[0] = 3.0;
        store.reset_velocity(NodeId(0));
        assert_eq!(store.velocity(NodeId(0)), (0.0, 0.0));
    }
}
