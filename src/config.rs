//! Layout configuration.
//!
//! Every tuned constant of the simulation is exposed here rather than
//! hard-coded in the force implementations. The struct deserializes from a
//! partial JS object (every field falls back to its default), so the host
//! only spells out what it overrides.

use serde::{Deserialize, Serialize};

/// Configuration for one simulation instance.
///
/// Defaults suit a dashboard-scale topology view: link rest length 100,
/// charge -300, node radii `weight / 10` clamped to [5, 20], and the standard
/// cooling schedule that settles in roughly 300 ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Rest length for links that don't specify their own distance.
    pub link_distance: f32,
    /// Spring stiffness override. `None` derives stiffness per link from
    /// endpoint connectivity (`1 / max(deg(source), deg(target))`).
    pub link_strength: Option<f32>,
    /// Many-body strength. Negative repels; zero disables the force.
    pub charge_strength: f32,
    /// Barnes-Hut acceptance parameter. A tree cell is treated as a single
    /// pseudo-body when `cell_width^2 < theta^2 * distance^2`.
    pub theta: f32,
    /// Pair distances below this are clamped before the inverse-square law,
    /// so near-coincident nodes don't produce unbounded impulses.
    pub charge_distance_min: f32,
    /// Charge interactions beyond this distance are dropped entirely.
    /// `None` means unlimited range.
    pub charge_distance_max: Option<f32>,
    /// Point the layout's centroid is steered toward.
    pub center: (f32, f32),
    /// Centering gain per tick. Not scaled by alpha.
    pub center_strength: f32,
    /// Extra clearance added between node circles by the collision force.
    pub collide_padding: f32,
    /// Node radius per unit of weight.
    pub radius_scale: f32,
    /// Lower radius clamp.
    pub radius_min: f32,
    /// Upper radius clamp.
    pub radius_max: f32,
    /// Alpha floor: the simulation is settled once alpha drops below this.
    pub alpha_min: f32,
    /// Geometric cooling rate per tick.
    pub alpha_decay: f32,
    /// Velocity retained after each integration step (1.0 = frictionless).
    pub velocity_decay: f32,
    /// Alpha bump applied when a drag grabs a node.
    pub drag_reheat: f32,
    /// Optional `(width, height)` canvas rectangle. When set, every node's
    /// post-integration position is clamped so its circle stays inside.
    pub bounds: Option<(f32, f32)>,
    /// Seed for the deterministic initial placement.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            link_strength: None,
            charge_strength: -300.0,
            theta: 0.9,
            charge_distance_min: 1.0,
            charge_distance_max: None,
            center: (0.0, 0.0),
            center_strength: 1.0,
            collide_padding: 1.0,
            radius_scale: 0.1,
            radius_min: 5.0,
            radius_max: 20.0,
            alpha_min: 0.001,
            // 1 - 0.001^(1/300): alpha crosses alpha_min after ~300 ticks.
            alpha_decay: 0.022_764_5,
            velocity_decay: 0.6,
            drag_reheat: 0.3,
            bounds: None,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    /// Derived display/collision radius for a node weight.
    pub fn radius_for(&self, weight: f32) -> f32 {
        (weight * self.radius_scale).clamp(self.radius_min, self.radius_max)
    }

    /// Number of ticks after which a freshly built simulation is guaranteed
    /// to be settled (alpha below `alpha_min`), absent reheating.
    pub fn ticks_to_settle(&self) -> u32 {
        let ticks = self.alpha_min.ln() / (1.0 - self.alpha_decay).ln();
        ticks.ceil() as u32 + 1
    }
}
