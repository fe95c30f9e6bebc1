//! The closed set of composable force modules.
//!
//! Each variant implements one capability: read node/link state (and the
//! spatial structures) and accumulate velocity deltas into a shared buffer.
//! Nothing is committed until the integrator runs, so a pass is free of
//! partial-application ordering effects within one force, and the whole set
//! composes as an explicit ordered list owned by the simulation core.

mod center;
mod collide;
mod link;
mod many_body;

pub use center::Center;
pub use collide::Collide;
pub use link::LinkSpring;
pub use many_body::ManyBody;

use std::f32::consts::TAU;

use crate::graph::{mix64, unit_f32, GraphStore, Link};
use crate::spatial::{HitIndex, QuadTree};

/// Read-only view of one tick's state, handed to every force.
pub struct ForceCtx<'a> {
    pub store: &'a GraphStore,
    pub links: &'a [Link],
    pub tree: &'a QuadTree,
    pub hits: &'a HitIndex,
    /// Current cooling energy; repulsion and springs scale by it.
    pub alpha: f32,
}

/// Per-node velocity deltas accumulated across the force pass.
pub struct DeltaBuf {
    pub dx: Vec<f32>,
    pub dy: Vec<f32>,
}

impl DeltaBuf {
    pub fn new(n: usize) -> Self {
        Self {
            dx: vec![0.0; n],
            dy: vec![0.0; n],
        }
    }

    pub fn reset(&mut self) {
        self.dx.fill(0.0);
        self.dy.fill(0.0);
    }
}

/// One force module.
#[derive(Debug, Clone)]
pub enum Force {
    Link(LinkSpring),
    ManyBody(ManyBody),
    Center(Center),
    Collide(Collide),
}

impl Force {
    /// Accumulate this force's velocity deltas for the current tick.
    pub fn apply(&self, ctx: &ForceCtx<'_>, out: &mut DeltaBuf) {
        match self {
            Force::Link(f) => f.apply(ctx, out),
            Force::ManyBody(f) => f.apply(ctx, out),
            Force::Center(f) => f.apply(ctx, out),
            Force::Collide(f) => f.apply(ctx, out),
        }
    }
}

/// Deterministic tie-break for two bodies at the exact same position: a tiny
/// displacement standing in for the zero vector from `a` toward `b`. The
/// direction is derived from the pair's arena slots (reruns reproduce it
/// exactly) and is antisymmetric, so the pair separates in opposite
/// directions instead of drifting together.
pub(crate) fn pair_nudge(a: u32, b: u32) -> (f32, f32) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let angle = unit_f32(mix64(((lo as u64) << 32) | hi as u64)) * TAU;
    let sign = if a <= b { 1.0 } else { -1.0 };
    (angle.cos() * 1e-6 * sign, angle.sin() * 1e-6 * sign)
}
