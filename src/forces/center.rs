//! Centering force.
//!
//! Steers the layout's centroid onto the configured center point with a
//! uniform per-node pull, so asymmetric repulsion can't walk the whole
//! graph off-canvas. Not scaled by alpha: drift correction should not fade
//! as the layout cools.

use super::{DeltaBuf, ForceCtx};

/// Uniform centroid pull toward a fixed point.
#[derive(Debug, Clone)]
pub struct Center {
    pub x: f32,
    pub y: f32,
    pub strength: f32,
}

impl Center {
    pub fn new(center: (f32, f32), strength: f32) -> Self {
        Self {
            x: center.0,
            y: center.1,
            strength,
        }
    }

    pub fn apply(&self, ctx: &ForceCtx<'_>, out: &mut DeltaBuf) {
        let Some((cx, cy)) = ctx.store.centroid() else {
            return;
        };
        let dx = (self.x - cx) * self.strength;
        let dy = (self.y - cy) * self.strength;

        for i in 0..ctx.store.len() {
            out.dx[i] += dx;
            out.dy[i] += dy;
        }
    }
}
