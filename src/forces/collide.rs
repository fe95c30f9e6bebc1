//! Collision separation force.
//!
//! Short-range pairwise repulsion that only acts between nodes whose circles
//! (derived radius plus configured padding) overlap, pushing them apart
//! until the circles clear. Candidate pairs come from the per-tick R-tree,
//! so only actual neighborhoods are examined. Not scaled by alpha: visual
//! overlap is unacceptable even in a settled layout.

use super::{pair_nudge, DeltaBuf, ForceCtx};

/// Circle-overlap separation.
#[derive(Debug, Clone)]
pub struct Collide {
    /// Extra clearance required between circles.
    pub padding: f32,
}

impl Collide {
    pub fn new(padding: f32) -> Self {
        Self { padding }
    }

    pub fn apply(&self, ctx: &ForceCtx<'_>, out: &mut DeltaBuf) {
        let pos_x = ctx.store.pos_x();
        let pos_y = ctx.store.pos_y();
        let radii = ctx.store.radii();

        let max_radius = radii.iter().copied().fold(0.0f32, f32::max);

        for i in 0..ctx.store.len() {
            let (x, y) = (pos_x[i], pos_y[i]);
            let reach = radii[i] + max_radius + self.padding;

            for other in ctx.hits.within(x, y, reach) {
                let j = other.index();
                // Each unordered pair is handled once, from its lower slot.
                if j <= i {
                    continue;
                }

                let clearance = radii[i] + radii[j] + self.padding;
                let (mut dx, mut dy) = (pos_x[j] - x, pos_y[j] - y);
                if dx == 0.0 && dy == 0.0 {
                    (dx, dy) = pair_nudge(i as u32, other.0);
                }

                let l2 = dx * dx + dy * dy;
                if l2 >= clearance * clearance {
                    continue;
                }

                let len = l2.sqrt();
                // Push strength proportional to the remaining overlap,
                // split by squared-radius mass so big circles move less.
                let push = (clearance - len) / len;
                let wi = radii[i] * radii[i];
                let wj = radii[j] * radii[j];
                let share_i = wj / (wi + wj);

                out.dx[i] -= dx * push * share_i;
                out.dy[i] -= dy * push * share_i;
                out.dx[j] += dx * push * (1.0 - share_i);
                out.dy[j] += dy * push * (1.0 - share_i);
            }
        }
    }
}
