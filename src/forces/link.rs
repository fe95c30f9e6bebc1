//! Link spring force.
//!
//! Pulls each link's endpoints toward the link's rest length. The
//! displacement correction is split between the endpoints by the link's
//! `bias`, so the better-connected endpoint moves less.

use super::{pair_nudge, DeltaBuf, ForceCtx};

/// Spring attraction along every resolved link.
#[derive(Debug, Clone, Default)]
pub struct LinkSpring;

impl LinkSpring {
    pub fn apply(&self, ctx: &ForceCtx<'_>, out: &mut DeltaBuf) {
        for link in ctx.links {
            let (sx, sy) = ctx.store.position(link.source);
            let (tx, ty) = ctx.store.position(link.target);

            let (mut dx, mut dy) = (tx - sx, ty - sy);
            if dx == 0.0 && dy == 0.0 {
                (dx, dy) = pair_nudge(link.source.0, link.target.0);
            }

            let len = (dx * dx + dy * dy).sqrt();
            let k = (len - link.distance) / len * ctx.alpha * link.strength;
            dx *= k;
            dy *= k;

            let t = link.target.index();
            let s = link.source.index();
            out.dx[t] -= dx * link.bias;
            out.dy[t] -= dy * link.bias;
            out.dx[s] += dx * (1.0 - link.bias);
            out.dy[s] += dy * (1.0 - link.bias);
        }
    }
}
