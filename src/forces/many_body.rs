//! Many-body (charge) force, Barnes-Hut approximated.
//!
//! Every pair of nodes interacts with inverse-square magnitude; far regions
//! of the quadtree are collapsed into single pseudo-bodies so the pass costs
//! O(n log n) instead of O(n^2). Negative strength repels.

use crate::spatial::BhVisit;

use super::{pair_nudge, DeltaBuf, ForceCtx};

/// Charge repulsion/attraction between all node pairs.
#[derive(Debug, Clone)]
pub struct ManyBody {
    /// Squared Barnes-Hut acceptance parameter.
    pub theta2: f32,
    /// Squared pair distances are floored here before the inverse-square
    /// law, so near-coincident nodes don't produce unbounded impulses.
    pub distance_min2: f32,
    /// Interactions beyond this squared distance are dropped entirely.
    pub distance_max2: f32,
}

impl ManyBody {
    pub fn new(theta: f32, distance_min: f32, distance_max: Option<f32>) -> Self {
        Self {
            theta2: theta * theta,
            distance_min2: distance_min * distance_min,
            distance_max2: distance_max.map_or(f32::INFINITY, |d| d * d),
        }
    }

    pub fn apply(&self, ctx: &ForceCtx<'_>, out: &mut DeltaBuf) {
        let pos_x = ctx.store.pos_x();
        let pos_y = ctx.store.pos_y();
        let alpha = ctx.alpha;

        for i in 0..ctx.store.len() {
            let (x, y) = (pos_x[i], pos_y[i]);
            let (mut ax, mut ay) = (0.0f32, 0.0f32);

            ctx.tree.traverse(x, y, self.theta2, &mut |v| {
                let (mut dx, mut dy, mass) = match v {
                    BhVisit::Far { mass, cx, cy } => (cx - x, cy - y, mass),
                    BhVisit::Near {
                        slot,
                        x: px,
                        y: py,
                        strength,
                    } => {
                        if slot as usize == i {
                            return;
                        }
                        (px - x, py - y, strength)
                    }
                };

                if dx == 0.0 && dy == 0.0 {
                    // Far cells are never coincident with the query (the
                    // acceptance test rejects zero distance), so this is an
                    // individual body and its slot-pair nudge applies.
                    (dx, dy) = match v {
                        BhVisit::Near { slot, .. } => pair_nudge(i as u32, slot),
                        BhVisit::Far { .. } => return,
                    };
                }

                let mut l2 = dx * dx + dy * dy;
                if l2 >= self.distance_max2 {
                    return;
                }
                l2 = l2.max(self.distance_min2);

                let w = mass * alpha / l2;
                ax += dx * w;
                ay += dy * w;
            });

            out.dx[i] += ax;
            out.dy[i] += ay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::graph::{GraphStore, NodeSpec};
    use crate::spatial::{HitIndex, QuadTree};

    fn ctx_for<'a>(
        store: &'a GraphStore,
        tree: &'a QuadTree,
        hits: &'a HitIndex,
    ) -> ForceCtx<'a> {
        ForceCtx {
            store,
            links: &[],
            tree,
            hits,
            alpha: 1.0,
        }
    }

    #[test]
    fn test_two_nodes_repel_along_their_axis() {
        let config = LayoutConfig::default();
        let store = GraphStore::build(
            &[NodeSpec::new("a", 0.0, ""), NodeSpec::new("b", 0.0, "")],
            &config,
        );
        let tree = QuadTree::build(store.pos_x(), store.pos_y(), -30.0);
        let hits = HitIndex::build(store.pos_x(), store.pos_y());

        let mut out = DeltaBuf::new(2);
        ManyBody::new(0.9, 1.0, None).apply(&ctx_for(&store, &tree, &hits), &mut out);

        // Deltas are opposite in direction (approximately equal magnitude)
        // and widen the separation.
        let sep_x = store.pos_x()[1] - store.pos_x()[0];
        let sep_y = store.pos_y()[1] - store.pos_y()[0];
        let relative = (out.dx[1] - out.dx[0]) * sep_x + (out.dy[1] - out.dy[0]) * sep_y;
        assert!(relative > 0.0, "repulsion must push the pair apart");
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let config = LayoutConfig::default();
        let mut store = GraphStore::build(
            &[NodeSpec::new("a", 0.0, ""), NodeSpec::new("b", 0.0, "")],
            &config,
        );
        // Force exact coincidence through the integrator-facing buffers.
        {
            let (px, py, _, _, _, _) = store.buffers_mut();
            px[0] = 1.0;
            px[1] = 1.0;
            py[0] = 2.0;
            py[1] = 2.0;
        }
        let tree = QuadTree::build(store.pos_x(), store.pos_y(), -30.0);
        let hits = HitIndex::build(store.pos_x(), store.pos_y());

        let mut out = DeltaBuf::new(2);
        ManyBody::new(0.9, 1.0, None).apply(&ctx_for(&store, &tree, &hits), &mut out);

        // The deterministic nudge must produce opposite, nonzero pushes.
        assert!(out.dx[0] != 0.0 || out.dy[0] != 0.0);
        let dot = out.dx[0] * out.dx[1] + out.dy[0] * out.dy[1];
        assert!(dot < 0.0, "coincident pair should separate in opposite directions");
    }

    #[test]
    fn test_distance_max_cuts_off_far_pairs() {
        let config = LayoutConfig::default();
        let mut store = GraphStore::build(
            &[NodeSpec::new("a", 0.0, ""), NodeSpec::new("b", 0.0, "")],
            &config,
        );
        {
            let (px, py, _, _, _, _) = store.buffers_mut();
            px[0] = 0.0;
            py[0] = 0.0;
            px[1] = 100.0;
            py[1] = 0.0;
        }
        let tree = QuadTree::build(store.pos_x(), store.pos_y(), -30.0);
        let hits = HitIndex::build(store.pos_x(), store.pos_y());

        // Pair separation 100: in range at 200, out of range at 50.
        let mut near = DeltaBuf::new(2);
        ManyBody::new(0.9, 1.0, Some(200.0)).apply(&ctx_for(&store, &tree, &hits), &mut near);
        assert!(near.dx[0] != 0.0 && near.dx[1] != 0.0);

        let mut cut = DeltaBuf::new(2);
        ManyBody::new(0.9, 1.0, Some(50.0)).apply(&ctx_for(&store, &tree, &hits), &mut cut);
        assert!(cut.dx.iter().chain(cut.dy.iter()).all(|&v| v == 0.0));
    }

    #[test]
    fn test_distance_min_floors_the_impulse() {
        let config = LayoutConfig::default();
        let mut store = GraphStore::build(
            &[NodeSpec::new("a", 0.0, ""), NodeSpec::new("b", 0.0, "")],
            &config,
        );
        {
            let (px, py, _, _, _, _) = store.buffers_mut();
            px[0] = 0.0;
            py[0] = 0.0;
            px[1] = 0.1;
            py[1] = 0.0;
        }
        let tree = QuadTree::build(store.pos_x(), store.pos_y(), -30.0);
        let hits = HitIndex::build(store.pos_x(), store.pos_y());

        // Separation 0.1 with a floor of 10: l2 clamps to 100, so the
        // impulse is |mass| * |d| / 100 rather than |mass| / |d|.
        let mut out = DeltaBuf::new(2);
        ManyBody::new(0.9, 10.0, None).apply(&ctx_for(&store, &tree, &hits), &mut out);
        assert!((out.dx[0] - (0.1 * -30.0 / 100.0)).abs() < 1e-6);
        assert!((out.dx[1] - (0.1 * 30.0 / 100.0)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_strength_is_inert() {
        let config = LayoutConfig::default();
        let store = GraphStore::build(
            &[
                NodeSpec::new("a", 0.0, ""),
                NodeSpec::new("b", 0.0, ""),
                NodeSpec::new("c", 0.0, ""),
            ],
            &config,
        );
        let tree = QuadTree::build(store.pos_x(), store.pos_y(), 0.0);
        let hits = HitIndex::build(store.pos_x(), store.pos_y());

        let mut out = DeltaBuf::new(3);
        ManyBody::new(0.9, 1.0, None).apply(&ctx_for(&store, &tree, &hits), &mut out);
        assert!(out.dx.iter().chain(out.dy.iter()).all(|&v| v == 0.0));
    }
}
