//! R-tree point index over current node positions.
//!
//! Backs two queries: nearest-node-within for pointer hit testing (the host
//! resolves a mouse position to a node id before starting a drag) and
//! in-radius neighborhoods for the short-range collision force. Bulk-loaded
//! from the SoA position buffers at the start of each tick.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::graph::NodeId;

/// One indexed node position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotPoint {
    slot: NodeId,
    x: f32,
    y: f32,
}

impl RTreeObject for SlotPoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for SlotPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Point index over the arena's current positions.
pub struct HitIndex {
    tree: RTree<SlotPoint>,
}

impl HitIndex {
    /// Bulk-load the index from parallel position slices.
    pub fn build(pos_x: &[f32], pos_y: &[f32]) -> Self {
        let points: Vec<_> = pos_x
            .iter()
            .zip(pos_y)
            .enumerate()
            .map(|(i, (&x, &y))| SlotPoint {
                slot: NodeId::new(i as u32),
                x,
                y,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Nearest node to `(x, y)` within `max_distance`, if any.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<NodeId> {
        let max_2 = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|p| p.distance_2(&[x, y]) <= max_2)
            .map(|p| p.slot)
    }

    /// All nodes within `radius` of `(x, y)`, including any node sitting at
    /// the query point itself.
    pub fn within(&self, x: f32, y: f32, radius: f32) -> Vec<NodeId> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|p| p.slot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(points: &[(f32, f32)]) -> HitIndex {
        let xs: Vec<f32> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f32> = points.iter().map(|p| p.1).collect();
        HitIndex::build(&xs, &ys)
    }

    #[test]
    fn test_nearest_within() {
        let idx = index(&[(0.0, 0.0), (10.0, 10.0)]);

        assert_eq!(idx.nearest_within(1.0, 1.0, 5.0), Some(NodeId(0)));
        assert_eq!(idx.nearest_within(9.0, 9.0, 5.0), Some(NodeId(1)));
        // Node 0 is ~7.07 away from (5, 5): outside 5, inside 8.
        assert_eq!(idx.nearest_within(5.0, 5.0, 5.0), None);
        assert_eq!(idx.nearest_within(5.0, 5.0, 8.0), Some(NodeId(0)));
    }

    #[test]
    fn test_within_radius() {
        let idx = index(&[(0.0, 0.0), (3.0, 0.0), (10.0, 0.0)]);

        let mut hits = idx.within(0.0, 0.0, 5.0);
        hits.sort_by_key(|id| id.0);
        assert_eq!(hits, vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn test_empty_index() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert_eq!(idx.nearest_within(0.0, 0.0, 100.0), None);
    }
}
