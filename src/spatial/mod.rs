//! Spatial structures rebuilt from node positions every tick.
//!
//! Two structures with two jobs: an R*-tree for point queries (pointer
//! picking, collision neighborhoods) and a Barnes-Hut quadtree carrying
//! aggregate mass/centroid per cell for approximate many-body repulsion.
//! Neither outlives the tick that built it.

mod quadtree;
mod rtree;

pub use quadtree::{BhVisit, QuadTree};
pub use rtree::HitIndex;
