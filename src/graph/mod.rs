//! Graph data model: build-time specs and the id-addressed node arena.
//!
//! Node and link collections are supplied wholesale at build (or replace)
//! time and addressed internally by dense arena slots, so the spatial
//! structures, force passes and integrator never alias caller references.

mod link;
mod node;
mod store;

pub use link::{Link, LinkSpec};
pub use node::{NodeId, NodeSpec};
pub use store::GraphStore;

/// splitmix64 finalizer. The engine's only source of "randomness": initial
/// placement jitter and coincident-pair tie-breaks both key off it, so a
/// fixed seed reproduces layouts bit-for-bit.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Maps a hash to [0, 1).
pub(crate) fn unit_f32(h: u64) -> f32 {
    (h >> 40) as f32 / (1u64 << 24) as f32
}
