//! Node identity and build-time node input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense arena slot for a node within one simulation instance.
///
/// Slots are assigned in input order at build time and stay stable until the
/// node set is replaced wholesale. External (caller) ids are strings; the
/// mapping lives in [`super::GraphStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// Arena index as usize, for SoA buffer access.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

/// One visual entity, as supplied by the caller.
///
/// `weight` drives the derived display/collision radius; `group` is an
/// opaque categorical tag (e.g. a tier name) echoed back in snapshots for
/// the renderer and never interpreted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub group: String,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, weight: f32, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight,
            group: group.into(),
        }
    }
}
