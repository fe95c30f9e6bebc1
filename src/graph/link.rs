//! Link input and its resolved, simulation-ready form.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// A relation between two nodes, as supplied by the caller.
///
/// `distance` and `strength` fall back to configuration defaults when
/// omitted; strength in particular defaults per-link from endpoint
/// connectivity so hub nodes are not over-constrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub strength: Option<f32>,
}

impl LinkSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            distance: None,
            strength: None,
        }
    }
}

/// A link whose endpoints resolved to arena slots.
///
/// `bias` splits each spring displacement between the endpoints in
/// proportion to connectivity: the better-connected end moves less.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    /// Spring rest length.
    pub distance: f32,
    /// Spring stiffness in (0, 1].
    pub strength: f32,
    /// Fraction of the displacement absorbed by the target endpoint.
    pub bias: f32,
}
