//! Error taxonomy for the layout engine.
//!
//! Only three conditions are hard errors; everything else (unresolvable
//! links, zero-node ticks) is absorbed locally and surfaced as diagnostics.

use serde::Serialize;
use thiserror::Error;

/// Errors returned by simulation and drag operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A drag command targeted an id the simulation does not know.
    /// The running simulation is unaffected.
    #[error("unknown node id: {id}")]
    UnknownNode { id: String },

    /// `drag_move` was issued for a node that is not currently dragging.
    #[error("node {id} is not being dragged")]
    NotDragging { id: String },

    /// The handle was used after `dispose()`.
    #[error("simulation has been disposed")]
    Disposed,
}

/// Build-time report for a link whose endpoints did not all resolve.
///
/// The offending link is dropped, never installed; the simulation itself
/// builds and ticks normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkWarning {
    /// The link's source id as supplied by the caller.
    pub source: String,
    /// The link's target id as supplied by the caller.
    pub target: String,
    /// Which of the two ids failed to resolve.
    pub missing: String,
}

impl LinkWarning {
    pub fn new(source: &str, target: &str, missing: &str) -> Self {
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
            missing: missing.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::UnknownNode { id: "p-42".into() };
        assert_eq!(err.to_string(), "unknown node id: p-42");
        assert_eq!(LayoutError::Disposed.to_string(), "simulation has been disposed");
    }
}
