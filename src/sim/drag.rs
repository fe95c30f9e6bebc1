//! Drag controller: pointer gestures as an explicit per-node state machine.
//!
//! Each node is `Free` or `Dragging`; a drag holds a position pin on the
//! node that the integrator honors exactly, and releasing clears the pin and
//! zeroes velocity so the node doesn't jump on release. Dragging several
//! nodes concurrently is independent per-id state.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::graph::{GraphStore, NodeId};

use super::integrator::clamp_to_bounds;

/// Tracks which nodes are currently held by a pointer.
#[derive(Debug, Default)]
pub struct DragController {
    dragging: HashSet<u32>,
}

impl DragController {
    /// Grab a node: pin it at the pointer position. Idempotent for a node
    /// already held (the pin just moves).
    pub fn begin(&mut self, store: &mut GraphStore, slot: NodeId, x: f32, y: f32, config: &LayoutConfig) {
        let (px, py) = clamp_to_bounds(x, y, store.radii()[slot.index()], config.bounds);
        store.set_pin(slot, px, py);
        self.dragging.insert(slot.0);
    }

    /// Move a held node's pin. Returns false (and changes nothing) when the
    /// node is not currently dragging.
    pub fn update(&mut self, store: &mut GraphStore, slot: NodeId, x: f32, y: f32, config: &LayoutConfig) -> bool {
        if !self.dragging.contains(&slot.0) {
            return false;
        }
        let (px, py) = clamp_to_bounds(x, y, store.radii()[slot.index()], config.bounds);
        store.set_pin(slot, px, py);
        true
    }

    /// Release a node: clear the pin and reset velocity. No-op for a node
    /// that is already free.
    pub fn end(&mut self, store: &mut GraphStore, slot: NodeId) {
        if self.dragging.remove(&slot.0) {
            store.clear_pin(slot);
            store.reset_velocity(slot);
        }
    }

    pub fn is_dragging(&self, slot: NodeId) -> bool {
        self.dragging.contains(&slot.0)
    }

    /// Release everything (wholesale replacement, disposal).
    pub fn release_all(&mut self, store: &mut GraphStore) {
        self.dragging.clear();
        store.clear_all_pins();
    }
}
