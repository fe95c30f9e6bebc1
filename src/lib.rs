//! Tier Layout - WASM Module
//!
//! Force-directed layout engine for network topology views, compiled to
//! WebAssembly and exposed via wasm-bindgen. The host supplies node and link
//! collections wholesale, drives the simulation one explicit `tick()` at a
//! time and renders the returned snapshots (or the zero-copy position views).
//!
//! # Architecture
//!
//! - `graph`: id-addressed node arena over petgraph's StableGraph, SoA state
//! - `spatial`: Barnes-Hut quadtree (repulsion) and R-tree (hit testing)
//! - `forces`: the composable force modules (springs, charge, center, collide)
//! - `sim`: integrator, cooling schedule, drag controller, simulation core

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod forces;
pub mod graph;
pub mod sim;
pub mod spatial;

use config::LayoutConfig;
use error::{LayoutError, LinkWarning};
use graph::{LinkSpec, NodeSpec};
use sim::Simulation;

/// Initialize the WASM module: panic messages and warnings go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Warn);
}

fn js_err(err: LayoutError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Main entry point for the layout engine.
///
/// Wraps the internal [`Simulation`] and provides the public API exposed to
/// JavaScript. All inputs and snapshots cross the boundary as plain JS
/// objects; the per-node position buffers are additionally available as
/// zero-copy `Float32Array` views for direct GPU upload.
#[wasm_bindgen]
pub struct TierLayout {
    sim: Simulation,
    warnings: Vec<LinkWarning>,
}

#[wasm_bindgen]
impl TierLayout {
    /// Build a simulation from node/link collections and an optional partial
    /// configuration object.
    ///
    /// Links referencing unknown node ids are dropped, not fatal; retrieve
    /// them via [`TierLayout::warnings`].
    #[wasm_bindgen(constructor)]
    pub fn new(nodes: JsValue, links: JsValue, config: JsValue) -> Result<TierLayout, JsValue> {
        let nodes: Vec<NodeSpec> = serde_wasm_bindgen::from_value(nodes)?;
        let links: Vec<LinkSpec> = serde_wasm_bindgen::from_value(links)?;
        let config: LayoutConfig = if config.is_undefined() || config.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let (sim, warnings) = Simulation::build(&nodes, &links, config);
        Ok(Self { sim, warnings })
    }

    /// Links dropped during the last build or replace, as
    /// `{ source, target, missing }` objects.
    pub fn warnings(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.warnings)?)
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation one step and return the snapshot:
    /// `{ alpha, nodes: [{ id, x, y, group }] }` in input order.
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.sim.tick().map_err(js_err)?;
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// Current state without advancing time.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.sim.snapshot().map_err(js_err)?;
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// Current cooling energy in [0, 1].
    pub fn alpha(&self) -> Result<f32, JsValue> {
        self.sim.alpha().map_err(js_err)
    }

    /// True once the layout has cooled below its energy floor; the host can
    /// stop its tick loop.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> Result<bool, JsValue> {
        self.sim.is_settled().map_err(js_err)
    }

    /// Add energy back into a (possibly settled) layout.
    pub fn reheat(&mut self, amount: f32) -> Result<(), JsValue> {
        self.sim.reheat(amount).map_err(js_err)
    }

    /// Replace the node/link collections wholesale. Surviving ids keep their
    /// positions; the cooling schedule restarts. Returns the new warnings.
    pub fn replace(&mut self, nodes: JsValue, links: JsValue) -> Result<JsValue, JsValue> {
        let nodes: Vec<NodeSpec> = serde_wasm_bindgen::from_value(nodes)?;
        let links: Vec<LinkSpec> = serde_wasm_bindgen::from_value(links)?;

        self.warnings = self.sim.replace(&nodes, &links).map_err(js_err)?;
        Ok(serde_wasm_bindgen::to_value(&self.warnings)?)
    }

    /// Release all simulation state. Every later call on this handle fails.
    pub fn dispose(&mut self) {
        self.sim.dispose();
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> Result<usize, JsValue> {
        self.sim.node_count().map_err(js_err)
    }

    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> Result<usize, JsValue> {
        self.sim.link_count().map_err(js_err)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Grab a node: it follows the pointer exactly until released, and the
    /// simulation reheats so neighbors adjust.
    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&mut self, id: &str, x: f32, y: f32) -> Result<(), JsValue> {
        self.sim.begin_drag(id, x, y).map_err(js_err)
    }

    /// Move a held node's pin to the pointer position.
    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, id: &str, x: f32, y: f32) -> Result<(), JsValue> {
        self.sim.drag_move(id, x, y).map_err(js_err)
    }

    /// Release a held node back to the forces.
    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&mut self, id: &str) -> Result<(), JsValue> {
        self.sim.end_drag(id).map_err(js_err)
    }

    /// Resolve a pointer position to the nearest node id within
    /// `max_distance`, or None. Use before `beginDrag`.
    pub fn pick(&self, x: f32, y: f32, max_distance: f32) -> Result<Option<String>, JsValue> {
        self.sim.pick(x, y, max_distance).map_err(js_err)
    }

    // =========================================================================
    // Position Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of X positions, indexed by input order.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for GPU upload, do not store.
    #[wasm_bindgen(js_name = positionsXView)]
    pub fn positions_x_view(&self) -> Result<Float32Array, JsValue> {
        let (pos_x, _, _) = self.sim.buffers().map_err(js_err)?;
        Ok(unsafe { Float32Array::view(pos_x) })
    }

    /// Get a zero-copy view of Y positions, indexed by input order.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for GPU upload, do not store.
    #[wasm_bindgen(js_name = positionsYView)]
    pub fn positions_y_view(&self) -> Result<Float32Array, JsValue> {
        let (_, pos_y, _) = self.sim.buffers().map_err(js_err)?;
        Ok(unsafe { Float32Array::view(pos_y) })
    }

    /// Get a zero-copy view of the derived node radii.
    #[wasm_bindgen(js_name = radiiView)]
    pub fn radii_view(&self) -> Result<Float32Array, JsValue> {
        let (_, _, radii) = self.sim.buffers().map_err(js_err)?;
        Ok(unsafe { Float32Array::view(radii) })
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;

    /// End-to-end over the JS boundary: build from JsValue collections,
    /// tick, read the zero-copy views, dispose.
    #[wasm_bindgen_test]
    fn test_facade_builds_ticks_and_disposes() {
        let nodes = serde_wasm_bindgen::to_value(&vec![
            NodeSpec::new("a", 100.0, "t1"),
            NodeSpec::new("b", 100.0, "t1"),
        ])
        .unwrap();
        let links = serde_wasm_bindgen::to_value(&vec![LinkSpec::new("a", "b")]).unwrap();

        let mut layout = TierLayout::new(nodes, links, JsValue::NULL).unwrap();
        assert_eq!(layout.node_count().unwrap(), 2);
        assert_eq!(layout.link_count().unwrap(), 1);

        let before = layout.alpha().unwrap();
        layout.tick().unwrap();
        assert!(layout.alpha().unwrap() < before);

        assert_eq!(layout.positions_x_view().unwrap().length(), 2);
        assert_eq!(layout.positions_y_view().unwrap().length(), 2);
        assert_eq!(layout.radii_view().unwrap().length(), 2);

        layout.dispose();
        assert!(layout.tick().is_err());
    }
}
