//! Simulation core: owns all state and orchestrates each tick.
//!
//! One tick is: rebuild the spatial structures from current positions, run
//! the force modules in registration order into the shared delta buffer,
//! integrate, cool alpha. The only way simulation time advances is an
//! explicit `tick()`; there is no background stepping, and the whole step is
//! synchronous and bounded by node/link count.

mod drag;
mod integrator;

pub use drag::DragController;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, LinkWarning};
use crate::forces::{Center, Collide, DeltaBuf, Force, ForceCtx, LinkSpring, ManyBody};
use crate::graph::{GraphStore, Link, LinkSpec, NodeId, NodeSpec};
use crate::spatial::{HitIndex, QuadTree};

/// One node's position in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub group: String,
}

/// Per-tick read-only output: every node's position plus current alpha.
/// This is the engine's sole externally visible state; rendering it is the
/// host's job.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub alpha: f32,
    pub nodes: Vec<NodePosition>,
}

struct SimState {
    config: LayoutConfig,
    store: GraphStore,
    links: Vec<Link>,
    forces: Vec<Force>,
    drag: DragController,
    deltas: DeltaBuf,
    alpha: f32,
}

/// Handle to one force-layout simulation.
///
/// Built from wholesale node/link collections; disposed explicitly. Every
/// operation after `dispose()` fails with [`LayoutError::Disposed`].
pub struct Simulation {
    state: Option<SimState>,
}

impl Simulation {
    /// Validate and build. Links referencing unknown ids are dropped and
    /// reported in the returned warning list; they are never fatal.
    pub fn build(
        nodes: &[NodeSpec],
        links: &[LinkSpec],
        config: LayoutConfig,
    ) -> (Self, Vec<LinkWarning>) {
        let mut store = GraphStore::build(nodes, &config);
        let (links, warnings) = store.resolve_links(links, &config);
        let deltas = DeltaBuf::new(store.len());

        let sim = Self {
            state: Some(SimState {
                forces: force_set(&config),
                drag: DragController::default(),
                deltas,
                alpha: 1.0,
                config,
                store,
                links,
            }),
        };
        (sim, warnings)
    }

    fn state(&self) -> Result<&SimState, LayoutError> {
        self.state.as_ref().ok_or(LayoutError::Disposed)
    }

    fn state_mut(&mut self) -> Result<&mut SimState, LayoutError> {
        self.state.as_mut().ok_or(LayoutError::Disposed)
    }

    /// Perform one simulation step and return the resulting snapshot.
    ///
    /// With zero nodes this is a defined no-op: an empty snapshot, alpha
    /// untouched.
    pub fn tick(&mut self) -> Result<Snapshot, LayoutError> {
        let s = self.state_mut()?;
        if s.store.is_empty() {
            return Ok(snapshot_of(s));
        }

        let tree = QuadTree::build(s.store.pos_x(), s.store.pos_y(), s.config.charge_strength);
        let hits = HitIndex::build(s.store.pos_x(), s.store.pos_y());

        s.deltas.reset();
        {
            let ctx = ForceCtx {
                store: &s.store,
                links: &s.links,
                tree: &tree,
                hits: &hits,
                alpha: s.alpha,
            };
            for force in &s.forces {
                force.apply(&ctx, &mut s.deltas);
            }
        }

        integrator::step(&mut s.store, &s.deltas, &s.config);
        s.alpha = integrator::cool(s.alpha, s.config.alpha_decay);

        Ok(snapshot_of(s))
    }

    /// Current state without advancing time.
    pub fn snapshot(&self) -> Result<Snapshot, LayoutError> {
        Ok(snapshot_of(self.state()?))
    }

    pub fn alpha(&self) -> Result<f32, LayoutError> {
        Ok(self.state()?.alpha)
    }

    /// True once alpha has cooled below its floor.
    pub fn is_settled(&self) -> Result<bool, LayoutError> {
        let s = self.state()?;
        Ok(s.alpha < s.config.alpha_min)
    }

    /// Re-energize without touching positions; used when topology or
    /// interaction perturbs a settled layout.
    pub fn reheat(&mut self, amount: f32) -> Result<(), LayoutError> {
        let s = self.state_mut()?;
        s.alpha = (s.alpha + amount.max(0.0)).min(1.0);
        Ok(())
    }

    /// Replace the node/link collections wholesale. Nodes whose id survives
    /// keep their position; pins are cleared, alpha restarts at 1.0 so the
    /// new topology gets a full annealing pass.
    pub fn replace(
        &mut self,
        nodes: &[NodeSpec],
        links: &[LinkSpec],
    ) -> Result<Vec<LinkWarning>, LayoutError> {
        let s = self.state_mut()?;

        let mut store = GraphStore::build(nodes, &s.config);
        store.carry_state_from(&s.store);
        let (links, warnings) = store.resolve_links(links, &s.config);

        s.deltas = DeltaBuf::new(store.len());
        s.store = store;
        s.links = links;
        s.drag = DragController::default();
        s.alpha = 1.0;
        Ok(warnings)
    }

    /// Release all node/link state. Idempotent; later calls on the handle
    /// fail with [`LayoutError::Disposed`].
    pub fn dispose(&mut self) {
        if let Some(s) = &mut self.state {
            s.drag.release_all(&mut s.store);
        }
        self.state = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_none()
    }

    // Drag API. Commands are keyed by external id and leave the running
    // simulation untouched when rejected.

    pub fn begin_drag(&mut self, id: &str, x: f32, y: f32) -> Result<(), LayoutError> {
        let s = self.state_mut()?;
        let slot = resolve(&s.store, id)?;
        s.drag.begin(&mut s.store, slot, x, y, &s.config);
        s.alpha = (s.alpha + s.config.drag_reheat).min(1.0);
        Ok(())
    }

    pub fn drag_move(&mut self, id: &str, x: f32, y: f32) -> Result<(), LayoutError> {
        let s = self.state_mut()?;
        let slot = resolve(&s.store, id)?;
        if !s.drag.update(&mut s.store, slot, x, y, &s.config) {
            log::warn!("drag_move rejected: {id} is not being dragged");
            return Err(LayoutError::NotDragging { id: id.to_owned() });
        }
        Ok(())
    }

    pub fn end_drag(&mut self, id: &str) -> Result<(), LayoutError> {
        let s = self.state_mut()?;
        let slot = resolve(&s.store, id)?;
        s.drag.end(&mut s.store, slot);
        Ok(())
    }

    /// Resolve a pointer position to the nearest node within `max_distance`,
    /// for hit testing before a drag.
    pub fn pick(&self, x: f32, y: f32, max_distance: f32) -> Result<Option<String>, LayoutError> {
        let s = self.state()?;
        let hits = HitIndex::build(s.store.pos_x(), s.store.pos_y());
        Ok(hits
            .nearest_within(x, y, max_distance)
            .map(|slot| s.store.id_of(slot).to_owned()))
    }

    pub fn node_count(&self) -> Result<usize, LayoutError> {
        Ok(self.state()?.store.len())
    }

    pub fn link_count(&self) -> Result<usize, LayoutError> {
        Ok(self.state()?.links.len())
    }

    /// SoA position/radius buffers, for zero-copy renderer views.
    pub fn buffers(&self) -> Result<(&[f32], &[f32], &[f32]), LayoutError> {
        let s = self.state()?;
        Ok((s.store.pos_x(), s.store.pos_y(), s.store.radii()))
    }
}

fn resolve(store: &GraphStore, id: &str) -> Result<NodeId, LayoutError> {
    store.slot_of(id).ok_or_else(|| {
        log::warn!("drag command rejected: unknown node {id}");
        LayoutError::UnknownNode { id: id.to_owned() }
    })
}

/// The fixed force registration order: springs, charge, centering,
/// collision.
fn force_set(config: &LayoutConfig) -> Vec<Force> {
    vec![
        Force::Link(LinkSpring),
        Force::ManyBody(ManyBody::new(
            config.theta,
            config.charge_distance_min,
            config.charge_distance_max,
        )),
        Force::Center(Center::new(config.center, config.center_strength)),
        Force::Collide(Collide::new(config.collide_padding)),
    ]
}

fn snapshot_of(s: &SimState) -> Snapshot {
    let nodes = (0..s.store.len())
        .map(|i| {
            let slot = NodeId::new(i as u32);
            let (x, y) = s.store.position(slot);
            NodePosition {
                id: s.store.id_of(slot).to_owned(),
                x,
                y,
                group: s.store.group_of(slot).to_owned(),
            }
        })
        .collect();
    Snapshot {
        alpha: s.alpha,
        nodes,
    }
}
