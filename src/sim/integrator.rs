//! Integration step and cooling schedule.
//!
//! Damped explicit Euler: accumulated force deltas fold into velocity, decay
//! shaves momentum, positions advance. Pinned nodes bypass all of it; their
//! position is forced to the pin and their velocity zeroed. With bounds
//! configured, every node's circle is clamped back inside the canvas after
//! the move.

use crate::config::LayoutConfig;
use crate::forces::DeltaBuf;
use crate::graph::GraphStore;

/// Alpha decays toward this; settling is detected against `alpha_min`.
const ALPHA_TARGET: f32 = 0.0;

/// Advance all node positions by one step.
pub fn step(store: &mut GraphStore, deltas: &DeltaBuf, config: &LayoutConfig) {
    let decay = config.velocity_decay;
    let bounds = config.bounds;
    let (pos_x, pos_y, vel_x, vel_y, pins, radii) = store.buffers_mut();

    for i in 0..pos_x.len() {
        if let Some((px, py)) = pins[i] {
            pos_x[i] = px;
            pos_y[i] = py;
            vel_x[i] = 0.0;
            vel_y[i] = 0.0;
            continue;
        }

        vel_x[i] = (vel_x[i] + deltas.dx[i]) * decay;
        vel_y[i] = (vel_y[i] + deltas.dy[i]) * decay;
        pos_x[i] += vel_x[i];
        pos_y[i] += vel_y[i];

        if bounds.is_some() {
            let (cx, cy) = clamp_to_bounds(pos_x[i], pos_y[i], radii[i], bounds);
            pos_x[i] = cx;
            pos_y[i] = cy;
        }
    }
}

/// One tick of exponential cooling.
pub fn cool(alpha: f32, alpha_decay: f32) -> f32 {
    alpha + (ALPHA_TARGET - alpha) * alpha_decay
}

/// Clamp a node center so its circle stays inside the `(width, height)`
/// canvas rectangle. No-op without bounds.
pub fn clamp_to_bounds(x: f32, y: f32, radius: f32, bounds: Option<(f32, f32)>) -> (f32, f32) {
    let Some((w, h)) = bounds else {
        return (x, y);
    };
    let rx = radius.min(w * 0.5);
    let ry = radius.min(h * 0.5);
    (x.clamp(rx, w - rx), y.clamp(ry, h - ry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeId, NodeSpec};

    fn store_of(n: usize, config: &LayoutConfig) -> GraphStore {
        let specs: Vec<NodeSpec> = (0..n)
            .map(|i| NodeSpec::new(format!("n{i}"), 100.0, ""))
            .collect();
        GraphStore::build(&specs, config)
    }

    #[test]
    fn test_velocity_folds_delta_and_decays() {
        let config = LayoutConfig::default(); // velocity_decay 0.6
        let mut store = store_of(1, &config);
        let (x0, y0) = store.position(NodeId(0));

        let mut deltas = DeltaBuf::new(1);
        deltas.dx[0] = 10.0;
        step(&mut store, &deltas, &config);

        assert_eq!(store.velocity(NodeId(0)), (6.0, 0.0));
        assert_eq!(store.position(NodeId(0)), (x0 + 6.0, y0));
    }

    #[test]
    fn test_pinned_node_ignores_forces() {
        let config = LayoutConfig::default();
        let mut store = store_of(1, &config);
        store.set_pin(NodeId(0), 77.0, -3.0);

        let mut deltas = DeltaBuf::new(1);
        deltas.dx[0] = 1000.0;
        deltas.dy[0] = 1000.0;
        step(&mut store, &deltas, &config);

        assert_eq!(store.position(NodeId(0)), (77.0, -3.0));
        assert_eq!(store.velocity(NodeId(0)), (0.0, 0.0));
    }

    #[test]
    fn test_bounds_clamp_keeps_circle_inside() {
        let config = LayoutConfig {
            bounds: Some((100.0, 100.0)),
            ..LayoutConfig::default()
        };
        let mut store = store_of(1, &config); // radius 10

        let mut deltas = DeltaBuf::new(1);
        deltas.dx[0] = 100_000.0;
        deltas.dy[0] = -100_000.0;
        step(&mut store, &deltas, &config);

        assert_eq!(store.position(NodeId(0)), (90.0, 10.0));
    }

    #[test]
    fn test_cooling_is_monotone_toward_zero() {
        let mut alpha = 1.0;
        for _ in 0..10 {
            let next = cool(alpha, 0.0228);
            assert!(next < alpha && next > 0.0);
            alpha = next;
        }
    }
}
