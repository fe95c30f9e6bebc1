//! Barnes-Hut quadtree over the 2D bounding square of current positions.
//!
//! Internal cells carry the summed strength-mass and |strength|-weighted
//! centroid of their subtree, computed bottom-up after insertion. Traversal
//! applies the Barnes-Hut criterion: a cell whose width is small relative to
//! its distance from the query point is handed to the caller as one
//! pseudo-body instead of being descended into, which is what keeps the
//! many-body pass below O(n^2).
//!
//! Degenerate input is safe: subdivision is capped by depth and by a minimum
//! cell size, below which points share one leaf bucket. Fully coincident
//! node sets therefore terminate instead of recursing forever.

/// Subdivision stops here even if points still collide spatially.
const MAX_DEPTH: u32 = 24;
/// Cells narrower than this are treated as a single location.
const MIN_HALF: f32 = 1e-4;

/// A square region: center plus half side length.
#[derive(Debug, Clone, Copy)]
struct Quad {
    cx: f32,
    cy: f32,
    half: f32,
}

impl Quad {
    /// Child quadrant `i` (bit 0: east, bit 1: south in +y convention).
    fn child(&self, i: usize) -> Quad {
        let h = self.half * 0.5;
        Quad {
            cx: self.cx + if i & 1 == 1 { h } else { -h },
            cy: self.cy + if i & 2 == 2 { h } else { -h },
            half: h,
        }
    }

    fn quadrant_of(&self, x: f32, y: f32) -> usize {
        (x >= self.cx) as usize | (((y >= self.cy) as usize) << 1)
    }
}

/// One inserted point.
#[derive(Debug, Clone, Copy)]
struct Body {
    slot: u32,
    x: f32,
    y: f32,
    strength: f32,
}

enum Cell {
    Empty,
    /// One position's worth of points: a single body, or several that are
    /// coincident (or undersized/over-deep, see the caps above).
    Leaf(Vec<Body>),
    Internal(Box<Internal>),
}

struct Internal {
    /// Summed signed strength of the subtree.
    mass: f32,
    /// |strength|-weighted centroid of the subtree.
    cx: f32,
    cy: f32,
    children: [Cell; 4],
}

impl Internal {
    fn empty() -> Self {
        Self {
            mass: 0.0,
            cx: 0.0,
            cy: 0.0,
            children: [Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
        }
    }
}

/// One step of a Barnes-Hut traversal.
#[derive(Debug, Clone, Copy)]
pub enum BhVisit {
    /// A whole cell accepted as a single pseudo-body.
    Far { mass: f32, cx: f32, cy: f32 },
    /// An individual body (a too-near cell was descended to its leaves).
    Near {
        slot: u32,
        x: f32,
        y: f32,
        strength: f32,
    },
}

/// Quadtree with per-cell aggregates, rebuilt each tick.
pub struct QuadTree {
    root: Cell,
    cover: Quad,
}

impl QuadTree {
    /// Build from parallel position slices with one uniform per-node
    /// strength (the configured charge).
    pub fn build(pos_x: &[f32], pos_y: &[f32], strength: f32) -> Self {
        let cover = cover_of(pos_x, pos_y);
        let mut root = Cell::Empty;

        for (i, (&x, &y)) in pos_x.iter().zip(pos_y).enumerate() {
            let body = Body {
                slot: i as u32,
                x,
                y,
                strength,
            };
            insert(&mut root, cover, body, 0);
        }

        let mut tree = Self { root, cover };
        aggregate(&mut tree.root);
        tree
    }

    /// Visit the tree from the viewpoint of a query position.
    ///
    /// Emits [`BhVisit::Far`] for every cell accepted whole under the
    /// criterion `width^2 < theta2 * distance(query, centroid)^2`, and
    /// [`BhVisit::Near`] for every individual body reached by descent. The
    /// caller owns all force math, including skipping itself among the near
    /// bodies.
    pub fn traverse<F>(&self, x: f32, y: f32, theta2: f32, visit: &mut F)
    where
        F: FnMut(BhVisit),
    {
        walk(&self.root, self.cover, x, y, theta2, visit);
    }

    /// Summed strength over all inserted bodies.
    pub fn total_mass(&self) -> f32 {
        match &self.root {
            Cell::Empty => 0.0,
            Cell::Leaf(pts) => pts.iter().map(|p| p.strength).sum(),
            Cell::Internal(node) => node.mass,
        }
    }
}

/// Smallest covering square, padded so a degenerate extent still has area.
fn cover_of(pos_x: &[f32], pos_y: &[f32]) -> Quad {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for (&x, &y) in pos_x.iter().zip(pos_y) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_x > max_x {
        // Empty input; any cover works.
        return Quad {
            cx: 0.0,
            cy: 0.0,
            half: 1.0,
        };
    }

    let half = ((max_x - min_x).max(max_y - min_y) * 0.5).max(0.5);
    Quad {
        cx: (min_x + max_x) * 0.5,
        cy: (min_y + max_y) * 0.5,
        half,
    }
}

fn insert(cell: &mut Cell, quad: Quad, body: Body, depth: u32) {
    match cell {
        Cell::Empty => *cell = Cell::Leaf(vec![body]),
        Cell::Leaf(pts) => {
            let at_cap = depth >= MAX_DEPTH || quad.half <= MIN_HALF;
            let coincident = pts[0].x == body.x && pts[0].y == body.y;
            if at_cap || coincident {
                pts.push(body);
                return;
            }

            let existing = std::mem::take(pts);
            let mut node = Internal::empty();
            for p in existing {
                let q = quad.quadrant_of(p.x, p.y);
                insert(&mut node.children[q], quad.child(q), p, depth + 1);
            }
            let q = quad.quadrant_of(body.x, body.y);
            insert(&mut node.children[q], quad.child(q), body, depth + 1);
            *cell = Cell::Internal(Box::new(node));
        }
        Cell::Internal(node) => {
            let q = quad.quadrant_of(body.x, body.y);
            insert(&mut node.children[q], quad.child(q), body, depth + 1);
        }
    }
}

/// Bottom-up aggregate pass. Returns `(mass, weight, wx, wy)` where the
/// centroid accumulators are |strength|-weighted.
fn aggregate(cell: &mut Cell) -> (f32, f32, f32, f32) {
    match cell {
        Cell::Empty => (0.0, 0.0, 0.0, 0.0),
        Cell::Leaf(pts) => {
            let mut sums = (0.0, 0.0, 0.0, 0.0);
            for p in pts {
                let w = p.strength.abs();
                sums.0 += p.strength;
                sums.1 += w;
                sums.2 += w * p.x;
                sums.3 += w * p.y;
            }
            sums
        }
        Cell::Internal(node) => {
            let mut sums = (0.0, 0.0, 0.0, 0.0);
            for child in &mut node.children {
                let (m, w, wx, wy) = aggregate(child);
                sums.0 += m;
                sums.1 += w;
                sums.2 += wx;
                sums.3 += wy;
            }
            node.mass = sums.0;
            if sums.1 > 0.0 {
                node.cx = sums.2 / sums.1;
                node.cy = sums.3 / sums.1;
            }
            sums
        }
    }
}

fn walk<F>(cell: &Cell, quad: Quad, x: f32, y: f32, theta2: f32, visit: &mut F)
where
    F: FnMut(BhVisit),
{
    match cell {
        Cell::Empty => {}
        Cell::Leaf(pts) => {
            for p in pts {
                visit(BhVisit::Near {
                    slot: p.slot,
                    x: p.x,
                    y: p.y,
                    strength: p.strength,
                });
            }
        }
        Cell::Internal(node) => {
            let dx = node.cx - x;
            let dy = node.cy - y;
            let l2 = dx * dx + dy * dy;
            let width = quad.half * 2.0;
            if width * width < theta2 * l2 {
                visit(BhVisit::Far {
                    mass: node.mass,
                    cx: node.cx,
                    cy: node.cy,
                });
            } else {
                for (i, child) in node.children.iter().enumerate() {
                    walk(child, quad.child(i), x, y, theta2, visit);
                }
            }
        }
    }
}
