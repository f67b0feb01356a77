//! Coordinates for drawing graphs and circuits.
//!
//! Pure functions of the shape being drawn; the renderer calls them whenever
//! it needs fresh positions.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::circuit::Circuit;
use crate::gate::GateId;
use crate::graph::{GraphAnalysis, GraphMode};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Default canvas side for graph drawings.
pub const CANVAS_SIZE: f64 = 320.0;
const CIRCLE_RADIUS: f64 = 100.0;
const PAIR_OFFSET: f64 = 60.0;

/// `n` vertices on a circle around the canvas center, first one at the top,
/// going clockwise. Two vertices sit side by side on the horizontal midline.
pub fn circle_layout(n: usize, size: f64) -> Vec<Point> {
    let (cx, cy) = (size / 2.0, size / 2.0);
    if n == 2 {
        return vec![Point::new(cx - PAIR_OFFSET, cy), Point::new(cx + PAIR_OFFSET, cy)];
    }
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64 - PI / 2.0;
            Point::new(cx + CIRCLE_RADIUS * angle.cos(), cy + CIRCLE_RADIUS * angle.sin())
        })
        .collect()
}

/// Two columns at a quarter and three quarters of the canvas width, each
/// spread evenly over its height.
pub fn bipartite_layout(left: usize, right: usize, size: f64) -> Vec<Point> {
    let column = |count: usize, x: f64| {
        let step = size / (count + 1) as f64;
        (0..count).map(move |i| Point::new(x, step * (i + 1) as f64))
    };
    column(left, size / 4.0).chain(column(right, size * 3.0 / 4.0)).collect()
}

/// Vertex positions for an analyzed relation.
pub fn graph_layout(graph: &GraphAnalysis, size: f64) -> Vec<Point> {
    match graph.mode {
        GraphMode::General => circle_layout(graph.vertex_count(), size),
        GraphMode::Bipartite { rows, cols } => bipartite_layout(rows, cols, size),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitLayout {
    /// Position of primary input `i + 1`.
    pub inputs: Vec<Point>,
    pub gates: HashMap<GateId, (Point, usize)>,
}

const INPUT_X: f64 = 60.0;
const INPUT_STEP: f64 = 80.0;
const GATE_X: f64 = 200.0;
const LEVEL_STEP: f64 = 160.0;
const GATE_STEP: f64 = 100.0;
const TOP: f64 = 80.0;

/// Inputs in a column on the left; gates in one column per level, declaration
/// order within a level.
pub fn circuit_layout(circuit: &Circuit) -> CircuitLayout {
    let inputs = (0..circuit.num_inputs())
        .map(|i| Point::new(INPUT_X, TOP + i as f64 * INPUT_STEP))
        .collect();

    let mut gates = HashMap::new();
    for (level, ids) in circuit.gates_by_level().into_iter().enumerate() {
        for (i, id) in ids.into_iter().enumerate() {
            let p = Point::new(GATE_X + level as f64 * LEVEL_STEP, TOP + i as f64 * GATE_STEP);
            gates.insert(id, (p, level));
        }
    }

    CircuitLayout { inputs, gates }
}

/// Point at distance `r` from `from` towards `to`, for clipping edges at a
/// vertex circle.
pub fn edge_point(from: Point, to: Point, r: f64) -> Point {
    let len = from.distance(to);
    if len == 0.0 {
        return from;
    }
    let ratio = r / len;
    Point::new(from.x + (to.x - from.x) * ratio, from.y + (to.y - from.y) * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_circle_layout() {
        let pts = circle_layout(4, CANVAS_SIZE);
        assert!(close(pts[0], Point::new(160.0, 60.0)));
        assert!(close(pts[1], Point::new(260.0, 160.0)));
        assert!(close(pts[2], Point::new(160.0, 260.0)));
        assert!(close(pts[3], Point::new(60.0, 160.0)));
    }

    #[test]
    fn test_pair_layout() {
        let pts = circle_layout(2, CANVAS_SIZE);
        assert_eq!(pts, vec![Point::new(100.0, 160.0), Point::new(220.0, 160.0)]);
    }

    #[test]
    fn test_bipartite_layout() {
        let pts = bipartite_layout(1, 3, 320.0);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Point::new(80.0, 160.0));
        assert_eq!(pts[1], Point::new(240.0, 80.0));
        assert_eq!(pts[3], Point::new(240.0, 240.0));
    }

    #[test]
    fn test_circuit_layout() {
        let mut c = Circuit::new(2);
        let a = c.declare_gate("0001", "1, 2", 3).unwrap();
        let b = c.declare_gate("0111", "1, 2", 4).unwrap();
        let d = c.declare_gate("0110", "3, 4", 5).unwrap();
        let layout = circuit_layout(&c);
        assert_eq!(layout.inputs, vec![Point::new(60.0, 80.0), Point::new(60.0, 160.0)]);
        assert_eq!(layout.gates[&a], (Point::new(200.0, 80.0), 0));
        assert_eq!(layout.gates[&b], (Point::new(200.0, 180.0), 0));
        assert_eq!(layout.gates[&d], (Point::new(360.0, 80.0), 1));
    }

    #[test]
    fn test_edge_point() {
        let p = edge_point(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 3.0);
        assert_eq!(p, Point::new(3.0, 0.0));
        let same = Point::new(1.0, 1.0);
        assert_eq!(edge_point(same, same, 3.0), same);
    }
}
