//! Relations as graphs.
//!
//! A bit vector read as a row-major `rows × cols` matrix is a relation: bit
//! `i * cols + j` set means an edge from row vertex `i` to column vertex `j`.
//! A square relation is a directed graph on one vertex set, with self-loops
//! allowed. A rectangular relation, or a square one forced into bipartite
//! mode, joins two disjoint vertex groups: rows on the left, columns on the
//! right.

use log::debug;

use crate::bipartite::{two_color, Side};
use crate::bits::{default_dimensions, generate_bitwise_values, perfect_sqrt, BitVector, VectorMode};
use crate::error::{Error, Result};

/// Square boolean adjacency matrix.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AdjacencyMatrix {
    n: usize,
    bits: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            bits: vec![false; n * n],
        }
    }

    /// Reads a row-major `n × n` matrix.
    pub fn from_square(bits: &[bool]) -> Option<Self> {
        let n = perfect_sqrt(bits.len())?;
        Some(Self {
            n,
            bits: bits.to_vec(),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.bits[from * self.n + to]
    }

    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.bits[from * self.n + to] = true;
    }

    pub fn has_self_loop(&self, v: usize) -> bool {
        self.has_edge(v, v)
    }

    /// Targets of edges leaving `v`, in index order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&u| self.has_edge(v, u))
    }

    /// All edges `(from, to)` in row-major order, self-loops included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| (0..self.n).filter(move |&j| self.has_edge(i, j)).map(move |j| (i, j)))
    }

    /// Number of edges between distinct vertices.
    pub fn inter_vertex_edge_count(&self) -> usize {
        self.edges().filter(|(i, j)| i != j).count()
    }

    /// Loop-free undirected closure: `(i, j)` for `i != j` iff `i → j` or `j → i`.
    pub fn symmetric_closure(&self) -> AdjacencyMatrix {
        let mut closure = AdjacencyMatrix::new(self.n);
        for (i, j) in self.edges() {
            if i != j {
                closure.add_edge(i, j);
                closure.add_edge(j, i);
            }
        }
        closure
    }

    /// Out-degree, ignoring self-loops.
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).filter(|&u| u != v).count()
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct GraphOptions {
    /// Treat a square relation as two disjoint vertex groups.
    pub force_bipartite: bool,
    /// Leave degree-0 vertices out of [`GraphAnalysis::visible_vertices`].
    pub hide_isolated: bool,
}

impl GraphOptions {
    pub fn with_force_bipartite(mut self, force_bipartite: bool) -> Self {
        self.force_bipartite = force_bipartite;
        self
    }

    pub fn with_hide_isolated(mut self, hide_isolated: bool) -> Self {
        self.hide_isolated = hide_isolated;
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GraphMode {
    /// One vertex set, edges between any two vertices.
    General,
    /// Rows are vertices `0..rows`, columns are `rows..rows + cols`.
    Bipartite { rows: usize, cols: usize },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Vertex {
    pub label: String,
    /// No edge to another vertex.
    pub isolated: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GraphAnalysis {
    pub mode: GraphMode,
    pub vertices: Vec<Vertex>,
    pub adjacency: AdjacencyMatrix,
    pub undirected: AdjacencyMatrix,
    pub is_bipartite: bool,
    pub partition: Vec<Option<Side>>,
    /// Directed edges for rendering, row-major.
    pub edges: Vec<Edge>,
    pub options: GraphOptions,
}

/// Vertex labels for a group of `n`: binary indices of identical width.
fn labels(n: usize) -> Vec<String> {
    if n == 1 {
        vec!["0".to_string()]
    } else {
        generate_bitwise_values(n)
    }
}

/// Interprets `vector` as a row-major `rows × cols` relation and analyzes it.
pub fn analyze(vector: &BitVector, rows: usize, cols: usize, options: GraphOptions) -> Result<GraphAnalysis> {
    VectorMode::Relation { rows, cols }.validate(vector)?;
    debug!("analyze(rows = {}, cols = {}, options = {:?})", rows, cols, options);

    let bits = vector.as_slice();
    let (mode, adjacency, vertex_labels) = if rows != cols || options.force_bipartite {
        let mut adjacency = AdjacencyMatrix::new(rows + cols);
        for i in 0..rows {
            for j in 0..cols {
                if bits[i * cols + j] {
                    adjacency.add_edge(i, rows + j);
                }
            }
        }
        let mut vertex_labels = labels(rows);
        vertex_labels.extend(labels(cols));
        (GraphMode::Bipartite { rows, cols }, adjacency, vertex_labels)
    } else {
        let n = rows.max(cols);
        let mut adjacency = AdjacencyMatrix::new(n);
        for i in 0..rows {
            for j in 0..cols {
                if bits[i * cols + j] {
                    adjacency.add_edge(i, j);
                }
            }
        }
        (GraphMode::General, adjacency, labels(n))
    };

    let undirected = adjacency.symmetric_closure();
    let (is_bipartite, partition) = match mode {
        GraphMode::Bipartite { rows, cols } => {
            let mut partition = vec![Some(Side::Left); rows];
            partition.extend(vec![Some(Side::Right); cols]);
            (true, partition)
        }
        GraphMode::General => {
            let coloring = two_color(&undirected);
            (coloring.is_bipartite, coloring.partition)
        }
    };

    let vertices = vertex_labels
        .into_iter()
        .enumerate()
        .map(|(v, label)| Vertex {
            label,
            isolated: undirected.degree(v) == 0,
        })
        .collect();
    let edges = adjacency.edges().map(|(from, to)| Edge { from, to }).collect();

    debug!("analyze: bipartite = {}", is_bipartite);
    Ok(GraphAnalysis {
        mode,
        vertices,
        adjacency,
        undirected,
        is_bipartite,
        partition,
        edges,
        options,
    })
}

/// Plain graph mode: a perfect-square vector of 2 to 256 bits.
pub fn analyze_graph_vector(vector: &BitVector, options: GraphOptions) -> Result<GraphAnalysis> {
    VectorMode::Graph.validate(vector)?;
    let n = perfect_sqrt(vector.len()).ok_or(Error::MismatchedDimensions {
        rows: 0,
        cols: 0,
        len: vector.len(),
    })?;
    analyze(vector, n, n, options)
}

/// Generalized mode: a power-of-two vector of up to 1024 bits, split into
/// `dimensions` or into the default near-square shape.
pub fn analyze_generalized(
    vector: &BitVector,
    dimensions: Option<(usize, usize)>,
    options: GraphOptions,
) -> Result<GraphAnalysis> {
    VectorMode::Generalized.validate(vector)?;
    let (rows, cols) = match dimensions.or_else(|| default_dimensions(vector.len())) {
        Some(dims) => dims,
        None => {
            return Err(Error::MismatchedDimensions {
                rows: 0,
                cols: 0,
                len: vector.len(),
            })
        }
    };
    analyze(vector, rows, cols, options)
}

impl GraphAnalysis {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn isolated(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.vertices.len()).filter(move |&v| self.vertices[v].isolated)
    }

    /// Vertices the renderer should draw.
    pub fn visible_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.vertices.len()).filter(move |&v| !(self.options.hide_isolated && self.vertices[v].isolated))
    }

    /// Vertices on `side` of the partition.
    pub fn side(&self, side: Side) -> Vec<usize> {
        (0..self.partition.len()).filter(|&v| self.partition[v] == Some(side)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn v(s: &str) -> BitVector {
        BitVector::parse(s).unwrap()
    }

    #[test]
    fn test_two_vertex_swap() {
        let g = analyze_graph_vector(&v("0110"), GraphOptions::default()).unwrap();
        assert_eq!(g.mode, GraphMode::General);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.vertices[0].label, "0");
        assert_eq!(g.vertices[1].label, "1");
        assert_eq!(g.edges, vec![Edge { from: 0, to: 1 }, Edge { from: 1, to: 0 }]);
        assert!(g.is_bipartite);
        assert_eq!(g.partition, vec![Some(Side::Left), Some(Side::Right)]);
    }

    #[test]
    fn test_self_loops_kept_in_edges() {
        let g = analyze_graph_vector(&v("100000001"), GraphOptions::default()).unwrap();
        assert_eq!(g.edges, vec![Edge { from: 0, to: 0 }, Edge { from: 2, to: 2 }]);
        assert!(g.edges.iter().all(Edge::is_loop));
        assert_eq!(g.undirected.inter_vertex_edge_count(), 0);
        assert!(g.is_bipartite);
        assert_eq!(g.isolated().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(g.vertices[2].label, "10");
    }

    #[test]
    fn test_triangle_not_bipartite() {
        // 0 -> 1 -> 2 -> 0
        let g = analyze_graph_vector(&v("010001100"), GraphOptions::default()).unwrap();
        assert!(!g.is_bipartite);
        assert_eq!(g.edges.len(), 3);
        assert!(g.undirected.has_edge(0, 2));
        assert!(g.undirected.has_edge(2, 0));
    }

    #[test]
    fn test_forced_bipartite_square() {
        let options = GraphOptions::default().with_force_bipartite(true);
        let g = analyze_graph_vector(&v("010001100"), options).unwrap();
        assert_eq!(g.mode, GraphMode::Bipartite { rows: 3, cols: 3 });
        assert_eq!(g.vertex_count(), 6);
        assert!(g.is_bipartite);
        assert_eq!(g.side(Side::Left), vec![0, 1, 2]);
        assert_eq!(g.side(Side::Right), vec![3, 4, 5]);
        assert_eq!(
            g.edges,
            vec![Edge { from: 0, to: 4 }, Edge { from: 1, to: 5 }, Edge { from: 2, to: 3 }]
        );
    }

    #[test]
    fn test_rectangular_is_bipartite() {
        let g = analyze(&v("100011"), 2, 3, GraphOptions::default()).unwrap();
        assert_eq!(g.mode, GraphMode::Bipartite { rows: 2, cols: 3 });
        assert!(g.is_bipartite);
        let labels: Vec<&str> = g.vertices.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1", "00", "01", "10"]);
        assert_eq!(
            g.edges,
            vec![Edge { from: 0, to: 2 }, Edge { from: 1, to: 3 }, Edge { from: 1, to: 4 }]
        );
        assert_eq!(g.isolated().count(), 0);
    }

    #[test]
    fn test_hide_isolated() {
        let options = GraphOptions::default().with_hide_isolated(true);
        let g = analyze(&v("0100"), 2, 2, options).unwrap();
        assert_eq!(g.visible_vertices().count(), 2);

        let g = analyze(&v("1000"), 2, 2, options).unwrap();
        assert_eq!(g.isolated().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(g.visible_vertices().count(), 0);

        let g = analyze(&v("1000"), 2, 2, GraphOptions::default()).unwrap();
        assert_eq!(g.visible_vertices().count(), 2);
    }

    #[test]
    fn test_validation_runs_first() {
        assert!(matches!(
            BitVector::parse("01a1"),
            Err(Error::InvalidVectorFormat { position: 2, .. })
        ));
        assert!(matches!(
            analyze_graph_vector(&v("011"), GraphOptions::default()),
            Err(Error::InvalidLength { len: 3, .. })
        ));
        assert_eq!(
            analyze(&v("011"), 2, 2, GraphOptions::default()),
            Err(Error::MismatchedDimensions {
                rows: 2,
                cols: 2,
                len: 3
            })
        );
    }

    #[test]
    fn test_generalized_dimensions() {
        let g = analyze_generalized(&v("01100110"), None, GraphOptions::default()).unwrap();
        assert_eq!(g.mode, GraphMode::Bipartite { rows: 4, cols: 2 });

        let g = analyze_generalized(&v("0110"), None, GraphOptions::default()).unwrap();
        assert_eq!(g.mode, GraphMode::General);

        let g = analyze_generalized(&v("01100110"), Some((1, 8)), GraphOptions::default()).unwrap();
        assert_eq!(g.mode, GraphMode::Bipartite { rows: 1, cols: 8 });

        assert!(analyze_generalized(&v("011"), None, GraphOptions::default()).is_err());
    }

    #[test]
    fn test_closure_is_symmetric() {
        let m = AdjacencyMatrix::from_square(&[false, true, false, false, true, false, true, false, false]).unwrap();
        let c = m.symmetric_closure();
        for i in 0..3 {
            assert!(!c.has_self_loop(i));
            for j in 0..3 {
                assert_eq!(c.has_edge(i, j), c.has_edge(j, i));
            }
        }
        assert!(AdjacencyMatrix::from_square(&[true, false]).is_none());
    }

    #[test]
    fn test_bipartite_result_ignores_direction() {
        fn transpose(bits: &[bool], n: usize) -> Vec<bool> {
            (0..n * n).map(|k| bits[(k % n) * n + k / n]).collect()
        }
        for s in ["0110", "0100", "010001100", "010000001", "0100001000010000", "0101101001011010"] {
            let bits = v(s).into_bits();
            let n = perfect_sqrt(bits.len()).unwrap();
            let g = analyze_graph_vector(&v(s), GraphOptions::default()).unwrap();
            let t = analyze_graph_vector(&BitVector::from_bits(transpose(&bits, n)), GraphOptions::default()).unwrap();
            assert_eq!(g.is_bipartite, t.is_bipartite, "{}", s);
            assert_eq!(g.undirected, t.undirected);
        }
    }

    #[test]
    fn test_bipartite_result_ignores_loops() {
        for s in ["0110", "010001100", "0100001000010000"] {
            let base = analyze_graph_vector(&v(s), GraphOptions::default()).unwrap();
            let n = base.vertex_count();
            let mut bits = v(s).into_bits();
            for i in 0..n {
                bits[i * n + i] = true;
            }
            let looped = analyze_graph_vector(&BitVector::from_bits(bits), GraphOptions::default()).unwrap();
            assert_eq!(base.is_bipartite, looped.is_bipartite);
        }
    }
}
