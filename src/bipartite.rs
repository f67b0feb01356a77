//! Two-coloring of undirected graphs.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::graph::AdjacencyMatrix;

/// One of the two color classes of a bipartite graph.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Color by position, `Left` for even indices.
    pub fn alternating(index: usize) -> Side {
        if index % 2 == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Encodes a partition as `-1` (uncolored), `0` (left) and `1` (right).
pub fn as_signed(partition: &[Option<Side>]) -> Vec<i8> {
    partition
        .iter()
        .map(|side| match side {
            None => -1,
            Some(Side::Left) => 0,
            Some(Side::Right) => 1,
        })
        .collect()
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Coloring {
    pub is_bipartite: bool,
    /// Color of each vertex. On failure, vertices not reached yet stay `None`.
    pub partition: Vec<Option<Side>>,
}

/// Two-colors `graph` by breadth-first search.
///
/// Edge direction is ignored: `i → j` and `j → i` both join `i` and `j`.
/// Self-loops are ignored. Every uncolored vertex, in index order, starts a new
/// search colored [`Side::Left`]. The search stops at the first edge joining two
/// vertices of the same color. A graph without edges between distinct vertices
/// is colored alternately by index.
pub fn two_color(graph: &AdjacencyMatrix) -> Coloring {
    let n = graph.size();

    if graph.inter_vertex_edge_count() == 0 {
        debug!("two_color: no edges, alternating {} vertices", n);
        return Coloring {
            is_bipartite: true,
            partition: (0..n).map(|i| Some(Side::alternating(i))).collect(),
        };
    }

    let mut partition: Vec<Option<Side>> = vec![None; n];
    let mut queue = VecDeque::new();

    for start in 0..n {
        if partition[start].is_some() {
            continue;
        }
        partition[start] = Some(Side::Left);
        queue.push_back(start);

        while let Some(v) = queue.pop_front() {
            let Some(side) = partition[v] else {
                continue;
            };
            for u in 0..n {
                if u == v || !(graph.has_edge(v, u) || graph.has_edge(u, v)) {
                    continue;
                }
                match partition[u] {
                    None => {
                        partition[u] = Some(side.opposite());
                        queue.push_back(u);
                    }
                    Some(other) if other == side => {
                        debug!("two_color: conflict on edge ({}, {})", v, u);
                        return Coloring {
                            is_bipartite: false,
                            partition,
                        };
                    }
                    Some(_) => {}
                }
            }
        }
    }

    Coloring {
        is_bipartite: true,
        partition,
    }
}

pub fn is_bipartite(graph: &AdjacencyMatrix) -> bool {
    two_color(graph).is_bipartite
}
