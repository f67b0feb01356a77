//! # logic-viz: boolean circuits, relations and graphs
//!
//! **`logic-viz`** is the computational core of an educational tool for boolean
//! logic and discrete mathematics. A user describes a gate-level circuit or a
//! truth-table signature; the library evaluates it and produces the resulting
//! relation as a truth table, a relation matrix, or a directed graph with an
//! optional bipartite split.
//!
//! ## Key Features
//!
//! - **Signature gates**: every gate is a truth table indexed by its inputs read
//!   most-significant-bit first. Named gates (AND, OR, XOR, NOT, NAND, NOR, XNOR)
//!   are tabulated into signatures when the gate is declared.
//! - **Dependency-ordered evaluation**: circuits are sorted topologically (Kahn),
//!   with cycles reported as [`Error::CircuitCycle`][crate::error::Error::CircuitCycle].
//! - **Exhaustive simulation** over all `2^n` input combinations in canonical order.
//! - **Relation matrices** with "don't care" masking of merged input positions,
//!   and chained composition of several vectors.
//! - **Graph analysis**: adjacency, undirected closure, BFS two-coloring,
//!   isolated vertices, plus pure layout and Graphviz export for renderers.
//!
//! ## Basic Usage
//!
//! ```rust
//! use logic_viz::circuit::Circuit;
//! use logic_viz::simulate::{simulate, SimulationConfig};
//!
//! // Two primary inputs (signals 1 and 2), one XOR gate writing signal 3.
//! let mut circuit = Circuit::new(2);
//! circuit.declare_gate("0110", "1, 2", 3).unwrap();
//!
//! let sim = simulate(&circuit, &SimulationConfig::default()).unwrap();
//! assert_eq!(sim.vector.to_string(), "0110");
//! ```
//!
//! ```rust
//! use logic_viz::bits::BitVector;
//! use logic_viz::graph::{analyze_graph_vector, GraphOptions};
//!
//! let vector = BitVector::parse("0110").unwrap();
//! let graph = analyze_graph_vector(&vector, GraphOptions::default()).unwrap();
//! assert!(graph.is_bipartite);
//! assert_eq!(graph.edges.len(), 2);
//! ```
//!
//! ## Core Components
//!
//! - **[`circuit`]** and **[`simulate`]**: gate graphs and their evaluation.
//! - **[`relation`]**: relation matrices and composition.
//! - **[`graph`]** and **[`bipartite`]**: relation graphs and two-coloring.
//! - **[`layout`]** and **[`dot`]**: coordinates and Graphviz output.

pub mod bipartite;
pub mod bits;
pub mod circuit;
pub mod dot;
pub mod error;
pub mod gate;
pub mod graph;
pub mod layout;
pub mod relation;
pub mod signal;
pub mod signature;
pub mod simulate;
