//! Circuit and relation-graph to DOT (Graphviz) conversion.
//!
//! Render the output with `dot`, `neato` or any online Graphviz viewer.
//!
//! # Conventions
//!
//! - **Circuits** flow left to right: primary inputs are drawn at the source
//!   rank, gates are labeled with their output signal and signature, and an
//!   edge runs from each signal producer to every gate reading that signal.
//! - **Relation graphs** are directed. Bipartite graphs place the two vertex
//!   groups in separate clusters. Self-loops are drawn as loops.
//!
//! # Examples
//!
//! ```
//! use logic_viz::circuit::Circuit;
//!
//! let mut circuit = Circuit::new(2);
//! circuit.declare_gate("0110", "1, 2", 3).unwrap();
//!
//! let dot = circuit.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::bipartite::Side;
use crate::circuit::Circuit;
use crate::graph::{GraphAnalysis, GraphMode};

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use logic_viz::bits::BitVector;
/// use logic_viz::dot::DotConfig;
/// use logic_viz::graph::{analyze_graph_vector, GraphOptions};
///
/// let vector = BitVector::parse("0110").unwrap();
/// let graph = analyze_graph_vector(&vector, GraphOptions::default()).unwrap();
/// let config = DotConfig {
///     vertex_shape: "doublecircle",
///     ..DotConfig::default()
/// };
///
/// let dot = graph.to_dot_with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for relation vertices (default: "circle")
    pub vertex_shape: &'static str,
    /// Shape for primary inputs (default: "plaintext")
    pub input_shape: &'static str,
    /// Shape for gates (default: "box")
    pub gate_shape: &'static str,
    /// Graph rank direction (default: "LR")
    pub rank_dir: &'static str,
    /// Show gate signatures next to their output signal (default: true)
    pub show_signatures: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            vertex_shape: "circle",
            input_shape: "plaintext",
            gate_shape: "box",
            rank_dir: "LR",
            show_signatures: true,
        }
    }
}

impl Circuit {
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rank_dir)?;

        writeln!(dot, "{{ rank=source")?;
        for i in 1..=self.num_inputs() {
            writeln!(dot, "s{} [shape={}, label=\"x{}\"];", i, config.input_shape, i)?;
        }
        writeln!(dot, "}}")?;

        for gate in self.gates() {
            let label = if config.show_signatures {
                format!("{}\\n{}", gate.output(), gate.signature())
            } else {
                gate.output().to_string()
            };
            writeln!(dot, "{} [shape={}, label=\"{}\"];", gate.id(), config.gate_shape, label)?;
        }

        for gate in self.gates() {
            for (pin, &input) in gate.inputs().iter().enumerate() {
                let source = if input.is_input(self.num_inputs()) {
                    format!("s{}", input)
                } else {
                    match self.producer(input) {
                        Some(p) => p.id().to_string(),
                        // Unproduced signals read as constant 0.
                        None => "zero".to_string(),
                    }
                };
                if source == "zero" {
                    writeln!(dot, "zero [shape={}, label=\"0\"];", config.input_shape)?;
                }
                writeln!(dot, "{} -> {} [headlabel=\"{}\"];", source, gate.id(), pin)?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

impl GraphAnalysis {
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let visible: Vec<usize> = self.visible_vertices().collect();
        let shown = |v: usize| visible.binary_search(&v).is_ok();

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.vertex_shape)?;

        match self.mode {
            GraphMode::General => {
                for &v in &visible {
                    writeln!(dot, "v{} [label=\"{}\"];", v, self.vertices[v].label)?;
                }
            }
            GraphMode::Bipartite { .. } => {
                writeln!(dot, "rankdir={};", config.rank_dir)?;
                for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                    writeln!(dot, "subgraph cluster_{} {{", side)?;
                    writeln!(dot, "label=\"{}\";", if i == 0 { "rows" } else { "columns" })?;
                    writeln!(dot, "rank=same;")?;
                    for v in self.side(side).into_iter().filter(|&v| shown(v)) {
                        writeln!(dot, "v{} [label=\"{}\"];", v, self.vertices[v].label)?;
                    }
                    writeln!(dot, "}}")?;
                }
            }
        }

        for edge in &self.edges {
            if !shown(edge.from) || !shown(edge.to) {
                continue;
            }
            writeln!(dot, "v{} -> v{};", edge.from, edge.to)?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
