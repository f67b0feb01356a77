use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;

use logic_viz::bipartite::as_signed;
use logic_viz::bits::BitVector;
use logic_viz::circuit::{Circuit, EvalOrder, OutputSelection};
use logic_viz::graph::{analyze, analyze_generalized, analyze_graph_vector, GraphAnalysis, GraphOptions};
use logic_viz::layout::{graph_layout, CANVAS_SIZE};
use logic_viz::relation::{compose, parse_positions, Composition, Link};
use logic_viz::signal::Signal;
use logic_viz::signature::Signature;
use logic_viz::simulate::{simulate, simulate_product, SimulationConfig};

#[derive(Parser)]
#[command(author, version, about = "Boolean circuits, relations and graphs")]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log: simplelog::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit over all input combinations
    Simulate {
        /// Number of primary inputs
        #[arg(short = 'n', long, default_value_t = 4)]
        inputs: usize,

        /// Gate as SIGNATURE:INPUTS:OUTPUT, e.g. "1000:1,3:5" (repeatable).
        /// Without gates, the built-in NOR circuit is used.
        #[arg(short, long = "gate", value_name = "GATE")]
        gates: Vec<String>,

        /// Evaluate in declaration order instead of sorting topologically
        #[arg(long)]
        insertion_order: bool,

        /// Report this signal instead of the largest gate output
        #[arg(long, value_name = "SIGNAL")]
        output: Option<u32>,

        /// Feed the cartesian product of these vectors instead of all combinations
        #[arg(long = "vector", value_name = "BITS")]
        vectors: Vec<String>,

        /// Print the truth table
        #[arg(short, long)]
        table: bool,

        /// Print the circuit as Graphviz DOT
        #[arg(long)]
        dot: bool,
    },

    /// Build a relation matrix from a chain of vectors
    Relation {
        /// Input vectors, optionally suffixed with ":and", ":or" or ":SIGNATURE"
        #[arg(required = true, num_args = 2..)]
        vectors: Vec<String>,

        /// Signature of the final pairing
        #[arg(short, long)]
        signature: String,

        /// Merged input positions, e.g. "2,3"
        #[arg(short, long, default_value = "")]
        merged: String,
    },

    /// Analyze a vector as a graph
    Graph {
        vector: String,

        /// Relation shape as ROWSxCOLS
        #[arg(long)]
        shape: Option<String>,

        /// Accept any power-of-two length up to 1024
        #[arg(long)]
        generalized: bool,

        /// Treat a square relation as bipartite
        #[arg(long)]
        bipartite: bool,

        /// Hide vertices without edges
        #[arg(long)]
        hide_isolated: bool,

        /// Print the graph as Graphviz DOT
        #[arg(long)]
        dot: bool,
    },
}

fn parse_gate(circuit: &mut Circuit, decl: &str) -> Result<()> {
    let parts: Vec<&str> = decl.split(':').collect();
    let [signature, inputs, output] = parts[..] else {
        return Err(eyre!("Gate must look like SIGNATURE:INPUTS:OUTPUT, got {:?}", decl));
    };
    let output: u32 = output.trim().parse()?;
    circuit.declare_gate(signature.trim(), inputs, output)?;
    Ok(())
}

fn nor_circuit() -> Result<Circuit> {
    let mut c = Circuit::new(4);
    c.declare_gate("1000", "1, 3", 5)?;
    c.declare_gate("1000", "2, 3", 6)?;
    c.declare_gate("1000", "2, 4", 7)?;
    c.declare_gate("1000", "2, 5", 8)?;
    c.declare_gate("1000", "1, 6", 9)?;
    c.declare_gate("1000", "4, 6", 10)?;
    c.declare_gate("1000", "3, 7", 11)?;
    c.declare_gate("1000000000000000", "8, 9, 10, 11", 12)?;
    Ok(c)
}

fn parse_link(s: &str) -> Result<Link> {
    let (vector, composition) = match s.split_once(':') {
        None => (s, Composition::And),
        Some((v, op)) => {
            let composition = match op.to_ascii_lowercase().as_str() {
                "and" => Composition::And,
                "or" => Composition::Or,
                sig => Composition::custom(Signature::parse(sig)?)?,
            };
            (v, composition)
        }
    };
    Ok(Link::new(BitVector::parse(vector)?, composition))
}

fn print_graph(graph: &GraphAnalysis) {
    let coords = graph_layout(graph, CANVAS_SIZE);
    println!("mode = {:?}", graph.mode);
    println!("bipartite = {}", graph.is_bipartite);
    println!("partition = {:?}", as_signed(&graph.partition));
    for v in graph.visible_vertices() {
        let vertex = &graph.vertices[v];
        println!(
            "- v{} '{}' at ({:.1}, {:.1}){}",
            v,
            vertex.label,
            coords[v].x,
            coords[v].y,
            if vertex.isolated { " isolated" } else { "" }
        );
    }
    for edge in &graph.edges {
        println!("  v{} -> v{}", edge.from, edge.to);
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Simulate {
            inputs,
            gates,
            insertion_order,
            output,
            vectors,
            table,
            dot,
        } => {
            let circuit = if gates.is_empty() {
                nor_circuit()?
            } else {
                let mut circuit = Circuit::new(inputs);
                for g in &gates {
                    parse_gate(&mut circuit, g)?;
                }
                circuit
            };
            for gate in circuit.gates() {
                log::info!("{}", gate);
            }

            let mut config = SimulationConfig::default().with_table(table);
            if insertion_order {
                config = config.with_order(EvalOrder::Insertion);
            }
            if let Some(s) = output {
                config = config.with_output(OutputSelection::Signal(Signal::new(s)));
            }

            let sim = if vectors.is_empty() {
                simulate(&circuit, &config)?
            } else {
                let vectors = vectors
                    .iter()
                    .map(|v| BitVector::parse(v))
                    .collect::<Result<Vec<_>, _>>()?;
                simulate_product(&circuit, &vectors, &config)?
            };

            println!("vector = {}", sim.vector);
            if let Some(table) = sim.table {
                print!("{}", table);
            }
            if dot {
                print!("{}", circuit.to_dot()?);
            }
        }

        Commands::Relation {
            vectors,
            signature,
            merged,
        } => {
            let links = vectors.iter().map(|s| parse_link(s)).collect::<Result<Vec<_>>>()?;
            let target = Signature::parse(&signature)?;
            if let Some(name) = target.operator_name() {
                log::info!("target operator: {}", name);
            }
            let matrix = compose(&links, &target, &parse_positions(&merged))?;
            print!("{}", matrix);
            println!("result = {}", matrix.flatten_string());
        }

        Commands::Graph {
            vector,
            shape,
            generalized,
            bipartite,
            hide_isolated,
            dot,
        } => {
            let vector = BitVector::parse(&vector)?;
            let options = GraphOptions::default()
                .with_force_bipartite(bipartite)
                .with_hide_isolated(hide_isolated);
            let dims: Option<(usize, usize)> = match shape {
                Some(s) => {
                    let (r, c) = s.split_once('x').ok_or_else(|| eyre!("Shape must look like ROWSxCOLS"))?;
                    Some((r.trim().parse()?, c.trim().parse()?))
                }
                None => None,
            };
            let graph = match (generalized, dims) {
                (true, dims) => analyze_generalized(&vector, dims, options)?,
                (false, Some((rows, cols))) => analyze(&vector, rows, cols, options)?,
                (false, None) => analyze_graph_vector(&vector, options)?,
            };
            if dot {
                print!("{}", graph.to_dot()?);
            } else {
                print_graph(&graph);
            }
        }
    }

    Ok(())
}
