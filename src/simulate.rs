//! Exhaustive simulation of a circuit over all input combinations.

use std::fmt::{Display, Formatter, Write};

use log::debug;

use crate::bits::{cartesian_product, input_combinations, BitVector};
use crate::circuit::{Circuit, EvalOrder, OutputSelection};
use crate::error::{Error, LengthRule, Result};
use crate::signal::{Signal, SignalTable};

/// Largest number of primary inputs simulated exhaustively (1024 combinations).
pub const MAX_INPUTS: usize = 10;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SimulationConfig {
    pub order: EvalOrder,
    pub output: OutputSelection,
    /// Record every gate value per combination.
    pub record_table: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            order: EvalOrder::Topological,
            output: OutputSelection::MaxOutputId,
            record_table: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_order(mut self, order: EvalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_output(mut self, output: OutputSelection) -> Self {
        self.output = output;
        self
    }

    pub fn with_table(mut self, record_table: bool) -> Self {
        self.record_table = record_table;
        self
    }
}

/// Signal values after evaluating one input combination.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub signals: SignalTable,
    pub output: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    /// Value of each gate, in declaration order.
    pub gates: Vec<bool>,
    pub output: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    pub num_inputs: usize,
    /// Output signal of each gate, in declaration order.
    pub gate_outputs: Vec<Signal>,
    pub rows: Vec<TruthRow>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Simulation {
    pub vector: BitVector,
    pub table: Option<TruthTable>,
}

/// Evaluates `circuit` on a single input tuple.
///
/// `inputs[k]` drives primary input signal `k + 1`.
pub fn evaluate(circuit: &Circuit, inputs: &[bool], config: &SimulationConfig) -> Result<Evaluation> {
    let order = circuit.evaluation_order(config.order)?;
    let output = circuit.output_signal(config.output);
    Ok(run_once(circuit, &order, output, inputs))
}

fn run_once(circuit: &Circuit, order: &[usize], output: Option<Signal>, inputs: &[bool]) -> Evaluation {
    let mut signals = SignalTable::with_inputs(inputs);
    for &i in order {
        circuit.gates()[i].fire(&mut signals);
    }
    let output = output.map_or(false, |s| signals.get(s));
    Evaluation { signals, output }
}

fn record_row(circuit: &Circuit, inputs: Vec<bool>, eval: &Evaluation) -> TruthRow {
    // A gate shadowed by a later writer of the same signal shows the final value.
    let gates = circuit.gates().iter().map(|g| eval.signals.get(g.output())).collect();
    TruthRow {
        inputs,
        gates,
        output: eval.output,
    }
}

fn simulate_rows<I>(circuit: &Circuit, width: usize, rows: I, config: &SimulationConfig) -> Result<Simulation>
where
    I: IntoIterator<Item = Vec<bool>>,
{
    let order = circuit.evaluation_order(config.order)?;
    let output = circuit.output_signal(config.output);
    debug!("simulate: order = {:?}, output = {:?}", order, output);

    let mut bits = Vec::new();
    let mut table = config.record_table.then(|| TruthTable {
        num_inputs: width,
        gate_outputs: circuit.gates().iter().map(|g| g.output()).collect(),
        rows: Vec::new(),
    });

    for inputs in rows {
        let eval = run_once(circuit, &order, output, &inputs);
        bits.push(eval.output);
        if let Some(table) = table.as_mut() {
            table.rows.push(record_row(circuit, inputs, &eval));
        }
    }

    Ok(Simulation {
        vector: BitVector::from_bits(bits),
        table,
    })
}

/// Runs the circuit over all `2^num_inputs` combinations in canonical order.
pub fn simulate(circuit: &Circuit, config: &SimulationConfig) -> Result<Simulation> {
    let n = circuit.num_inputs();
    if n > MAX_INPUTS {
        return Err(Error::InvalidLength {
            len: n,
            rule: LengthRule::Between {
                min: 0,
                max: MAX_INPUTS,
            },
        });
    }
    debug!("simulate(num_inputs = {}, gates = {})", n, circuit.len());
    simulate_rows(circuit, n, input_combinations(n), config)
}

/// Runs the circuit over the cartesian product of several input vectors.
///
/// Vector `k` drives primary input `k + 1`; the first vector varies slowest.
pub fn simulate_product(circuit: &Circuit, vectors: &[BitVector], config: &SimulationConfig) -> Result<Simulation> {
    if vectors.is_empty() {
        return Err(Error::InvalidLength {
            len: 0,
            rule: LengthRule::AtLeast(1),
        });
    }
    let slices: Vec<&[bool]> = vectors.iter().map(|v| v.as_slice()).collect();
    let total: usize = slices.iter().map(|s| s.len()).product();
    if total > crate::bits::MAX_VECTOR_LEN {
        return Err(Error::InvalidLength {
            len: total,
            rule: LengthRule::Between {
                min: 1,
                max: crate::bits::MAX_VECTOR_LEN,
            },
        });
    }
    debug!("simulate_product(vectors = {}, rows = {})", vectors.len(), total);
    simulate_rows(circuit, vectors.len(), cartesian_product(&slices), config)
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut header = Vec::new();
        for i in 1..=self.num_inputs {
            header.push(format!("x{}", i));
        }
        for s in &self.gate_outputs {
            header.push(s.to_string());
        }
        header.push("F".to_string());
        let widths: Vec<usize> = header.iter().map(|h| h.len()).collect();

        let mut line = String::new();
        for (h, w) in header.iter().zip(&widths) {
            write!(line, "{:>w$} ", h, w = w)?;
        }
        writeln!(f, "{}", line.trim_end())?;
        writeln!(f, "{}", "-".repeat(line.trim_end().len()))?;

        for row in &self.rows {
            let values = row.inputs.iter().chain(&row.gates).chain(std::iter::once(&row.output));
            let mut line = String::new();
            for (v, w) in values.zip(&widths) {
                write!(line, "{:>w$} ", *v as u8, w = w)?;
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::signature::GateKind;

    fn s(id: u32) -> Signal {
        Signal::new(id)
    }

    #[test]
    fn test_xor_circuit() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::Xor, &[s(1), s(2)], s(3)).unwrap();
        let sim = simulate(&c, &SimulationConfig::default()).unwrap();
        assert_eq!(sim.vector.to_string(), "0110");
        assert!(sim.table.is_none());
    }

    #[test]
    fn test_no_gates_yields_zeros() {
        let c = Circuit::new(3);
        let sim = simulate(&c, &SimulationConfig::default()).unwrap();
        assert_eq!(sim.vector.to_string(), "00000000");

        // Even a primary input picked explicitly is not an output without gates.
        let config = SimulationConfig::default().with_output(OutputSelection::Signal(s(1)));
        let sim = simulate(&Circuit::new(2), &config).unwrap();
        assert_eq!(sim.vector.to_string(), "0000");
    }

    #[test]
    fn test_output_is_max_signal_not_last_gate() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::And, &[s(1), s(2)], s(9)).unwrap();
        c.add_named_gate(GateKind::Or, &[s(1), s(2)], s(3)).unwrap();
        let config = SimulationConfig::default();
        assert_eq!(simulate(&c, &config).unwrap().vector.to_string(), "0001");

        let config = config.with_output(OutputSelection::LastDeclared);
        assert_eq!(simulate(&c, &config).unwrap().vector.to_string(), "0111");

        let config = config.with_output(OutputSelection::Signal(s(1)));
        assert_eq!(simulate(&c, &config).unwrap().vector.to_string(), "0011");
    }

    #[test]
    fn test_order_modes_differ_on_unsorted_circuit() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::Not, &[s(3)], s(4)).unwrap();
        c.add_named_gate(GateKind::And, &[s(1), s(2)], s(3)).unwrap();

        let topo = SimulationConfig::default();
        assert_eq!(simulate(&c, &topo).unwrap().vector.to_string(), "1110");

        // In declaration order NOT reads signal 3 before it is written.
        let insertion = topo.with_order(EvalOrder::Insertion);
        assert_eq!(simulate(&c, &insertion).unwrap().vector.to_string(), "1111");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut c = Circuit::new(1);
        c.declare_gate("0001", "1, 3", 2).unwrap();
        c.declare_gate("0001", "1, 2", 3).unwrap();
        let err = simulate(&c, &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::CircuitCycle { .. }));
    }

    #[test]
    fn test_truth_table() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::Nand, &[s(1), s(2)], s(3)).unwrap();
        c.add_named_gate(GateKind::Not, &[s(3)], s(4)).unwrap();
        let config = SimulationConfig::default().with_table(true);
        let sim = simulate(&c, &config).unwrap();
        assert_eq!(sim.vector.to_string(), "0001");

        let table = sim.table.unwrap();
        assert_eq!(table.gate_outputs, vec![s(3), s(4)]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(
            table.rows[3],
            TruthRow {
                inputs: vec![true, true],
                gates: vec![false, true],
                output: true,
            }
        );

        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x1 x2 3 4 F");
        assert_eq!(lines[2], " 0  0 1 0 0");
        assert_eq!(lines[5], " 1  1 0 1 1");
    }

    #[test]
    fn test_too_many_inputs() {
        let c = Circuit::new(MAX_INPUTS + 1);
        assert!(matches!(
            simulate(&c, &SimulationConfig::default()),
            Err(Error::InvalidLength { len: 11, .. })
        ));
    }

    #[test]
    fn test_evaluate_single() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::Or, &[s(1), s(2)], s(3)).unwrap();
        let eval = evaluate(&c, &[false, true], &SimulationConfig::default()).unwrap();
        assert!(eval.output);
        assert!(eval.signals.get(s(2)));
        assert!(eval.signals.get(s(3)));
    }

    #[test]
    fn test_simulate_product() {
        let mut c = Circuit::new(2);
        c.add_named_gate(GateKind::And, &[s(1), s(2)], s(3)).unwrap();
        let vectors = [BitVector::parse("011").unwrap(), BitVector::parse("10").unwrap()];
        let sim = simulate_product(&c, &vectors, &SimulationConfig::default()).unwrap();
        // (0,1) (0,0) (1,1) (1,0) (1,1) (1,0)
        assert_eq!(sim.vector.to_string(), "001010");
        assert!(simulate_product(&c, &[], &SimulationConfig::default()).is_err());
    }
}
