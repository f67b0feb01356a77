//! Gate-level circuits.
//!
//! A [`Circuit`] owns its gates; wiring is implicit. A gate input names a
//! signal, and that signal is either a primary input (`1..=num_inputs`) or the
//! output of some gate. Evaluation order is derived from this implicit wiring,
//! either by topological sorting or by trusting declaration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::debug;

use crate::error::{Error, Result};
use crate::gate::{parse_signal_list, Gate, GateId};
use crate::signal::Signal;
use crate::signature::{GateKind, Signature};

/// How gates are ordered for evaluation.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum EvalOrder {
    /// Kahn's topological sort over the signal dependencies.
    #[default]
    Topological,
    /// Declaration order. Only correct when gates are declared after every
    /// gate they read from.
    Insertion,
}

/// Which signal is reported as the circuit's output.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum OutputSelection {
    /// Output of the gate with the numerically largest output signal.
    #[default]
    MaxOutputId,
    /// Output of the last declared gate.
    LastDeclared,
    /// A fixed signal.
    Signal(Signal),
}

/// Editor metadata describing a drawn wire. Never consulted by evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Connection {
    pub from_gate: GateId,
    pub to_gate: GateId,
    pub to_input_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    num_inputs: usize,
    gates: Vec<Gate>,
    connections: Vec<Connection>,
    last_gate_id: u32,
}

impl Circuit {
    pub fn new(num_inputs: usize) -> Self {
        Self {
            num_inputs,
            ..Default::default()
        }
    }
}

// Getters
impl Circuit {
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id() == id)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// First signal id not used by any input or gate output.
    pub fn next_signal_id(&self) -> Signal {
        let max_output = self.gates.iter().map(|g| g.output().id()).max().unwrap_or(0);
        Signal::new(max_output.max(self.num_inputs as u32) + 1)
    }

    /// Gate whose output is `signal`; the last declared one if several write it.
    pub fn producer(&self, signal: Signal) -> Option<&Gate> {
        self.gates.iter().rev().find(|g| g.output() == signal)
    }

    /// The signal reported as circuit output under `selection`.
    ///
    /// A circuit without gates has no output, whatever the selection.
    pub fn output_signal(&self, selection: OutputSelection) -> Option<Signal> {
        if self.gates.is_empty() {
            return None;
        }
        match selection {
            OutputSelection::MaxOutputId => self.gates.iter().map(|g| g.output()).max(),
            OutputSelection::LastDeclared => self.gates.last().map(|g| g.output()),
            OutputSelection::Signal(s) => Some(s),
        }
    }
}

// Editing
impl Circuit {
    fn new_gate_id(&mut self) -> GateId {
        self.last_gate_id += 1;
        GateId::new(self.last_gate_id)
    }

    fn check_signals(&self, inputs: &[Signal], output: Signal) -> Result<()> {
        if let Some(s) = inputs.iter().find(|s| s.id() == 0) {
            return Err(Error::InvalidSignal(format!("signal {} does not exist", s)));
        }
        if output.id() as usize <= self.num_inputs {
            return Err(Error::InvalidSignal(format!(
                "gate output {} collides with primary inputs 1..={}",
                output, self.num_inputs
            )));
        }
        Ok(())
    }

    /// Adds a gate defined by its signature and returns its id.
    pub fn add_gate(&mut self, signature: Signature, inputs: &[Signal], output: Signal) -> Result<GateId> {
        self.check_signals(inputs, output)?;
        let id = self.new_gate_id();
        debug!("add_gate({}, [{}], {:?}, {:?})", id, signature, inputs, output);
        self.gates.push(Gate::new(id, signature, inputs, output));
        Ok(id)
    }

    /// Adds a gate computing a named kind.
    pub fn add_named_gate(&mut self, kind: GateKind, inputs: &[Signal], output: Signal) -> Result<GateId> {
        let signature = kind.signature(inputs.len())?;
        self.add_gate(signature, inputs, output)
    }

    /// Adds a gate from its textual form, e.g. `declare_gate("1000", "1, 3", 5)`.
    pub fn declare_gate(&mut self, signature: &str, inputs: &str, output: u32) -> Result<GateId> {
        let signature = Signature::parse(signature)?;
        let inputs = parse_signal_list(inputs)?;
        self.add_gate(signature, &inputs, Signal::new(output))
    }

    /// Removes a gate together with every connection touching it.
    pub fn remove_gate(&mut self, id: GateId) -> Option<Gate> {
        let pos = self.gates.iter().position(|g| g.id() == id)?;
        self.connections.retain(|c| c.from_gate != id && c.to_gate != id);
        Some(self.gates.remove(pos))
    }

    /// Replaces the inputs of a gate. Returns `false` if there is no such gate.
    pub fn set_gate_inputs(&mut self, id: GateId, inputs: &[Signal]) -> Result<bool> {
        let Some(gate) = self.gates.iter().find(|g| g.id() == id) else {
            return Ok(false);
        };
        self.check_signals(inputs, gate.output())?;
        if let Some(gate) = self.gates.iter_mut().find(|g| g.id() == id) {
            gate.set_inputs(inputs);
        }
        Ok(true)
    }

    /// Changes the number of primary inputs.
    ///
    /// Fails if an existing gate output would fall into the primary input range.
    pub fn set_num_inputs(&mut self, num_inputs: usize) -> Result<()> {
        if let Some(gate) = self.gates.iter().find(|g| g.output().id() as usize <= num_inputs) {
            return Err(Error::InvalidSignal(format!(
                "gate output {} collides with primary inputs 1..={}",
                gate.output(),
                num_inputs
            )));
        }
        self.num_inputs = num_inputs;
        Ok(())
    }

    /// Records a drawn wire. Returns `false` if either gate is missing or the
    /// input index is out of range.
    pub fn add_connection(&mut self, from_gate: GateId, to_gate: GateId, to_input_index: usize) -> bool {
        let valid = self.gate(from_gate).is_some()
            && self
                .gate(to_gate)
                .map_or(false, |g| to_input_index < g.arity());
        if valid {
            self.connections.push(Connection {
                from_gate,
                to_gate,
                to_input_index,
            });
        }
        valid
    }

    pub fn remove_connection(&mut self, from_gate: GateId, to_gate: GateId, to_input_index: usize) {
        self.connections.retain(|c| {
            c.from_gate != from_gate || c.to_gate != to_gate || c.to_input_index != to_input_index
        });
    }
}

// Ordering
impl Circuit {
    /// For each gate, the indices of the gates producing its non-primary
    /// inputs (the last writer of each).
    fn input_producers(&self) -> Vec<Vec<usize>> {
        let mut last_writer: HashMap<Signal, usize> = HashMap::new();
        for (i, gate) in self.gates.iter().enumerate() {
            last_writer.insert(gate.output(), i);
        }

        self.gates
            .iter()
            .map(|gate| {
                let mut producers: Vec<usize> = gate
                    .inputs()
                    .iter()
                    .filter(|input| !input.is_input(self.num_inputs))
                    .filter_map(|input| last_writer.get(input).copied())
                    .collect();
                producers.sort_unstable();
                producers.dedup();
                producers
            })
            .collect()
    }

    /// Gate indices each gate must wait for.
    ///
    /// A gate depends on the producers of its inputs, and on every earlier
    /// gate writing the same output, so the last writer wins.
    fn dependencies(&self) -> Vec<Vec<usize>> {
        let mut deps = self.input_producers();
        let mut last_writer: HashMap<Signal, usize> = HashMap::new();
        for (i, gate) in self.gates.iter().enumerate() {
            if let Some(prev) = last_writer.insert(gate.output(), i) {
                deps[i].push(prev);
            }
        }
        for ds in &mut deps {
            ds.sort_unstable();
            ds.dedup();
        }
        deps
    }

    /// Kahn's topological sort.
    ///
    /// Among gates that are ready, the earliest declared one goes first, so an
    /// already dependency-ordered circuit keeps its declaration order.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        let n = self.gates.len();
        let deps = self.dependencies();

        let mut in_degree = vec![0usize; n];
        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (c, ds) in deps.iter().enumerate() {
            for &p in ds {
                consumers[p].push(c);
                in_degree[c] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..n).filter(|&i| in_degree[i] == 0).map(Reverse).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for &c in &consumers[i] {
                in_degree[c] -= 1;
                if in_degree[c] == 0 {
                    ready.push(Reverse(c));
                }
            }
        }

        if order.len() < n {
            // Leftover gates either lie on a cycle or only read from one.
            let gates: Vec<GateId> = (0..n)
                .filter(|&i| in_degree[i] > 0 && on_cycle(i, &consumers, &in_degree))
                .map(|i| self.gates[i].id())
                .collect();
            debug!("topological_order: cycle through {:?}", gates);
            return Err(Error::CircuitCycle { gates });
        }

        debug!("topological_order: {:?}", order);
        Ok(order)
    }

    /// Gate indices in the order `order` prescribes.
    pub fn evaluation_order(&self, order: EvalOrder) -> Result<Vec<usize>> {
        match order {
            EvalOrder::Topological => self.topological_order(),
            EvalOrder::Insertion => Ok((0..self.gates.len()).collect()),
        }
    }

    /// Depth of every gate: 0 when all inputs are primary, otherwise one more
    /// than the deepest gate it reads from. Used for layout only.
    pub fn levels(&self) -> HashMap<GateId, usize> {
        let deps = self.input_producers();
        let mut memo: Vec<Option<usize>> = vec![None; self.gates.len()];
        let mut visiting = vec![false; self.gates.len()];
        for i in 0..self.gates.len() {
            level_of(i, &deps, &mut memo, &mut visiting);
        }
        self.gates
            .iter()
            .zip(memo)
            .map(|(g, level)| (g.id(), level.unwrap_or(0)))
            .collect()
    }

    /// Gate ids grouped by level, declaration order within a level.
    pub fn gates_by_level(&self) -> Vec<Vec<GateId>> {
        let levels = self.levels();
        let mut grouped: Vec<Vec<GateId>> = Vec::new();
        for gate in &self.gates {
            let level = levels[&gate.id()];
            if grouped.len() <= level {
                grouped.resize_with(level + 1, Vec::new);
            }
            grouped[level].push(gate.id());
        }
        grouped
    }
}

/// Whether `start` can reach itself through gates left over by Kahn's sort.
fn on_cycle(start: usize, consumers: &[Vec<usize>], in_degree: &[usize]) -> bool {
    let mut seen = vec![false; consumers.len()];
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        for &c in &consumers[v] {
            if in_degree[c] == 0 {
                continue;
            }
            if c == start {
                return true;
            }
            if !seen[c] {
                seen[c] = true;
                stack.push(c);
            }
        }
    }
    false
}

fn level_of(i: usize, deps: &[Vec<usize>], memo: &mut [Option<usize>], visiting: &mut [bool]) -> usize {
    if let Some(level) = memo[i] {
        return level;
    }
    if visiting[i] {
        // Back edge of a cycle: contributes nothing.
        return 0;
    }
    visiting[i] = true;
    let mut level = 0;
    for &d in &deps[i] {
        if d == i {
            continue;
        }
        if visiting[d] && memo[d].is_none() {
            continue;
        }
        level = level.max(level_of(d, deps, memo, visiting) + 1);
    }
    visiting[i] = false;
    memo[i] = Some(level);
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn s(id: u32) -> Signal {
        Signal::new(id)
    }

    fn nor_circuit() -> Circuit {
        let mut c = Circuit::new(4);
        c.declare_gate("1000", "1, 3", 5).unwrap();
        c.declare_gate("1000", "2, 3", 6).unwrap();
        c.declare_gate("1000", "2, 4", 7).unwrap();
        c.declare_gate("1000", "2, 5", 8).unwrap();
        c.declare_gate("1000", "1, 6", 9).unwrap();
        c.declare_gate("1000", "4, 6", 10).unwrap();
        c.declare_gate("1000", "3, 7", 11).unwrap();
        c.declare_gate("1000000000000000", "8, 9, 10, 11", 12).unwrap();
        c
    }

    fn assert_linearization(c: &Circuit, order: &[usize]) {
        assert_eq!(order.len(), c.len());
        let pos: HashMap<usize, usize> = order.iter().enumerate().map(|(p, &i)| (i, p)).collect();
        for (i, gate) in c.gates().iter().enumerate() {
            for &input in gate.inputs() {
                if let Some(j) = c.gates().iter().rposition(|g| g.output() == input) {
                    assert!(pos[&j] < pos[&i], "{} must come before {}", c.gates()[j], gate);
                }
            }
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut c = Circuit::new(2);
        let a = c.add_named_gate(GateKind::And, &[s(1), s(2)], s(3)).unwrap();
        let b = c.add_named_gate(GateKind::Not, &[s(3)], s(4)).unwrap();
        assert_eq!(a, GateId::new(1));
        assert_eq!(b, GateId::new(2));
        c.remove_gate(b);
        let d = c.add_named_gate(GateKind::Not, &[s(3)], s(4)).unwrap();
        assert_eq!(d, GateId::new(3));
    }

    #[test]
    fn test_declared_order_is_kept() {
        let c = nor_circuit();
        let order = c.topological_order().unwrap();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_order_declarations() {
        let mut c = Circuit::new(2);
        c.declare_gate("0001", "3, 4", 5).unwrap();
        c.declare_gate("10", "3", 4).unwrap();
        c.declare_gate("0110", "1, 2", 3).unwrap();
        let order = c.topological_order().unwrap();
        assert_eq!(order, vec![2, 1, 0]);
        assert_linearization(&c, &order);
        assert_eq!(c.evaluation_order(EvalOrder::Insertion).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut c = Circuit::new(1);
        let g = c.declare_gate("0001", "1, 2", 2);
        // Output 2 is fine with a single primary input.
        let g = g.unwrap();
        assert_eq!(c.topological_order(), Err(Error::CircuitCycle { gates: vec![g] }));
    }

    #[test]
    fn test_mutual_reference_is_a_cycle() {
        let mut c = Circuit::new(2);
        let a = c.declare_gate("0001", "1, 4", 3).unwrap();
        let b = c.declare_gate("0111", "2, 3", 4).unwrap();
        let _ok = c.declare_gate("10", "1", 5).unwrap();
        assert_eq!(c.topological_order(), Err(Error::CircuitCycle { gates: vec![a, b] }));
        // Insertion order does not look at dependencies at all.
        assert!(c.evaluation_order(EvalOrder::Insertion).is_ok());
    }

    #[test]
    fn test_cycle_excludes_downstream_gates() {
        let mut c = Circuit::new(2);
        let a = c.declare_gate("0001", "1, 4", 3).unwrap();
        let b = c.declare_gate("0111", "2, 3", 4).unwrap();
        let _reader = c.declare_gate("10", "4", 5).unwrap();
        let err = c.topological_order().unwrap_err();
        assert_eq!(err, Error::CircuitCycle { gates: vec![a, b] });
        assert_eq!(err.to_string(), "Circuit contains a cycle through gates g1, g2");
    }

    #[test]
    fn test_duplicate_writers_ordered_by_declaration() {
        let mut c = Circuit::new(2);
        c.declare_gate("0110", "1, 2", 4).unwrap();
        c.declare_gate("01", "4", 5).unwrap();
        c.declare_gate("0001", "1, 2", 4).unwrap();
        assert_eq!(c.producer(s(4)).map(|g| g.id()), Some(GateId::new(3)));
        let order = c.topological_order().unwrap();
        // Both writers of 4 come before the reader, the later writer last.
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_output_collision_rejected() {
        let mut c = Circuit::new(4);
        assert!(matches!(c.declare_gate("01", "1", 3), Err(Error::InvalidSignal(_))));
        assert!(matches!(c.declare_gate("01", "0", 5), Err(Error::InvalidSignal(_))));
        assert!(matches!(c.declare_gate("0a", "1", 5), Err(Error::InvalidVectorFormat { .. })));
        c.declare_gate("01", "1", 5).unwrap();
        assert!(c.set_num_inputs(5).is_err());
        assert!(c.set_num_inputs(3).is_ok());
        assert_eq!(c.num_inputs(), 3);
    }

    #[test]
    fn test_levels() {
        let c = nor_circuit();
        let levels = c.levels();
        let level = |id: u32| levels[&GateId::new(id)];
        assert_eq!(level(1), 0); // 5 = f(1, 3)
        assert_eq!(level(2), 0); // 6 = f(2, 3)
        assert_eq!(level(3), 0); // 7 = f(2, 4)
        assert_eq!(level(4), 1); // 8 = f(2, 5)
        assert_eq!(level(5), 1); // 9 = f(1, 6)
        assert_eq!(level(6), 1); // 10 = f(4, 6)
        assert_eq!(level(7), 1); // 11 = f(3, 7)
        assert_eq!(level(8), 2); // 12 = f(8, 9, 10, 11)

        let grouped = c.gates_by_level();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[2], vec![GateId::new(8)]);
    }

    #[test]
    fn test_levels_ignore_duplicate_writers() {
        let mut c = Circuit::new(2);
        let a = c.declare_gate("0001", "1, 2", 3).unwrap();
        let b = c.declare_gate("0111", "1, 2", 3).unwrap();
        let d = c.declare_gate("10", "3", 4).unwrap();
        let levels = c.levels();
        assert_eq!(levels[&a], 0);
        assert_eq!(levels[&b], 0);
        assert_eq!(levels[&d], 1);
        // Ordering still puts the earlier writer first.
        assert_eq!(c.topological_order().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_levels_survive_cycles() {
        let mut c = Circuit::new(1);
        c.declare_gate("0001", "1, 3", 2).unwrap();
        c.declare_gate("0001", "1, 2", 3).unwrap();
        let levels = c.levels();
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn test_output_signal() {
        let mut c = Circuit::new(2);
        assert_eq!(c.output_signal(OutputSelection::MaxOutputId), None);
        c.declare_gate("0001", "1, 2", 7).unwrap();
        c.declare_gate("0111", "1, 2", 3).unwrap();
        assert_eq!(c.output_signal(OutputSelection::MaxOutputId), Some(s(7)));
        assert_eq!(c.output_signal(OutputSelection::LastDeclared), Some(s(3)));
        assert_eq!(c.output_signal(OutputSelection::Signal(s(2))), Some(s(2)));
        assert_eq!(c.next_signal_id(), s(8));
        assert_eq!(Circuit::new(4).next_signal_id(), s(5));
    }

    #[test]
    fn test_connections() {
        let mut c = nor_circuit();
        let (g1, g4, g8) = (GateId::new(1), GateId::new(4), GateId::new(8));
        assert!(c.add_connection(g1, g4, 1));
        assert!(c.add_connection(g4, g8, 0));
        assert!(!c.add_connection(g4, g8, 4));
        assert!(!c.add_connection(GateId::new(99), g8, 0));
        assert_eq!(c.connections().len(), 2);

        c.remove_connection(g4, g8, 0);
        assert_eq!(c.connections().len(), 1);

        c.remove_gate(g1);
        assert!(c.connections().is_empty());
        assert!(c.gate(g1).is_none());
    }

    #[test]
    fn test_set_gate_inputs() {
        let mut c = Circuit::new(2);
        let g = c.declare_gate("0001", "1, 2", 3).unwrap();
        assert_eq!(c.set_gate_inputs(g, &[s(2), s(1)]), Ok(true));
        assert_eq!(c.gate(g).unwrap().inputs(), &[s(2), s(1)]);
        assert_eq!(c.set_gate_inputs(GateId::new(9), &[s(1)]), Ok(false));
        assert!(c.set_gate_inputs(g, &[s(0)]).is_err());
    }
}
