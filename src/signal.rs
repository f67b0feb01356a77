use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

/// Integer identifier of a boolean value in a circuit.
///
/// Signals `1..=num_inputs` are the primary inputs; every other signal is
/// produced by a gate.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Signal(u32);

// Constructors
impl Signal {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Primary input `index`, counted from 0.
    pub const fn from_input(index: u32) -> Self {
        Self(index + 1)
    }
}

// Getters
impl Signal {
    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn is_input(self, num_inputs: usize) -> bool {
        self.0 >= 1 && self.0 as usize <= num_inputs
    }
}

impl From<u32> for Signal {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Values of all signals during the evaluation of one input combination.
///
/// Created fresh for every combination and dropped afterwards.
#[derive(Debug, Default, Clone)]
pub struct SignalTable {
    values: HashMap<Signal, bool>,
}

impl SignalTable {
    /// Table with primary inputs `1..=inputs.len()` seeded from `inputs`.
    pub fn with_inputs(inputs: &[bool]) -> Self {
        let values = inputs
            .iter()
            .enumerate()
            .map(|(i, &b)| (Signal::from_input(i as u32), b))
            .collect();
        Self { values }
    }

    /// Value of `signal`; signals nobody has written read as 0.
    pub fn get(&self, signal: Signal) -> bool {
        self.values.get(&signal).copied().unwrap_or(false)
    }

    pub fn set(&mut self, signal: Signal, value: bool) {
        self.values.insert(signal, value);
    }

    pub fn contains(&self, signal: Signal) -> bool {
        self.values.contains_key(&signal)
    }

    /// Gathers the values of `signals` in order.
    pub fn gather(&self, signals: &[Signal]) -> Vec<bool> {
        signals.iter().map(|&s| self.get(s)).collect()
    }
}
