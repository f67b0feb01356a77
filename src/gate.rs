use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::signal::{Signal, SignalTable};
use crate::signature::{GateKind, Signature};

/// Identifier assigned to a gate by its circuit, starting at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateId(u32);

impl GateId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl Display for GateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gate {
    id: GateId,
    signature: Signature,
    inputs: Box<[Signal]>,
    output: Signal,
}

// Constructors
impl Gate {
    pub fn new(id: GateId, signature: Signature, inputs: &[Signal], output: Signal) -> Gate {
        Gate {
            id,
            signature,
            inputs: inputs.into(),
            output,
        }
    }

    /// Gate computing a named kind, tabulated over `inputs.len()` inputs.
    pub fn named(id: GateId, kind: GateKind, inputs: &[Signal], output: Signal) -> Result<Gate> {
        let signature = kind.signature(inputs.len())?;
        Ok(Gate::new(id, signature, inputs, output))
    }
}

// Getters
impl Gate {
    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn inputs(&self) -> &[Signal] {
        &self.inputs
    }

    pub fn output(&self) -> Signal {
        self.output
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

// Mutation
impl Gate {
    pub fn set_inputs(&mut self, inputs: &[Signal]) {
        self.inputs = inputs.into();
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
    }
}

impl Gate {
    /// Reads the inputs from `signals`, evaluates the signature and stores the
    /// result under the output signal.
    pub fn fire(&self, signals: &mut SignalTable) -> bool {
        let values = signals.gather(&self.inputs);
        let value = self.signature.eval(&values);
        signals.set(self.output, value);
        value
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(|s| s.to_string()).collect();
        write!(
            f,
            "{}: {} = [{}]({})",
            self.id,
            self.output,
            self.signature,
            inputs.join(", ")
        )
    }
}

/// Parses a comma-separated list of signal IDs such as `"1, 3"`.
///
/// Whitespace and empty entries are ignored; anything that is not a positive
/// integer is rejected.
pub fn parse_signal_list(s: &str) -> Result<Vec<Signal>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u32>() {
            Ok(id) if id > 0 => Ok(Signal::new(id)),
            _ => Err(Error::InvalidSignal(format!(
                "expected a positive signal id, found {:?}",
                part
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn signals(ids: &[u32]) -> Vec<Signal> {
        ids.iter().map(|&i| Signal::new(i)).collect()
    }

    #[test]
    fn test_gate_new() {
        let sig = Signature::parse("1000").unwrap();
        let gate = Gate::new(GateId::new(1), sig.clone(), &signals(&[1, 3]), Signal::new(5));
        assert_eq!(gate.inputs(), &signals(&[1, 3])[..]);
        assert_eq!(gate.output(), Signal::new(5));
        assert_eq!(gate.signature(), &sig);
        assert_eq!(gate.arity(), 2);
        assert_eq!(gate.to_string(), "g1: 5 = [1000](1, 3)");
    }

    #[test]
    fn test_gate_named() {
        let gate = Gate::named(GateId::new(2), GateKind::Xor, &signals(&[1, 2]), Signal::new(3)).unwrap();
        assert_eq!(gate.signature().to_string(), "0110");
        assert!(Gate::named(GateId::new(3), GateKind::Not, &signals(&[1, 2]), Signal::new(4)).is_err());
    }

    #[test]
    fn test_gate_fire() {
        let gate = Gate::named(GateId::new(1), GateKind::Nor, &signals(&[1, 2]), Signal::new(3)).unwrap();
        let mut table = SignalTable::with_inputs(&[false, false]);
        assert!(gate.fire(&mut table));
        assert!(table.get(Signal::new(3)));

        let mut table = SignalTable::with_inputs(&[false, true]);
        assert!(!gate.fire(&mut table));
        assert!(table.contains(Signal::new(3)));
        assert!(!table.get(Signal::new(3)));
    }

    #[test]
    fn test_parse_signal_list() {
        assert_eq!(parse_signal_list("1, 3").unwrap(), signals(&[1, 3]));
        assert_eq!(parse_signal_list(" 8,9 ,10,11 ").unwrap(), signals(&[8, 9, 10, 11]));
        assert_eq!(parse_signal_list("2,,4,").unwrap(), signals(&[2, 4]));
        assert!(parse_signal_list("").unwrap().is_empty());
        assert!(matches!(parse_signal_list("1, x"), Err(Error::InvalidSignal(_))));
        assert!(matches!(parse_signal_list("0"), Err(Error::InvalidSignal(_))));
        assert!(matches!(parse_signal_list("-2"), Err(Error::InvalidSignal(_))));
    }
}
