//! Truth-table signatures and named gate kinds.
//!
//! A k-input gate is fully described by its signature: a bit string of length
//! `2^k` whose entry at index `i` is the output for the input tuple whose
//! MSB-first binary value is `i`. Named kinds (AND, OR, ...) are tabulated into
//! a signature once, so evaluation only ever goes through [`Signature::eval`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::bits::{from_msb_bits, input_combinations, BitVector};
use crate::error::{Error, Result};

/// Largest number of inputs a named gate kind can be tabulated for.
pub const MAX_ARITY: usize = 16;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Signature(Vec<bool>);

impl Signature {
    pub fn parse(s: &str) -> Result<Self> {
        BitVector::parse(s).map(Signature::from)
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Entry at `index`, or `false` when the signature is too short.
    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Evaluates the gate on an ordered input tuple.
    ///
    /// Empty signatures, empty inputs and out-of-range indices all yield `false`.
    pub fn eval(&self, inputs: &[bool]) -> bool {
        if self.0.is_empty() || inputs.is_empty() {
            return false;
        }
        // Indices beyond the signature fall back to 0, so wide tuples are fine.
        if inputs.len() >= usize::BITS as usize {
            let (high, low) = inputs.split_at(inputs.len() - (usize::BITS as usize - 1));
            if high.iter().any(|&b| b) {
                return false;
            }
            return self.get(from_msb_bits(low));
        }
        self.get(from_msb_bits(inputs))
    }

    /// Number of inputs this signature naturally describes, if its length is `2^k`.
    pub fn arity(&self) -> Option<usize> {
        self.0
            .len()
            .is_power_of_two()
            .then(|| self.0.len().trailing_zeros() as usize)
    }

    /// Conventional name of a two-input operator, for 4-bit signatures.
    pub fn operator_name(&self) -> Option<&'static str> {
        if self.0.len() != 4 {
            return None;
        }
        Some(BINARY_OPERATORS[from_msb_bits(&self.0)])
    }

    /// Signature of the two-input AND, `0001`.
    pub fn and2() -> Self {
        Self(vec![false, false, false, true])
    }

    /// Signature of the two-input OR, `0111`.
    pub fn or2() -> Self {
        Self(vec![false, true, true, true])
    }
}

/// Names of the 16 two-input boolean operators, indexed by the signature read
/// as a 4-bit number (entry for inputs `00` is the most significant bit).
const BINARY_OPERATORS: [&str; 16] = [
    "FALSE",        // 0000
    "AND",          // 0001
    "A AND NOT B",  // 0010
    "A",            // 0011
    "NOT A AND B",  // 0100
    "B",            // 0101
    "XOR",          // 0110
    "OR",           // 0111
    "NOR",          // 1000
    "XNOR",         // 1001
    "NOT B",        // 1010
    "A OR NOT B",   // 1011
    "NOT A",        // 1100
    "NOT A OR B",   // 1101
    "NAND",         // 1110
    "TRUE",         // 1111
];

impl From<BitVector> for Signature {
    fn from(v: BitVector) -> Self {
        Self(v.into_bits())
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as u8)?;
        }
        Ok(())
    }
}

/// Evaluates a raw signature string on an input tuple.
///
/// Characters other than `1` count as 0; this is the lenient path used by
/// callers that did not validate their signature up front.
pub fn evaluate(signature: &str, inputs: &[bool]) -> bool {
    let bits = signature.chars().map(|c| c == '1').collect();
    Signature(bits).eval(inputs)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
    Nand,
    Nor,
    Xnor,
}

impl GateKind {
    pub const ALL: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Not => "NOT",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xnor => "XNOR",
        }
    }

    fn reduce(self, inputs: &[bool]) -> bool {
        let and = || inputs.iter().fold(true, |a, &b| a & b);
        let or = || inputs.iter().fold(false, |a, &b| a | b);
        let xor = || inputs.iter().fold(false, |a, &b| a ^ b);
        match self {
            GateKind::And => and(),
            GateKind::Or => or(),
            GateKind::Xor => xor(),
            GateKind::Not => !inputs[0],
            GateKind::Nand => !and(),
            GateKind::Nor => !or(),
            GateKind::Xnor => inputs.is_empty() || !xor(),
        }
    }

    /// Tabulates this kind over `arity` inputs.
    ///
    /// A zero-input table holds the single constant the fold starts from.
    pub fn signature(self, arity: usize) -> Result<Signature> {
        let valid = match self {
            GateKind::Not => arity == 1,
            _ => arity <= MAX_ARITY,
        };
        if !valid {
            return Err(Error::InvalidArity { kind: self, arity });
        }
        let bits = input_combinations(arity).map(|t| self.reduce(&t)).collect();
        Ok(Signature(bits))
    }
}

impl FromStr for GateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        GateKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownGateKind(name.to_string()))
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluates a named gate kind on an input tuple.
pub fn evaluate_named(name: &str, inputs: &[bool]) -> Result<bool> {
    let kind: GateKind = name.parse()?;
    let signature = kind.signature(inputs.len())?;
    if inputs.is_empty() {
        return Ok(signature.get(0));
    }
    Ok(signature.eval(inputs))
}
