//! Error type shared by every operation in the crate.

use std::fmt;

use crate::gate::GateId;
use crate::signature::GateKind;

/// Structural rule a vector length failed to satisfy.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LengthRule {
    /// Length must lie in `min..=max`.
    Between { min: usize, max: usize },
    /// Length must be a perfect square.
    PerfectSquare,
    /// Length must be an exact power of two.
    PowerOfTwo,
    /// At least this many items are required.
    AtLeast(usize),
    /// Exactly this many items are required.
    Exactly(usize),
}

impl fmt::Display for LengthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthRule::Between { min, max } => write!(f, "between {} and {}", min, max),
            LengthRule::PerfectSquare => write!(f, "a perfect square (4, 9, 16, 25, ...)"),
            LengthRule::PowerOfTwo => write!(f, "a power of two (1, 2, 4, 8, ...)"),
            LengthRule::AtLeast(n) => write!(f, "at least {}", n),
            LengthRule::Exactly(n) => write!(f, "exactly {}", n),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// Input contains something other than `0` and `1`.
    InvalidVectorFormat { position: usize, found: Option<char> },
    /// Length is out of bounds or has the wrong shape.
    InvalidLength { len: usize, rule: LengthRule },
    /// Gates that could not be ordered because they depend on each other.
    CircuitCycle { gates: Vec<GateId> },
    /// Named gate mode was given a name it does not know.
    UnknownGateKind(String),
    /// `rows * cols` does not match the vector length.
    MismatchedDimensions { rows: usize, cols: usize, len: usize },
    /// A named gate kind cannot take this many inputs.
    InvalidArity { kind: GateKind, arity: usize },
    /// Malformed signal reference in a gate declaration.
    InvalidSignal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidVectorFormat { found: None, .. } => {
                write!(f, "Vector must not be empty")
            }
            Error::InvalidVectorFormat {
                position,
                found: Some(c),
            } => write!(
                f,
                "Vector must contain only 0 or 1, found {:?} at position {}",
                c, position
            ),
            Error::InvalidLength { len, rule } => {
                write!(f, "Invalid length {}: must be {}", len, rule)
            }
            Error::CircuitCycle { gates } => {
                let ids: Vec<String> = gates.iter().map(|g| g.to_string()).collect();
                write!(f, "Circuit contains a cycle through gates {}", ids.join(", "))
            }
            Error::UnknownGateKind(name) => write!(f, "Unknown gate kind {:?}", name),
            Error::MismatchedDimensions { rows, cols, len } => write!(
                f,
                "Dimensions {}x{} do not match vector length {}",
                rows, cols, len
            ),
            Error::InvalidArity { kind, arity } => {
                write!(f, "{} gate cannot have {} inputs", kind, arity)
            }
            Error::InvalidSignal(msg) => write!(f, "Invalid signal: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
