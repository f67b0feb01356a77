//! Bit vectors and bitwise enumeration.
//!
//! Every user-facing bit string enters the crate through [`BitVector::parse`],
//! and every computation that enumerates input combinations goes through
//! [`input_combinations`], which fixes the canonical order: ascending integer
//! value, expanded most-significant bit first.

use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::str::FromStr;

use crate::error::{Error, LengthRule, Result};

/// Largest vector accepted by any mode.
pub const MAX_VECTOR_LEN: usize = 1024;

/// Bounds of the plain graph mode.
pub const GRAPH_MIN_LEN: usize = 2;
pub const GRAPH_MAX_LEN: usize = 256;

/// A non-empty sequence of bits.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitVector(Vec<bool>);

// Constructors
impl BitVector {
    /// Parses a string of `0` and `1` characters.
    ///
    /// Anything else, including the empty string, is rejected with
    /// [`Error::InvalidVectorFormat`].
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidVectorFormat {
                position: 0,
                found: None,
            });
        }
        let mut bits = Vec::with_capacity(s.len());
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => {
                    return Err(Error::InvalidVectorFormat {
                        position,
                        found: Some(c),
                    })
                }
            }
        }
        Ok(Self(bits))
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

// Getters
impl BitVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.0
    }

    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }
}

impl Index<usize> for BitVector {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromStr for BitVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as u8)?;
        }
        Ok(())
    }
}

/// Structural constraint a vector must satisfy before it is interpreted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VectorMode {
    /// Square adjacency matrix: 2..=256 bits, perfect square length.
    Graph,
    /// Truth vector of some function: 1..=1024 bits, power-of-two length.
    Generalized,
    /// Explicit `rows × cols` relation: 1..=1024 bits, exactly `rows * cols`.
    Relation { rows: usize, cols: usize },
}

impl VectorMode {
    pub fn validate(&self, vector: &BitVector) -> Result<()> {
        let len = vector.len();
        match *self {
            VectorMode::Graph => {
                check_bounds(len, GRAPH_MIN_LEN, GRAPH_MAX_LEN)?;
                if perfect_sqrt(len).is_none() {
                    return Err(Error::InvalidLength {
                        len,
                        rule: LengthRule::PerfectSquare,
                    });
                }
            }
            VectorMode::Generalized => {
                check_bounds(len, 1, MAX_VECTOR_LEN)?;
                if !len.is_power_of_two() {
                    return Err(Error::InvalidLength {
                        len,
                        rule: LengthRule::PowerOfTwo,
                    });
                }
            }
            VectorMode::Relation { rows, cols } => {
                check_bounds(len, 1, MAX_VECTOR_LEN)?;
                if rows.checked_mul(cols) != Some(len) {
                    return Err(Error::MismatchedDimensions { rows, cols, len });
                }
            }
        }
        Ok(())
    }
}

fn check_bounds(len: usize, min: usize, max: usize) -> Result<()> {
    if len < min || len > max {
        return Err(Error::InvalidLength {
            len,
            rule: LengthRule::Between { min, max },
        });
    }
    Ok(())
}

/// Returns `Some(r)` when `n == r * r`.
pub fn perfect_sqrt(n: usize) -> Option<usize> {
    let mut r = (n as f64).sqrt() as usize;
    // Correct for floating point drift in either direction.
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    (r * r == n).then_some(r)
}

/// Default `rows × cols` split of a `2^k` vector: `2^ceil(k/2) × 2^floor(k/2)`.
pub fn default_dimensions(len: usize) -> Option<(usize, usize)> {
    if !len.is_power_of_two() {
        return None;
    }
    let k = len.trailing_zeros();
    Some((1 << ((k + 1) / 2), 1 << (k / 2)))
}

/// Number of bits needed to label `n` items, `ceil(log2(n))`.
pub fn bit_width(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Formats `value` as a zero-padded MSB-first binary string of `width` bits.
pub fn to_binary(value: usize, width: usize) -> String {
    (0..width)
        .rev()
        .map(|i| if (value >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Labels `0..n` as binary strings of identical width [`bit_width(n)`](bit_width).
pub fn generate_bitwise_values(n: usize) -> Vec<String> {
    let width = bit_width(n);
    (0..n).map(|i| to_binary(i, width)).collect()
}

/// Expands `value` into a `width`-wide tuple, most significant bit first.
pub fn to_msb_bits(value: usize, width: usize) -> Vec<bool> {
    (0..width).rev().map(|i| (value >> i) & 1 == 1).collect()
}

/// Binary value of a tuple read most significant bit first.
pub fn from_msb_bits(bits: &[bool]) -> usize {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as usize)
}

/// All `2^width` input tuples in canonical order.
pub fn input_combinations(width: usize) -> impl Iterator<Item = Vec<bool>> {
    (0..1usize << width).map(move |i| to_msb_bits(i, width))
}

/// Cartesian product of several bit sequences, first sequence varying slowest.
pub fn cartesian_product(vectors: &[&[bool]]) -> Vec<Vec<bool>> {
    vectors.iter().fold(vec![Vec::new()], |acc, bits| {
        acc.iter()
            .flat_map(|prefix| {
                bits.iter().map(move |&b| {
                    let mut t = prefix.clone();
                    t.push(b);
                    t
                })
            })
            .collect()
    })
}
