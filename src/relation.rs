//! Boolean relation matrices built from two bit vectors and a signature.
//!
//! Rows are indexed by the bits of one vector, columns by the bits of the other,
//! and each cell is the signature applied to the pair `(row_bit, col_bit)`.
//! Cells whose concatenated row and column labels disagree on a set of merged
//! positions are masked out as "don't care".

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::bits::{generate_bitwise_values, BitVector};
use crate::error::{Error, LengthRule, Result};
use crate::signature::Signature;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    Zero,
    One,
    Masked,
}

impl Cell {
    pub fn value(self) -> Option<bool> {
        match self {
            Cell::Zero => Some(false),
            Cell::One => Some(true),
            Cell::Masked => None,
        }
    }

    pub fn is_masked(self) -> bool {
        self == Cell::Masked
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        if b {
            Cell::One
        } else {
            Cell::Zero
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Cell::Zero => '0',
            Cell::One => '1',
            Cell::Masked => '-',
        };
        write!(f, "{}", c)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RelationMatrix {
    row_bits: Vec<bool>,
    col_bits: Vec<bool>,
    row_headers: Vec<String>,
    col_headers: Vec<String>,
    cells: Vec<Vec<Cell>>,
}

/// Labels for `n` rows or columns; none are needed for a single line.
fn headers(n: usize) -> Vec<String> {
    if n <= 1 {
        Vec::new()
    } else {
        generate_bitwise_values(n)
    }
}

/// True when the characters at the 1-based `positions` of `label` are not all
/// equal. A position past the end of the label counts as its own value.
fn is_masked(label: &str, positions: &[usize]) -> bool {
    let bytes = label.as_bytes();
    let seen: HashSet<Option<u8>> = positions
        .iter()
        .map(|&p| p.checked_sub(1).and_then(|i| bytes.get(i).copied()))
        .collect();
    seen.len() > 1
}

/// Builds the `row_bits.len() × col_bits.len()` relation matrix.
///
/// Cell `(i, j)` is masked when the merged positions disagree in
/// `row_header[i] + col_header[j]`; otherwise it holds
/// `signature[(row_bits[i] << 1) | col_bits[j]]` (0 when out of range).
pub fn build(row_bits: &[bool], col_bits: &[bool], signature: &Signature, masked_positions: &[usize]) -> RelationMatrix {
    debug!(
        "build(rows = {}, cols = {}, signature = {}, masked = {:?})",
        row_bits.len(),
        col_bits.len(),
        signature,
        masked_positions
    );
    let row_headers = headers(row_bits.len());
    let col_headers = headers(col_bits.len());

    let cells = row_bits
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            let row_label = row_headers.get(i).map_or("", String::as_str);
            col_bits
                .iter()
                .enumerate()
                .map(|(j, &col)| {
                    let col_label = col_headers.get(j).map_or("", String::as_str);
                    let label = format!("{}{}", row_label, col_label);
                    if is_masked(&label, masked_positions) {
                        Cell::Masked
                    } else {
                        let index = ((row as usize) << 1) | col as usize;
                        Cell::from(signature.get(index))
                    }
                })
                .collect()
        })
        .collect();

    RelationMatrix {
        row_bits: row_bits.to_vec(),
        col_bits: col_bits.to_vec(),
        row_headers,
        col_headers,
        cells,
    }
}

impl RelationMatrix {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.col_bits.len()
    }

    pub fn row_bits(&self) -> &[bool] {
        &self.row_bits
    }

    pub fn col_bits(&self) -> &[bool] {
        &self.col_bits
    }

    pub fn row_headers(&self) -> &[String] {
        &self.row_headers
    }

    pub fn col_headers(&self) -> &[String] {
        &self.col_headers
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn masked_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_masked()).count()
    }

    /// Non-masked cells in row-major order.
    pub fn flatten(&self) -> Vec<bool> {
        self.cells.iter().flatten().filter_map(|c| c.value()).collect()
    }

    /// [`flatten`](Self::flatten) as a `0`/`1` string.
    pub fn flatten_string(&self) -> String {
        self.flatten().iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

impl Display for RelationMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let row_width = self.row_headers.iter().map(String::len).max().unwrap_or(0);
        let col_width = self.col_headers.iter().map(String::len).max().unwrap_or(1).max(1);
        if !self.col_headers.is_empty() {
            write!(f, "{:row_width$} |", "", row_width = row_width)?;
            for h in &self.col_headers {
                write!(f, " {:>col_width$}", h, col_width = col_width)?;
            }
            writeln!(f)?;
        }
        for (i, row) in self.cells.iter().enumerate() {
            let label = self.row_headers.get(i).map_or("", String::as_str);
            write!(f, "{:row_width$} |", label, row_width = row_width)?;
            for cell in row {
                write!(f, " {:>col_width$}", cell.to_string(), col_width = col_width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Operator joining one link of a chain to the next.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum Composition {
    /// `0001`
    #[default]
    And,
    /// `0111`
    Or,
    /// Any of the 16 two-input operators, given as its 4-bit signature.
    Custom(Signature),
}

impl Composition {
    /// A two-input operator given by its 4-bit signature.
    pub fn custom(signature: Signature) -> Result<Self> {
        check_operator(&signature)?;
        Ok(Composition::Custom(signature))
    }

    pub fn signature(&self) -> Signature {
        match self {
            Composition::And => Signature::and2(),
            Composition::Or => Signature::or2(),
            Composition::Custom(s) => s.clone(),
        }
    }
}

fn check_operator(signature: &Signature) -> Result<()> {
    if signature.len() != 4 {
        return Err(Error::InvalidLength {
            len: signature.len(),
            rule: LengthRule::Exactly(4),
        });
    }
    Ok(())
}

/// A vector in a chained composition together with the operator that joins it
/// to the next vector.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Link {
    pub vector: BitVector,
    pub composition: Composition,
}

impl Link {
    pub fn new(vector: BitVector, composition: Composition) -> Self {
        Self { vector, composition }
    }
}

/// Folds a chain of vectors into a single relation.
///
/// Each step pairs the accumulated vector (rows) with the next link (columns).
/// Intermediate steps use the composition of the left link; the last step
/// uses `target`. The flattened result of a step becomes the rows of the next.
/// Returns the matrix of the last step.
pub fn compose(links: &[Link], target: &Signature, masked_positions: &[usize]) -> Result<RelationMatrix> {
    if links.len() < 2 {
        return Err(Error::InvalidLength {
            len: links.len(),
            rule: LengthRule::AtLeast(2),
        });
    }
    for link in links {
        if let Composition::Custom(signature) = &link.composition {
            check_operator(signature)?;
        }
    }

    let mut acc = links[0].vector.as_slice().to_vec();
    let mut operator = links[0].composition.signature();
    let last = links.len() - 1;
    let mut result = None;

    for (step, link) in links.iter().enumerate().skip(1) {
        if acc.is_empty() {
            return Err(Error::InvalidLength {
                len: 0,
                rule: LengthRule::AtLeast(1),
            });
        }
        let signature = if step < last { &operator } else { target };
        let matrix = build(&acc, link.vector.as_slice(), signature, masked_positions);
        debug!("compose: step {} -> {}", step, matrix.flatten_string());
        acc = matrix.flatten();
        operator = link.composition.signature();
        result = Some(matrix);
    }

    // At least one step ran since there are two or more links.
    result.ok_or(Error::InvalidLength {
        len: links.len(),
        rule: LengthRule::AtLeast(2),
    })
}

/// Parses merged input positions such as `"2, 3"`, skipping anything that is
/// not a number.
pub fn parse_positions(s: &str) -> Vec<usize> {
    s.split(',').filter_map(|p| p.trim().parse().ok()).collect()
}
