use std::fmt;
use std::ops::{Index, IndexMut};

use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};

use super::Value;
use crate::error::{Error, Result};

/// A dense, row-major matrix of `f64`.
///
/// The shape is fixed at construction; the contents may be mutated through
/// [`Matrix::set`]. Every operation that derives a new matrix (slicing
/// included) copies, so mutating a result never touches its source.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "MatrixData", into = "MatrixData")]
pub struct Matrix {
    pub(in crate::matrix) rows: usize,
    pub(in crate::matrix) cols: usize,
    pub(in crate::matrix) data: Vec<Value>,
}

/// Wire form of a [`Matrix`]; re-validated on the way back in.
#[derive(Serialize, Deserialize)]
struct MatrixData {
    rows: usize,
    cols: usize,
    data: Vec<Value>,
}

impl TryFrom<MatrixData> for Matrix {
    type Error = Error;

    fn try_from(raw: MatrixData) -> Result<Self> {
        Matrix::checked("deserialize", raw.rows, raw.cols, raw.data)
    }
}

impl From<Matrix> for MatrixData {
    fn from(matrix: Matrix) -> Self {
        MatrixData {
            rows: matrix.rows,
            cols: matrix.cols,
            data: matrix.data,
        }
    }
}

impl Matrix {
    /// A `rows x cols` matrix of zeros.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix::new_with_filler(rows, cols, 0.0)
    }

    pub fn new_with_filler(rows: usize, cols: usize, filler: Value) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![filler; rows * cols],
        }
    }

    /// Copies `data`, read in row-major order, into a new matrix.
    pub fn from_slice(rows: usize, cols: usize, data: &[Value]) -> Result<Matrix> {
        Matrix::checked("from_slice", rows, cols, data.to_vec())
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<Value>) -> Result<Matrix> {
        Matrix::checked("from_vec", rows, cols, data)
    }

    fn checked(op: &'static str, rows: usize, cols: usize, data: Vec<Value>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                op,
                detail: format!(
                    "{} values cannot fill a {}x{} matrix",
                    data.len(),
                    rows,
                    cols
                ),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(i, j)` for every cell.
    ///
    /// Cells are currently visited in row-major order, but callers should
    /// not rely on it: `f` is expected to be a pure function of its indices.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> Value,
    {
        let data = iproduct!(0..rows, 0..cols).map(|(i, j)| f(i, j)).collect();
        Matrix { rows, cols, data }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(Error::IndexOutOfRange(format!(
                "({}, {}) is outside a {}x{} matrix",
                i, j, self.rows, self.cols
            )));
        }
        Ok(i * self.cols + j)
    }

    pub fn at(&self, i: usize, j: usize) -> Result<Value> {
        let offset = self.offset(i, j)?;
        Ok(self.data[offset])
    }

    pub fn set(&mut self, i: usize, j: usize, value: Value) -> Result<()> {
        let offset = self.offset(i, j)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Borrows row `i` as a slice of length `cols`.
    pub fn row(&self, i: usize) -> Result<&[Value]> {
        if i >= self.rows {
            return Err(Error::IndexOutOfRange(format!(
                "row {} of a matrix with {} rows",
                i, self.rows
            )));
        }
        Ok(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Iterates over the rows; works for zero-column matrices too.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// All values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Value;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        match self.offset(i, j) {
            Ok(offset) => &self.data[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        match self.offset(i, j) {
            Ok(offset) => &mut self.data[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const R: usize, const C: usize> From<[[Value; C]; R]> for Matrix {
    fn from(values: [[Value; C]; R]) -> Self {
        Matrix {
            rows: R,
            cols: C,
            data: values.iter().flatten().copied().collect(),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            let open = if i == 0 { "[" } else { " " };
            let close = if i + 1 == self.rows { "]" } else { "\n" };
            write!(f, "{}{}{}", open, row.iter().join(" "), close)?;
        }
        if self.rows == 0 {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
