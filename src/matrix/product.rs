use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::{Matrix, Value};

/// A matrix multiplication strategy.
///
/// Implementations must agree bit for bit with [`Sequential`]: every output
/// cell is the sum over `k` in ascending order of `left[i][k] * right[k][j]`.
pub trait MatrixProduct: std::fmt::Debug + Send + Sync {
    fn product(&self, left: &Matrix, right: &Matrix) -> Result<Matrix>;
}

/// Single-threaded, row-major matrix multiplication.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sequential;

/// Computes each output row on the rayon pool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowParallel;

fn check_shapes(left: &Matrix, right: &Matrix) -> Result<()> {
    if left.cols != right.rows {
        return Err(Error::shape("product", left.dims(), right.dims()));
    }
    Ok(())
}

/// Fills `out` with row `i` of `left * right`.
fn product_row(left: &Matrix, right: &Matrix, i: usize, out: &mut [Value]) {
    let left_row = &left.data[i * left.cols..(i + 1) * left.cols];
    for (j, cell) in out.iter_mut().enumerate() {
        *cell = left_row
            .iter()
            .enumerate()
            .fold(0.0, |acc, (k, &x)| acc + x * right.data[k * right.cols + j]);
    }
}

impl MatrixProduct for Sequential {
    fn product(&self, left: &Matrix, right: &Matrix) -> Result<Matrix> {
        check_shapes(left, right)?;
        let mut result = Matrix::new(left.rows, right.cols);
        let cols = right.cols;
        for i in 0..left.rows {
            product_row(left, right, i, &mut result.data[i * cols..(i + 1) * cols]);
        }
        Ok(result)
    }
}

impl MatrixProduct for RowParallel {
    fn product(&self, left: &Matrix, right: &Matrix) -> Result<Matrix> {
        check_shapes(left, right)?;
        let mut result = Matrix::new(left.rows, right.cols);
        if result.is_empty() {
            return Ok(result);
        }
        result
            .data
            .par_chunks_mut(right.cols)
            .enumerate()
            .for_each(|(i, out)| product_row(left, right, i, out));
        Ok(result)
    }
}
