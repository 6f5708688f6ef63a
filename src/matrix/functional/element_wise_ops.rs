use std::ops::{Mul, Neg};

use itertools::izip;

use crate::error::{Error, Result};
use crate::matrix::{Matrix, Value};

/// Combines two same-shaped matrices cell by cell.
fn zip_with<F>(op: &'static str, left: &Matrix, right: &Matrix, f: F) -> Result<Matrix>
where
    F: Fn(Value, Value) -> Value,
{
    if left.dims() != right.dims() {
        return Err(Error::shape(op, left.dims(), right.dims()));
    }
    let data = izip!(left.data.iter(), right.data.iter())
        .map(|(&x, &y)| f(x, y))
        .collect();
    Ok(Matrix {
        rows: left.rows,
        cols: left.cols,
        data,
    })
}

impl Matrix {
    pub fn plus(&self, other: &Matrix) -> Result<Matrix> {
        zip_with("plus", self, other, |x, y| x + y)
    }

    pub fn minus(&self, other: &Matrix) -> Result<Matrix> {
        zip_with("minus", self, other, |x, y| x - y)
    }

    /// Element-wise (Hadamard) product. See [`Matrix::product`] for the
    /// matrix multiplication.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        zip_with("dot", self, other, |x, y| x * y)
    }

    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(Value) -> Value,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    pub fn scale(&self, k: Value) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn add_scalar(&self, k: Value) -> Matrix {
        self.map(|x| x + k)
    }
}

impl Mul<Value> for &Matrix {
    type Output = Matrix;

    fn mul(self, k: Value) -> Matrix {
        self.scale(k)
    }
}

impl Mul<Value> for Matrix {
    type Output = Matrix;

    fn mul(mut self, k: Value) -> Matrix {
        self.data.iter_mut().for_each(|x| *x *= k);
        self
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.map(|x| -x)
    }
}

#[test]
fn test_plus_minus() {
    let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
    let b = Matrix::from([[0.5, 0.5], [1.0, -1.0]]);
    assert_eq!(a.plus(&b).unwrap(), Matrix::from([[1.5, 2.5], [4.0, 3.0]]));
    assert_eq!(a.minus(&b).unwrap(), Matrix::from([[0.5, 1.5], [2.0, 5.0]]));
}

#[test]
fn test_shape_mismatch() {
    let a = Matrix::new(2, 3);
    let b = Matrix::new(3, 2);
    for result in [a.plus(&b), a.minus(&b), a.dot(&b)] {
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }
}

#[test]
fn test_element_wise_multiplication() {
    let left = Matrix::from([[1.0, 2.0, 3.0]]);
    let right = Matrix::from([[7.0, 2.0, 8.0]]);
    assert_eq!(left.dot(&right).unwrap(), Matrix::from([[7.0, 4.0, 24.0]]));
}

#[test]
fn test_scalar_ops() {
    let m = Matrix::from([[1.0, -2.0]]);
    assert_eq!(m.scale(3.0), Matrix::from([[3.0, -6.0]]));
    assert_eq!(&m * 3.0, m.scale(3.0));
    assert_eq!(m.add_scalar(1.0), Matrix::from([[2.0, -1.0]]));
    assert_eq!(-&m, Matrix::from([[-1.0, 2.0]]));
}

#[test]
fn test_map_propagates_nan() {
    let m = Matrix::from([[0.0, 1.0]]).map(|x| x.ln());
    assert_eq!(m.at(0, 0).unwrap(), f64::NEG_INFINITY);
    assert!(m.map(|x| x * 0.0).at(0, 0).unwrap().is_nan());
}
