use crate::error::Result;
use crate::matrix::{Matrix, MatrixProduct, Sequential, Value};

impl Matrix {
    pub fn sum(&self) -> Value {
        self.reduce(0.0, |acc, x| acc + x)
    }

    /// Folds every value into `init`, visiting cells in row-major order.
    pub fn reduce<F>(&self, init: Value, f: F) -> Value
    where
        F: Fn(Value, Value) -> Value,
    {
        self.data.iter().fold(init, |acc, &x| f(acc, x))
    }

    /// Transpose; the result has shape `(cols, rows)`.
    pub fn t(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.data[j * self.cols + i])
    }

    /// Matrix multiplication using the [`Sequential`] strategy.
    pub fn product(&self, other: &Matrix) -> Result<Matrix> {
        Sequential.product(self, other)
    }
}

#[test]
fn test_sum_and_reduce() {
    let m = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(m.sum(), 10.0);
    assert_eq!(m.reduce(1.0, |acc, x| acc * x), 24.0);
    // row-major order is observable with a non-commutative fold
    assert_eq!(m.reduce(0.0, |acc, x| acc * 10.0 + x), 1234.0);
    assert_eq!(Matrix::new(0, 4).sum(), 0.0);
}

#[test]
fn test_transpose() {
    let m = Matrix::from([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let t = m.t();
    assert_eq!(t.dims(), (3, 2));
    assert_eq!(t, Matrix::from([[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]));
    assert_eq!(t.t(), m);
}

#[test]
fn test_product_2x2() {
    let matrix = Matrix::from([[0.0, 1.0], [2.0, 3.0]]);
    let e1 = Matrix::from([[0.0], [1.0]]);
    let e2 = Matrix::from([[1.0], [0.0]]);
    let diag = Matrix::from([[1.0], [1.0]]);

    let r = matrix.product(&diag).unwrap();
    assert_eq!(r.dims(), (2, 1));
    assert_eq!(r, Matrix::from([[1.0], [5.0]]));
    assert_eq!(matrix.product(&e1).unwrap(), Matrix::from([[1.0], [3.0]]));
    assert_eq!(matrix.product(&e2).unwrap(), Matrix::from([[0.0], [2.0]]));
}
