//! Cost functions and their gradients.
//!
//! Both costs are pure: they read `theta`, `x` and `y` and allocate fresh
//! matrices for the hypothesis and the gradient. `theta` has shape
//! `(features, classes)`, `x` is `(m, features)` and `y` is `(m, classes)`.

use num::traits::real::Real;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::{Matrix, MatrixProduct, Value};

/// The logistic function `1 / (1 + e^-z)`.
pub fn sigmoid<T: Real>(z: T) -> T {
    T::one() / (T::one() + (-z).exp())
}

pub trait CostFunction: Send + Sync {
    /// Predictions for every row of `x`, shape `(m, classes)`.
    fn hypothesis(&self, product: &dyn MatrixProduct, x: &Matrix, theta: &Matrix)
        -> Result<Matrix>;

    /// Returns the scalar cost of `theta` and its gradient, which has the
    /// same shape as `theta`.
    fn cost(
        &self,
        product: &dyn MatrixProduct,
        theta: &Matrix,
        x: &Matrix,
        y: &Matrix,
    ) -> Result<(Value, Matrix)>;

    /// Whether predictions are class scores that accuracy can be computed on.
    fn is_classifier(&self) -> bool;
}

/// Squared error: `J = 1/2m * sum((X theta - y)^2)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinearRegression;

/// Cross entropy over a sigmoid activation, applied per class column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogisticRegression;

fn residuals(h: &Matrix, y: &Matrix) -> Result<Matrix> {
    if h.dims() != y.dims() {
        return Err(Error::ShapeMismatch {
            op: "cost",
            detail: format!(
                "predictions are {}x{} but labels are {}x{}",
                h.rows(),
                h.cols(),
                y.rows(),
                y.cols()
            ),
        });
    }
    h.minus(y)
}

/// `1/m * X^T (h - y)`
fn gradient(product: &dyn MatrixProduct, x: &Matrix, error: &Matrix) -> Result<Matrix> {
    let m = x.rows() as Value;
    Ok(product.product(&x.t(), error)? * (1.0 / m))
}

impl CostFunction for LinearRegression {
    fn hypothesis(
        &self,
        product: &dyn MatrixProduct,
        x: &Matrix,
        theta: &Matrix,
    ) -> Result<Matrix> {
        product.product(x, theta)
    }

    fn cost(
        &self,
        product: &dyn MatrixProduct,
        theta: &Matrix,
        x: &Matrix,
        y: &Matrix,
    ) -> Result<(Value, Matrix)> {
        let h = self.hypothesis(product, x, theta)?;
        let error = residuals(&h, y)?;
        let m = x.rows() as Value;
        let j = error.dot(&error)?.sum() / (2.0 * m);
        Ok((j, gradient(product, x, &error)?))
    }

    fn is_classifier(&self) -> bool {
        false
    }
}

impl CostFunction for LogisticRegression {
    fn hypothesis(
        &self,
        product: &dyn MatrixProduct,
        x: &Matrix,
        theta: &Matrix,
    ) -> Result<Matrix> {
        Ok(product.product(x, theta)?.map(sigmoid))
    }

    /// `h` of exactly 0 or 1 makes the log diverge; the resulting infinite
    /// or NaN cost is returned as is.
    fn cost(
        &self,
        product: &dyn MatrixProduct,
        theta: &Matrix,
        x: &Matrix,
        y: &Matrix,
    ) -> Result<(Value, Matrix)> {
        let h = self.hypothesis(product, x, theta)?;
        let error = residuals(&h, y)?;
        let m = x.rows() as Value;
        let positive = y.dot(&h.map(Value::ln))?;
        let negative = y.map(|v| 1.0 - v).dot(&h.map(|v| (1.0 - v).ln()))?;
        let j = -positive.plus(&negative)?.sum() / m;
        Ok((j, gradient(product, x, &error)?))
    }

    fn is_classifier(&self) -> bool {
        true
    }
}

/// The model being fit, selecting its cost function.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Model {
    LinearRegression,
    #[default]
    LogisticRegression,
}

impl Model {
    fn cost_function(&self) -> &dyn CostFunction {
        match self {
            Model::LinearRegression => &LinearRegression,
            Model::LogisticRegression => &LogisticRegression,
        }
    }
}

impl CostFunction for Model {
    fn hypothesis(
        &self,
        product: &dyn MatrixProduct,
        x: &Matrix,
        theta: &Matrix,
    ) -> Result<Matrix> {
        self.cost_function().hypothesis(product, x, theta)
    }

    fn cost(
        &self,
        product: &dyn MatrixProduct,
        theta: &Matrix,
        x: &Matrix,
        y: &Matrix,
    ) -> Result<(Value, Matrix)> {
        self.cost_function().cost(product, theta, x, y)
    }

    fn is_classifier(&self) -> bool {
        self.cost_function().is_classifier()
    }
}
