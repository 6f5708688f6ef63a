//! Dense matrices, linear and logistic regression costs, and a batch
//! gradient descent optimizer to fit them.

pub mod classify;
pub mod cost;
pub mod data;
pub mod error;
pub mod matrix;
pub mod optim;

pub use error::{Error, Result};
pub use matrix::{Matrix, Value};
pub use optim::{Fit, FitConfig, GradientDescent, LearningRate, Termination};

/// Fits `config.model` to `x` and `y` with sequential products.
pub fn fit(x: &Matrix, y: &Matrix, config: &FitConfig) -> Result<Fit> {
    GradientDescent::default().fit(x, y, config)
}

/// Accuracy of `theta` as a logistic classifier on `(x, y)`, and the rows it
/// misclassifies.
pub fn evaluate(x: &Matrix, theta: &Matrix, y: &Matrix) -> Result<(Value, Vec<usize>)> {
    classify::accuracy(x, theta, y)
}
