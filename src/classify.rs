//! Predictions, one-hot encoding and accuracy for fitted classifiers.

use itertools::Itertools;

use crate::cost::{CostFunction, LogisticRegression};
use crate::error::{Error, Result};
use crate::matrix::{Matrix, MatrixProduct, Sequential, Value};

/// `sigmoid(x * theta)`, one column of class scores per class. For raw
/// regression output use [`CostFunction::hypothesis`] on the model.
pub fn predict(x: &Matrix, theta: &Matrix) -> Result<Matrix> {
    LogisticRegression.hypothesis(&Sequential, x, theta)
}

/// Turns a column of class indices into a `(m, k)` one-hot matrix.
///
/// Every label must be an integer in `[0, k)`; anything else is rejected
/// rather than encoded as an all-zero row.
pub fn hot_encode(labels: &Matrix, k: usize) -> Result<Matrix> {
    if k == 0 {
        return Err(Error::InvalidConfig(
            "hot encoding needs at least one class".to_string(),
        ));
    }
    if labels.cols() != 1 {
        return Err(Error::ShapeMismatch {
            op: "hot_encode",
            detail: format!("labels must be a single column, got {}", labels.cols()),
        });
    }
    let mut encoded = Matrix::new(labels.rows(), k);
    for (i, &label) in labels.values().enumerate() {
        if !(label >= 0.0 && label < k as Value && label.fract() == 0.0) {
            return Err(Error::IndexOutOfRange(format!(
                "label {} at row {} is not a class in 0..{}",
                label, i, k
            )));
        }
        encoded[(i, label as usize)] = 1.0;
    }
    Ok(encoded)
}

/// For each row, the column index of its largest value as a `(m, 1)` matrix.
///
/// Ties go to the first column holding the maximum. `NaN` never wins.
pub fn hot_decode(matrix: &Matrix) -> Result<Matrix> {
    if matrix.cols() == 0 && matrix.rows() > 0 {
        return Err(Error::IndexOutOfRange(
            "cannot decode rows with no columns".to_string(),
        ));
    }
    let decoded = matrix
        .iter_rows()
        .map(|row| {
            let mut best = 0;
            for (j, &x) in row.iter().enumerate().skip(1) {
                if !x.is_nan() && (row[best].is_nan() || x > row[best]) {
                    best = j;
                }
            }
            best as Value
        })
        .collect();
    Matrix::from_vec(matrix.rows(), 1, decoded)
}

/// Class index per row: a single column is read as a binary score
/// thresholded at 0.5, wider matrices are hot-decoded.
pub fn class_indices(matrix: &Matrix) -> Result<Matrix> {
    if matrix.cols() == 1 {
        return Ok(matrix.map(|p| if p >= 0.5 { 1.0 } else { 0.0 }));
    }
    hot_decode(matrix)
}

/// Fraction of rows predicted correctly by logistic regression, plus the
/// indices of the rows it got wrong.
pub fn accuracy(x: &Matrix, theta: &Matrix, y: &Matrix) -> Result<(Value, Vec<usize>)> {
    accuracy_with(&LogisticRegression, &Sequential, x, theta, y)
}

pub fn accuracy_with(
    model: &dyn CostFunction,
    product: &dyn MatrixProduct,
    x: &Matrix,
    theta: &Matrix,
    y: &Matrix,
) -> Result<(Value, Vec<usize>)> {
    if x.rows() == 0 {
        return Err(Error::EmptyInput(
            "accuracy of zero samples is undefined".to_string(),
        ));
    }
    let predictions = model.hypothesis(product, x, theta)?;
    if predictions.dims() != y.dims() {
        return Err(Error::shape("accuracy", predictions.dims(), y.dims()));
    }
    let predicted = class_indices(&predictions)?;
    let labels = class_indices(y)?;
    let missed: Vec<usize> = predicted
        .values()
        .zip(labels.values())
        .positions(|(p, l)| p != l)
        .collect();
    let m = x.rows();
    Ok(((m - missed.len()) as Value / m as Value, missed))
}
