//! Loading, shaping and generating training data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::matrix::{Matrix, Value};

/// Prepends a column of ones to `x`.
pub fn add_bias(x: &Matrix) -> Result<Matrix> {
    Matrix::concatenate_cols(&Matrix::new_with_filler(x.rows(), 1, 1.0), x)
}

/// Splits a raw data matrix into `(x, y, theta)`.
///
/// `y` is the last column. `x` is a bias column followed by every other
/// column, and `theta` is a zero column with one entry per column of `x`.
pub fn init_parameters(data: &Matrix) -> Result<(Matrix, Matrix, Matrix)> {
    let (m, n) = data.dims();
    if m == 0 || n == 0 {
        return Err(Error::EmptyInput(format!(
            "cannot split a {}x{} matrix into features and labels",
            m, n
        )));
    }
    let x = add_bias(&data.slice_cols(0, n - 1)?)?;
    let y = data.col(n - 1)?;
    let theta = Matrix::new(n, 1);
    Ok((x, y, theta))
}

/// Per-column shift and scale applied by [`normalize_features`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// `(1, n)`; zero for the bias column.
    pub means: Matrix,
    /// `(1, n)`; one for the bias column and for constant columns.
    pub std_devs: Matrix,
}

impl Normalization {
    /// Applies the same transform to new samples, e.g. a single row to
    /// predict on.
    pub fn apply(&self, x: &Matrix) -> Result<Matrix> {
        if x.cols() != self.means.cols() {
            return Err(Error::shape("normalize", x.dims(), self.means.dims()));
        }
        let means = self.means.as_slice();
        let std_devs = self.std_devs.as_slice();
        Ok(Matrix::from_fn(x.rows(), x.cols(), |i, j| {
            (x[(i, j)] - means[j]) / std_devs[j]
        }))
    }
}

/// Normalises every column of `x` but the first (bias) column in place, to
/// zero mean and unit sample standard deviation.
///
/// Columns with no spread are centred but not scaled.
pub fn normalize_features(x: &mut Matrix) -> Result<Normalization> {
    let (m, n) = x.dims();
    if m == 0 {
        return Err(Error::EmptyInput("cannot normalise zero samples".to_string()));
    }
    let mut means = Matrix::new(1, n);
    let mut std_devs = Matrix::new_with_filler(1, n, 1.0);
    for j in 1..n {
        let column = x.col(j)?;
        let mean = column.sum() / m as Value;
        let spread = column.reduce(0.0, |acc, v| acc + (v - mean) * (v - mean));
        let std_dev = if m > 1 { (spread / (m - 1) as Value).sqrt() } else { 0.0 };
        means[(0, j)] = mean;
        if std_dev > 0.0 {
            std_devs[(0, j)] = std_dev;
        } else {
            debug!(column = j, "constant column, centring only");
        }
    }
    let normalization = Normalization { means, std_devs };
    *x = normalization.apply(x)?;
    Ok(normalization)
}

/// Parses header-less, comma separated rows of floats.
pub fn parse_csv<R: Read>(reader: R) -> Result<Matrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cols = None;
    let mut rows = 0;
    let mut data = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        match cols {
            None => cols = Some(record.len()),
            Some(width) if width != record.len() => {
                return Err(Error::ShapeMismatch {
                    op: "parse_csv",
                    detail: format!(
                        "row {} has {} fields, expected {}",
                        row,
                        record.len(),
                        width
                    ),
                });
            }
            Some(_) => {}
        }
        for (col, field) in record.iter().enumerate() {
            let value = field.parse::<Value>().map_err(|_| Error::Parse {
                row,
                col,
                value: field.to_string(),
            })?;
            data.push(value);
        }
        rows += 1;
    }

    match cols {
        Some(cols) => Matrix::from_vec(rows, cols, data),
        None => Err(Error::EmptyInput("no rows to parse".to_string())),
    }
}

/// Reads a CSV file with [`parse_csv`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let file = File::open(path.as_ref())?;
    let matrix = parse_csv(file)?;
    debug!(path = %path.as_ref().display(), rows = matrix.rows(), cols = matrix.cols(), "read csv");
    Ok(matrix)
}

/// Samples `per_cluster` points around each 2-D center.
///
/// Returns `x` as `(bias, x1, x2)` rows and the labels as a column of class
/// indices, cluster `k` being labelled `k`.
pub fn gaussian_clusters<R: Rng + ?Sized>(
    rng: &mut R,
    centers: &[(Value, Value)],
    per_cluster: usize,
    std_dev: Value,
) -> Result<(Matrix, Matrix)> {
    if !(std_dev >= 0.0 && std_dev.is_finite()) {
        return Err(Error::InvalidConfig(format!(
            "cluster spread must be finite and non-negative, got {std_dev}"
        )));
    }
    let normal = Normal::new(0.0, std_dev)
        .map_err(|e| Error::InvalidConfig(format!("cluster spread {std_dev}: {e}")))?;
    let m = centers.len() * per_cluster;
    let mut x = Vec::with_capacity(m * 3);
    let mut labels = Vec::with_capacity(m);
    for (k, &(cx, cy)) in centers.iter().enumerate() {
        for _ in 0..per_cluster {
            x.extend([1.0, cx + normal.sample(rng), cy + normal.sample(rng)]);
            labels.push(k as Value);
        }
    }
    Ok((Matrix::from_vec(m, 3, x)?, Matrix::from_vec(m, 1, labels)?))
}
