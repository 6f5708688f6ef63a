//! Errors shared by the matrix, optimizer and data helpers.

use std::io;

/// Everything that can go wrong before or during a fit.
///
/// Numeric divergence is not an error: a `NaN` or infinite cost is
/// reported through the cost trace, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: &'static str, detail: String },

    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("could not parse float {value:?} at row {row}, column {col}")]
    Parse {
        row: usize,
        col: usize,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        Error::ShapeMismatch {
            op,
            detail: format!("left is {}x{}, right is {}x{}", left.0, left.1, right.0, right.1),
        }
    }
}

#[test]
fn test_shape_message() {
    let err = Error::shape("plus", (2, 3), (3, 2));
    assert_eq!(
        err.to_string(),
        "shape mismatch in plus: left is 2x3, right is 3x2"
    );
}
