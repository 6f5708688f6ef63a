use crate::error::{Error, Result};
use crate::matrix::Matrix;

fn check_range(axis: &str, from: usize, to: usize, len: usize) -> Result<()> {
    if from > to || to > len {
        return Err(Error::IndexOutOfRange(format!(
            "{axis} range {from}..{to} exceeds {len} {axis}s"
        )));
    }
    Ok(())
}

impl Matrix {
    /// Copies rows `[from, to)` into a new matrix.
    pub fn slice_rows(&self, from: usize, to: usize) -> Result<Matrix> {
        check_range("row", from, to, self.rows)?;
        Ok(Matrix {
            rows: to - from,
            cols: self.cols,
            data: self.data[from * self.cols..to * self.cols].to_vec(),
        })
    }

    /// Copies columns `[from, to)` into a new matrix.
    pub fn slice_cols(&self, from: usize, to: usize) -> Result<Matrix> {
        check_range("column", from, to, self.cols)?;
        let data = self
            .iter_rows()
            .flat_map(|row| row[from..to].iter().copied())
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: to - from,
            data,
        })
    }

    pub fn col(&self, j: usize) -> Result<Matrix> {
        if j >= self.cols {
            return Err(Error::IndexOutOfRange(format!(
                "column {} of a matrix with {} columns",
                j, self.cols
            )));
        }
        self.slice_cols(j, j + 1)
    }

    /// Keeps the rows whose index satisfies `predicate`, in their original order.
    pub fn filter_rows<P>(&self, mut predicate: P) -> Matrix
    where
        P: FnMut(usize) -> bool,
    {
        let mut rows = 0;
        let mut data = Vec::new();
        for (i, row) in self.iter_rows().enumerate() {
            if predicate(i) {
                data.extend_from_slice(row);
                rows += 1;
            }
        }
        Matrix {
            rows,
            cols: self.cols,
            data,
        }
    }

    /// Places `right`'s columns after `left`'s.
    pub fn concatenate_cols(left: &Matrix, right: &Matrix) -> Result<Matrix> {
        if left.rows != right.rows {
            return Err(Error::shape("concatenate_cols", left.dims(), right.dims()));
        }
        let data = left
            .iter_rows()
            .zip(right.iter_rows())
            .flat_map(|(l, r)| l.iter().chain(r.iter()).copied())
            .collect();
        Ok(Matrix {
            rows: left.rows,
            cols: left.cols + right.cols,
            data,
        })
    }

    /// Places `bottom`'s rows after `top`'s.
    pub fn concatenate_rows(top: &Matrix, bottom: &Matrix) -> Result<Matrix> {
        if top.cols != bottom.cols {
            return Err(Error::shape("concatenate_rows", top.dims(), bottom.dims()));
        }
        let mut data = Vec::with_capacity(top.data.len() + bottom.data.len());
        data.extend_from_slice(&top.data);
        data.extend_from_slice(&bottom.data);
        Ok(Matrix {
            rows: top.rows + bottom.rows,
            cols: top.cols,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Matrix {
        Matrix::from([[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]])
    }

    #[test]
    fn test_slice_rows() {
        let m = grid();
        assert_eq!(
            m.slice_rows(1, 3).unwrap(),
            Matrix::from([[3.0, 4.0, 5.0], [6.0, 7.0, 8.0]])
        );
        assert_eq!(m.slice_rows(2, 2).unwrap().dims(), (0, 3));
        assert!(matches!(m.slice_rows(1, 4), Err(Error::IndexOutOfRange(_))));
        assert!(m.slice_rows(2, 1).is_err());
    }

    #[test]
    fn test_slice_cols() {
        let m = grid();
        assert_eq!(
            m.slice_cols(0, 2).unwrap(),
            Matrix::from([[0.0, 1.0], [3.0, 4.0], [6.0, 7.0]])
        );
        assert!(matches!(m.slice_cols(0, 4), Err(Error::IndexOutOfRange(_))));
        assert_eq!(m.col(2).unwrap(), Matrix::from([[2.0], [5.0], [8.0]]));
        assert!(m.col(3).is_err());
    }

    #[test]
    fn test_slices_are_copies() {
        let m = grid();
        let mut slice = m.slice_rows(0, 1).unwrap();
        slice.set(0, 0, 100.0).unwrap();
        assert_eq!(m.at(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_filter_rows() {
        let m = grid();
        let odd = m.filter_rows(|i| i % 2 == 1);
        assert_eq!(odd, Matrix::from([[3.0, 4.0, 5.0]]));
        let none = m.filter_rows(|_| false);
        assert_eq!(none.dims(), (0, 3));
        let labels = Matrix::from([[1.0], [0.0], [1.0]]);
        let positives = m.filter_rows(|i| labels[(i, 0)] == 1.0);
        assert_eq!(positives, Matrix::from([[0.0, 1.0, 2.0], [6.0, 7.0, 8.0]]));
    }

    #[test]
    fn test_concatenate_cols() {
        let ones = Matrix::new_with_filler(3, 1, 1.0);
        let joined = Matrix::concatenate_cols(&ones, &grid()).unwrap();
        assert_eq!(joined.dims(), (3, 4));
        assert_eq!(joined.row(1).unwrap(), &[1.0, 3.0, 4.0, 5.0]);
        let err = Matrix::concatenate_cols(&Matrix::new(2, 1), &grid()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_concatenate_rows() {
        let joined = Matrix::concatenate_rows(&grid(), &Matrix::new(1, 3)).unwrap();
        assert_eq!(joined.dims(), (4, 3));
        assert_eq!(joined.row(3).unwrap(), &[0.0, 0.0, 0.0]);
        assert!(Matrix::concatenate_rows(&grid(), &Matrix::new(1, 2)).is_err());
    }
}
