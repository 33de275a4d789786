//! Dense distance matrix consumed by the exact solver.

use std::fmt;

/// Why a matrix was rejected at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("distance matrix is empty")]
    Empty,

    #[error("distance matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("distance matrix data has {len} entries, expected {expected}")]
    WrongLength { len: usize, expected: usize },

    #[error("distance[{from}][{to}] = {value} is not a finite non-negative number")]
    InvalidEntry { from: usize, to: usize, value: f64 },
}

/// A validated n×n matrix of travel costs stored in row-major order.
///
/// `get(i, j)` is the cost of travelling from `i` to `j`; the matrix need not
/// be symmetric and the diagonal is never used by a tour.
///
/// ```
/// use tspopt::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 3.0],
///     vec![2.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(1, 2), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::Empty);
        }

        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            data.extend(values);
        }

        Self::from_data(size, data)
    }

    /// Builds a matrix from row-major data of length `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        if size == 0 {
            return Err(MatrixError::Empty);
        }
        if data.len() != size * size {
            return Err(MatrixError::WrongLength {
                len: data.len(),
                expected: size * size,
            });
        }
        if let Some(pos) = data.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(MatrixError::InvalidEntry {
                from: pos / size,
                to: pos % size,
                value: data[pos],
            });
        }

        Ok(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Row-major view of every entry.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            let row: Vec<String> = self.row(i).iter().map(|d| format!("{:.3}", d)).collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}
