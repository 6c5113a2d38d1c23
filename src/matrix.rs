//! Dense 2D storage for features, labels and predictions.
//!
//! A `Matrix` is addressed as `(row, col)` where a row is a feature (or class)
//! dimension and a column is one sample. Storage is column-major, so every
//! sample is a contiguous slice:
//! - `data.len() == rows * cols`
//! - column `c` lives at `data[c * rows..(c + 1) * rows]`

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// A `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a matrix from a flat column-major buffer.
    pub fn from_flat(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidShape(format!(
                "buffer length {} does not match rows * cols ({rows} * {cols})",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from per-sample columns.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(Error::InvalidShape(format!(
                    "column {i} has len {}, expected {rows}",
                    col.len()
                )));
            }
        }

        let mut data = Vec::with_capacity(rows * columns.len());
        for col in columns {
            data.extend_from_slice(col);
        }

        Ok(Self {
            data,
            rows,
            cols: columns.len(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols == 0
    }

    /// Panics if `row >= rows` or `col >= cols`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        self.data[col * self.rows + row]
    }

    /// Panics if `row >= rows` or `col >= cols`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        self.data[col * self.rows + row] = value;
    }

    /// Returns the `col`-th sample (shape: `(rows,)`).
    ///
    /// Panics if `col >= cols`.
    #[inline]
    pub fn column(&self, col: usize) -> &[f64] {
        let start = col * self.rows;
        &self.data[start..start + self.rows]
    }

    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [f64] {
        let start = col * self.rows;
        &mut self.data[start..start + self.rows]
    }

    /// Copies out the `row`-th dimension across all samples (shape: `(cols,)`).
    ///
    /// Rows are strided in column-major storage, so this allocates.
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.cols).map(|c| self.get(row, c)).collect()
    }

    /// Iterate over sample columns in index order.
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.cols).map(move |c| self.column(c))
    }

    /// Copy the given columns, in order, into a new matrix.
    pub fn select_columns(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.rows);
        for &idx in indices {
            data.extend_from_slice(self.column(idx));
        }
        Matrix {
            data,
            rows: self.rows,
            cols: indices.len(),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
