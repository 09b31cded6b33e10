use std::collections::HashSet;
use std::fmt;

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{HeatmapError, Result};

// ---------------------------------------------------------------------------
// Matrix – rectangular numeric grid with optional labels
// ---------------------------------------------------------------------------

/// A rectangular numeric matrix (rows × columns) with optional row and
/// column labels.
///
/// Matrices are immutable once built: every operation in this crate returns
/// a new `Matrix` rather than modifying one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    values: Array2<f64>,
    row_names: Option<Vec<String>>,
    column_names: Option<Vec<String>>,
}

impl Matrix {
    /// Build a matrix from an array and optional labels.
    ///
    /// Label sequences, when present, must match the array dimensions and
    /// must not repeat a name.
    /// Non-finite values are accepted here; [`crate::transform::transform`]
    /// rejects them.
    pub fn new(
        values: Array2<f64>,
        row_names: Option<Vec<String>>,
        column_names: Option<Vec<String>>,
    ) -> Result<Self> {
        let (n_rows, n_cols) = values.dim();
        check_labels(row_names.as_deref(), n_rows, "row")?;
        check_labels(column_names.as_deref(), n_cols, "column")?;

        Ok(Self {
            values,
            row_names,
            column_names,
        })
    }

    /// Build an unlabelled matrix from row vectors. Every row must have the
    /// same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(HeatmapError::invalid_input(format!(
                "row {i} has {} columns, expected {n_cols}",
                row.len()
            )));
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| HeatmapError::invalid_input(e.to_string()))?;
        Self::new(values, None, None)
    }

    /// Attach labels, consuming `self`.
    pub fn with_labels(
        self,
        row_names: Option<Vec<String>>,
        column_names: Option<Vec<String>>,
    ) -> Result<Self> {
        Self::new(self.values, row_names, column_names)
    }

    /// Same labels, new values of identical shape.
    pub(crate) fn with_values(&self, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.dim(), self.values.dim());
        Self {
            values,
            row_names: self.row_names.clone(),
            column_names: self.column_names.clone(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// `true` when the matrix has zero rows or zero columns.
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Panics if `row` is out of bounds, like ndarray indexing.
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// Panics if `col` is out of bounds, like ndarray indexing.
    pub fn column(&self, col: usize) -> ArrayView1<'_, f64> {
        self.values.column(col)
    }

    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }

    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    /// Display label of a row: its name, or its 1-based index when unlabelled.
    pub fn row_label(&self, row: usize) -> String {
        label_at(self.row_names.as_deref(), row)
    }

    /// Display label of a column: its name, or its 1-based index when unlabelled.
    pub fn column_label(&self, col: usize) -> String {
        label_at(self.column_names.as_deref(), col)
    }

    /// Display labels of all rows.
    pub fn row_labels(&self) -> Vec<String> {
        (0..self.nrows()).map(|i| self.row_label(i)).collect()
    }

    /// Display labels of all columns.
    pub fn column_labels(&self) -> Vec<String> {
        (0..self.ncols()).map(|j| self.column_label(j)).collect()
    }

    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.row_names.as_ref()?.iter().position(|n| n == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.as_ref()?.iter().position(|n| n == name)
    }

    /// Sub-matrix made of the given rows and columns, in the given order.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        if let Some(&r) = rows.iter().find(|&&r| r >= self.nrows()) {
            return Err(HeatmapError::invalid_input(format!(
                "row index {r} out of bounds for {} rows",
                self.nrows()
            )));
        }
        if let Some(&c) = cols.iter().find(|&&c| c >= self.ncols()) {
            return Err(HeatmapError::invalid_input(format!(
                "column index {c} out of bounds for {} columns",
                self.ncols()
            )));
        }

        let values = if rows.is_empty() || cols.is_empty() {
            Array2::zeros((rows.len(), cols.len()))
        } else {
            self.values.select(Axis(0), rows).select(Axis(1), cols)
        };
        let row_names = self
            .row_names
            .as_ref()
            .map(|names| rows.iter().map(|&r| names[r].clone()).collect());
        let column_names = self
            .column_names
            .as_ref()
            .map(|names| cols.iter().map(|&c| names[c].clone()).collect());

        Ok(Self {
            values,
            row_names,
            column_names,
        })
    }

    /// Sub-matrix made of the named rows and columns, in the given order.
    /// Both label sequences must be present.
    pub fn select_by_name(&self, rows: &[String], cols: &[String]) -> Result<Self> {
        let row_names = self
            .row_names
            .as_deref()
            .ok_or_else(|| HeatmapError::invalid_input("matrix has no row labels"))?;
        let column_names = self
            .column_names
            .as_deref()
            .ok_or_else(|| HeatmapError::invalid_input("matrix has no column labels"))?;

        let row_idx = super::filter::resolve_names(row_names, rows, "row")?;
        let col_idx = super::filter::resolve_names(column_names, cols, "column")?;
        self.select(&row_idx, &col_idx)
    }

    /// Minimum and maximum of the finite values, or `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Position and value of the first NaN or infinite cell in row-major order.
    pub fn first_non_finite(&self) -> Option<(usize, usize, f64)> {
        self.values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|((r, c), &v)| (r, c, v))
    }
}

fn label_at(names: Option<&[String]>, index: usize) -> String {
    names
        .and_then(|n| n.get(index).cloned())
        .unwrap_or_else(|| (index + 1).to_string())
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.values.outer_iter().enumerate() {
            write!(f, "{}", self.row_label(i))?;
            for v in row.iter() {
                write!(f, "\t{v:.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Length and uniqueness check for one label axis.
fn check_labels(names: Option<&[String]>, expected: usize, what: &str) -> Result<()> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != expected {
        return Err(HeatmapError::invalid_input(format!(
            "expected {expected} {what} labels, got {}",
            names.len()
        )));
    }
    let mut seen = HashSet::with_capacity(names.len());
    if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
        return Err(HeatmapError::invalid_input(format!("duplicate {what} label '{dup}'")));
    }
    Ok(())
}
