//! Heatmap state: data, visible rows/columns, colour range and gradient
//! colours, plus the per-cell colour grid handed to a renderer.

use rayon::prelude::*;

use crate::color::{Color, ColorPreset, ColorRange};
use crate::data::filter::{hidden_names, resolve_names};
use crate::data::Matrix;
use crate::error::{HeatmapError, Result};
use crate::transform::{transform, TransformSpec};

// ---------------------------------------------------------------------------
// ColorGrid – one colour per visible cell
// ---------------------------------------------------------------------------

/// Row-major grid of cell colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    nrows: usize,
    ncols: usize,
    colors: Vec<Color>,
}

impl ColorGrid {
    /// Map every cell of `matrix` through `range`. Rows are mapped in
    /// parallel; the result is identical to a sequential pass.
    pub fn from_matrix(matrix: &Matrix, range: &ColorRange) -> Self {
        let rows: Vec<Vec<Color>> = (0..matrix.nrows())
            .into_par_iter()
            .map(|r| matrix.row(r).iter().map(|&v| range.color_for(v)).collect())
            .collect();

        Self {
            nrows: matrix.nrows(),
            ncols: matrix.ncols(),
            colors: rows.concat(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.colors.get(row * self.ncols + col).copied()
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks(0) panics, and a zero-column grid has no cells anyway
        self.colors.chunks(self.ncols.max(1))
    }
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// A data matrix together with everything needed to colour it.
#[derive(Debug, Clone)]
pub struct Heatmap {
    data: Matrix,
    /// Indices into `data` rows, in display order.
    visible_rows: Vec<usize>,
    visible_columns: Vec<usize>,
    /// User override of the gradient range; `None` follows the data.
    values_range: Option<(f64, f64)>,
    low_color: Color,
    mid_color: Option<Color>,
    high_color: Color,
}

impl Heatmap {
    /// All rows and columns visible, automatic range, green-to-red gradient.
    pub fn new(data: Matrix) -> Self {
        Self {
            visible_rows: (0..data.nrows()).collect(),
            visible_columns: (0..data.ncols()).collect(),
            data,
            values_range: None,
            low_color: ColorPreset::Green.color(),
            mid_color: None,
            high_color: ColorPreset::Red.color(),
        }
    }

    pub fn data(&self) -> &Matrix {
        &self.data
    }

    /// Replace the data. Visibility is kept when the labels are unchanged
    /// and reset to everything otherwise.
    pub fn set_data(&mut self, data: Matrix) {
        let same_labels = data.row_labels() == self.data.row_labels()
            && data.column_labels() == self.data.column_labels();
        if !same_labels {
            self.visible_rows = (0..data.nrows()).collect();
            self.visible_columns = (0..data.ncols()).collect();
        }
        self.data = data;
    }

    /// Transform the full data matrix and keep the result.
    pub fn apply(&mut self, spec: &TransformSpec) -> Result<()> {
        let transformed = transform(&self.data, spec)?;
        self.set_data(transformed);
        Ok(())
    }

    // -- Range and colours --

    /// Set (`Some`) or clear (`None`) the user range override.
    pub fn set_values_range(&mut self, range: Option<(f64, f64)>) -> Result<()> {
        if let Some((low, high)) = range {
            if !(low.is_finite() && high.is_finite()) || low > high {
                return Err(HeatmapError::InvalidRange { low, high });
            }
        }
        self.values_range = range;
        Ok(())
    }

    pub fn has_custom_range(&self) -> bool {
        self.values_range.is_some()
    }

    /// Effective `(low, high)`: the override, else the min/max of the
    /// visible finite values, else `(0, 0)`.
    pub fn values_range(&self) -> Result<(f64, f64)> {
        if let Some(range) = self.values_range {
            return Ok(range);
        }
        Ok(self.visible_matrix()?.value_range().unwrap_or((0.0, 0.0)))
    }

    pub fn low_color(&self) -> Color {
        self.low_color
    }

    pub fn set_low_color(&mut self, color: Color) {
        self.low_color = color;
    }

    pub fn mid_color(&self) -> Option<Color> {
        self.mid_color
    }

    pub fn set_mid_color(&mut self, color: Option<Color>) {
        self.mid_color = color;
    }

    pub fn high_color(&self) -> Color {
        self.high_color
    }

    pub fn set_high_color(&mut self, color: Color) {
        self.high_color = color;
    }

    pub fn color_range(&self) -> Result<ColorRange> {
        let (low, high) = self.values_range()?;
        Ok(ColorRange::new(low, high, self.low_color, self.high_color)?
            .with_mid_color(self.mid_color))
    }

    // -- Visibility --

    pub fn row_names(&self) -> Vec<String> {
        self.data.row_labels()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data.column_labels()
    }

    pub fn visible_row_names(&self) -> Vec<String> {
        self.visible_rows.iter().map(|&r| self.data.row_label(r)).collect()
    }

    pub fn visible_column_names(&self) -> Vec<String> {
        self.visible_columns.iter().map(|&c| self.data.column_label(c)).collect()
    }

    pub fn hidden_row_names(&self) -> Vec<String> {
        hidden_names(&self.row_names(), &self.visible_row_names())
    }

    pub fn hidden_column_names(&self) -> Vec<String> {
        hidden_names(&self.column_names(), &self.visible_column_names())
    }

    /// Show exactly these rows, in this order.
    pub fn set_visible_rows(&mut self, names: &[String]) -> Result<()> {
        self.visible_rows = resolve_names(&self.row_names(), names, "row")?;
        Ok(())
    }

    /// Show exactly these columns, in this order.
    pub fn set_visible_columns(&mut self, names: &[String]) -> Result<()> {
        self.visible_columns = resolve_names(&self.column_names(), names, "column")?;
        Ok(())
    }

    /// The part of the data currently displayed.
    pub fn visible_matrix(&self) -> Result<Matrix> {
        self.data.select(&self.visible_rows, &self.visible_columns)
    }

    /// Colours of the visible cells.
    pub fn color_grid(&self) -> Result<ColorGrid> {
        let visible = self.visible_matrix()?;
        let range = self.color_range()?;
        Ok(ColorGrid::from_matrix(&visible, &range))
    }
}
