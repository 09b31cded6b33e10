//! Matrix transformations applied before colour mapping
//!
//! A [`TransformSpec`] runs in three steps: an element-wise (or per-column,
//! for z-scores) [`Transform`], per-row [`Centering`], and optional
//! symmetric clipping controlled by a [`ClipRule`].

use std::fmt;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::Matrix;
use crate::error::{HeatmapError, Result};
use crate::stats;

// ---------------------------------------------------------------------------
// Spec types
// ---------------------------------------------------------------------------

/// Numeric function applied to the matrix values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transform {
    #[default]
    Identity,
    Log2,
    Log10,
    /// log2(x + 1)
    Log2PlusOne,
    /// log10(x + 1)
    Log10PlusOne,
    /// Per-column (v - mean) / population std.
    ZScore,
}

impl Transform {
    pub const ALL: [Transform; 6] = [
        Transform::Identity,
        Transform::Log2,
        Transform::Log10,
        Transform::Log2PlusOne,
        Transform::Log10PlusOne,
        Transform::ZScore,
    ];

    /// Scalar form of the element-wise transforms, `None` outside the domain.
    /// Not meaningful for `ZScore`, which needs the whole column.
    fn apply_scalar(self, v: f64) -> Option<f64> {
        match self {
            Transform::Identity | Transform::ZScore => Some(v),
            Transform::Log2 => (v > 0.0).then(|| v.log2()),
            Transform::Log10 => (v > 0.0).then(|| v.log10()),
            Transform::Log2PlusOne => (v > -1.0).then(|| (v + 1.0).log2()),
            Transform::Log10PlusOne => (v > -1.0).then(|| (v + 1.0).log10()),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transform::Identity => "identity",
            Transform::Log2 => "log2",
            Transform::Log10 => "log10",
            Transform::Log2PlusOne => "log2(x+1)",
            Transform::Log10PlusOne => "log10(x+1)",
            Transform::ZScore => "z-score",
        };
        f.write_str(name)
    }
}

/// Per-row reference statistic subtracted after the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Centering {
    #[default]
    None,
    Mean,
    Median,
}

impl Centering {
    pub const ALL: [Centering; 3] = [Centering::None, Centering::Mean, Centering::Median];
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Centering::None => "none",
            Centering::Mean => "center on mean",
            Centering::Median => "center on median",
        };
        f.write_str(name)
    }
}

/// How the symmetric clip bound is derived from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipRule {
    /// `k` population standard deviations of all cells.
    StdDevs(f64),
    /// `k` interquartile ranges of all cells.
    Iqr(f64),
}

impl Default for ClipRule {
    fn default() -> Self {
        ClipRule::StdDevs(3.0)
    }
}

impl ClipRule {
    /// Clip bound for the given values. Zero or negative disables clipping.
    pub fn bound(&self, values: &[f64]) -> f64 {
        match *self {
            ClipRule::StdDevs(k) => k * stats::population_std(values),
            ClipRule::Iqr(k) => k * stats::iqr(values),
        }
    }
}

/// Full description of a matrix transformation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformSpec {
    pub transform: Transform,
    pub centering: Centering,
    pub clip: bool,
    #[serde(default)]
    pub clip_rule: ClipRule,
}

impl TransformSpec {
    /// Identity transform, no centering, no clipping.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(transform: Transform, centering: Centering) -> Self {
        Self {
            transform,
            centering,
            ..Self::default()
        }
    }

    /// Enable clipping with the given rule.
    pub fn with_clip(mut self, rule: ClipRule) -> Self {
        self.clip = true;
        self.clip_rule = rule;
        self
    }
}

// ---------------------------------------------------------------------------
// transform
// ---------------------------------------------------------------------------

/// Apply `spec` to `matrix`, returning a new matrix with the same shape and
/// labels.
///
/// Fails on an empty matrix, on any NaN or infinite cell, and on values
/// outside a logarithm's domain (`<= 0` for log2/log10, `<= -1` for the
/// `+1` variants). No partial result is produced.
pub fn transform(matrix: &Matrix, spec: &TransformSpec) -> Result<Matrix> {
    if matrix.is_empty() {
        return Err(HeatmapError::invalid_input(format!(
            "matrix is empty ({} rows, {} columns)",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if let Some((r, c, v)) = matrix.first_non_finite() {
        return Err(HeatmapError::invalid_input(format!(
            "non-finite value {v} at row '{}', column '{}'",
            matrix.row_label(r),
            matrix.column_label(c)
        )));
    }

    let mut values = match spec.transform {
        Transform::ZScore => z_score_columns(matrix.values()),
        t => apply_elementwise(matrix, t)?,
    };

    center_rows(&mut values, spec.centering);

    if spec.clip {
        clip_symmetric(&mut values, spec.clip_rule);
    }

    log::debug!(
        "Applied {} / {} (clip: {}) to {}x{} matrix",
        spec.transform,
        spec.centering,
        spec.clip,
        matrix.nrows(),
        matrix.ncols()
    );

    Ok(matrix.with_values(values))
}

fn apply_elementwise(matrix: &Matrix, t: Transform) -> Result<Array2<f64>> {
    let source = matrix.values();
    let mut out = Array2::zeros(source.dim());

    for ((r, c), &v) in source.indexed_iter() {
        out[[r, c]] = t.apply_scalar(v).ok_or_else(|| {
            HeatmapError::invalid_input(format!(
                "{t} is undefined for {v} at row '{}', column '{}'",
                matrix.row_label(r),
                matrix.column_label(c)
            ))
        })?;
    }
    Ok(out)
}

fn z_score_columns(source: &Array2<f64>) -> Array2<f64> {
    let mut out = source.clone();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let values = column.to_vec();
        // Constant columns map to zero, whatever rounding does to sigma.
        if values.iter().all(|&v| v == values[0]) {
            column.fill(0.0);
            continue;
        }
        let mu = stats::mean(&values);
        let sigma = stats::population_std(&values);
        column.mapv_inplace(|v| (v - mu) / sigma);
    }
    out
}

fn center_rows(values: &mut Array2<f64>, centering: Centering) {
    if centering == Centering::None {
        return;
    }
    for mut row in values.rows_mut() {
        let row_values = row.to_vec();
        let reference = match centering {
            Centering::Mean => stats::mean(&row_values),
            Centering::Median => stats::median(&row_values),
            Centering::None => 0.0,
        };
        row.mapv_inplace(|v| v - reference);
    }
}

fn clip_symmetric(values: &mut Array2<f64>, rule: ClipRule) {
    let all: Vec<f64> = values.iter().copied().collect();
    let bound = rule.bound(&all);
    if !(bound.is_finite() && bound > 0.0) {
        return;
    }
    values.mapv_inplace(|v| v.clamp(-bound, bound));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_centering() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let spec = TransformSpec::new(Transform::Identity, Centering::Mean);
        let out = transform(&m, &spec).unwrap();
        assert_eq!(out.values(), &array![[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_median_centering() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 10.0]]).unwrap();
        let spec = TransformSpec::new(Transform::Identity, Centering::Median);
        let out = transform(&m, &spec).unwrap();
        assert_eq!(out.values(), &array![[-1.0, 0.0, 8.0]]);
    }

    #[test]
    fn test_log_transforms() {
        let m = Matrix::from_rows(vec![vec![1.0, 8.0, 100.0]]).unwrap();
        let log2 = transform(&m, &TransformSpec::new(Transform::Log2, Centering::None)).unwrap();
        assert!(close(log2.get(0, 1).unwrap(), 3.0));
        let log10 = transform(&m, &TransformSpec::new(Transform::Log10, Centering::None)).unwrap();
        assert!(close(log10.get(0, 2).unwrap(), 2.0));

        let p = Matrix::from_rows(vec![vec![0.0, 3.0, 9.0]]).unwrap();
        let log2p =
            transform(&p, &TransformSpec::new(Transform::Log2PlusOne, Centering::None)).unwrap();
        assert!(close(log2p.get(0, 0).unwrap(), 0.0));
        assert!(close(log2p.get(0, 1).unwrap(), 2.0));
        let log10p =
            transform(&p, &TransformSpec::new(Transform::Log10PlusOne, Centering::None)).unwrap();
        assert!(close(log10p.get(0, 2).unwrap(), 1.0));
    }

    #[test]
    fn test_log_of_non_positive_fails() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![0.0, 4.0]])
            .unwrap()
            .with_labels(
                Some(vec!["g1".into(), "g2".into()]),
                Some(vec!["s1".into(), "s2".into()]),
            )
            .unwrap();
        let err = transform(&m, &TransformSpec::new(Transform::Log2, Centering::None)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 'g2'"), "{msg}");
        assert!(msg.contains("column 's1'"), "{msg}");

        let minus_one = Matrix::from_rows(vec![vec![-1.0]]).unwrap();
        let spec = TransformSpec::new(Transform::Log10PlusOne, Centering::None);
        assert!(transform(&minus_one, &spec).is_err());
    }

    #[test]
    fn test_z_score() {
        let m = Matrix::from_rows(vec![vec![1.0, 7.0], vec![3.0, 7.0]]).unwrap();
        let out = transform(&m, &TransformSpec::new(Transform::ZScore, Centering::None)).unwrap();
        assert!(close(out.get(0, 0).unwrap(), -1.0));
        assert!(close(out.get(1, 0).unwrap(), 1.0));
        // zero variance column
        assert_eq!(out.get(0, 1), Some(0.0));
        assert_eq!(out.get(1, 1), Some(0.0));
    }

    #[test]
    fn test_z_score_fractional_constant_columns() {
        let m = Matrix::from_rows(vec![
            vec![0.1, 0.7, 2.3, 1.0],
            vec![0.1, 0.7, 2.3, 2.0],
            vec![0.1, 0.7, 2.3, 9.0],
        ])
        .unwrap();
        let out = transform(&m, &TransformSpec::new(Transform::ZScore, Centering::None)).unwrap();
        for c in 0..3 {
            assert!(out.column(c).iter().all(|&v| v == 0.0), "column {c}: {:?}", out.column(c));
        }
        assert!(close(out.column(3).sum(), 0.0));
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        let empty = Matrix::from_rows(vec![vec![], vec![]]).unwrap();
        assert!(matches!(
            transform(&empty, &TransformSpec::identity()),
            Err(HeatmapError::InvalidInput { .. })
        ));

        let nan = Matrix::from_rows(vec![vec![1.0, f64::NAN]]).unwrap();
        let err = transform(&nan, &TransformSpec::identity()).unwrap_err();
        assert!(err.to_string().contains("column '2'"));
    }

    #[test]
    fn test_clip_std_devs() {
        let m = Matrix::from_rows(vec![vec![0.0, 0.0, 0.0, 10.0]]).unwrap();
        let spec = TransformSpec::identity().with_clip(ClipRule::StdDevs(1.0));
        let out = transform(&m, &spec).unwrap();
        // population std of [0, 0, 0, 10] is sqrt(18.75)
        let bound = 18.75_f64.sqrt();
        assert!(close(out.get(0, 3).unwrap(), bound));
        assert_eq!(out.get(0, 0), Some(0.0));
    }

    #[test]
    fn test_clip_iqr_and_disabled() {
        let m = Matrix::from_rows(vec![vec![-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 50.0]]).unwrap();
        let out = transform(&m, &TransformSpec::identity().with_clip(ClipRule::Iqr(1.0))).unwrap();
        // Q1 = 1.5, Q3 = 4.5
        assert_eq!(out.get(0, 0), Some(-3.0));
        assert_eq!(out.get(0, 6), Some(3.0));
        assert_eq!(out.get(0, 2), Some(2.0));

        let flat = Matrix::from_rows(vec![vec![4.0, 4.0]]).unwrap();
        let spec = TransformSpec::identity().with_clip(ClipRule::default());
        let out = transform(&flat, &spec).unwrap();
        assert_eq!(out, flat);
    }

    #[test]
    fn test_input_untouched_and_labels_kept() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0]])
            .unwrap()
            .with_labels(Some(vec!["r".into()]), Some(vec!["a".into(), "b".into()]))
            .unwrap();
        let before = m.clone();
        let out = transform(&m, &TransformSpec::new(Transform::Log2, Centering::Mean)).unwrap();
        assert_eq!(m, before);
        assert_eq!(out.row_names(), m.row_names());
        assert_eq!(out.column_names(), m.column_names());
    }

    #[test]
    fn test_spec_serde() {
        let spec = TransformSpec::new(Transform::Log2PlusOne, Centering::Median)
            .with_clip(ClipRule::Iqr(1.5));
        let json = serde_json::to_string(&spec).unwrap();
        let back: TransformSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
