use rusty_heatmap::prelude::*;

fn labelled(rows: Vec<Vec<f64>>) -> Matrix {
    let n_rows = rows.len();
    let n_cols = rows[0].len();
    Matrix::from_rows(rows)
        .unwrap()
        .with_labels(
            Some((0..n_rows).map(|i| format!("gene{i}")).collect()),
            Some((0..n_cols).map(|j| format!("sample{j}")).collect()),
        )
        .unwrap()
}

fn all_specs() -> Vec<TransformSpec> {
    let mut specs = Vec::new();
    for t in Transform::ALL {
        for c in Centering::ALL {
            specs.push(TransformSpec::new(t, c));
            specs.push(TransformSpec::new(t, c).with_clip(ClipRule::StdDevs(2.0)));
            specs.push(TransformSpec::new(t, c).with_clip(ClipRule::Iqr(1.5)));
        }
    }
    specs
}

#[test]
fn identity_twice_is_unchanged() {
    let m = labelled(vec![vec![0.5, -3.0, 12.0], vec![7.25, 0.0, -1e6]]);
    let once = transform(&m, &TransformSpec::identity()).unwrap();
    let twice = transform(&once, &TransformSpec::identity()).unwrap();
    assert_eq!(twice, m);
}

#[test]
fn every_spec_preserves_shape_and_labels() {
    let m = labelled(vec![
        vec![1.0, 2.0, 30.0, 4.0],
        vec![5.0, 6.0, 7.0, 800.0],
        vec![9.0, 10.0, 11.0, 12.0],
    ]);
    for spec in all_specs() {
        let out = transform(&m, &spec).unwrap();
        assert_eq!((out.nrows(), out.ncols()), (3, 4), "{spec:?}");
        assert_eq!(out.row_names(), m.row_names(), "{spec:?}");
        assert_eq!(out.column_names(), m.column_names(), "{spec:?}");
        assert!(out.first_non_finite().is_none(), "{spec:?}");
    }
}

#[test]
fn z_score_constant_column_is_zero() {
    let m = labelled(vec![vec![4.0, 1.0], vec![4.0, 2.0], vec![4.0, 9.0]]);
    let out = transform(&m, &TransformSpec::new(Transform::ZScore, Centering::None)).unwrap();
    assert!(out.column(0).iter().all(|&v| v == 0.0));
    let mean: f64 = out.column(1).iter().sum::<f64>() / 3.0;
    assert!(mean.abs() < 1e-12);
}

#[test]
fn z_score_fractional_constant_columns_are_zero() {
    let m = labelled(vec![vec![0.1, 0.7, 2.3], vec![0.1, 0.7, 2.3], vec![0.1, 0.7, 2.3]]);
    let out = transform(&m, &TransformSpec::new(Transform::ZScore, Centering::None)).unwrap();
    assert!(out.values().iter().all(|&v| v == 0.0), "{out}");
}

#[test]
fn extreme_range_keeps_endpoint_colors() {
    let range = ColorRange::new(-f64::MAX, f64::MAX, Color::BLACK, Color::WHITE).unwrap();
    assert_eq!(color_for(f64::MAX, &range), Color::WHITE);
    assert_eq!(color_for(-f64::MAX, &range), Color::BLACK);
}

#[test]
fn gradient_endpoints_and_clamping() {
    let low_color = Color::rgb(10, 200, 30);
    let high_color = Color::rgb(240, 15, 160);
    let range = ColorRange::new(-4.0, 12.5, low_color, high_color).unwrap();

    assert_eq!(color_for(-4.0, &range), low_color);
    assert_eq!(color_for(12.5, &range), high_color);
    assert_eq!(color_for(-104.0, &range), color_for(-4.0, &range));
    assert_eq!(color_for(112.5, &range), color_for(12.5, &range));
}

#[test]
fn degenerate_range_is_flat_high_color() {
    let range = ColorRange::new(5.0, 5.0, Color::BLACK, Color::WHITE).unwrap();
    for x in [0.0, 5.0, 100.0] {
        assert_eq!(color_for(x, &range), Color::WHITE);
    }
}

#[test]
fn mean_centering_example() {
    let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let out = transform(&m, &TransformSpec::new(Transform::Identity, Centering::Mean)).unwrap();
    let expected = Matrix::from_rows(vec![vec![-1.0, 0.0, 1.0], vec![-1.0, 0.0, 1.0]]).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn black_to_white_midpoint() {
    let range = ColorRange::new(0.0, 10.0, Color::BLACK, Color::WHITE).unwrap();
    let c = color_for(5.0, &range);
    for ch in [c.r, c.g, c.b] {
        assert!((127..=129).contains(&ch), "{c}");
    }
}

#[test]
fn log_transform_fails_fast_on_zero() {
    let m = labelled(vec![vec![1.0, 2.0], vec![3.0, 0.0]]);
    match transform(&m, &TransformSpec::new(Transform::Log10, Centering::None)) {
        Err(HeatmapError::InvalidInput { reason }) => {
            assert!(reason.contains("gene1"), "{reason}");
            assert!(reason.contains("sample1"), "{reason}");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn heatmap_grid_matches_sequential_mapping() {
    let rows: Vec<Vec<f64>> = (0..50)
        .map(|i| (0..17).map(|j| ((i * 31 + j * 7) % 23) as f64 - 11.0).collect())
        .collect();
    let mut heatmap = Heatmap::new(labelled(rows));
    heatmap.set_mid_color(Some(Color::BLACK));
    heatmap
        .apply(&TransformSpec::new(Transform::Identity, Centering::Median))
        .unwrap();

    let grid = heatmap.color_grid().unwrap();
    let range = heatmap.color_range().unwrap();
    let data = heatmap.visible_matrix().unwrap();
    for i in 0..data.nrows() {
        for j in 0..data.ncols() {
            assert_eq!(grid.get(i, j), Some(range.color_for(data.get(i, j).unwrap())));
        }
    }
}

#[test]
fn clipped_values_stay_within_bound() {
    let m = labelled(vec![
        vec![0.0, 1.0, 2.0, 3.0, 100.0],
        vec![-80.0, 1.0, 0.5, 2.0, 3.0],
    ]);
    let centering = TransformSpec::new(Transform::Identity, Centering::Mean);
    let out = transform(&m, &centering.with_clip(ClipRule::StdDevs(1.0))).unwrap();

    let centered = transform(&m, &centering).unwrap();
    let all: Vec<f64> = centered.values().iter().copied().collect();
    let bound = ClipRule::StdDevs(1.0).bound(&all);
    assert!(out.values().iter().all(|v| v.abs() <= bound + 1e-12));
    assert!(out.values().iter().any(|v| (v.abs() - bound).abs() < 1e-12));
}

#[test]
fn loaded_csv_flows_through_pipeline() {
    let text = "gene,a,b,c\nG1,1,2,4\nG2,8,16,32\n";
    let m = rusty_heatmap::data::loader::read_delimited(text.as_bytes(), b',').unwrap();
    let out = transform(&m, &TransformSpec::new(Transform::Log2, Centering::Median)).unwrap();
    assert_eq!(out.row(0).to_vec(), vec![-1.0, 0.0, 1.0]);
    assert_eq!(out.row(1).to_vec(), vec![-1.0, 0.0, 1.0]);
}
