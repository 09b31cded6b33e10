//! Heatmap data transformations and colour gradients.
//!
//! A raw [`Matrix`] goes through [`transform`] (log / z-score, row
//! centering, clipping) and each resulting value is coloured with a
//! [`ColorRange`]. [`Heatmap`] bundles both steps with row/column
//! visibility and produces a [`ColorGrid`] for a renderer.
//!
//! ```
//! use rusty_heatmap::prelude::*;
//!
//! let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
//! let centered = transform(&m, &TransformSpec::new(Transform::Identity, Centering::Mean))?;
//! let range = ColorRange::new(-1.0, 1.0, Color::BLACK, Color::WHITE)?;
//! assert_eq!(color_for(centered.get(0, 2).unwrap(), &range), Color::WHITE);
//! # Ok::<(), rusty_heatmap::error::HeatmapError>(())
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod stats;
pub mod transform;

pub use color::{color_for, Color, ColorChoices, ColorPreset, ColorRange};
pub use data::Matrix;
pub use error::{HeatmapError, Result};
pub use heatmap::{ColorGrid, Heatmap};
pub use transform::{transform, Centering, ClipRule, Transform, TransformSpec};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::{color_for, Color, ColorChoices, ColorPreset, ColorRange};
    pub use crate::config::ViewerConfig;
    pub use crate::data::loader::load_file;
    pub use crate::data::Matrix;
    pub use crate::error::{HeatmapError, Result};
    pub use crate::export::export_png;
    pub use crate::heatmap::{ColorGrid, Heatmap};
    pub use crate::transform::{transform, Centering, ClipRule, Transform, TransformSpec};
}
