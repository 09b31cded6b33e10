//! PNG export of a colour grid.

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{HeatmapError, Result};
use crate::heatmap::ColorGrid;

/// Rasterise `grid`, drawing each cell as a `cell_size`-pixel square.
pub fn to_image(grid: &ColorGrid, cell_size: u32) -> Result<RgbaImage> {
    if grid.is_empty() {
        return Err(HeatmapError::Export {
            reason: "nothing to export, the heatmap has no visible cells".to_string(),
        });
    }
    if cell_size == 0 {
        return Err(HeatmapError::Export {
            reason: "cell size must be at least one pixel".to_string(),
        });
    }

    let scaled = |n: usize| {
        u32::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(cell_size))
            .ok_or_else(|| HeatmapError::Export {
                reason: format!("{n} cells of {cell_size}px exceed the maximum image size"),
            })
    };
    let width = scaled(grid.ncols())?;
    let height = scaled(grid.nrows())?;

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let row = (y / cell_size) as usize;
        let col = (x / cell_size) as usize;
        match grid.get(row, col) {
            Some(c) => Rgba([c.r, c.g, c.b, c.a]),
            None => Rgba([0, 0, 0, 0]),
        }
    }))
}

/// Write `grid` to `path` as a PNG image.
pub fn export_png(grid: &ColorGrid, cell_size: u32, path: &Path) -> Result<()> {
    let img = to_image(grid, cell_size)?;
    img.save_with_format(path, ImageFormat::Png)?;
    log::info!(
        "Exported {}x{} heatmap image to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
