use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorChoices, ColorPreset};
use crate::transform::ClipRule;

/// Environment variable naming an optional JSON file of [`ViewerConfig`].
pub const CONFIG_ENV_VAR: &str = "RUSTY_HEATMAP_CONFIG";

/// Label font sizes accepted by the viewer, in points.
pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 6.0..=48.0;

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Settings handed to the viewer at construction. Missing JSON fields fall
/// back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// On-screen cell size in points.
    pub cell_width: f32,
    pub cell_height: f32,
    pub label_font_size: f32,
    /// Pixel size of one cell in exported PNGs.
    pub export_cell_size: u32,
    /// Rule used when the transform dialog enables clipping.
    pub clip_rule: ClipRule,
    /// Colours offered by the Low / Mid / High pickers.
    pub colors: Vec<Color>,
    pub low_color: ColorPreset,
    pub high_color: ColorPreset,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_size: [1200.0, 800.0],
            cell_width: 24.0,
            cell_height: 18.0,
            label_font_size: 11.0,
            export_cell_size: 20,
            clip_rule: ClipRule::default(),
            colors: ColorPreset::ALL.iter().map(|p| p.color()).collect(),
            low_color: ColorPreset::Green,
            high_color: ColorPreset::Red,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Colour list with the configured low and high picks.
    pub fn color_choices(&self) -> Result<ColorChoices> {
        Ok(ColorChoices::new(
            self.colors.clone(),
            self.low_color.color(),
            self.high_color.color(),
        )?)
    }

    pub fn set_label_font_size(&mut self, size: f32) -> Result<()> {
        if !FONT_SIZE_RANGE.contains(&size) {
            bail!(
                "font size {size} outside {}..={}",
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            );
        }
        self.label_font_size = size;
        Ok(())
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or use the defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: ViewerConfig =
            serde_json::from_str(r#"{"cell_width": 40.0, "low_color": "Blue"}"#).unwrap();
        assert_eq!(cfg.cell_width, 40.0);
        assert_eq!(cfg.low_color, ColorPreset::Blue);
        assert_eq!(cfg.high_color, ColorPreset::Red);
        assert_eq!(cfg.clip_rule, ClipRule::StdDevs(3.0));
    }

    #[test]
    fn test_clip_rule_json() {
        let cfg: ViewerConfig = serde_json::from_str(r#"{"clip_rule": {"Iqr": 1.5}}"#).unwrap();
        assert_eq!(cfg.clip_rule, ClipRule::Iqr(1.5));
    }

    #[test]
    fn test_font_size_bounds() {
        let mut cfg = ViewerConfig::default();
        cfg.set_label_font_size(16.0).unwrap();
        assert_eq!(cfg.label_font_size, 16.0);
        assert!(cfg.set_label_font_size(2.0).is_err());
        assert!(cfg.set_label_font_size(f32::NAN).is_err());
        assert_eq!(cfg.label_font_size, 16.0);
    }

    #[test]
    fn test_color_choices_from_config() {
        let cfg: ViewerConfig = serde_json::from_str(
            r#"{"colors": [{"r": 0, "g": 0, "b": 0, "a": 255}], "low_color": "Blue"}"#,
        )
        .unwrap();
        let choices = cfg.color_choices().unwrap();
        assert_eq!(choices.low(), ColorPreset::Blue.color());
        assert_eq!(choices.colors().len(), 3);
        assert_eq!(choices.colors()[0], Color::BLACK);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/heatmap.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
