use std::path::Path;

use rusty_heatmap::config::ViewerConfig;
use rusty_heatmap::data::loader::load_file;
use rusty_heatmap::export::export_png;
use rusty_heatmap::{Color, ColorChoices, ColorGrid, Heatmap, Matrix, TransformSpec};

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

/// Title and explanatory text shown at the top of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogConfig {
    pub title: &'static str,
    pub description: &'static str,
}

pub const RANGE_DIALOG: DialogConfig = DialogConfig {
    title: "Set range",
    description: "Select the minimum and maximum values used to create the color gradient.",
};

pub const TRANSFORM_DIALOG: DialogConfig = DialogConfig {
    title: "Transform data",
    description: "Select the transformation and centering applied to the heatmap data. \
                  Transformations are applied on top of the current data.",
};

pub const VISIBLE_ROWS_DIALOG: DialogConfig = DialogConfig {
    title: "Visible rows",
    description: "Configure the visible rows by moving them from one list to the other.",
};

pub const VISIBLE_COLUMNS_DIALOG: DialogConfig = DialogConfig {
    title: "Visible columns",
    description: "Configure the visible columns by moving them from one list to the other.",
};

pub const FONT_DIALOG: DialogConfig = DialogConfig {
    title: "Configure font",
    description: "Select the size of the font used for the heatmap labels and legend.",
};

pub const COLORS_DIALOG: DialogConfig = DialogConfig {
    title: "Edit colors",
    description: "Edit the colors offered by the Low, Mid and High selectors. \
                  At least two distinct colors are required.",
};

/// Two lists of names; items move between them and keep their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSelection {
    pub selected: Vec<String>,
    pub unselected: Vec<String>,
}

impl ListSelection {
    pub fn new(selected: Vec<String>, unselected: Vec<String>) -> Self {
        Self {
            selected,
            unselected,
        }
    }

    pub fn select(&mut self, name: &str) {
        if let Some(i) = self.unselected.iter().position(|n| n == name) {
            let item = self.unselected.remove(i);
            self.selected.push(item);
        }
    }

    pub fn unselect(&mut self, name: &str) {
        if let Some(i) = self.selected.iter().position(|n| n == name) {
            let item = self.selected.remove(i);
            self.unselected.push(item);
        }
    }

    pub fn select_all(&mut self) {
        self.selected.append(&mut self.unselected);
    }

    pub fn unselect_all(&mut self) {
        self.unselected.append(&mut self.selected);
    }

    /// Move the selected item at `index` one place up.
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.selected.len() {
            self.selected.swap(index - 1, index);
        }
    }

    /// Move the selected item at `index` one place down.
    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.selected.len() {
            self.selected.swap(index, index + 1);
        }
    }
}

/// The dialog currently open, with its working values.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Range { low: f64, high: f64, automatic: bool },
    Transform { spec: TransformSpec },
    VisibleRows(ListSelection),
    VisibleColumns(ListSelection),
    Font { size: f32 },
    Colors { colors: Vec<Color> },
}

impl Dialog {
    pub fn config(&self) -> DialogConfig {
        match self {
            Dialog::Range { .. } => RANGE_DIALOG,
            Dialog::Transform { .. } => TRANSFORM_DIALOG,
            Dialog::VisibleRows(_) => VISIBLE_ROWS_DIALOG,
            Dialog::VisibleColumns(_) => VISIBLE_COLUMNS_DIALOG,
            Dialog::Font { .. } => FONT_DIALOG,
            Dialog::Colors { .. } => COLORS_DIALOG,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded heatmap (None until user loads a file).
    pub heatmap: Option<Heatmap>,

    /// Name of the loaded file, shown in the top bar.
    pub source_name: Option<String>,

    /// Colours of the visible cells (cached).
    pub grid: Option<ColorGrid>,

    /// Colour list and the current Low / Mid / High picks.
    pub colors: ColorChoices,

    /// Open dialog, if any.
    pub dialog: Option<Dialog>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let colors = config.color_choices().unwrap_or_else(|e| {
            log::warn!("Invalid color list in config, using defaults: {e:#}");
            ColorChoices::default()
        });
        Self {
            colors,
            config,
            heatmap: None,
            source_name: None,
            grid: None,
            dialog: None,
            status_message: None,
        }
    }

    /// Show a freshly loaded matrix.
    pub fn set_matrix(&mut self, matrix: Matrix, source_name: Option<String>) {
        self.heatmap = Some(Heatmap::new(matrix));
        self.push_colors();
        self.source_name = source_name;
        self.dialog = None;
        self.status_message = None;
        self.refresh();
    }

    pub fn open_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(matrix) => {
                log::info!(
                    "Loaded {}x{} matrix from {}",
                    matrix.nrows(),
                    matrix.ncols(),
                    path.display()
                );
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                self.set_matrix(matrix, name);
            }
            Err(e) => self.report_error("Failed to load file", &e),
        }
    }

    /// Recompute the cached colour grid after any heatmap change.
    pub fn refresh(&mut self) {
        let Some(heatmap) = &self.heatmap else {
            self.grid = None;
            return;
        };
        match heatmap.color_grid() {
            Ok(grid) => self.grid = Some(grid),
            Err(e) => {
                self.grid = None;
                self.report_error("Failed to color heatmap", &anyhow::Error::from(e));
            }
        }
    }

    // -- Colours --

    pub fn set_low_color(&mut self, color: Color) {
        let result = self.colors.select_low(color);
        self.after_color_change("Low color", result);
    }

    pub fn set_mid_color(&mut self, color: Option<Color>) {
        let result = self.colors.select_mid(color);
        self.after_color_change("Mid color", result);
    }

    pub fn set_high_color(&mut self, color: Color) {
        let result = self.colors.select_high(color);
        self.after_color_change("High color", result);
    }

    fn after_color_change(&mut self, what: &str, result: rusty_heatmap::Result<()>) {
        match result {
            Ok(()) => {
                self.push_colors();
                self.refresh();
            }
            Err(e) => self.report_error(what, &anyhow::Error::from(e)),
        }
    }

    /// Copy the current picks into the heatmap.
    fn push_colors(&mut self) {
        if let Some(h) = &mut self.heatmap {
            h.set_low_color(self.colors.low());
            h.set_mid_color(self.colors.mid());
            h.set_high_color(self.colors.high());
        }
    }

    // -- Dialog openers --

    pub fn open_range_dialog(&mut self) {
        let Some(h) = &self.heatmap else { return };
        let (low, high) = h.values_range().unwrap_or((0.0, 0.0));
        self.dialog = Some(Dialog::Range {
            low,
            high,
            automatic: !h.has_custom_range(),
        });
    }

    pub fn open_transform_dialog(&mut self) {
        if self.heatmap.is_none() {
            return;
        }
        let mut spec = TransformSpec::identity();
        spec.clip_rule = self.config.clip_rule;
        self.dialog = Some(Dialog::Transform { spec });
    }

    pub fn open_visible_rows_dialog(&mut self) {
        let Some(h) = &self.heatmap else { return };
        let selection = ListSelection::new(h.visible_row_names(), h.hidden_row_names());
        self.dialog = Some(Dialog::VisibleRows(selection));
    }

    pub fn open_visible_columns_dialog(&mut self) {
        let Some(h) = &self.heatmap else { return };
        let selection = ListSelection::new(h.visible_column_names(), h.hidden_column_names());
        self.dialog = Some(Dialog::VisibleColumns(selection));
    }

    pub fn open_font_dialog(&mut self) {
        self.dialog = Some(Dialog::Font {
            size: self.config.label_font_size,
        });
    }

    pub fn open_colors_dialog(&mut self) {
        self.dialog = Some(Dialog::Colors {
            colors: self.colors.colors().to_vec(),
        });
    }

    /// Apply the open dialog's values and close it. Errors keep the dialog
    /// open so the user can correct them.
    pub fn accept_dialog(&mut self) {
        let Some(dialog) = self.dialog.clone() else {
            return;
        };

        let result: anyhow::Result<()> = match &dialog {
            Dialog::Font { size } => self.config.set_label_font_size(*size),
            Dialog::Colors { colors } => match self.colors.set_colors(colors.clone()) {
                Ok(changed) => {
                    if changed {
                        log::info!("Color picks changed by the color list edit");
                    }
                    self.push_colors();
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
            data_dialog => {
                let Some(heatmap) = self.heatmap.as_mut() else {
                    self.dialog = None;
                    return;
                };
                apply_to_heatmap(heatmap, data_dialog).map_err(anyhow::Error::from)
            }
        };

        match result {
            Ok(()) => {
                log::info!("{} applied", dialog.config().title);
                self.dialog = None;
                self.status_message = None;
                self.refresh();
            }
            Err(e) => self.report_error(dialog.config().title, &e),
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    // -- Export --

    pub fn export_image(&mut self, path: &Path) {
        let Some(grid) = &self.grid else { return };
        if let Err(e) = export_png(grid, self.config.export_cell_size, path) {
            self.report_error("Failed to export image", &anyhow::Error::from(e));
        } else {
            self.status_message = None;
        }
    }

    fn report_error(&mut self, what: &str, e: &anyhow::Error) {
        log::error!("{what}: {e:#}");
        self.status_message = Some(format!("{what}: {e:#}"));
    }
}

fn apply_to_heatmap(heatmap: &mut Heatmap, dialog: &Dialog) -> rusty_heatmap::Result<()> {
    match dialog {
        Dialog::Range {
            low,
            high,
            automatic,
        } => heatmap.set_values_range((!automatic).then_some((*low, *high))),
        Dialog::Transform { spec } => heatmap.apply(spec),
        Dialog::VisibleRows(sel) => heatmap.set_visible_rows(&sel.selected),
        Dialog::VisibleColumns(sel) => heatmap.set_visible_columns(&sel.selected),
        Dialog::Font { .. } | Dialog::Colors { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_heatmap::{Centering, ColorPreset, Transform};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(ViewerConfig::default());
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap()
            .with_labels(Some(names(&["r1", "r2"])), Some(names(&["c1", "c2"])))
            .unwrap();
        state.set_matrix(m, Some("test.csv".into()));
        state
    }

    #[test]
    fn test_list_selection_moves() {
        let mut sel = ListSelection::new(names(&["a", "b"]), names(&["c"]));
        sel.select("c");
        sel.unselect("a");
        assert_eq!(sel.selected, names(&["b", "c"]));
        assert_eq!(sel.unselected, names(&["a"]));
        sel.move_up(1);
        assert_eq!(sel.selected, names(&["c", "b"]));
        sel.move_down(1);
        assert_eq!(sel.selected, names(&["c", "b"]));
        sel.unselect_all();
        assert!(sel.selected.is_empty());
        sel.select_all();
        assert_eq!(sel.selected.len(), 3);
    }

    #[test]
    fn test_load_builds_grid() {
        let state = loaded();
        let grid = state.grid.as_ref().unwrap();
        assert_eq!(grid.get(0, 0), Some(ColorPreset::Green.color()));
        assert_eq!(grid.get(1, 1), Some(ColorPreset::Red.color()));
    }

    #[test]
    fn test_range_dialog_error_keeps_dialog_open() {
        let mut state = loaded();
        state.open_range_dialog();
        assert_eq!(
            state.dialog,
            Some(Dialog::Range { low: 1.0, high: 4.0, automatic: true })
        );
        state.dialog = Some(Dialog::Range { low: 5.0, high: 1.0, automatic: false });
        state.accept_dialog();
        assert!(state.dialog.is_some());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_transform_dialog_applies() {
        let mut state = loaded();
        state.open_transform_dialog();
        state.dialog = Some(Dialog::Transform {
            spec: TransformSpec::new(Transform::Identity, Centering::Mean),
        });
        state.accept_dialog();
        assert!(state.dialog.is_none());
        let data = state.heatmap.as_ref().unwrap().data().clone();
        assert_eq!(data.get(0, 0), Some(-0.5));
    }

    #[test]
    fn test_visible_columns_dialog() {
        let mut state = loaded();
        state.open_visible_columns_dialog();
        if let Some(Dialog::VisibleColumns(sel)) = &mut state.dialog {
            sel.unselect("c1");
        }
        state.accept_dialog();
        assert_eq!(state.grid.as_ref().unwrap().ncols(), 1);
    }

    #[test]
    fn test_color_pickers() {
        let mut state = loaded();
        state.set_high_color(ColorPreset::Blue.color());
        assert_eq!(state.grid.as_ref().unwrap().get(1, 1), Some(Color::rgb(0, 0, 255)));

        state.set_mid_color(Some(ColorPreset::Red.color()));
        let range = state.heatmap.as_ref().unwrap().color_range().unwrap();
        assert_eq!(range.mid_color(), Some(ColorPreset::Red.color()));

        state.set_low_color(Color::rgb(1, 2, 3));
        assert!(state.status_message.is_some());
        assert_eq!(state.colors.low(), ColorPreset::Green.color());
    }

    #[test]
    fn test_edit_colors_keeps_surviving_picks() {
        let mut state = loaded();
        let yellow = Color::rgb(255, 255, 0);
        state.open_colors_dialog();
        state.dialog = Some(Dialog::Colors {
            colors: vec![ColorPreset::Green.color(), yellow],
        });
        state.accept_dialog();
        assert!(state.dialog.is_none());
        assert_eq!(state.colors.low(), ColorPreset::Green.color());
        // red was removed, high falls back to the first colour
        assert_eq!(state.colors.high(), ColorPreset::Green.color());
        assert_eq!(state.heatmap.as_ref().unwrap().high_color(), ColorPreset::Green.color());

        state.dialog = Some(Dialog::Colors { colors: vec![yellow] });
        state.accept_dialog();
        assert!(state.dialog.is_some());
        assert_eq!(state.colors.colors().len(), 2);
    }

    #[test]
    fn test_font_dialog() {
        let mut state = AppState::new(ViewerConfig::default());
        state.open_font_dialog();
        assert_eq!(state.dialog, Some(Dialog::Font { size: 11.0 }));
        state.dialog = Some(Dialog::Font { size: 18.0 });
        state.accept_dialog();
        assert!(state.dialog.is_none());
        assert_eq!(state.config.label_font_size, 18.0);

        state.dialog = Some(Dialog::Font { size: 500.0 });
        state.accept_dialog();
        assert!(state.dialog.is_some());
        assert_eq!(state.config.label_font_size, 18.0);
    }
}
