use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_heatmap::color::MIN_CHOICES;
use rusty_heatmap::config::FONT_SIZE_RANGE;
use rusty_heatmap::{Centering, ClipRule, Color, Transform, TransformSpec};

use crate::state::{AppState, Dialog, ListSelection};
use crate::ui::{from_color32, to_color32};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        let has_data = state.heatmap.is_some();
        let has_grid = state.grid.is_some();
        ui.menu_button("☰ Heatmap", |ui: &mut Ui| {
            ui.add_enabled_ui(has_data, |ui: &mut Ui| {
                if ui.button("Set range").clicked() {
                    state.open_range_dialog();
                    ui.close_menu();
                }
                if ui.button("Transform data").clicked() {
                    state.open_transform_dialog();
                    ui.close_menu();
                }
                if ui.button("Visible rows").clicked() {
                    state.open_visible_rows_dialog();
                    ui.close_menu();
                }
                if ui.button("Visible columns").clicked() {
                    state.open_visible_columns_dialog();
                    ui.close_menu();
                }
            });
            if ui.button("Configure font").clicked() {
                state.open_font_dialog();
                ui.close_menu();
            }
            if ui.button("Edit colors").clicked() {
                state.open_colors_dialog();
                ui.close_menu();
            }
            if ui
                .add_enabled(has_grid, egui::Button::new("Export heatmap as image"))
                .clicked()
            {
                save_image_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(h) = &state.heatmap {
            let name = state.source_name.as_deref().unwrap_or("untitled");
            ui.label(format!(
                "{name}: {} × {}, {} × {} visible",
                h.data().nrows(),
                h.data().ncols(),
                h.visible_row_names().len(),
                h.visible_column_names().len()
            ));
            ui.separator();
        }

        let choices = state.colors.colors().to_vec();

        ui.label("Low:");
        if let Some(c) = color_combo(ui, "low_color", state.colors.low(), &choices) {
            state.set_low_color(c);
        }

        ui.label("Mid:");
        if let Some(c) = mid_color_combo(ui, state.colors.mid(), &choices) {
            state.set_mid_color(c);
        }

        ui.label("High:");
        if let Some(c) = color_combo(ui, "high_color", state.colors.high(), &choices) {
            state.set_high_color(c);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn swatch(color: Color) -> RichText {
    RichText::new(format!("■ {color}")).color(to_color32(color))
}

/// Returns the newly picked colour, if the user changed it.
fn color_combo(ui: &mut Ui, id: &str, current: Color, choices: &[Color]) -> Option<Color> {
    let mut value = current;
    egui::ComboBox::from_id_salt(id)
        .width(110.0)
        .selected_text(swatch(current))
        .show_ui(ui, |ui: &mut Ui| {
            for &c in choices {
                ui.selectable_value(&mut value, c, swatch(c));
            }
        });
    (value != current).then_some(value)
}

fn mid_color_combo(
    ui: &mut Ui,
    current: Option<Color>,
    choices: &[Color],
) -> Option<Option<Color>> {
    let mut value = current;
    egui::ComboBox::from_id_salt("mid_color")
        .width(110.0)
        .selected_text(current.map_or_else(|| RichText::new("None"), swatch))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut value, None, "None");
            for &c in choices {
                ui.selectable_value(&mut value, Some(c), swatch(c));
            }
        });
    (value != current).then_some(value)
}

// ---------------------------------------------------------------------------
// Dialog window
// ---------------------------------------------------------------------------

/// Render the open dialog, if any, and apply or discard it on OK / Cancel.
pub fn dialog_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(dialog) = state.dialog.as_mut() else {
        return;
    };
    let config = dialog.config();

    let mut open = true;
    let mut accepted: Option<bool> = None;

    egui::Window::new(config.title)
        .collapsible(false)
        .resizable(true)
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.label(config.description);
            ui.separator();

            match dialog {
                Dialog::Range {
                    low,
                    high,
                    automatic,
                } => range_controls(ui, low, high, automatic),
                Dialog::Transform { spec } => transform_controls(ui, spec),
                Dialog::VisibleRows(sel) | Dialog::VisibleColumns(sel) => {
                    list_selection(ui, sel)
                }
                Dialog::Font { size } => font_controls(ui, size),
                Dialog::Colors { colors } => colors_controls(ui, colors),
            }

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    accepted = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    accepted = Some(false);
                }
            });
        });

    if !open {
        accepted = Some(false);
    }
    match accepted {
        Some(true) => state.accept_dialog(),
        Some(false) => state.cancel_dialog(),
        None => {}
    }
}

fn range_controls(ui: &mut Ui, low: &mut f64, high: &mut f64, automatic: &mut bool) {
    ui.checkbox(automatic, "Follow data minimum / maximum");
    ui.add_enabled_ui(!*automatic, |ui: &mut Ui| {
        egui::Grid::new("range_grid").num_columns(2).show(ui, |ui: &mut Ui| {
            ui.label("Minimum");
            ui.add(egui::DragValue::new(&mut *low).speed(0.1));
            ui.end_row();
            ui.label("Maximum");
            ui.add(egui::DragValue::new(&mut *high).speed(0.1));
            ui.end_row();
        });
    });
    if !*automatic && *low > *high {
        ui.colored_label(Color32::RED, "Minimum must not exceed maximum");
    }
}

fn transform_controls(ui: &mut Ui, spec: &mut TransformSpec) {
    egui::Grid::new("transform_grid").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Transform");
        egui::ComboBox::from_id_salt("transform")
            .selected_text(spec.transform.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for t in Transform::ALL {
                    ui.selectable_value(&mut spec.transform, t, t.to_string());
                }
            });
        ui.end_row();

        ui.label("Centering");
        ui.vertical(|ui: &mut Ui| {
            for c in Centering::ALL {
                ui.radio_value(&mut spec.centering, c, c.to_string());
            }
        });
        ui.end_row();
    });

    ui.checkbox(&mut spec.clip, "Clip extreme values");
    ui.add_enabled_ui(spec.clip, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            let (mut k, mut iqr) = match spec.clip_rule {
                ClipRule::StdDevs(k) => (k, false),
                ClipRule::Iqr(k) => (k, true),
            };
            ui.label("Bound: ±");
            ui.add(egui::DragValue::new(&mut k).speed(0.1).range(0.1..=100.0));
            ui.radio_value(&mut iqr, false, "× std. deviation");
            ui.radio_value(&mut iqr, true, "× IQR");
            spec.clip_rule = if iqr { ClipRule::Iqr(k) } else { ClipRule::StdDevs(k) };
        });
    });
}

fn font_controls(ui: &mut Ui, size: &mut f32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Size");
        ui.add(
            egui::DragValue::new(&mut *size)
                .speed(0.5)
                .range(FONT_SIZE_RANGE)
                .suffix(" pt"),
        );
    });
    ui.label(RichText::new("GENE001  sample_1  0.123").size(*size));
}

fn colors_controls(ui: &mut Ui, colors: &mut Vec<Color>) {
    let can_remove = colors.len() > MIN_CHOICES;
    let mut remove: Option<usize> = None;

    for (i, color) in colors.iter_mut().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let mut edited = to_color32(*color);
            if ui.color_edit_button_srgba(&mut edited).changed() {
                *color = from_color32(edited);
            }
            ui.monospace(color.to_string());
            if ui.add_enabled(can_remove, egui::Button::new("Remove")).clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        colors.remove(i);
    }
    if ui.button("Add color").clicked() {
        colors.push(Color::rgb(128, 128, 128));
    }

    if colors.iter().enumerate().any(|(i, c)| colors[..i].contains(c)) {
        ui.colored_label(Color32::YELLOW, "Repeated colors are merged");
    }
}

fn list_selection(ui: &mut Ui, sel: &mut ListSelection) {
    let mut to_select: Option<String> = None;
    let mut to_unselect: Option<String> = None;
    let mut up: Option<usize> = None;
    let mut down: Option<usize> = None;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong(format!("Visible ({})", sel.selected.len()));
        ScrollArea::vertical()
            .id_salt("visible_list")
            .max_height(300.0)
            .show(&mut cols[0], |ui: &mut Ui| {
                for (i, name) in sel.selected.iter().enumerate() {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("⬆").clicked() {
                            up = Some(i);
                        }
                        if ui.small_button("⬇").clicked() {
                            down = Some(i);
                        }
                        if ui.button(name.as_str()).on_hover_text("Hide").clicked() {
                            to_unselect = Some(name.clone());
                        }
                    });
                }
            });

        cols[1].strong(format!("Hidden ({})", sel.unselected.len()));
        ScrollArea::vertical()
            .id_salt("hidden_list")
            .max_height(300.0)
            .show(&mut cols[1], |ui: &mut Ui| {
                for name in &sel.unselected {
                    if ui.button(name.as_str()).on_hover_text("Show").clicked() {
                        to_select = Some(name.clone());
                    }
                }
            });
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Show all").clicked() {
            sel.select_all();
        }
        if ui.button("Hide all").clicked() {
            sel.unselect_all();
        }
    });

    if let Some(name) = to_select {
        sel.select(&name);
    }
    if let Some(name) = to_unselect {
        sel.unselect(&name);
    }
    if let Some(i) = up {
        sel.move_up(i);
    }
    if let Some(i) = down {
        sel.move_down(i);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open matrix")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "txt"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_image_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export heatmap as image")
        .add_filter("PNG", &["png"])
        .set_file_name("heatmap.png")
        .save_file();

    if let Some(path) = file {
        state.export_image(&path);
    }
}
