use std::f32::consts::FRAC_PI_2;

use eframe::egui::epaint::TextShape;
use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Rect, ScrollArea, Sense, Stroke, Ui};

use rusty_heatmap::ColorRange;

use crate::state::AppState;
use crate::ui::to_color32;

const LEGEND_STEPS: usize = 64;
const LEGEND_HEIGHT: f32 = 14.0;
const LABEL_PADDING: f32 = 6.0;

// ---------------------------------------------------------------------------
// Heatmap grid (central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap cells, row/column labels and the colour legend.
pub fn heatmap_view(ui: &mut Ui, state: &AppState) {
    let (Some(heatmap), Some(grid)) = (&state.heatmap, &state.grid) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view a heatmap  (File → Open…)");
        });
        return;
    };
    if grid.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No visible rows or columns  (☰ Heatmap → Visible rows / columns)");
        });
        return;
    }

    let cfg = &state.config;
    let font = FontId::proportional(cfg.label_font_size);
    let text_color = ui.visuals().text_color();
    let cell = vec2(cfg.cell_width, cfg.cell_height);

    let row_names = heatmap.visible_row_names();
    let col_names = heatmap.visible_column_names();
    let widest = |names: &[String]| -> f32 {
        ui.fonts(|f| {
            names
                .iter()
                .map(|n| f.layout_no_wrap(n.clone(), font.clone(), text_color).size().x)
                .fold(0.0, f32::max)
        })
    };
    let label_width = widest(row_names.as_slice()) + LABEL_PADDING * 2.0;
    let header_height = widest(col_names.as_slice()) + LABEL_PADDING * 2.0;

    let grid_size = vec2(cell.x * grid.ncols() as f32, cell.y * grid.nrows() as f32);
    let legend_block = LEGEND_HEIGHT + cfg.label_font_size + LABEL_PADDING * 3.0;
    let total = vec2(
        label_width + grid_size.x.max(200.0),
        header_height + grid_size.y + legend_block,
    );

    let range = heatmap.color_range().ok();

    ScrollArea::both()
        .id_salt("heatmap_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let (response, painter) = ui.allocate_painter(total, Sense::hover());
            let origin = response.rect.min;
            let grid_origin = origin + vec2(label_width, header_height);

            // --- Column labels, rotated to read bottom-up ---
            for (j, name) in col_names.iter().enumerate() {
                let galley = painter.layout_no_wrap(name.clone(), font.clone(), text_color);
                let x = grid_origin.x + j as f32 * cell.x + (cell.x - galley.size().y) / 2.0;
                let pos = pos2(x, grid_origin.y - LABEL_PADDING);
                painter.add(TextShape::new(pos, galley, text_color).with_angle(-FRAC_PI_2));
            }

            // --- Row labels ---
            for (i, name) in row_names.iter().enumerate() {
                painter.text(
                    pos2(
                        grid_origin.x - LABEL_PADDING,
                        grid_origin.y + (i as f32 + 0.5) * cell.y,
                    ),
                    Align2::RIGHT_CENTER,
                    name,
                    font.clone(),
                    text_color,
                );
            }

            // --- Cells ---
            for (i, row) in grid.rows().enumerate() {
                for (j, &c) in row.iter().enumerate() {
                    let rect = Rect::from_min_size(
                        grid_origin + vec2(j as f32 * cell.x, i as f32 * cell.y),
                        cell,
                    );
                    painter.rect_filled(rect, 0.0, to_color32(c));
                }
            }

            // --- Hover ---
            let mut tooltip: Option<String> = None;
            if let Some(pointer) = response.hover_pos() {
                let rel = pointer - grid_origin;
                if rel.x >= 0.0 && rel.y >= 0.0 {
                    let (i, j) = ((rel.y / cell.y) as usize, (rel.x / cell.x) as usize);
                    if i < grid.nrows() && j < grid.ncols() {
                        let rect = Rect::from_min_size(
                            grid_origin + vec2(j as f32 * cell.x, i as f32 * cell.y),
                            cell,
                        );
                        painter.rect_stroke(
                            rect,
                            0.0,
                            Stroke::new(1.5, Color32::WHITE),
                            egui::StrokeKind::Outside,
                        );
                        let value = heatmap.visible_matrix().ok().and_then(|m| m.get(i, j));
                        tooltip = Some(format!(
                            "Row: {}\nColumn: {}\nValue: {}",
                            row_names[i],
                            col_names[j],
                            value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
                        ));
                    }
                }
            }

            // --- Legend ---
            if let Some(range) = &range {
                let top = grid_origin.y + grid_size.y + LABEL_PADDING * 2.0;
                let width = grid_size.x.clamp(120.0, 320.0);
                legend(&painter, range, pos2(grid_origin.x, top), width, &font, text_color);
            }

            if let Some(text) = tooltip {
                response.on_hover_text_at_pointer(text);
            }
        });
}

fn legend(
    painter: &egui::Painter,
    range: &ColorRange,
    min: egui::Pos2,
    width: f32,
    font: &FontId,
    text_color: Color32,
) {
    let step_w = width / LEGEND_STEPS as f32;
    for k in 0..LEGEND_STEPS {
        let t = k as f64 / (LEGEND_STEPS - 1) as f64;
        let value = range.low() + t * (range.high() - range.low());
        let rect = Rect::from_min_size(
            min + vec2(k as f32 * step_w, 0.0),
            vec2(step_w.ceil(), LEGEND_HEIGHT),
        );
        painter.rect_filled(rect, 0.0, to_color32(range.color_for(value)));
    }

    let label_y = min.y + LEGEND_HEIGHT + LABEL_PADDING / 2.0;
    painter.text(
        pos2(min.x, label_y),
        Align2::LEFT_TOP,
        format!("{:.3}", range.low()),
        font.clone(),
        text_color,
    );
    painter.text(
        pos2(min.x + width, label_y),
        Align2::RIGHT_TOP,
        format!("{:.3}", range.high()),
        font.clone(),
        text_color,
    );
    if range.mid_color().is_some() {
        painter.text(
            pos2(min.x + width / 2.0, label_y),
            Align2::CENTER_TOP,
            format!("{:.3}", range.midpoint()),
            font.clone(),
            text_color,
        );
    }
}
