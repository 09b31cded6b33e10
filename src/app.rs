use eframe::egui;
use rusty_heatmap::config::ViewerConfig;

use crate::state::AppState;
use crate::ui::{heatmap_view, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HeatmapApp {
    pub state: AppState,
}

impl HeatmapApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for HeatmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and colour pickers ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: heatmap ----
        egui::CentralPanel::default().show(ctx, |ui| {
            heatmap_view::heatmap_view(ui, &self.state);
        });

        // ---- Floating dialog ----
        panels::dialog_window(ctx, &mut self.state);
    }
}
