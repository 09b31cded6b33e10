mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::HeatmapApp;
use eframe::egui;
use rusty_heatmap::config::ViewerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::from_env().unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to default settings");
        ViewerConfig::default()
    });
    // Optional data file to open on start-up.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Heatmap",
        options,
        Box::new(move |_cc| {
            let mut app = HeatmapApp::new(config);
            if let Some(path) = initial_file {
                app.state.open_path(&path);
            }
            Ok(Box::new(app))
        }),
    )
}
