mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::RustyOutlierApp;
use eframe::egui;
use rusty_outlier::Settings;
use rusty_outlier::data::loader::load_file;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env_or(Settings::new("cpu")).unwrap_or_else(|e| {
        log::error!("Ignoring settings file: {e:#}");
        Settings::new("cpu")
    });
    let mut state = AppState::with_settings(settings);

    // Optional table to open on start-up.
    if let Some(path) = std::env::args_os().nth(1) {
        match load_file(Path::new(&path)) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Outlier – MAD Z-Score Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyOutlierApp::new(state)))),
    )
}
