mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::ShowUpApp;
use eframe::egui;
use state::AppState;

/// The source table, read from the working directory at startup.
/// `generate_sample` produces one.
const DEFAULT_DATASET: &str = "appointments.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The dashboard never starts on partial data: a startup load failure
    // is fatal.
    let dataset = data::loader::load_file(Path::new(DEFAULT_DATASET))
        .with_context(|| format!("loading {DEFAULT_DATASET}"))?;
    log::info!(
        "Loaded {} appointments across {} neighborhoods",
        dataset.len(),
        dataset.neighborhoods.len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ShowUp – Appointment Attendance",
        options,
        Box::new(move |_cc| Ok(Box::new(ShowUpApp::new(AppState::with_dataset(dataset))))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
