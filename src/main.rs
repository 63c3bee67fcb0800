mod app;
mod binding;
mod color;
mod config;
mod data;
mod figure;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use app::LaunchDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // A dashboard without its dataset has nothing to show.
    let dataset = data::loader::load_file(Path::new(config.data_path))
        .context("the launch dataset is required at startup")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    let title = config.window_title;
    let state = AppState::new(config, dataset);

    eframe::run_native(
        title,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
