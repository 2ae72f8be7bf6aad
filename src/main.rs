mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::DataSweeperApp;
use data_sweeper::config::SweeperConfig;
use eframe::egui;

fn main() -> eframe::Result {
    // Optional first argument: path to a TOML config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = SweeperConfig::load(config_path.as_deref());
    let log_level = loaded
        .as_ref()
        .map_or("info", |config| config.log_level.as_str())
        .to_string();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Ignoring config: {e:#}");
        SweeperConfig::default()
    });
    log::debug!("Using config {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Sweeper",
        options,
        Box::new(|_cc| Ok(Box::new(DataSweeperApp::new(config)))),
    )
}
