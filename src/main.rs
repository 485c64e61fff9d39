mod app;
mod color;
mod config;
mod data;
mod error;
mod format;
mod state;
mod ui;

use std::sync::Arc;

use app::SalaryDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Loading salary survey from {}", config.source);

    // One load per session; the dataset is immutable from here on.
    let app = match data::loader::load(&config.source) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} records ({} years, {} seniorities, {} contracts, {} company sizes)",
                dataset.len(),
                dataset.options.years.len(),
                dataset.options.seniorities.len(),
                dataset.options.contracts.len(),
                dataset.options.sizes.len(),
            );
            SalaryDashApp::Ready(Box::new(AppState::new(Arc::new(dataset))))
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.source);
            SalaryDashApp::Failed {
                source: config.source.to_string(),
                message: e.to_string(),
            }
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Careers Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
