//! Chemical Equipment Parameter Visualizer - Main Entry Point
//!
//! Desktop client for the dataset REST service: upload CSV files, browse the
//! most recent datasets and inspect their statistics.

use anyhow::Context;
use chemvis_rs::{
    backend::{ApiBackend, HttpDatasetApi},
    config::{self, AppConfig},
    frontend::ChemVisApp,
};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up stderr logging plus a daily log file when the data dir is usable.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chemvis_rs=debug"));

    let log_dir = config::log_dir().filter(|dir| std::fs::create_dir_all(dir).is_ok());
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "chemvis.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    tracing::info!("Starting Chemical Equipment Visualizer");

    let config = AppConfig::load_or_default();
    tracing::info!("Dataset API at {}", config.api.base_url);

    let api = HttpDatasetApi::new(&config.api).context("Failed to build HTTP client")?;
    let (backend, frontend) = ApiBackend::new(config.clone(), Arc::new(api));
    let stop_handle = backend.stop_handle();
    let backend_handle = std::thread::Builder::new()
        .name("chemvis-backend".to_string())
        .spawn(move || backend.run())
        .context("Failed to spawn backend thread")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Chemical Equipment Parameter Visualizer"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Chemical Equipment Visualizer",
        native_options,
        Box::new(|cc| Ok(Box::new(ChemVisApp::new(cc, frontend, config)))),
    );

    // Signal backend to stop and wait for it
    tracing::info!("Shutting down...");
    stop_handle.store(false, std::sync::atomic::Ordering::SeqCst);
    if backend_handle.join().is_err() {
        tracing::error!("Backend thread panicked");
    }

    result.map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
