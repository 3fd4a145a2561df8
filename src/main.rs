mod app;
mod chart;
mod color;
mod config;
mod data;
mod gallery;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

const DEFAULT_CONFIG: &str = "dashboard.ron";

/// Water / built-up / vegetation cover dashboard for tracked water bodies.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RON configuration file (defaults to ./dashboard.ron if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data fetch timeout in seconds
    #[arg(long)]
    fetch_timeout: Option<u64>,
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            DashboardConfig::load(Path::new(DEFAULT_CONFIG)).context("loading default config")
        }
        None => {
            log::info!("no {DEFAULT_CONFIG} found, using built-in series");
            Ok(DashboardConfig::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(secs) = args.fetch_timeout {
        config.fetch_timeout_secs = secs;
        config.validate()?;
    }

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let client = reqwest::Client::builder()
        .build()
        .context("creating http client")?;

    let mut state = AppState::new(config, client);
    runtime.block_on(state.initialize());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Water Body Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the gallery composites.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(state, runtime)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
