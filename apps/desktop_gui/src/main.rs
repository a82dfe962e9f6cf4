mod app;
mod backend_bridge;
mod controller;

use anyhow::Context;
use clap::Parser;
use client_core::{load_client_settings, HttpPriceClient};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use app::EstimatorApp;
use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;

const APP_TITLE: &str = "Home Price Estimator";

#[derive(Parser, Debug)]
#[command(name = "home_price_gui", about = "Desktop form for home price estimates")]
struct GuiArgs {
    /// Overrides `client.toml` and `PRICE_SERVER_URL`.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = GuiArgs::parse();
    let settings = load_client_settings().with_server_url(args.server_url);
    let client = HttpPriceClient::from_settings(&settings)
        .context("invalid estimation server address")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(client, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([520.0, 420.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(EstimatorApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run {APP_TITLE}: {err}"))
}
