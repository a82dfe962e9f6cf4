use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_client_settings, EstimateController, EstimatePage, HttpPriceClient, LocationLoader,
};
use shared::domain::{LocationSource, ROOM_COUNT_CHOICES};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "home_price_cli", about = "Estimate home prices from the command line")]
struct Cli {
    /// Overrides `client.toml` and `PRICE_SERVER_URL`.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the location names offered by the form.
    Locations,
    /// Fill in the form and request an estimate.
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
struct EstimateArgs {
    #[arg(long)]
    sqft: String,
    #[arg(long)]
    bhk: Option<u32>,
    #[arg(long)]
    bath: Option<u32>,
    #[arg(long)]
    location: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_client_settings().with_server_url(cli.server_url);
    let client = HttpPriceClient::from_settings(&settings)?;
    tracing::debug!(server_url = client.server_url(), "using estimation server");

    let mut page = EstimatePage::new();
    let list = LocationLoader::new().load(&mut page, &client).await;

    match cli.command {
        Command::Locations => {
            if list.source == LocationSource::Fallback {
                eprintln!("server unavailable; showing built-in locations");
            }
            for name in &list.names {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Estimate(args) => {
            fill_page(&mut page, &args)?;
            let mut controller = EstimateController::new();
            let submitted = controller.submit(&mut page, &client).await;
            if let Some(alert) = page.take_alert() {
                eprintln!("{alert}");
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", page.price.text());
            match submitted {
                Ok(outcome) if outcome.is_price() => Ok(ExitCode::SUCCESS),
                _ => Ok(ExitCode::FAILURE),
            }
        }
    }
}

/// Copies the arguments into the form. An unknown location leaves the
/// placeholder selected so the estimate is rejected the same way the form
/// rejects it.
fn fill_page(page: &mut EstimatePage, args: &EstimateArgs) -> Result<()> {
    page.square_footage = args.sqft.clone();

    if let Some(bhk) = args.bhk {
        if !page.bhk.check(bhk) {
            bail!("--bhk must be one of {ROOM_COUNT_CHOICES:?}");
        }
    }
    if let Some(bath) = args.bath {
        if !page.bath.check(bath) {
            bail!("--bath must be one of {ROOM_COUNT_CHOICES:?}");
        }
    }

    if !page.locations.select(&args.location) {
        tracing::warn!(location = %args.location, "location is not one of the offered options");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::LocationList;

    fn args(location: &str) -> EstimateArgs {
        EstimateArgs {
            sqft: "1200".into(),
            bhk: Some(3),
            bath: None,
            location: location.into(),
        }
    }

    fn loaded_page() -> EstimatePage {
        let mut page = EstimatePage::new();
        page.locations.replace_options(&LocationList::fallback());
        page
    }

    #[test]
    fn fill_page_copies_arguments() {
        let mut page = loaded_page();
        fill_page(&mut page, &args("Whitefield")).expect("filled");

        let request = EstimateController::build_request(&page).expect("valid");
        assert_eq!(request.total_sqft, 1200.0);
        assert_eq!(request.bhk, 3);
        assert_eq!(request.bath, 2);
        assert_eq!(request.location, "Whitefield");
    }

    #[test]
    fn unknown_location_is_left_unselected() {
        let mut page = loaded_page();
        fill_page(&mut page, &args("Atlantis")).expect("filled");
        assert_eq!(page.locations.value(), "");
    }

    #[test]
    fn out_of_range_room_counts_are_rejected() {
        let mut page = loaded_page();
        let mut bad = args("Whitefield");
        bad.bath = Some(9);
        assert!(fill_page(&mut page, &bad).is_err());
    }

    #[test]
    fn parses_estimate_command() {
        let cli = Cli::try_parse_from([
            "home_price_cli",
            "estimate",
            "--sqft",
            "850",
            "--location",
            "MG Road",
            "--server-url",
            "http://localhost:5000",
        ])
        .expect("parsed");
        assert_eq!(cli.server_url.as_deref(), Some("http://localhost:5000"));
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate command");
        };
        assert_eq!(args.sqft, "850");
        assert_eq!(args.bhk, None);
        assert_eq!(args.location, "MG Road");
    }
}
