use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skycast_core::{Config, ForecastSampling, OpenWeatherClient, RecentCities, Units};
use tracing::{error, info};

use crate::format;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Look up current conditions and the 5-day forecast for a city.
    Show {
        /// City name to search for.
        city: String,

        /// Display units: "metric" (Celsius) or "imperial" (Fahrenheit).
        #[arg(long)]
        units: Option<Units>,

        /// First forecast entry to keep (index into the 3-hour series).
        #[arg(long)]
        offset: Option<usize>,

        /// Keep every Nth forecast entry after the offset.
        #[arg(long)]
        stride: Option<usize>,
    },

    /// Pick one of the recently searched cities and search it again.
    Recent,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                units,
                offset,
                stride,
            } => run_search(&city, units, offset, stride).await,
            Command::Recent => pick_recent().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// Runs the search flow; the failure of any stage is logged and ends only
/// this lookup.
async fn run_search(
    city: &str,
    units: Option<Units>,
    offset: Option<usize>,
    stride: Option<usize>,
) -> Result<()> {
    let outcome = search(city, units, offset, stride).await;
    if let Err(err) = &outcome {
        error!(city, error = %err, "search failed");
    }
    outcome
}

async fn search(
    city: &str,
    units: Option<Units>,
    offset: Option<usize>,
    stride: Option<usize>,
) -> Result<()> {
    let config = Config::load()?;
    let api_key = config.require_api_key()?;
    let units = units.unwrap_or(config.units);

    let mut client = OpenWeatherClient::new(api_key);
    if offset.is_some() || stride.is_some() {
        let defaults = ForecastSampling::default();
        client.set_forecast_sampling(
            offset.unwrap_or(defaults.offset),
            stride.unwrap_or(defaults.stride),
        );
    }

    let locations = client.fetch_coordinates(city).await?;
    let location = locations.first().context("Geocoding returned no matches")?;
    info!(city, lat = location.lat, lon = location.lon, "resolved coordinates");

    // The two downstream requests only depend on the coordinates, so they
    // are issued concurrently.
    let (current, forecast) = tokio::try_join!(
        client.fetch_current(location.lat, location.lon, units),
        client.fetch_forecast(location.lat, location.lon, units),
    )?;

    println!("{}", format::current_weather(&current, location, units));
    println!();
    println!("{}", format::forecast(&forecast, units));

    let mut recent = RecentCities::load()?;
    recent.record(city);
    recent.save()?;

    Ok(())
}

async fn pick_recent() -> Result<()> {
    let recent = RecentCities::load()?;
    if recent.is_empty() {
        println!("No recent searches yet.");
        return Ok(());
    }

    let choices: Vec<String> = recent.iter().map(str::to_string).collect();
    let city = inquire::Select::new("Search again:", choices)
        .prompt()
        .context("Failed to read selection")?;

    run_search(&city, None, None, None).await
}
