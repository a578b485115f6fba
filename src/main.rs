use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use travel_planner::{
    AppState, AttractionCatalog, GeminiClient, OpenWeatherClient, TravelPlannerConfig,
    TripPlanner, telemetry, web,
};

#[derive(Parser)]
#[command(
    name = "travel-planner",
    version,
    about = "AI trip planning backend with local attraction lookup"
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = TravelPlannerConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    telemetry::init(&config.logging)?;

    info!("Gemini API key loaded: {}", config.gemini.api_key.is_some());
    info!("Weather API key loaded: {}", config.weather.api_key.is_some());
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; trip planning requests will fail");
    }
    if config.weather.api_key.is_none() {
        warn!("WEATHER_API_KEY is not set; weather requests will fail");
    }

    let catalog = Arc::new(AttractionCatalog::load_or_empty(&config.server.dataset_path));
    let generator = Arc::new(GeminiClient::new(&config.gemini)?);
    let weather = Arc::new(OpenWeatherClient::new(&config.weather)?);

    let planner = Arc::new(TripPlanner::new(catalog, generator));
    let state = AppState::new(planner, weather);

    web::run(&config, state).await
}
