use anyhow::Context;
use clap::{Parser, Subcommand};
use eastgate_site::app::ports::Geocoder;
use eastgate_site::config::Config;
use eastgate_site::infra::{InMemoryContentStore, NominatimGeocoder};
use eastgate_site::state::AppState;
use eastgate_site::{logging, metrics, server};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "eastgate_site")]
#[command(about = "Content gateway and form endpoints for the East Gate church website")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Serve from an empty in-memory store instead of the CMS
        #[arg(long)]
        in_memory: bool,
    },
    /// Print the home page view model as JSON
    Home,
    /// Print the events page view model as JSON
    Events,
    /// Look up coordinates for a postal code
    Geocode {
        zip: String,
        #[arg(long)]
        country: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    match cli.command {
        Commands::Serve { port, in_memory } => {
            metrics::init_metrics();
            let port = port.unwrap_or(config.server.port);
            let state = if in_memory {
                info!("Serving from the in-memory content store");
                AppState::with_store(config, Arc::new(InMemoryContentStore::new()))?
            } else {
                AppState::from_config(config)?
            };
            server::start_server(state, port).await?;
        }
        Commands::Home => {
            let state = AppState::from_config(config)?;
            let home = state.content.home_page().await;
            println!("{}", serde_json::to_string_pretty(&home)?);
        }
        Commands::Events => {
            let state = AppState::from_config(config)?;
            let events = state.content.events_page().await;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Commands::Geocode { zip, country } => {
            let country = country.unwrap_or_else(|| config.geocode.country.clone());
            let geocoder = NominatimGeocoder::new(reqwest::Client::new(), &config.geocode);
            match geocoder.geocode(&zip, &country).await? {
                Some(point) => println!("{}", serde_json::to_string_pretty(&point)?),
                None => println!("No match for {zip} ({country})"),
            }
        }
    }

    Ok(())
}
