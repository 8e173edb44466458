use clap::Parser;
use pincodepro::cli::handlers::*;
use pincodepro::cli::Cli;
use pincodepro::cli::Commands;
use pincodepro::config::AppConfig;
use pincodepro::PincodeServices;
use pincodepro::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let config = AppConfig::load_layered(cli.config.as_deref())?;

    // Initialize logging; --verbose overrides the configured level
    if cli.verbose {
        pincodepro::logging::init_logging_with_level("debug")?;
    } else {
        pincodepro::logging::init_logging_with_config(Some(&config))?;
    }
    info!("PincodePro v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Search {
            query,
            ai,
            voice,
            json,
        } => {
            let services = PincodeServices::from_config(&config)?;
            handle_search_command(&services, &query, ai, voice, json).await?;
        }
        Commands::Near { lat, lon, json } => {
            let services = PincodeServices::from_config(&config)?;
            handle_near_command(&services, lat, lon, json).await?;
        }
        Commands::ShareLocation { lat, lon, json } => {
            handle_share_location_command(lat, lon, json)?;
        }
        Commands::Insights { query, index, json } => {
            let services = PincodeServices::from_config(&config)?;
            handle_insights_command(&services, &query, index, json).await?;
        }
        Commands::States { state } => {
            handle_states_command(state.as_deref())?;
        }
        Commands::Featured => {
            let services = PincodeServices::from_config(&config)?;
            handle_featured_command(&services).await?;
        }
        Commands::Support {
            message,
            interactive,
        } => {
            let services = PincodeServices::from_config(&config)?;
            handle_support_command(&services, message, interactive).await?;
        }
        Commands::Serve { host, port, cors } => {
            handle_serve_api(&config, host, port, cors).await?;
        }
        Commands::Config { toml } => {
            handle_config_command(&config, toml)?;
        }
    }

    Ok(())
}
