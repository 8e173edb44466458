//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "pincodepro")]
#[command(about = "PincodePro: India postal code lookup with AI query normalization")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a pincode or post office
    Search {
        /// Pincode, post office name or a free-form question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Always rewrite the query with the AI normalizer
        #[arg(long)]
        ai: bool,
        /// Treat the query as transcribed speech (implies --ai)
        #[arg(long)]
        voice: bool,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up the post office for a coordinate pair
    Near {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print map and WhatsApp links for sharing a live location
    ShareLocation {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Print the links as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch locality insights for a search result
    Insights {
        /// Pincode or post office name
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Which result to use when the search returns several
        #[arg(short, long, default_value = "0")]
        index: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse states, or the major districts of one state
    States {
        /// State name (case-insensitive)
        state: Option<String>,
    },
    /// Show the featured pincodes with their head offices
    Featured,
    /// Chat with customer support
    Support {
        /// Single message to send
        message: Option<String>,
        /// Keep the conversation going on stdin
        #[arg(short, long)]
        interactive: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config {
        /// Print as TOML (key masked)
        #[arg(long)]
        toml: bool,
    },
}
