mod views;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pryce-cli")]
#[command(about = "Store status badges and nearest-store listings for the Pryce catalog")]
struct Cli {
    /// Stores catalog (YAML or JSON); defaults to PRYCE_STORES_PATH
    #[arg(long, global = true)]
    stores: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show open/closed status for active stores
    Status {
        /// Only show this store id
        #[arg(long)]
        store: Option<String>,
        /// Evaluate at this local time (YYYY-MM-DDTHH:MM) instead of now
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List active stores nearest-first
    Nearby {
        /// Reference latitude; defaults to PRYCE_DEFAULT_LAT
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Reference longitude; defaults to PRYCE_DEFAULT_LNG
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Maximum number of stores; defaults to PRYCE_NEARBY_LIMIT
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the weekly opening hours of one store
    Hours {
        #[arg(long)]
        store: String,
    },
    /// Report catalog entries with unreadable hours or coordinates
    Check,
}

/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` and either with seconds.
fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{raw}'"))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pryce_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stores_path = cli
        .stores
        .clone()
        .unwrap_or_else(|| config.stores_path.clone());

    match cli.command {
        Some(Commands::Status { store, at, json }) => {
            views::run_status(&config, &stores_path, store.as_deref(), at, json)?;
        }
        Some(Commands::Nearby {
            lat,
            lng,
            limit,
            json,
        }) => {
            let user = lat.zip(lng).map(|(lat, lng)| pryce_core::GeoPoint::new(lat, lng));
            views::run_nearby(&config, &stores_path, user, limit, json)?;
        }
        Some(Commands::Hours { store }) => views::run_hours(&config, &stores_path, &store)?,
        Some(Commands::Check) => views::run_check(&config, &stores_path)?,
        None => println!("pryce-cli: run with --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
