//! Command-line soil lookup.
//!
//! Finds the nearest soil record for a place or coordinates and prints the
//! static soil-type and month recommendations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use yuvaa::config::Config;
use yuvaa::dataset::SoilTable;
use yuvaa::geo::MatchResult;
use yuvaa::geocoding::NominatimGeocoder;
use yuvaa::query::{resolve_query, QueryInput};
use yuvaa::recommend::{self, Recommendation};
use yuvaa::SoilType;

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Soil lookup and crop recommendations from the command line")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Nearest soil record to a place or coordinates
    Nearest {
        /// Address or place name (takes precedence over --lat/--lon)
        #[arg(long)]
        location: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Soil dataset (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Nominatim base URL (overrides config)
        #[arg(long)]
        geocoder_url: Option<String>,

        /// Fail on records with unusable coordinates instead of skipping them
        #[arg(long)]
        strict: bool,
    },
    /// Crops and fertilizer for a soil type
    Soil {
        /// e.g. "Black Soil" or "black"
        soil_type: String,
    },
    /// Market demand and fertilizer for a sowing month
    Month {
        /// e.g. "March" or "mar"
        month: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for results
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Nearest {
            location,
            lat,
            lon,
            dataset,
            geocoder_url,
            strict,
        } => {
            if let Some(dataset) = dataset {
                config.dataset.path = dataset;
            }
            if let Some(url) = geocoder_url {
                config.geocoder.url = url;
            }
            config.dataset.strict |= strict;

            let table = SoilTable::load(&config.dataset.path).with_context(|| {
                format!("Failed to load soil data from {}", config.dataset.path.display())
            })?;
            let geocoder = NominatimGeocoder::new(
                &config.geocoder.url,
                &config.geocoder.user_agent,
                config.geocoder.timeout(),
            )?;

            let input = QueryInput {
                location,
                latitude: lat,
                longitude: lon,
            };
            let point = resolve_query(&input, &geocoder).await?;
            debug!("Query point {}", point);

            let result = table.nearest(&point, config.dataset.scan_policy())?;
            println!("{}", format_match(&result));
        }
        Command::Soil { soil_type } => {
            let soil_type: SoilType = soil_type.parse()?;
            println!("{}", soil_type);
            println!("{}", format_recommendation(&recommend::for_soil(soil_type)));
        }
        Command::Month { month } => {
            let month = recommend::parse_month(&month)?;
            println!("Market demand for {}", month.name());
            println!("{}", format_recommendation(&recommend::for_month(month)));
        }
    }

    Ok(())
}

fn format_match(result: &MatchResult<'_>) -> String {
    let record = result.record;
    let mut lines = vec![
        "Closest Soil Data:".to_string(),
        format!("Latitude: {}", record.location.lat),
        format!("Longitude: {}", record.location.lon),
        format!("Distance: {:.2} km", result.distance_km),
        format!("Soil Type: {}", record.soil_type),
        format!("Recommended Crops: {}", record.recommended_crops),
        format!(
            "pH: {}",
            record.ph.map_or_else(|| "unknown".to_string(), |ph| ph.to_string())
        ),
        format!("Recommended Fertilizer: {}", record.recommended_fertilizer),
    ];
    if result.excluded > 0 {
        lines.push(format!(
            "({} records with unusable coordinates were skipped)",
            result.excluded
        ));
    }
    lines.join("\n")
}

fn format_recommendation(rec: &Recommendation) -> String {
    let mut out = String::from("Recommended Crops:");
    for crop in rec.crops {
        out.push_str("\n- ");
        out.push_str(crop);
    }
    out.push_str("\nRecommended Fertilizer: ");
    out.push_str(rec.fertilizer);
    out
}
