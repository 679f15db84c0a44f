//! placemerge CLI - joins the KSH place-name workbook with the GeoNames postal dump
//!
//! Runs load → normalize → merge → write once. Paths come from positional
//! arguments, then `PLACEMERGE_*` environment variables (a `.env` file is
//! honoured), then the built-in defaults.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use placemerge::PipelineConfig;

#[derive(Parser)]
#[command(name = "placemerge")]
#[command(version, about = "Join place names with statistical codes, postal codes and coordinates", long_about = None)]
struct Cli {
    /// Administrative registry workbook [default: Helysegnevkonyv_adattar_2010.xls]
    admin: Option<PathBuf>,

    /// Tab-delimited postal registry [default: HU.txt]
    postal: Option<PathBuf>,

    /// Output CSV file [default: place_kshcode_postcode_points.csv]
    output: Option<PathBuf>,
}

fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = PipelineConfig::default()
        .with_env_overrides()
        .with_paths(cli.admin, cli.postal, cli.output);

    match placemerge::run(&config) {
        Ok(report) => {
            tracing::info!(
                "Done: {} joined records written to {}",
                report.joined_records,
                report.output.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
