//! Render the Markdown map comparison table from exported mission
//! data.
//!
//! Run with: cargo run --bin build-docs -- [--data <dir>] [--out <file>]

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use antistasi_maps::mission::Mission;
use antistasi_maps::reference::ReferenceData;
use antistasi_maps::report::{pretty_list, Report};
use antistasi_maps::table;

#[derive(Parser)]
#[command(name = "build-docs")]
#[command(about = "Render the map comparison table from exported mission data")]
struct Cli {
    /// Directory holding per-mission JSON records
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Output Markdown file
    #[arg(long, default_value = "docs/maps.md")]
    out: PathBuf,

    /// Directory holding the curated reference tables
    #[arg(long, default_value = "static_data")]
    static_data: PathBuf,

    /// Map keys to skip (repeatable)
    #[arg(long = "exclude")]
    excluded: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let reference = ReferenceData::load(&cli.static_data)?;
    let missions = Mission::load_all(&cli.data, &cli.excluded)?;
    info!(
        "Loaded {} mission records from '{}'.",
        missions.len(),
        cli.data.display(),
    );

    // re-check zone counts so stale exports surface here too
    let mut report = Report::new();
    for mission in &missions {
        mission.verify_military_zones(&reference.zones, &mut report);
    }

    let missing_names: Vec<&str> = missions
        .iter()
        .filter(|m| m.display_name.is_none())
        .map(|m| m.map_key.as_str())
        .collect();
    if !missing_names.is_empty() {
        warn!("Maps without a display name: {}.", pretty_list(&missing_names));
    }
    let missing_urls: Vec<&str> = missions
        .iter()
        .filter(|m| m.url.is_none())
        .map(|m| m.map_key.as_str())
        .collect();
    if !missing_urls.is_empty() {
        warn!("Maps without a url: {}.", pretty_list(&missing_urls));
    }

    let doc = table::render_comparison_table(&missions)?;
    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&cli.out, &doc)?;
    info!(
        "Wrote comparison table for {} maps to '{}'.",
        missions.len(),
        cli.out.display(),
    );
    Ok(())
}
