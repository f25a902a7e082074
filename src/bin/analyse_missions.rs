//! Extract and reconcile map data for every mission in a mod source
//! tree.
//!
//! Run with: cargo run --bin analyse-missions -- --missions <dir> [--geodata <dir>]

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use antistasi_maps::batch::{self, BatchOptions};
use antistasi_maps::reference::ReferenceData;
use antistasi_maps::report::Report;

#[derive(Parser)]
#[command(name = "analyse-missions")]
#[command(about = "Extract and reconcile map data from Antistasi mission sources")]
struct Cli {
    /// Mod source directory with one mission directory per map
    #[arg(long)]
    missions: PathBuf,

    /// Output directory for per-mission JSON records
    #[arg(long, default_value = "data")]
    out: PathBuf,

    /// grad_meh export root with one subdirectory per map key
    #[arg(long)]
    geodata: Option<PathBuf>,

    /// Directory holding the curated reference tables
    #[arg(long, default_value = "static_data")]
    static_data: PathBuf,

    /// Mission directory names to skip (repeatable)
    #[arg(long = "exclude", default_value = "Antistasi_Stratis.Stratis")]
    excluded: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let reference = ReferenceData::load(&cli.static_data)?;
    let options = BatchOptions {
        missions_root: cli.missions,
        data_dir: cli.out,
        geodata_root: cli.geodata,
        excluded_missions: cli.excluded,
    };

    let mut report = Report::new();
    let summary = batch::run(&options, &reference, &mut report)?;
    info!(
        "Analysed {} missions: {} warnings, {} errors.",
        summary.analysed.len(),
        report.warnings(),
        report.errors(),
    );
    Ok(())
}
