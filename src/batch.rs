//! Batch analysis across every mission in a mod source tree.
//!
//! One run discovers mission directories, builds and reconciles a
//! [`Mission`] record for each, verifies zone counts, exports one JSON
//! file per mission, and finishes with cross-mission reporting of
//! curated-table keys nothing used. Per-mission problems become
//! findings; the run itself only fails on structural preconditions.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::mission::{discover, Mission};
use crate::reference::ReferenceData;
use crate::report::{pretty_list, Report};

/// Inputs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Mod source directory holding one mission directory per map.
    pub missions_root: PathBuf,
    /// Output directory for per-mission JSON records; created if
    /// absent.
    pub data_dir: PathBuf,
    /// grad_meh export root, one subdirectory per map key.
    pub geodata_root: Option<PathBuf>,
    /// Mission directory names to skip.
    pub excluded_missions: Vec<String>,
}

/// What a run produced, beyond its findings.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Map keys analysed, in processing order.
    pub analysed: Vec<String>,
    /// Map index keys no analysed mission used.
    pub unused_map_index_keys: Vec<String>,
    /// Zone reference keys no analysed mission used.
    pub unused_zone_reference_keys: Vec<String>,
    /// Fallback town-count keys no analysed mission used.
    pub unused_towns_count_keys: Vec<String>,
}

pub fn run(
    options: &BatchOptions,
    reference: &ReferenceData,
    report: &mut Report,
) -> Result<BatchSummary> {
    check_preconditions(options)?;
    std::fs::create_dir_all(&options.data_dir).map_err(|e| Error::io(&options.data_dir, e))?;

    let mut dirs = discover::mission_dirs(&options.missions_root)?;
    if !options.excluded_missions.is_empty() {
        info!("Ignoring {}.", pretty_list(&options.excluded_missions));
        dirs.retain(|dir| {
            let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            !options.excluded_missions.iter().any(|x| x == name)
        });
    }
    if dirs.is_empty() {
        return Err(Error::NoMissionsFound(options.missions_root.clone()));
    }
    info!(
        "Found {} missions in '{}'.",
        dirs.len(),
        options.missions_root.display(),
    );

    let mut summary = BatchSummary::default();
    for dir in &dirs {
        let mut mission = Mission::from_sources(dir, &reference.map_index, report);
        mission.reconcile_towns(
            options.geodata_root.as_deref(),
            &reference.towns_counts,
            report,
        );
        mission.verify_military_zones(&reference.zones, report);
        mission.export(&options.data_dir)?;
        summary.analysed.push(mission.map_key);
    }

    let analysed: BTreeSet<&str> = summary.analysed.iter().map(String::as_str).collect();
    summary.unused_map_index_keys = unused_keys(reference.map_index.keys(), &analysed);
    summary.unused_zone_reference_keys = unused_keys(reference.zones.keys(), &analysed);
    summary.unused_towns_count_keys = unused_keys(reference.towns_counts.keys(), &analysed);
    if !summary.unused_map_index_keys.is_empty() {
        warn!(
            "Unused map index keys: {}.",
            pretty_list(&summary.unused_map_index_keys),
        );
    }
    if !summary.unused_zone_reference_keys.is_empty() {
        warn!(
            "Unused military zone keys: {}.",
            pretty_list(&summary.unused_zone_reference_keys),
        );
    }
    if !summary.unused_towns_count_keys.is_empty() {
        warn!(
            "Unused town count keys: {}.",
            pretty_list(&summary.unused_towns_count_keys),
        );
    }

    info!(
        "Exported data for {} missions to '{}'.",
        summary.analysed.len(),
        options.data_dir.display(),
    );
    Ok(summary)
}

fn check_preconditions(options: &BatchOptions) -> Result<()> {
    if !options.missions_root.is_dir() {
        return Err(Error::MissingDirectory {
            name: "missions",
            path: options.missions_root.clone(),
        });
    }
    if let Some(root) = &options.geodata_root {
        if !root.is_dir() {
            return Err(Error::MissingDirectory {
                name: "geodata",
                path: root.clone(),
            });
        }
    }
    Ok(())
}

fn unused_keys<'a>(
    keys: impl Iterator<Item = &'a String>,
    analysed: &BTreeSet<&str>,
) -> Vec<String> {
    keys.filter(|k| !analysed.contains(k.as_str()))
        .cloned()
        .collect()
}
