//! Per-mission record assembly, reconciliation and export.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geodata::{self, Feature};
use crate::mission::discover;
use crate::mission::marker::{Marker, MarkerKind};
use crate::names::{normalize_mission_town_name, normalize_town_name};
use crate::parse::map_info::{self, MapInfo};
use crate::parse::sqm::{self, MarkerNode};
use crate::reference::{MapIndex, TownsCounts, ZoneReferences};
use crate::report::{pretty_list, FindingKind, Report, Severity};

pub const MAP_INFO_FILENAME: &str = "mapInfo.hpp";
pub const MISSION_FILENAME: &str = "mission.sqm";

// war level progression weights per zone category
const AIRPORT_POINTS: u32 = 8;
const BASE_POINTS: u32 = 6;
const WATERPORT_POINTS: u32 = 4;
const OUTPOST_POINTS: u32 = 2;
const FACTORY_POINTS: u32 = 2;
const RESOURCE_POINTS: u32 = 2;

/// Everything the analysis knows about one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    /// Lowercase world name, from the mission directory extension.
    pub map_key: String,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub climate: Option<String>,
    /// Town name to population count. Counts are absent when the town
    /// list was adopted from geodata, which carries no populations.
    pub towns: BTreeMap<String, Option<u32>>,
    /// Raw `disabledTowns` entries from map metadata.
    pub disabled_towns: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Mission {
    /// Builds a mission record from its source directory.
    ///
    /// Parse failures in either source file are per-mission findings,
    /// not errors: the record proceeds with empty values for whatever
    /// the broken file would have contributed.
    pub fn from_sources(mission_dir: &Path, map_index: &MapIndex, report: &mut Report) -> Mission {
        let map_key = discover::map_key_from_dir(mission_dir).unwrap_or_else(|| {
            mission_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });

        let map_info = match map_info::load_map_info(&mission_dir.join(MAP_INFO_FILENAME)) {
            Ok(info) => Some(info),
            Err(e) => {
                report.add(
                    Severity::Error,
                    FindingKind::MetadataUnusable,
                    &map_key,
                    format!("'{map_key}': unusable {MAP_INFO_FILENAME}: {e}"),
                );
                None
            }
        };

        let marker_nodes = load_marker_nodes(&mission_dir.join(MISSION_FILENAME), &map_key, report);
        Mission::from_parts(map_key, map_info, marker_nodes, map_index, report)
    }

    /// Assembles a record from already-parsed pieces.
    pub fn from_parts(
        map_key: String,
        map_info: Option<MapInfo>,
        marker_nodes: Vec<MarkerNode>,
        map_index: &MapIndex,
        report: &mut Report,
    ) -> Mission {
        let (climate, populations, disabled_towns) = match map_info {
            Some(info) => (Some(info.climate), info.populations, info.disabled_towns),
            None => (None, Vec::new(), Vec::new()),
        };

        let towns = build_towns(&map_key, populations, &disabled_towns, report);
        let markers = marker_nodes.iter().filter_map(Marker::from_node).collect();

        let entry = map_index.get(&map_key);
        if entry.is_none() {
            report.add(
                Severity::Error,
                FindingKind::MapIndexKeyMissing,
                &map_key,
                format!("'{map_key}': map index issue: key not found."),
            );
        }
        let display_name = entry
            .and_then(|e| e.display_name.clone())
            .filter(|s| !s.is_empty());
        let url = entry.and_then(|e| e.url.clone()).filter(|s| !s.is_empty());
        if display_name.is_none() {
            report.add(
                Severity::Error,
                FindingKind::MapIndexFieldMissing,
                &map_key,
                format!("'{map_key}': map index issue: no `display_name`."),
            );
        }
        if url.is_none() {
            report.add(
                Severity::Error,
                FindingKind::MapIndexFieldMissing,
                &map_key,
                format!("'{map_key}': map index issue: no `url`."),
            );
        }

        Mission {
            map_key,
            display_name,
            url,
            climate,
            towns,
            disabled_towns,
            markers,
        }
    }

    /// Reconciles this mission's towns against grad_meh geodata,
    /// falling back to the curated town count when both sides are
    /// empty.
    pub fn reconcile_towns(
        &mut self,
        geodata_root: Option<&Path>,
        towns_counts: &TownsCounts,
        report: &mut Report,
    ) {
        let features = self.load_geodata(geodata_root, report);
        self.apply_geodata_towns(&features, towns_counts, report);
    }

    fn load_geodata(&self, geodata_root: Option<&Path>, report: &mut Report) -> Vec<Feature> {
        let resolved = geodata_root.and_then(|root| resolve_geodata_dir(root, &self.map_key));
        let Some(dir) = resolved else {
            report.add(
                Severity::Warning,
                FindingKind::GeodataMissing,
                &self.map_key,
                format!("'{}': no grad_meh locations data.", self.map_key),
            );
            return Vec::new();
        };
        match geodata::load_towns_from_dir(&dir) {
            Ok(features) => features,
            Err(e) => {
                report.add(
                    Severity::Error,
                    FindingKind::GeodataUnusable,
                    &self.map_key,
                    format!("'{}': unusable grad_meh data: {e}", self.map_key),
                );
                Vec::new()
            }
        }
    }

    /// Applies the geodata comparison rules to the town table.
    pub fn apply_geodata_towns(
        &mut self,
        features: &[Feature],
        towns_counts: &TownsCounts,
        report: &mut Report,
    ) {
        let gm_towns = self.geodata_towns(features, report);
        let map_key = self.map_key.clone();

        if self.towns.is_empty() && gm_towns.is_empty() {
            if let Some(&count) = towns_counts.get(&map_key) {
                self.towns = (0..count)
                    .map(|i| (format!("UNKNOWN_{i}"), Some(0)))
                    .collect();
                report.add(
                    Severity::Warning,
                    FindingKind::PlaceholderTowns,
                    &map_key,
                    format!(
                        "'{map_key}': no towns in mission or grad_meh data; \
                         placeholding {count} from reference count."
                    ),
                );
            } else {
                report.add(
                    Severity::Error,
                    FindingKind::NoTownsAnywhere,
                    &map_key,
                    format!("'{map_key}': no towns defined in mission or in grad_meh data."),
                );
            }
        } else if self.towns.is_empty() {
            self.towns = gm_towns.iter().map(|name| (name.clone(), None)).collect();
            report.add(
                Severity::Info,
                FindingKind::TownsFromGeodata,
                &map_key,
                format!(
                    "'{map_key}': no towns defined in mission; {} from grad_meh data.",
                    gm_towns.len(),
                ),
            );
        } else if gm_towns.is_empty() {
            report.add(
                Severity::Info,
                FindingKind::TownsMissionOnly,
                &map_key,
                format!(
                    "'{map_key}': {} towns defined in mission; no grad_meh data.",
                    self.towns.len(),
                ),
            );
        } else if self.towns.len() != gm_towns.len() {
            report.add(
                Severity::Warning,
                FindingKind::TownsCountMismatch,
                &map_key,
                format!(
                    "'{map_key}': {} towns defined in mission doesn't match {} in grad_meh data.",
                    self.towns.len(),
                    gm_towns.len(),
                ),
            );
        } else {
            report.add(
                Severity::Info,
                FindingKind::TownsCountMatch,
                &map_key,
                format!(
                    "'{map_key}': {} towns defined in mission matches grad_meh data.",
                    self.towns.len(),
                ),
            );
        }
    }

    /// Geodata town names surviving the disabled-towns filter. Names
    /// are compared in normalized form; when two spellings normalize
    /// identically the one from the last feature wins.
    fn geodata_towns(&self, features: &[Feature], report: &mut Report) -> BTreeSet<String> {
        let disabled: BTreeSet<String> = self
            .disabled_towns
            .iter()
            .map(|raw| normalize_mission_town_name(raw))
            .collect();
        let mut by_norm: BTreeMap<String, &str> = BTreeMap::new();
        for feature in features {
            by_norm.insert(normalize_town_name(&feature.name), feature.name.as_str());
        }
        let mut towns = BTreeSet::new();
        for (norm, raw) in by_norm {
            if disabled.contains(&norm) {
                report.add(
                    Severity::Debug,
                    FindingKind::DisabledTownSkipped,
                    &self.map_key,
                    format!(
                        "'{}': didn't add disabled town: '{norm}' ('{raw}').",
                        self.map_key,
                    ),
                );
            } else {
                towns.insert(raw.to_string());
            }
        }
        towns
    }

    /// Checks zone counts against the curated in-game reference.
    /// Findings only; counting errors in a mission are for humans to
    /// fix in the mission, not for this tool to repair.
    pub fn verify_military_zones(&self, zones: &ZoneReferences, report: &mut Report) {
        let map_key = &self.map_key;
        let Some(reference) = zones.get(map_key) else {
            report.add(
                Severity::Error,
                FindingKind::ZoneReferenceMissing,
                map_key,
                format!("'{map_key}': military zone verification issue: key not found."),
            );
            return;
        };
        let checks: [(&str, Option<u32>, usize); 7] = [
            ("airports_count", reference.airports, self.airports_count()),
            ("bases_count", reference.bases, self.bases_count()),
            (
                "waterports_count",
                reference.waterports,
                self.waterports_count(),
            ),
            ("outposts_count", reference.outposts, self.outposts_count()),
            (
                "factories_count",
                reference.factories,
                self.factories_count(),
            ),
            (
                "resources_count",
                reference.resources,
                self.resources_count(),
            ),
            (
                "total_military_zones_count",
                reference.total,
                self.total_military_zones_count(),
            ),
        ];
        for (field, expected, actual) in checks {
            let Some(expected) = expected else { continue };
            if actual == expected as usize {
                report.add(
                    Severity::Debug,
                    FindingKind::ZoneCountVerified,
                    map_key,
                    format!("'{map_key}': `{field}` matches in-game data."),
                );
            } else {
                report.add(
                    Severity::Error,
                    FindingKind::ZoneCountMismatch,
                    map_key,
                    format!(
                        "'{map_key}': military zone verification issue: \
                         `{field}`: {actual} doesn't match in-game value: {expected}."
                    ),
                );
            }
        }
    }

    /// `None` until the mission has towns, mirroring the progression
    /// formula's town term being undefined rather than zero.
    pub fn towns_count(&self) -> Option<usize> {
        if self.towns.is_empty() {
            None
        } else {
            Some(self.towns.len())
        }
    }

    fn markers_of(&self, kind: MarkerKind) -> usize {
        self.markers.iter().filter(|m| m.kind == kind).count()
    }

    pub fn airports_count(&self) -> usize {
        self.markers_of(MarkerKind::Airport)
    }

    pub fn bases_count(&self) -> usize {
        self.markers_of(MarkerKind::Base)
    }

    pub fn waterports_count(&self) -> usize {
        self.markers_of(MarkerKind::Waterport)
    }

    pub fn outposts_count(&self) -> usize {
        self.markers_of(MarkerKind::Outpost)
    }

    pub fn factories_count(&self) -> usize {
        self.markers_of(MarkerKind::Factory)
    }

    pub fn resources_count(&self) -> usize {
        self.markers_of(MarkerKind::Resource)
    }

    /// Every marker is a classified zone, so the total is the marker
    /// count.
    pub fn total_military_zones_count(&self) -> usize {
        self.markers.len()
    }

    /// Starting war-level progression points: weighted military zones
    /// plus one point per town. Undefined until the mission has towns.
    pub fn war_level_points(&self) -> Option<u32> {
        let towns = self.towns_count()? as u32;
        Some(
            AIRPORT_POINTS * self.airports_count() as u32
                + BASE_POINTS * self.bases_count() as u32
                + WATERPORT_POINTS * self.waterports_count() as u32
                + OUTPOST_POINTS * self.outposts_count() as u32
                + FACTORY_POINTS * self.factories_count() as u32
                + RESOURCE_POINTS * self.resources_count() as u32
                + towns,
        )
    }

    /// This mission's points as a fraction of the best-scoring mission
    /// in the batch. A ratio above 1 means `max_points` was not the
    /// batch maximum and is rejected.
    pub fn war_level_points_ratio(&self, max_points: u32) -> Result<Option<f64>> {
        let Some(points) = self.war_level_points() else {
            return Ok(None);
        };
        let ratio = f64::from(points) / f64::from(max_points);
        if ratio > 1.0 {
            return Err(Error::RatioOutOfBounds(ratio));
        }
        Ok(Some(ratio))
    }

    /// Writes this record to `<dir>/<map_key>.json`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.map_key));
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::json(&path, e))?;
        std::fs::write(&path, json).map_err(|e| Error::io(&path, e))?;
        info!("Exported '{}' mission data to '{}'.", self.map_key, path.display());
        Ok(path)
    }

    /// Reads a previously exported record.
    pub fn from_json_file(path: &Path) -> Result<Mission> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| Error::json(path, e))
    }

    /// Loads every exported record in `dir`, sorted by map key,
    /// skipping excluded keys.
    pub fn load_all(dir: &Path, excluded_keys: &[String]) -> Result<Vec<Mission>> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();
        let mut missions = Vec::new();
        for path in paths {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if excluded_keys.iter().any(|k| k == stem) {
                info!("Skipping excluded '{stem}'.");
                continue;
            }
            missions.push(Mission::from_json_file(&path)?);
        }
        Ok(missions)
    }
}

/// Filters out disabled towns by exact raw-name match, then collapses
/// duplicate names keeping the highest population.
fn build_towns(
    map_key: &str,
    populations: Vec<(String, u32)>,
    disabled_towns: &[String],
    report: &mut Report,
) -> BTreeMap<String, Option<u32>> {
    let mut kept: Vec<(String, u32)> = populations
        .into_iter()
        .filter(|(name, _)| !disabled_towns.iter().any(|d| d == name))
        .collect();
    let kept_count = kept.len();
    // sorted so the duplicate that survives is the highest count
    kept.sort();
    let mut towns: BTreeMap<String, Option<u32>> = BTreeMap::new();
    let mut duplicates: BTreeSet<String> = BTreeSet::new();
    for (name, count) in kept {
        if towns.insert(name.clone(), Some(count)).is_some() {
            duplicates.insert(name);
        }
    }
    if !duplicates.is_empty() {
        report.add(
            Severity::Warning,
            FindingKind::DuplicateTowns,
            map_key,
            format!(
                "'{map_key}': towns_count={kept_count} but {} unique. {} duplicated.",
                towns.len(),
                pretty_list(&duplicates),
            ),
        );
    }
    towns
}

fn load_marker_nodes(path: &Path, map_key: &str, report: &mut Report) -> Vec<MarkerNode> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            report.add(
                Severity::Error,
                FindingKind::MarkerFileUnparseable,
                map_key,
                format!("'{map_key}': couldn't read {MISSION_FILENAME}: {e}"),
            );
            return Vec::new();
        }
    };
    // editor exports are UTF-8; binarized files are not, and fail the
    // parse either way
    let text = String::from_utf8_lossy(&bytes);
    match sqm::parse_mission_markers(&text) {
        Ok(nodes) => nodes,
        Err(e) => {
            report.add(
                Severity::Warning,
                FindingKind::MarkerFileUnparseable,
                map_key,
                format!(
                    "'{map_key}': couldn't parse {MISSION_FILENAME} ({e}); \
                     file may be binarized."
                ),
            );
            Vec::new()
        }
    }
}

/// Geodata export directories usually carry the lowercase map key, but
/// older exports kept the world name's original casing.
fn resolve_geodata_dir(root: &Path, map_key: &str) -> Option<PathBuf> {
    let mut capitalized = map_key.to_string();
    if let Some(first) = capitalized.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    for candidate in [map_key.to_string(), capitalized, map_key.to_uppercase()] {
        let dir = root.join(&candidate);
        if dir.is_dir() {
            return Some(dir);
        }
    }
    None
}
