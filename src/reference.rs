//! Curated reference tables, shipped as JSON next to the binaries.
//!
//! These are lookup data maintained by hand: a map index (display names
//! and links), in-game military zone counts collected by playing the
//! maps, and fallback town counts for maps where neither the mission
//! nor any geodata defines towns. Keys are lowercase map keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const MAP_INDEX_FILE: &str = "map_index.json";
pub const MILITARY_ZONES_FILE: &str = "military_zones.json";
pub const TOWNS_COUNTS_FILE: &str = "towns_counts.json";

/// Presentation data for one map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapIndexEntry {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// In-game zone counts for one map. Most entries only record the total;
/// per-category counts exist where someone sat down and counted them.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ZoneReference {
    #[serde(default)]
    pub airports: Option<u32>,
    #[serde(default)]
    pub bases: Option<u32>,
    #[serde(default)]
    pub waterports: Option<u32>,
    #[serde(default)]
    pub outposts: Option<u32>,
    #[serde(default)]
    pub factories: Option<u32>,
    #[serde(default)]
    pub resources: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

pub type MapIndex = BTreeMap<String, MapIndexEntry>;
pub type ZoneReferences = BTreeMap<String, ZoneReference>;
pub type TownsCounts = BTreeMap<String, u32>;

/// All reference tables for a run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub map_index: MapIndex,
    pub zones: ZoneReferences,
    pub towns_counts: TownsCounts,
}

impl ReferenceData {
    /// Loads the three tables from a directory.
    pub fn load(dir: &Path) -> Result<ReferenceData> {
        Ok(ReferenceData {
            map_index: load_json(&dir.join(MAP_INDEX_FILE))?,
            zones: load_json(&dir.join(MILITARY_ZONES_FILE))?,
            towns_counts: load_json(&dir.join(TOWNS_COUNTS_FILE))?,
        })
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reference_data() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(MAP_INDEX_FILE),
            r#"{"altis": {"display_name": "Altis", "url": "https://example.test/altis"},
                "stratis": {"display_name": "Stratis"}}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join(MILITARY_ZONES_FILE),
            r#"{"altis": {"airports": 4, "bases": 3, "total": 36},
                "stratis": {"total": 12}}"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join(TOWNS_COUNTS_FILE), r#"{"stratis": 3}"#).unwrap();

        let data = ReferenceData::load(tmp.path()).unwrap();
        assert_eq!(
            data.map_index["altis"].display_name.as_deref(),
            Some("Altis"),
        );
        assert_eq!(data.map_index["stratis"].url, None);
        assert_eq!(data.zones["altis"].airports, Some(4));
        assert_eq!(data.zones["altis"].waterports, None);
        assert_eq!(data.zones["stratis"].total, Some(12));
        assert_eq!(data.towns_counts["stratis"], 3);
    }

    #[test]
    fn test_missing_table_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ReferenceData::load(tmp.path()).is_err());
    }
}
