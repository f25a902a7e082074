//! Loader for grad_meh geodata exports.
//!
//! A map's export directory holds one gzipped JSON array of GeoJSON
//! `Feature` records per location class (`namevillage.geojson.gz`,
//! `namecity.geojson.gz`, `namecitycapital.geojson.gz`, among others we
//! do not read). Decoding is strict: a malformed feature fails the
//! whole file, since silently dropping records would skew every town
//! comparison downstream.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

const GEOJSON_GZ_SUFFIX: &str = ".geojson.gz";

/// Settlement classes carried by the location-name feature files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettlementKind {
    Village,
    City,
    Capital,
}

impl SettlementKind {
    /// Maps a feature-file stem to its settlement class.
    pub fn from_stem(stem: &str) -> Option<SettlementKind> {
        match stem {
            "namevillage" => Some(SettlementKind::Village),
            "namecity" => Some(SettlementKind::City),
            "namecitycapital" => Some(SettlementKind::Capital),
            _ => None,
        }
    }
}

/// One named settlement from a geodata export.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    /// Planar world position as exported, `(x, y)`.
    pub position: (f64, f64),
    pub kind: SettlementKind,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point { coordinates: (f64, f64) },
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    name: Option<String>,
}

impl RawFeature {
    fn into_feature(self, kind: SettlementKind, path: &Path) -> Result<Feature> {
        let name = self
            .properties
            .and_then(|p| p.name)
            .ok_or_else(|| Error::FeatureDecode {
                path: path.to_path_buf(),
                message: "feature without a name".into(),
            })?;
        let RawGeometry::Point { coordinates } =
            self.geometry.ok_or_else(|| Error::FeatureDecode {
                path: path.to_path_buf(),
                message: format!("feature '{name}' without point geometry"),
            })?;
        Ok(Feature {
            name,
            position: coordinates,
            kind,
        })
    }
}

/// Loads one gzipped feature file. An empty feature array is legal but
/// suspicious, so it is logged.
pub fn load_features_from_file(path: &Path, kind: SettlementKind) -> Result<Vec<Feature>> {
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut decoder = GzDecoder::new(file);
    let mut json = String::new();
    decoder
        .read_to_string(&mut json)
        .map_err(|e| Error::io(path, e))?;
    let raw: Vec<RawFeature> = serde_json::from_str(&json).map_err(|e| Error::FeatureDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if raw.is_empty() {
        warn!("no features in '{}'", path.display());
    }
    raw.into_iter()
        .map(|f| f.into_feature(kind, path))
        .collect()
}

/// Loads every town-class feature file in a map's geodata directory.
///
/// Files are visited in name order so results are stable across
/// platforms. A missing directory is an expected condition (most maps
/// have no geodata export) and yields an empty list with a warning.
pub fn load_towns_from_dir(dir: &Path) -> Result<Vec<Feature>> {
    if !dir.is_dir() {
        warn!("no geodata directory at '{}'", dir.display());
        return Ok(Vec::new());
    }
    let mut files: Vec<(PathBuf, SettlementKind)> = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(GEOJSON_GZ_SUFFIX) else {
            continue;
        };
        if let Some(kind) = SettlementKind::from_stem(stem) {
            files.push((path, kind));
        }
    }
    files.sort();
    let mut features = Vec::new();
    for (path, kind) in files {
        features.extend(load_features_from_file(&path, kind)?);
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn write_gz(path: &Path, json: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    const VILLAGES: &str = r#"[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[3810.0,2902.5]},
         "properties":{"name":"Girna"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[2400.1,1010.9]},
         "properties":{"name":"Kamino"}}
    ]"#;

    const CITIES: &str = r#"[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[1871.6,3821.1]},
         "properties":{"name":"Agia Marina"}}
    ]"#;

    #[test]
    fn test_settlement_kind_from_stem() {
        assert_eq!(SettlementKind::from_stem("namevillage"), Some(SettlementKind::Village));
        assert_eq!(SettlementKind::from_stem("namecity"), Some(SettlementKind::City));
        assert_eq!(
            SettlementKind::from_stem("namecitycapital"),
            Some(SettlementKind::Capital),
        );
        assert_eq!(SettlementKind::from_stem("namelocal"), None);
        assert_eq!(SettlementKind::from_stem("mount"), None);
    }

    #[test]
    fn test_load_towns_from_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write_gz(&tmp.path().join("namevillage.geojson.gz"), VILLAGES);
        write_gz(&tmp.path().join("namecity.geojson.gz"), CITIES);
        // ignored: not a town location class
        write_gz(&tmp.path().join("mount.geojson.gz"), "[]");
        std::fs::write(tmp.path().join("README.txt"), "ignored").unwrap();

        let features = load_towns_from_dir(tmp.path()).unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        // namecity sorts before namevillage
        assert_eq!(names, ["Agia Marina", "Girna", "Kamino"]);
        assert_eq!(features[0].kind, SettlementKind::City);
        assert_eq!(features[0].position, (1871.6, 3821.1));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("no_such_map");
        assert_eq!(load_towns_from_dir(&missing).unwrap(), Vec::new());
    }

    #[test]
    fn test_empty_feature_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("namevillage.geojson.gz");
        write_gz(&path, "[]");
        assert!(load_features_from_file(&path, SettlementKind::Village)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_json_fails_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("namecity.geojson.gz");
        write_gz(&path, r#"{"not": "an array"}"#);
        assert!(load_features_from_file(&path, SettlementKind::City).is_err());
    }

    #[test]
    fn test_nameless_feature_fails_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("namecity.geojson.gz");
        write_gz(
            &path,
            r#"[{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":{}}]"#,
        );
        assert!(load_features_from_file(&path, SettlementKind::City).is_err());
    }

    #[test]
    fn test_not_gzip_fails_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("namecity.geojson.gz");
        std::fs::write(&path, "plain text, not gzip").unwrap();
        assert!(load_features_from_file(&path, SettlementKind::City).is_err());
    }
}
