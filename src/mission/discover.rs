//! Locating mission directories and deriving map keys.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Derives the lowercase map key from a mission directory name.
///
/// Mission directories are named `<Campaign>.<WorldName>`; the world
/// name after the final dot identifies the map. `Antistasi_Altis.Altis`
/// yields `altis`.
pub fn map_key_from_dir(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Whether a directory entry looks like a mission directory: a directory
/// whose stem ends with its own extension, ignoring case.
///
/// `Antistasi_Altis.Altis` and `AntistasiMalden.malden` qualify;
/// `backup.old` or a stray `README.md` do not.
pub fn looks_like_mission_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let Some(key) = map_key_from_dir(path) else {
        return false;
    };
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    stem.to_lowercase().ends_with(&key)
}

/// Mission directories directly under `root`, sorted by name.
pub fn mission_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| Error::io(root, e))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let path = entry.path();
        if looks_like_mission_dir(&path) {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_from_dir() {
        assert_eq!(
            map_key_from_dir(Path::new("/maps/Antistasi_Altis.Altis")),
            Some("altis".to_string()),
        );
        assert_eq!(
            map_key_from_dir(Path::new("Antistasi_Foo.foo")),
            Some("foo".to_string()),
        );
        assert_eq!(map_key_from_dir(Path::new("/maps/NoExtension")), None);
    }

    #[test]
    fn test_mission_dirs_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for name in [
            "Antistasi_Tanoa.Tanoa",
            "Antistasi_Altis.Altis",
            "AntistasiMalden.malden",
            "not_a_mission",
            "backup.old",
        ] {
            std::fs::create_dir(root.join(name)).unwrap();
        }
        std::fs::write(root.join("Readme.readme"), "not a directory").unwrap();

        let dirs = mission_dirs(root).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "AntistasiMalden.malden",
                "Antistasi_Altis.Altis",
                "Antistasi_Tanoa.Tanoa",
            ],
        );
    }

    #[test]
    fn test_mission_dirs_missing_root() {
        assert!(mission_dirs(Path::new("/definitely/not/here")).is_err());
    }
}
