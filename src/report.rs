//! Run findings, mirrored to the log.
//!
//! Every reconciliation decision leaves a [`Finding`] in the [`Report`]
//! in addition to its tracing event, so batch outcomes stay inspectable
//! after the run without scraping log output.

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// What a finding is about, independent of its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// Duplicate town names were collapsed during town-table construction.
    DuplicateTowns,
    /// The map metadata file was missing, unreadable, or failed to parse.
    MetadataUnusable,
    /// The entity-hierarchy file was missing or could not be parsed.
    MarkerFileUnparseable,
    /// The map key has no entry in the map index table.
    MapIndexKeyMissing,
    /// The map index entry exists but lacks a display name or url.
    MapIndexFieldMissing,
    /// No geodata directory was found for this map.
    GeodataMissing,
    /// A geodata file existed but could not be decoded.
    GeodataUnusable,
    /// A normalized geodata town matched a disabled town and was skipped.
    DisabledTownSkipped,
    /// Neither the mission nor the geodata defines any towns.
    NoTownsAnywhere,
    /// Placeholder towns were synthesized from the reference town count.
    PlaceholderTowns,
    /// The mission defined no towns; the geodata town list was adopted.
    TownsFromGeodata,
    /// The mission defines towns but no geodata exists to check against.
    TownsMissionOnly,
    /// Mission and geodata town counts disagree.
    TownsCountMismatch,
    /// Mission and geodata town counts agree.
    TownsCountMatch,
    /// The map key has no entry in the military zone reference table.
    ZoneReferenceMissing,
    /// A zone count disagrees with its reference value.
    ZoneCountMismatch,
    /// A zone count matches its reference value.
    ZoneCountVerified,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// Map key the finding is about.
    pub map_key: String,
    pub message: String,
}

/// Accumulated findings for one run.
#[derive(Debug, Default)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding and emits it at the matching log level.
    pub fn add(&mut self, severity: Severity, kind: FindingKind, map_key: &str, message: String) {
        match severity {
            Severity::Debug => debug!("{message}"),
            Severity::Info => info!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }
        self.findings.push(Finding {
            severity,
            kind,
            map_key: map_key.to_string(),
            message,
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    pub fn for_map<'a>(&'a self, map_key: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.map_key == map_key)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

/// Formats strings as `'a', 'b', 'c'` for log messages.
pub fn pretty_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| format!("'{}'", s.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_report_counts() {
        let mut report = Report::new();
        report.add(
            Severity::Warning,
            FindingKind::TownsCountMismatch,
            "altis",
            "count mismatch".into(),
        );
        report.add(
            Severity::Error,
            FindingKind::MapIndexKeyMissing,
            "altis",
            "key not found".into(),
        );
        report.add(
            Severity::Info,
            FindingKind::TownsCountMatch,
            "tanoa",
            "counts agree".into(),
        );

        assert_eq!(report.findings().len(), 3);
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.errors(), 1);
        assert_eq!(report.of_kind(FindingKind::TownsCountMatch).count(), 1);
        assert_eq!(report.for_map("altis").count(), 2);
    }

    #[test]
    fn test_pretty_list() {
        assert_eq!(pretty_list(["a", "b"]), "'a', 'b'");
        assert_eq!(pretty_list(Vec::<String>::new()), "");
    }
}
