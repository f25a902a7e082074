//! Markdown comparison table over exported mission records.

use crate::error::Result;
use crate::mission::Mission;

struct Column {
    heading: &'static str,
    align_right: bool,
}

const COLUMNS: &[Column] = &[
    Column { heading: "Map", align_right: false },
    Column { heading: "Climate", align_right: false },
    Column { heading: "Airports", align_right: true },
    Column { heading: "Bases", align_right: true },
    Column { heading: "Sea/<br>riverports", align_right: true },
    Column { heading: "Outposts", align_right: true },
    Column { heading: "Factories", align_right: true },
    Column { heading: "Resources", align_right: true },
    Column { heading: "Total<br>military<br>zones[^1]", align_right: true },
    Column { heading: "Towns", align_right: true },
    Column { heading: "War Level<br>points ratio[^2]", align_right: true },
];

const INTRO_MARKDOWN: &str = "\
---
hide:
  - navigation
---

# Map comparison

Extracted from mission sources and grad_meh map exports, then checked
against in-game observations where those have been collected.

";

const OUTRO_MARKDOWN: &str = "
[^1]: Count of all military zone markers placed in the mission: airports, bases, sea/riverports, outposts, factories and resources.
[^2]: Starting war level progression points relative to the highest-scoring map. 8 points per airport, 6 per base, 4 per sea/riverport, 2 per outpost, factory and resource, plus 1 per town.
";

/// Renders the full comparison document: intro, one table row per
/// mission sorted by display name, and footnotes.
///
/// Missing values render as blank cells rather than zeros, so a map
/// with no towns reads as unknown, not as having none.
pub fn render_comparison_table(missions: &[Mission]) -> Result<String> {
    let mut sorted: Vec<&Mission> = missions.iter().collect();
    sorted.sort_by_key(|m| sort_key(m));
    let max_points = missions.iter().filter_map(Mission::war_level_points).max();

    let mut out = String::new();
    out.push_str(INTRO_MARKDOWN);
    out.push_str(&format!(
        "- {} maps, including seasonal variants\n\n",
        sorted.len(),
    ));
    render_header(&mut out);
    for mission in sorted {
        render_row(&mut out, mission, max_points)?;
    }
    out.push_str(OUTRO_MARKDOWN);
    Ok(out)
}

fn sort_key(mission: &Mission) -> String {
    mission
        .display_name
        .clone()
        .unwrap_or_else(|| mission.map_key.clone())
        .to_lowercase()
}

fn render_header(out: &mut String) {
    for column in COLUMNS {
        out.push_str("| ");
        out.push_str(column.heading);
        out.push(' ');
    }
    out.push_str("|\n");
    for column in COLUMNS {
        out.push_str(if column.align_right { "| ---: " } else { "| :--- " });
    }
    out.push_str("|\n");
}

fn render_row(out: &mut String, mission: &Mission, max_points: Option<u32>) -> Result<()> {
    let ratio = match max_points {
        Some(max) => mission.war_level_points_ratio(max)?,
        None => None,
    };
    let cells = [
        map_cell(mission),
        mission.climate.clone().unwrap_or_default(),
        mission.airports_count().to_string(),
        mission.bases_count().to_string(),
        mission.waterports_count().to_string(),
        mission.outposts_count().to_string(),
        mission.factories_count().to_string(),
        mission.resources_count().to_string(),
        mission.total_military_zones_count().to_string(),
        mission
            .towns_count()
            .map(|n| n.to_string())
            .unwrap_or_default(),
        ratio.map(|r| format!("{r:.2}")).unwrap_or_default(),
    ];
    for cell in cells {
        out.push_str("| ");
        out.push_str(&cell);
        out.push(' ');
    }
    out.push_str("|\n");
    Ok(())
}

fn map_cell(mission: &Mission) -> String {
    let name = mission
        .display_name
        .clone()
        .unwrap_or_else(|| mission.map_key.clone());
    match &mission.url {
        Some(url) => format!("[{name}]({url})"),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{Marker, MarkerKind, Position};
    use std::collections::BTreeMap;

    fn mission(map_key: &str, display_name: Option<&str>, towns: usize) -> Mission {
        Mission {
            map_key: map_key.into(),
            display_name: display_name.map(String::from),
            url: display_name.map(|_| format!("https://example.test/{map_key}")),
            climate: Some("arid".into()),
            towns: (0..towns)
                .map(|i| (format!("Town{i}"), Some(10)))
                .collect(),
            disabled_towns: Vec::new(),
            markers: Vec::new(),
        }
    }

    fn with_airports(mut mission: Mission, count: usize) -> Mission {
        for n in 0..count {
            mission.markers.push(Marker {
                name: format!("airport_{n}"),
                kind: MarkerKind::Airport,
                position: Position { x: 0.0, y: 0.0, z: 0.0 },
            });
        }
        mission
    }

    #[test]
    fn test_rows_sorted_by_display_name() {
        let missions = vec![
            mission("zulu", Some("Zulu Coast"), 2),
            mission("alpha", Some("alpha Valley"), 2),
        ];
        let doc = render_comparison_table(&missions).unwrap();
        let alpha = doc.find("alpha Valley").unwrap();
        let zulu = doc.find("Zulu Coast").unwrap();
        assert!(alpha < zulu, "case-insensitive sort puts alpha first");
    }

    #[test]
    fn test_map_cell_linked_when_url_present() {
        let missions = vec![mission("altis", Some("Altis"), 1)];
        let doc = render_comparison_table(&missions).unwrap();
        assert!(doc.contains("[Altis](https://example.test/altis)"));
    }

    #[test]
    fn test_map_cell_falls_back_to_map_key() {
        let missions = vec![mission("unlisted", None, 1)];
        let doc = render_comparison_table(&missions).unwrap();
        assert!(doc.contains("| unlisted |"));
    }

    #[test]
    fn test_missing_values_render_blank_not_zero() {
        let missions = vec![mission("empty", Some("Empty"), 0)];
        let doc = render_comparison_table(&missions).unwrap();
        let row = doc.lines().find(|l| l.contains("Empty")).unwrap();
        // towns and ratio cells are blank; zone counts are real zeros
        assert!(row.ends_with("| 0 |  |  |"), "{row:?}");
    }

    #[test]
    fn test_ratio_relative_to_batch_maximum() {
        let missions = vec![
            // 1 airport + 1 town = 9 points
            with_airports(mission("small", Some("Small"), 1), 1),
            // 2 airports + 2 towns = 18 points
            with_airports(mission("big", Some("Big"), 2), 2),
        ];
        let doc = render_comparison_table(&missions).unwrap();
        let small = doc.lines().find(|l| l.contains("Small")).unwrap();
        let big = doc.lines().find(|l| l.contains("Big")).unwrap();
        assert!(small.ends_with("| 1 | 0.50 |"), "{small:?}");
        assert!(big.ends_with("| 2 | 1.00 |"), "{big:?}");
    }

    #[test]
    fn test_header_and_footnotes_present() {
        let doc = render_comparison_table(&[]).unwrap();
        assert!(doc.contains("| Map | Climate |"));
        assert!(doc.contains("| :--- | :--- | ---: |"));
        assert!(doc.contains("- 0 maps"));
        assert!(doc.contains("[^1]:"));
        assert!(doc.contains("[^2]:"));
    }
}
