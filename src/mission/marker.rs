//! Military-zone marker taxonomy and positions.

use serde::{Deserialize, Serialize};

use crate::parse::sqm::MarkerNode;

/// Military-zone categories, recognized by marker name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Airport,
    Base,
    Waterport,
    Outpost,
    Factory,
    Resource,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::Airport,
        MarkerKind::Base,
        MarkerKind::Waterport,
        MarkerKind::Outpost,
        MarkerKind::Factory,
        MarkerKind::Resource,
    ];

    /// The marker-name prefix missions use for this category.
    pub fn prefix(self) -> &'static str {
        match self {
            MarkerKind::Airport => "airport",
            MarkerKind::Base => "milbase",
            MarkerKind::Waterport => "seaport",
            MarkerKind::Outpost => "outpost",
            MarkerKind::Factory => "factory",
            MarkerKind::Resource => "resource",
        }
    }

    /// Classifies a marker name by case-insensitive prefix match.
    ///
    /// No prefix is a prefix of another, so classification is
    /// unambiguous; names matching nothing are not military zones.
    pub fn from_marker_name(name: &str) -> Option<MarkerKind> {
        let lowered = name.to_lowercase();
        MarkerKind::ALL
            .into_iter()
            .find(|kind| lowered.starts_with(kind.prefix()))
    }
}

/// A world-space position.
///
/// Game files store positions as `{x, z, y}` with the height in the
/// middle; this type holds them in conventional order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Converts a raw game-engine position array.
    ///
    /// Three-element arrays are `{x, z, y}`; two-element arrays are
    /// planar `{x, y}`. Anything shorter maps to the origin.
    pub fn from_game_array(raw: &[f64]) -> Position {
        match raw {
            [x, z, y, ..] => Position {
                x: *x,
                y: *y,
                z: *z,
            },
            [x, y] => Position {
                x: *x,
                y: *y,
                z: 0.0,
            },
            _ => Position {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        }
    }
}

/// A classified military-zone marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub kind: MarkerKind,
    pub position: Position,
}

impl Marker {
    /// Builds a marker from a raw node; `None` when the name matches no
    /// zone category.
    pub fn from_node(node: &MarkerNode) -> Option<Marker> {
        let kind = MarkerKind::from_marker_name(&node.name)?;
        Some(Marker {
            name: node.name.clone(),
            kind,
            position: Position::from_game_array(&node.position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_prefix() {
        assert_eq!(
            MarkerKind::from_marker_name("airport_1"),
            Some(MarkerKind::Airport),
        );
        assert_eq!(
            MarkerKind::from_marker_name("milbase_4"),
            Some(MarkerKind::Base),
        );
        assert_eq!(
            MarkerKind::from_marker_name("seaport"),
            Some(MarkerKind::Waterport),
        );
        assert_eq!(
            MarkerKind::from_marker_name("outpost_3"),
            Some(MarkerKind::Outpost),
        );
        assert_eq!(
            MarkerKind::from_marker_name("factory_9"),
            Some(MarkerKind::Factory),
        );
        assert_eq!(
            MarkerKind::from_marker_name("resource_2"),
            Some(MarkerKind::Resource),
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            MarkerKind::from_marker_name("Seaport"),
            Some(MarkerKind::Waterport),
        );
        assert_eq!(
            MarkerKind::from_marker_name("OUTPOST_7"),
            Some(MarkerKind::Outpost),
        );
        assert_eq!(
            MarkerKind::from_marker_name("FactOry_3"),
            Some(MarkerKind::Factory),
        );
    }

    #[test]
    fn test_non_zone_names_are_rejected() {
        for name in ["respawn_west", "Stodaig_Airfield", "town_5", ""] {
            assert_eq!(MarkerKind::from_marker_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn test_position_from_game_array() {
        let p = Position::from_game_array(&[100.0, 25.0, 200.0]);
        assert_eq!(p, Position { x: 100.0, y: 200.0, z: 25.0 });

        let p = Position::from_game_array(&[100.0, 200.0]);
        assert_eq!(p, Position { x: 100.0, y: 200.0, z: 0.0 });

        let p = Position::from_game_array(&[]);
        assert_eq!(p, Position { x: 0.0, y: 0.0, z: 0.0 });
    }

    #[test]
    fn test_marker_from_node() {
        let node = MarkerNode {
            name: "Seaport_2".into(),
            position: vec![4284.9, 312.3, 2131.4],
        };
        let marker = Marker::from_node(&node).unwrap();
        assert_eq!(marker.kind, MarkerKind::Waterport);
        assert_eq!(marker.position.y, 2131.4);
        assert_eq!(marker.position.z, 312.3);

        let node = MarkerNode {
            name: "respawn_west".into(),
            position: vec![0.0, 0.0, 0.0],
        };
        assert!(Marker::from_node(&node).is_none());
    }
}
