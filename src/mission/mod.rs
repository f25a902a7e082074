pub mod discover;
pub mod marker;
pub mod mission;

pub use discover::{looks_like_mission_dir, map_key_from_dir, mission_dirs};
pub use marker::{Marker, MarkerKind, Position};
pub use mission::{Mission, MAP_INFO_FILENAME, MISSION_FILENAME};
