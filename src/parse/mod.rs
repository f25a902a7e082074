pub mod map_info;
pub mod scanner;
pub mod sqm;

pub use map_info::{parse_map_info, MapInfo};
pub use scanner::Scanner;
pub use sqm::{parse_class_file, parse_mission_markers, ClassNode, MarkerNode, Value};
