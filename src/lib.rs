//! Antistasi Maps
//!
//! A Rust library for extracting per-map data from Antistasi-style
//! mission sources, reconciling it against grad_meh geodata exports and
//! curated reference tables, and rendering the results for publication.

pub mod batch;
pub mod error;
pub mod geodata;
pub mod mission;
pub mod names;
pub mod parse;
pub mod reference;
pub mod report;
pub mod table;

pub use error::{Error, Result};
pub use batch::{run as run_batch, BatchOptions, BatchSummary};
pub use geodata::{Feature, SettlementKind};
pub use mission::{
    Marker, MarkerKind, Mission, Position,
    MAP_INFO_FILENAME, MISSION_FILENAME,
};
pub use parse::{MapInfo, MarkerNode};
pub use reference::{MapIndexEntry, ReferenceData, ZoneReference};
pub use report::{Finding, FindingKind, Report, Severity};
pub use table::render_comparison_table;
