//! Anchored parser for `mapInfo.hpp` map metadata.
//!
//! Metadata files lean on preprocessor macros (`GVAR(...)`, includes)
//! that a full config parse would choke on, so this parser searches for
//! the three field anchors it needs and parses only their bodies:
//!
//! * `climate = "<str>";` (mandatory)
//! * `population[] = { {"<town>", <count>}, ... };` (optional)
//! * `disabledTowns[] = { "<town>", ... };` (optional)
//!
//! An anchor whose body then fails to parse is an error, not a silent
//! absence, so quiet data loss from a typo in the field body cannot
//! happen.

use std::path::Path;

use super::scanner::Scanner;
use crate::error::{Error, Result};

/// The analysis-relevant contents of a map metadata file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapInfo {
    pub climate: String,
    /// `(raw town name, population count)` in file order, duplicates
    /// preserved.
    pub populations: Vec<(String, u32)>,
    /// Raw `disabledTowns` entries, unnormalized.
    pub disabled_towns: Vec<String>,
}

/// Reads and parses a map metadata file.
pub fn load_map_info(path: &Path) -> Result<MapInfo> {
    let src = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_map_info(&src)
}

pub fn parse_map_info(src: &str) -> Result<MapInfo> {
    let climate = find_climate(src)?.ok_or(Error::MissingField("climate"))?;
    let populations = find_population(src)?.unwrap_or_default();
    let disabled_towns = find_disabled_towns(src)?.unwrap_or_default();
    Ok(MapInfo {
        climate,
        populations,
        disabled_towns,
    })
}

/// Byte offsets where `field` occurs as a standalone identifier.
fn field_starts(src: &str, field: &str) -> Vec<usize> {
    let bytes = src.as_bytes();
    src.match_indices(field)
        .filter(|&(idx, _)| {
            let before_ok = idx == 0 || !is_ident_byte(bytes[idx - 1]);
            let after = idx + field.len();
            let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
            before_ok && after_ok
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn malformed(field: &'static str, err: &Error) -> Error {
    Error::MalformedField {
        field,
        message: err.to_string(),
    }
}

fn find_climate(src: &str) -> Result<Option<String>> {
    for start in field_starts(src, "climate") {
        let mut s = Scanner::new(&src[start + "climate".len()..]);
        if !matches!(s.eat(b'='), Ok(true)) {
            continue;
        }
        if s.skip_trivia().is_err() || s.peek() != Some(b'"') {
            continue;
        }
        // committed: this occurrence is the climate assignment
        let value = s.quoted_string().map_err(|e| malformed("climate", &e))?;
        s.expect(b';').map_err(|e| malformed("climate", &e))?;
        return Ok(Some(value));
    }
    Ok(None)
}

fn find_population(src: &str) -> Result<Option<Vec<(String, u32)>>> {
    for start in field_starts(src, "population") {
        let Some(mut s) = array_body(src, start + "population".len()) else {
            continue;
        };
        return parse_population_items(&mut s)
            .map(Some)
            .map_err(|e| malformed("population", &e));
    }
    Ok(None)
}

fn find_disabled_towns(src: &str) -> Result<Option<Vec<String>>> {
    for start in field_starts(src, "disabledTowns") {
        let Some(mut s) = array_body(src, start + "disabledTowns".len()) else {
            continue;
        };
        return parse_string_items(&mut s)
            .map(Some)
            .map_err(|e| malformed("disabledTowns", &e));
    }
    Ok(None)
}

/// Commits to an `[] = {` array header following an anchor; the returned
/// scanner is positioned just inside the opening brace.
fn array_body(src: &str, offset: usize) -> Option<Scanner<'_>> {
    let mut s = Scanner::new(&src[offset..]);
    for expected in [b'[', b']', b'=', b'{'] {
        if !matches!(s.eat(expected), Ok(true)) {
            return None;
        }
    }
    Some(s)
}

/// `{"<town>", <count>}` groups, comma-separated, through the closing
/// `};`. Tolerates a trailing comma and an empty list.
fn parse_population_items(s: &mut Scanner) -> Result<Vec<(String, u32)>> {
    let mut entries = Vec::new();
    if s.eat(b'}')? {
        s.expect(b';')?;
        return Ok(entries);
    }
    loop {
        s.expect(b'{')?;
        let name = s.quoted_string()?;
        s.expect(b',')?;
        let token = s.number_token()?;
        let count: u32 = token
            .parse()
            .map_err(|_| s.err(format!("invalid population count `{token}`")))?;
        s.expect(b'}')?;
        entries.push((name, count));
        if s.eat(b',')? {
            if s.eat(b'}')? {
                break;
            }
        } else {
            s.expect(b'}')?;
            break;
        }
    }
    s.expect(b';')?;
    Ok(entries)
}

/// String items, comma-separated, through the closing `};`.
fn parse_string_items(s: &mut Scanner) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    if s.eat(b'}')? {
        s.expect(b';')?;
        return Ok(entries);
    }
    loop {
        entries.push(s.quoted_string()?);
        if s.eat(b',')? {
            if s.eat(b'}')? {
                break;
            }
        } else {
            s.expect(b'}')?;
            break;
        }
    }
    s.expect(b';')?;
    Ok(entries)
}
