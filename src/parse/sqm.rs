//! Parser for `mission.sqm` and other Arma class-hierarchy files.
//!
//! Handles the plain-text subset the editor emits: nested `class` blocks,
//! scalar and array property assignments, quoted strings with doubled-quote
//! escapes, numbers, and comments. Binarized files fail to parse and are
//! reported as such by the caller.

use indexmap::IndexMap;

use super::scanner::Scanner;
use crate::error::{Error, Result};
use crate::mission::marker::MarkerKind;

/// A property value in a class hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// One `class` block: named properties in source order plus child classes.
#[derive(Debug, Clone, Default)]
pub struct ClassNode {
    pub name: String,
    pub properties: IndexMap<String, Value>,
    pub classes: Vec<ClassNode>,
}

impl ClassNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// First child class with the given name.
    pub fn class(&self, name: &str) -> Option<&ClassNode> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn str_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }
}

/// Parses a whole class-hierarchy file. The returned node is a synthetic
/// unnamed root holding the file's top-level properties and classes.
pub fn parse_class_file(src: &str) -> Result<ClassNode> {
    let mut scanner = Scanner::new(src);
    let mut root = ClassNode::default();
    parse_body(&mut scanner, &mut root, true)?;
    Ok(root)
}

fn parse_body(s: &mut Scanner, node: &mut ClassNode, top_level: bool) -> Result<()> {
    loop {
        s.skip_trivia()?;
        match s.peek() {
            None if top_level => return Ok(()),
            None => return Err(s.err("unexpected end of input in class body")),
            Some(b'}') if !top_level => return Ok(()),
            Some(b'}') => return Err(s.err("unexpected `}` at top level")),
            _ => parse_statement(s, node)?,
        }
    }
}

fn parse_statement(s: &mut Scanner, node: &mut ClassNode) -> Result<()> {
    let name = s.ident()?;
    if name == "class" {
        let class_name = s.ident()?;
        let mut child = ClassNode::named(class_name);
        if s.eat(b':')? {
            // base class name; inheritance carries nothing we analyse
            s.ident()?;
        }
        s.skip_trivia()?;
        match s.peek() {
            Some(b'{') => {
                s.expect(b'{')?;
                parse_body(s, &mut child, false)?;
                s.expect(b'}')?;
                s.expect(b';')?;
            }
            // forward declaration `class X;` registers an empty class
            Some(b';') => {
                s.expect(b';')?;
            }
            _ => return Err(s.err(format!("expected `{{` or `;` after `class {class_name}`"))),
        }
        node.classes.push(child);
    } else {
        let is_array = s.eat(b'[')?;
        if is_array {
            s.expect(b']')?;
        }
        s.expect(b'=')?;
        let value = if is_array {
            s.expect(b'{')?;
            Value::Array(parse_array_items(s)?)
        } else {
            parse_scalar(s)?
        };
        s.expect(b';')?;
        node.properties.insert(name.to_string(), value);
    }
    Ok(())
}

fn parse_scalar(s: &mut Scanner) -> Result<Value> {
    s.skip_trivia()?;
    match s.peek() {
        Some(b'"') => Ok(Value::Str(s.quoted_string()?)),
        Some(b) if b == b'-' || b == b'+' || b == b'.' || b.is_ascii_digit() => {
            let token = s.number_token()?;
            parse_number(token).ok_or_else(|| s.err(format!("invalid number `{token}`")))
        }
        Some(b) => Err(s.err(format!("expected value, found `{}`", b as char))),
        None => Err(s.err("expected value, found end of input")),
    }
}

fn parse_number(token: &str) -> Option<Value> {
    if token.contains(['.', 'e', 'E']) {
        token.parse::<f64>().ok().map(Value::Float)
    } else {
        token.parse::<i64>().ok().map(Value::Int)
    }
}

/// Parses array items after the opening `{`, consuming the closing `}`.
/// Tolerates a trailing comma, which editor exports sometimes emit.
fn parse_array_items(s: &mut Scanner) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    if s.eat(b'}')? {
        return Ok(items);
    }
    loop {
        let item = if s.eat(b'{')? {
            Value::Array(parse_array_items(s)?)
        } else {
            parse_scalar(s)?
        };
        items.push(item);
        if s.eat(b',')? {
            if s.eat(b'}')? {
                return Ok(items);
            }
        } else {
            s.expect(b'}')?;
            return Ok(items);
        }
    }
}

/// A marker entity lifted out of the mission hierarchy: its name and
/// raw game-engine position array.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    pub name: String,
    pub position: Vec<f64>,
}

/// Extracts military-zone marker nodes from mission file text.
///
/// Walks `Mission` → `Entities`, descending through `Layer` entities,
/// and keeps `Marker` entities whose name carries a known zone prefix.
/// Everything else in the file is ignored.
pub fn parse_mission_markers(src: &str) -> Result<Vec<MarkerNode>> {
    let root = parse_class_file(src)?;
    let mission = root
        .class("Mission")
        .ok_or(Error::MissingField("Mission"))?;
    let mut nodes = Vec::new();
    collect_marker_nodes(mission, &mut nodes);
    Ok(nodes)
}

fn collect_marker_nodes(node: &ClassNode, out: &mut Vec<MarkerNode>) {
    let Some(entities) = node.class("Entities") else {
        return;
    };
    for entity in &entities.classes {
        match entity.str_property("dataType") {
            Some("Marker") => {
                let name = entity.str_property("name").unwrap_or_default();
                if MarkerKind::from_marker_name(name).is_none() {
                    continue;
                }
                let position = entity
                    .property("position")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(Value::as_f64).collect())
                    .unwrap_or_default();
                out.push(MarkerNode {
                    name: name.to_string(),
                    position,
                });
            }
            Some("Layer") => collect_marker_nodes(entity, out),
            _ => {}
        }
    }
}
