//! Core records for floor-plan scenes
//!
//! Everything is a plain nested serde record; ids are opaque strings unique
//! within a layer. Vertices carry owner sets (which lines and areas
//! reference them) so their lifetime can be decided locally.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Type-specific extras on lines, holes and areas (height, texture, ...)
pub type PropertyMap = IndexMap<String, serde_json::Value>;

fn is_false(v: &bool) -> bool {
    !*v
}

/// A shared corner point of the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Lines referencing this vertex as an endpoint
    #[serde(default)]
    pub lines: IndexSet<String>,
    /// Areas referencing this vertex in their cycle
    #[serde(default)]
    pub areas: IndexSet<String>,
    /// Kept alive through an in-flight edit even with no owners
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
}

impl Vertex {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True when no line or area references this vertex
    pub fn is_orphan(&self) -> bool {
        self.lines.is_empty() && self.areas.is_empty()
    }
}

/// A wall or partition edge between two vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    /// Ordered endpoint pair; always two distinct existing vertex ids once
    /// an edit settles
    pub vertices: [String; 2],
    pub thickness: f32,
    /// Openings attached to this line, ordered
    #[serde(default)]
    pub holes: Vec<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// An opening (door/window) in a line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    pub id: String,
    /// Owning line id
    pub line: String,
    /// Normalized center position along the owning line, in [0, 1]
    pub offset: f32,
    pub width: f32,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A detected room, or a manually added region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    /// Closed vertex cycle, counter-clockwise
    pub vertices: Vec<String>,
    /// Other areas fully contained in this one
    #[serde(default)]
    pub holes: Vec<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A user-defined bundle of elements that edits keep together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Element ids (lines) belonging to the group
    #[serde(default)]
    pub elements: IndexSet<String>,
}

/// An alignment guide the snap resolver turns into candidates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Guide {
    Horizontal { y: f32 },
    Vertical { x: f32 },
}

/// One editable plane of vertices, lines, holes and areas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertices: IndexMap<String, Vertex>,
    #[serde(default)]
    pub lines: IndexMap<String, Line>,
    #[serde(default)]
    pub holes: IndexMap<String, Hole>,
    #[serde(default)]
    pub areas: IndexMap<String, Area>,
    #[serde(default)]
    pub groups: IndexMap<String, Group>,
    /// Monotonic id source; serialized so reloaded scenes keep allocating
    /// fresh ids
    #[serde(default)]
    pub(crate) next_id: u64,
}
