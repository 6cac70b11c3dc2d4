//! Editable floor-plan data model
//!
//! This module contains the persisted records (scene, layers, vertices,
//! lines, holes, areas, guides, groups) and the low-level mutation
//! primitives the pure operations in `graph`, `rooms` and `walls` build on.
//!
//! # Submodules
//! - `types` - the plain serde records
//! - `layer` - layer mutation primitives and reference-counted vertex lifetime
//! - `scene` - the top-level scene container

mod layer;
mod scene;
mod types;

pub use scene::Scene;
pub use types::{Area, Group, Guide, Hole, Layer, Line, PropertyMap, Vertex};
