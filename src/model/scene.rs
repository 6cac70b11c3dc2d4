//! Top-level scene container

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::types::{Guide, Layer};

fn default_grid_spacing() -> f32 {
    20.0
}

/// A whole plan: drawing bounds, layers and alignment guides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Lattice spacing the grid snap candidates are generated at
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f32,
    #[serde(default)]
    pub layers: IndexMap<String, Layer>,
    #[serde(default)]
    pub guides: Vec<Guide>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            grid_spacing: default_grid_spacing(),
            layers: IndexMap::new(),
            guides: Vec::new(),
        }
    }

    /// Insert a fresh empty layer and return a reference to it
    pub fn add_layer(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut Layer {
        let id = id.into();
        let layer = Layer::new(id.clone(), name);
        self.layers.entry(id).or_insert(layer)
    }
}
