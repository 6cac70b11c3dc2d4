//! Scene persistence
//!
//! Scenes are stored as plain nested JSON records, the same shape the data
//! model serializes to. Load and save go through buffered readers/writers;
//! failures carry enough context to show the user which file misbehaved.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;

use crate::model::Scene;

/// Load a scene from a JSON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open plan file {}", path.display()))?;
    let reader = BufReader::new(file);
    let scene = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse plan file {}", path.display()))?;
    Ok(scene)
}

/// Write a scene to a JSON file, pretty-printed
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create plan file {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, scene)
        .with_context(|| format!("failed to write plan file {}", path.display()))?;
    Ok(())
}
