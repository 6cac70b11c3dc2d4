//! Layer mutation primitives
//!
//! Vertices are shared by reference: every line endpoint and area corner
//! holds the vertex id, and the vertex holds the owner sets back. A vertex
//! is dropped the instant both owner sets empty out, unless it is pinned by
//! an in-flight edit. All higher-level operations go through these
//! primitives so the bookkeeping stays in one place.

use crate::error::PlanError;
use crate::geometry::{distance, same_point, Point};
use crate::model::types::{Area, Hole, Layer, Line, PropertyMap, Vertex};

impl Layer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vertices: Default::default(),
            lines: Default::default(),
            holes: Default::default(),
            areas: Default::default(),
            groups: Default::default(),
            next_id: 0,
        }
    }

    pub(crate) fn alloc_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    pub fn vertex(&self, id: &str) -> Result<&Vertex, PlanError> {
        self.vertices
            .get(id)
            .ok_or_else(|| PlanError::MissingVertex(id.to_string()))
    }

    pub fn line(&self, id: &str) -> Result<&Line, PlanError> {
        self.lines
            .get(id)
            .ok_or_else(|| PlanError::MissingLine(id.to_string()))
    }

    pub fn area(&self, id: &str) -> Result<&Area, PlanError> {
        self.areas
            .get(id)
            .ok_or_else(|| PlanError::MissingArea(id.to_string()))
    }

    pub fn hole(&self, id: &str) -> Result<&Hole, PlanError> {
        self.holes
            .get(id)
            .ok_or_else(|| PlanError::MissingHole(id.to_string()))
    }

    /// Endpoint coordinates of a line
    pub fn line_points(&self, line: &Line) -> Result<(Point, Point), PlanError> {
        let a = self.vertex(&line.vertices[0])?.point();
        let b = self.vertex(&line.vertices[1])?.point();
        Ok((a, b))
    }

    pub fn line_length(&self, line: &Line) -> Result<f32, PlanError> {
        let (a, b) = self.line_points(line)?;
        Ok(distance(a, b))
    }

    /// Absolute center position of a hole along its owning line
    pub fn hole_center(&self, hole: &Hole) -> Result<Point, PlanError> {
        let line = self.line(&hole.line)?;
        let (a, b) = self.line_points(line)?;
        Ok(Point::new(
            a.x + (b.x - a.x) * hole.offset,
            a.y + (b.y - a.y) * hole.offset,
        ))
    }

    /// The existing vertex at these coordinates, if any
    pub fn find_vertex_at(&self, p: Point) -> Option<&Vertex> {
        self.vertices.values().find(|v| same_point(v.point(), p))
    }

    /// Reuse the vertex already at `p` or create a new one
    pub fn add_or_reuse_vertex(&mut self, p: Point) -> String {
        if let Some(v) = self.find_vertex_at(p) {
            return v.id.clone();
        }
        let id = self.alloc_id();
        self.vertices.insert(
            id.clone(),
            Vertex {
                id: id.clone(),
                x: p.x,
                y: p.y,
                lines: Default::default(),
                areas: Default::default(),
                pinned: false,
            },
        );
        id
    }

    /// Move a vertex, as a drag does. Consolidation of vertices dropped on
    /// top of each other happens separately at drag-end.
    pub fn move_vertex(&mut self, id: &str, x: f32, y: f32) -> Result<(), PlanError> {
        let v = self
            .vertices
            .get_mut(id)
            .ok_or_else(|| PlanError::MissingVertex(id.to_string()))?;
        v.x = x;
        v.y = y;
        Ok(())
    }

    /// Keep a vertex alive through an in-flight edit
    pub fn pin_vertex(&mut self, id: &str) -> Result<(), PlanError> {
        self.vertices
            .get_mut(id)
            .map(|v| v.pinned = true)
            .ok_or_else(|| PlanError::MissingVertex(id.to_string()))
    }

    /// Release the pin; an orphaned vertex is dropped on the spot
    pub fn unpin_vertex(&mut self, id: &str) -> Result<(), PlanError> {
        let v = self
            .vertices
            .get_mut(id)
            .ok_or_else(|| PlanError::MissingVertex(id.to_string()))?;
        v.pinned = false;
        self.drop_vertex_if_orphan(id);
        Ok(())
    }

    fn drop_vertex_if_orphan(&mut self, id: &str) {
        let drop = self
            .vertices
            .get(id)
            .map(|v| v.is_orphan() && !v.pinned)
            .unwrap_or(false);
        if drop {
            self.vertices.shift_remove(id);
        }
    }

    pub(crate) fn detach_line_from_vertex(&mut self, vertex_id: &str, line_id: &str) {
        if let Some(v) = self.vertices.get_mut(vertex_id) {
            v.lines.shift_remove(line_id);
        }
        self.drop_vertex_if_orphan(vertex_id);
    }

    pub(crate) fn detach_area_from_vertex(&mut self, vertex_id: &str, area_id: &str) {
        if let Some(v) = self.vertices.get_mut(vertex_id) {
            v.areas.shift_remove(area_id);
        }
        self.drop_vertex_if_orphan(vertex_id);
    }

    /// Insert a line between two points, reusing coincident vertices.
    /// Returns `None` without touching the layer when the endpoints collapse
    /// onto the same vertex.
    pub fn add_line(
        &mut self,
        a: Point,
        b: Point,
        thickness: f32,
        properties: PropertyMap,
    ) -> Option<String> {
        let va = self.add_or_reuse_vertex(a);
        let vb = self.add_or_reuse_vertex(b);
        if va == vb {
            self.drop_vertex_if_orphan(&va);
            return None;
        }

        let id = self.alloc_id();
        self.lines.insert(
            id.clone(),
            Line {
                id: id.clone(),
                vertices: [va.clone(), vb.clone()],
                thickness,
                holes: Vec::new(),
                properties,
            },
        );
        self.vertices[&va].lines.insert(id.clone());
        self.vertices[&vb].lines.insert(id.clone());
        Some(id)
    }

    /// Remove a line, its holes, its group memberships and its vertex
    /// back-references
    pub fn remove_line(&mut self, id: &str) -> Result<Line, PlanError> {
        let line = self
            .lines
            .shift_remove(id)
            .ok_or_else(|| PlanError::MissingLine(id.to_string()))?;

        for hole_id in &line.holes {
            self.holes.shift_remove(hole_id);
        }
        for group in self.groups.values_mut() {
            group.elements.shift_remove(id);
        }
        let [va, vb] = line.vertices.clone();
        self.detach_line_from_vertex(&va, id);
        self.detach_line_from_vertex(&vb, id);
        Ok(line)
    }

    /// Attach a hole to a line at a normalized offset (clamped into [0, 1])
    pub fn add_hole(
        &mut self,
        line_id: &str,
        offset: f32,
        width: f32,
        properties: PropertyMap,
    ) -> Result<String, PlanError> {
        if !self.lines.contains_key(line_id) {
            return Err(PlanError::MissingLine(line_id.to_string()));
        }
        let id = self.alloc_id();
        self.holes.insert(
            id.clone(),
            Hole {
                id: id.clone(),
                line: line_id.to_string(),
                offset: offset.clamp(0.0, 1.0),
                width,
                properties,
            },
        );
        self.lines[line_id].holes.push(id.clone());
        Ok(id)
    }

    pub fn remove_hole(&mut self, id: &str) -> Result<Hole, PlanError> {
        let hole = self
            .holes
            .shift_remove(id)
            .ok_or_else(|| PlanError::MissingHole(id.to_string()))?;
        if let Some(line) = self.lines.get_mut(&hole.line) {
            line.holes.retain(|h| h != id);
        }
        Ok(hole)
    }

    /// Create an area over existing vertices (the manual, flood-fill style
    /// entry point; detected rooms go through the room detector instead)
    pub fn add_area(
        &mut self,
        vertex_ids: Vec<String>,
        properties: PropertyMap,
    ) -> Result<String, PlanError> {
        let id = self.alloc_id();
        self.insert_area(Area {
            id: id.clone(),
            vertices: vertex_ids,
            holes: Vec::new(),
            properties,
        })?;
        Ok(id)
    }

    pub(crate) fn insert_area(&mut self, area: Area) -> Result<(), PlanError> {
        for vid in &area.vertices {
            if !self.vertices.contains_key(vid) {
                return Err(PlanError::MissingVertex(vid.clone()));
            }
        }
        for vid in &area.vertices {
            self.vertices[vid].areas.insert(area.id.clone());
        }
        self.areas.insert(area.id.clone(), area);
        Ok(())
    }

    pub fn remove_area(&mut self, id: &str) -> Result<Area, PlanError> {
        let area = self
            .areas
            .shift_remove(id)
            .ok_or_else(|| PlanError::MissingArea(id.to_string()))?;
        for vid in area.vertices.clone() {
            self.detach_area_from_vertex(&vid, id);
        }
        Ok(area)
    }
}
