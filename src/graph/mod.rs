//! Planar graph maintenance
//!
//! The operations here keep a layer's line set planar while the user draws
//! and drags: new lines absorb colinear overlaps and split anything they
//! cross, drag-end consolidation merges coincident vertices, and degenerate
//! zero-length lines are swept out. Every public operation is a pure
//! `(layer) -> layer'` transformation; the input layer is never touched.

use tracing::debug;

use crate::error::PlanError;
use crate::geometry::{
    distance, point_on_segment, same_point, segment_relation, Point, SegmentRelation, EPS,
};
use crate::model::{Layer, PropertyMap};

/// A hole detached from its line, remembered by absolute position so it can
/// be re-attached to whichever sub-segment it lands on
#[derive(Debug, Clone)]
pub struct CarriedHole {
    pub center: Point,
    pub width: f32,
    pub properties: PropertyMap,
}

/// AABB of a segment, inflated by the shared tolerance
fn seg_bounds(p: Point, q: Point) -> [f32; 4] {
    [
        p.x.min(q.x) - EPS,
        p.y.min(q.y) - EPS,
        p.x.max(q.x) + EPS,
        p.y.max(q.y) + EPS,
    ]
}

fn bounds_overlap(a: [f32; 4], b: [f32; 4]) -> bool {
    !(a[2] < b[0] || b[2] < a[0] || a[3] < b[1] || b[3] < a[1])
}

/// Insert a wall segment while preserving planarity.
///
/// Existing lines colinear-overlapping the new run are absorbed into it
/// (their holes re-attached by absolute position); lines properly crossed
/// at an interior point are split there. The new run is subdivided at every
/// junction that still carries geometry, so the settled layer has no
/// undetected overlaps or crossings.
///
/// A degenerate zero-length request is a no-op, not an error.
pub fn add_line_avoiding_intersections(
    layer: &Layer,
    a: Point,
    b: Point,
    thickness: f32,
    properties: PropertyMap,
    carried_holes: Vec<CarriedHole>,
) -> Result<(Layer, Vec<String>), PlanError> {
    let mut next = layer.clone();
    if same_point(a, b) {
        return Ok((next, Vec::new()));
    }

    let mut points = vec![a, b];
    let mut carried = carried_holes;
    let bounds = seg_bounds(a, b);

    let mut absorbed = 0usize;
    let mut splits = 0usize;

    let existing: Vec<String> = next.lines.keys().cloned().collect();
    for line_id in existing {
        let line = match next.lines.get(&line_id) {
            Some(l) => l.clone(),
            None => continue,
        };
        let (p0, p1) = next.line_points(&line)?;
        if !bounds_overlap(bounds, seg_bounds(p0, p1)) {
            continue;
        }

        match segment_relation(a, b, p0, p1) {
            SegmentRelation::ColinearOverlap => {
                // Absorb the overlapping run: remember its holes by absolute
                // position and let its endpoints extend the new run
                for hole_id in &line.holes {
                    let hole = next.hole(hole_id)?.clone();
                    let center = next.hole_center(&hole)?;
                    carried.push(CarriedHole {
                        center,
                        width: hole.width,
                        properties: hole.properties,
                    });
                }
                next.remove_line(&line_id)?;
                points.push(p0);
                points.push(p1);
                absorbed += 1;
            }
            SegmentRelation::Intersect(pt) => {
                let shares_endpoint = same_point(a, p0)
                    || same_point(a, p1)
                    || same_point(b, p0)
                    || same_point(b, p1);
                let interior_of_existing = !same_point(pt, p0) && !same_point(pt, p1);
                if interior_of_existing && !shares_endpoint {
                    split_line_in_place(&mut next, &line_id, pt)?;
                    points.push(pt);
                    splits += 1;
                } else if !interior_of_existing {
                    // The new run passes over an existing endpoint vertex;
                    // subdivide there so the graphs join up
                    points.push(pt);
                }
            }
            SegmentRelation::None => {}
        }
    }

    if absorbed > 0 || splits > 0 {
        debug!(absorbed, splits, "resolved conflicts for new line");
    }

    points.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));
    points.dedup_by(|p, q| same_point(*p, *q));

    // Interior candidates only subdivide the run where a vertex still
    // carries lines; endpoints of absorbed colinear runs that connect to
    // nothing just extend the new line instead of fragmenting it
    let last = points.len() - 1;
    let kept: Vec<Point> = points
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            *i == 0
                || *i == last
                || next
                    .vertices
                    .values()
                    .any(|v| !v.lines.is_empty() && same_point(v.point(), **p))
        })
        .map(|(_, p)| *p)
        .collect();

    let mut created = Vec::new();
    for pair in kept.windows(2) {
        if let Some(id) = next.add_line(pair[0], pair[1], thickness, properties.clone()) {
            created.push(id);
        }
    }

    for ch in carried {
        for line_id in &created {
            let line = next.line(line_id)?.clone();
            let (p0, p1) = next.line_points(&line)?;
            if point_on_segment(ch.center, p0, p1) {
                let len = distance(p0, p1);
                let offset = if len > EPS {
                    distance(p0, ch.center) / len
                } else {
                    0.0
                };
                next.add_hole(line_id, offset, ch.width, ch.properties.clone())?;
                break;
            }
        }
    }

    Ok((next, created))
}

/// Replace one line with two lines sharing a new vertex at `at`.
///
/// Holes are redistributed by comparing their offset against the split
/// offset and re-normalized onto their half; group memberships of the
/// parent carry over to both children. Splitting at (or within tolerance
/// of) an endpoint leaves the layer unchanged.
pub fn split_line(
    layer: &Layer,
    line_id: &str,
    at: Point,
) -> Result<(Layer, Vec<String>), PlanError> {
    let mut next = layer.clone();
    let created = split_line_in_place(&mut next, line_id, at)?;
    Ok((next, created))
}

pub(crate) fn split_line_in_place(
    layer: &mut Layer,
    line_id: &str,
    at: Point,
) -> Result<Vec<String>, PlanError> {
    let line = layer.line(line_id)?.clone();
    let (p0, p1) = layer.line_points(&line)?;
    let len = distance(p0, p1);
    if len <= EPS || same_point(p0, at) || same_point(p1, at) {
        return Ok(Vec::new());
    }
    let t_split = (distance(p0, at) / len).clamp(0.0, 1.0);

    let parent_groups: Vec<String> = layer
        .groups
        .iter()
        .filter(|(_, g)| g.elements.contains(line_id))
        .map(|(gid, _)| gid.clone())
        .collect();

    let mut hole_data = Vec::new();
    for hid in &line.holes {
        let h = layer.hole(hid)?;
        hole_data.push((h.offset, h.width, h.properties.clone()));
    }

    // Pin the endpoints so their ids survive the swap
    let [v0, v1] = line.vertices.clone();
    layer.pin_vertex(&v0)?;
    layer.pin_vertex(&v1)?;
    layer.remove_line(line_id)?;

    let mut created = Vec::new();
    if let Some(id) = layer.add_line(p0, at, line.thickness, line.properties.clone()) {
        created.push(id);
    }
    if let Some(id) = layer.add_line(at, p1, line.thickness, line.properties.clone()) {
        created.push(id);
    }

    if created.len() == 2 {
        for (offset, width, props) in hole_data {
            if offset < t_split {
                layer.add_hole(&created[0], offset / t_split, width, props)?;
            } else {
                layer.add_hole(&created[1], (offset - t_split) / (1.0 - t_split), width, props)?;
            }
        }
    } else if created.len() == 1 {
        for (offset, width, props) in hole_data {
            layer.add_hole(&created[0], offset, width, props)?;
        }
    }

    for gid in parent_groups {
        if let Some(group) = layer.groups.get_mut(&gid) {
            for child in &created {
                group.elements.insert(child.clone());
            }
        }
    }

    layer.unpin_vertex(&v0)?;
    layer.unpin_vertex(&v1)?;
    Ok(created)
}

/// Fold every vertex coincident with `vertex_id` into it.
///
/// Lines and areas referencing a duplicate are re-pointed at the canonical
/// vertex; duplicates left without references are deleted, as are lines
/// whose two endpoints collapse onto the same vertex. Called after every
/// drag-end to consolidate vertices dropped on top of each other.
pub fn merge_equal_vertices(layer: &Layer, vertex_id: &str) -> Result<Layer, PlanError> {
    let mut next = layer.clone();
    let target_point = next.vertex(vertex_id)?.point();
    next.pin_vertex(vertex_id)?;

    let duplicates: Vec<String> = next
        .vertices
        .values()
        .filter(|v| v.id != vertex_id && same_point(v.point(), target_point))
        .map(|v| v.id.clone())
        .collect();

    let mut merged = 0usize;
    for dup in &duplicates {
        let dup_lines: Vec<String> = next.vertices[dup].lines.iter().cloned().collect();
        let dup_areas: Vec<String> = next.vertices[dup].areas.iter().cloned().collect();

        for line_id in dup_lines {
            next.vertices[dup].lines.shift_remove(&line_id);
            let mut collapsed = false;
            if let Some(line) = next.lines.get_mut(&line_id) {
                for slot in line.vertices.iter_mut() {
                    if *slot == *dup {
                        *slot = vertex_id.to_string();
                    }
                }
                collapsed = line.vertices[0] == line.vertices[1];
            }
            if collapsed {
                next.remove_line(&line_id)?;
            } else {
                next.vertices[vertex_id].lines.insert(line_id.clone());
            }
        }

        for area_id in dup_areas {
            next.vertices[dup].areas.shift_remove(&area_id);
            if let Some(area) = next.areas.get_mut(&area_id) {
                for slot in area.vertices.iter_mut() {
                    if *slot == *dup {
                        *slot = vertex_id.to_string();
                    }
                }
            }
            next.vertices[vertex_id].areas.insert(area_id.clone());
        }

        if next.vertices.get(dup).map(|v| v.is_orphan()).unwrap_or(false) {
            next.vertices.shift_remove(dup);
            merged += 1;
        }
    }

    if merged > 0 {
        debug!(merged, vertex = vertex_id, "consolidated coincident vertices");
    }

    next.unpin_vertex(vertex_id)?;
    Ok(next)
}

/// Delete every line whose endpoints are within tolerance of each other
pub fn remove_zero_length_lines(layer: &Layer) -> Layer {
    let mut next = layer.clone();
    let doomed: Vec<String> = next
        .lines
        .values()
        .filter_map(|line| {
            let (a, b) = next.line_points(line).ok()?;
            (distance(a, b) <= EPS).then(|| line.id.clone())
        })
        .collect();
    for id in doomed {
        let _ = next.remove_line(&id);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Group;

    fn empty_layer() -> Layer {
        Layer::new("layer-1", "default")
    }

    #[test]
    fn test_colinear_overlap_merges_into_one_line() {
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(5.0, 0.0),
                Point::new(15.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();

        let (layer, created) = add_line_avoiding_intersections(
            &layer,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2.0,
            PropertyMap::new(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(layer.lines.len(), 1);
        let line = layer.line(&created[0]).unwrap();
        let (a, b) = layer.line_points(line).unwrap();
        let (lo, hi) = if a.x < b.x { (a, b) } else { (b, a) };
        assert!(same_point(lo, Point::new(0.0, 0.0)));
        assert!(same_point(hi, Point::new(15.0, 0.0)));
    }

    #[test]
    fn test_crossing_splits_both_lines() {
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(5.0, -5.0),
                Point::new(5.0, 5.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();

        let (layer, created) = add_line_avoiding_intersections(
            &layer,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2.0,
            PropertyMap::new(),
            Vec::new(),
        )
        .unwrap();

        // Existing vertical line split in two, new run split in two
        assert_eq!(created.len(), 2);
        assert_eq!(layer.lines.len(), 4);
        let crossing = layer.find_vertex_at(Point::new(5.0, 0.0)).unwrap();
        assert_eq!(crossing.lines.len(), 4);
    }

    #[test]
    fn test_new_line_joins_existing_endpoint() {
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(5.0, 0.0),
                Point::new(5.0, 5.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();

        let (layer, created) = add_line_avoiding_intersections(
            &layer,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2.0,
            PropertyMap::new(),
            Vec::new(),
        )
        .unwrap();

        // The run is subdivided at the T-junction vertex
        assert_eq!(created.len(), 2);
        let junction = layer.find_vertex_at(Point::new(5.0, 0.0)).unwrap();
        assert_eq!(junction.lines.len(), 3);
    }

    #[test]
    fn test_carried_holes_reattach_by_position() {
        let mut layer = empty_layer();
        let old = layer
            .add_line(
                Point::new(5.0, 0.0),
                Point::new(15.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        // Hole centered at x = 10
        layer.add_hole(&old, 0.5, 2.0, PropertyMap::new()).unwrap();

        let (layer, created) = add_line_avoiding_intersections(
            &layer,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2.0,
            PropertyMap::new(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(layer.holes.len(), 1);
        let hole = layer.holes.values().next().unwrap().clone();
        let center = layer.hole_center(&hole).unwrap();
        assert!(same_point(center, Point::new(10.0, 0.0)));
        // 10 along a 15-long line
        assert!((hole.offset - 10.0 / 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_split_redistributes_holes_and_groups() {
        let mut layer = empty_layer();
        let line = layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        layer.add_hole(&line, 0.2, 1.0, PropertyMap::new()).unwrap();
        layer.add_hole(&line, 0.8, 1.0, PropertyMap::new()).unwrap();
        layer.groups.insert(
            "g1".to_string(),
            Group {
                id: "g1".to_string(),
                name: "walls".to_string(),
                elements: [line.clone()].into_iter().collect(),
            },
        );

        let (layer, created) = split_line(&layer, &line, Point::new(4.0, 0.0)).unwrap();
        assert_eq!(created.len(), 2);

        // Both children inherit the group
        let group = &layer.groups["g1"];
        assert!(group.elements.contains(&created[0]));
        assert!(group.elements.contains(&created[1]));

        // Hole at x=2 lands on the first half, hole at x=8 on the second,
        // both keeping their absolute position
        let mut centers: Vec<f32> = layer
            .holes
            .values()
            .map(|h| layer.hole_center(h).unwrap().x)
            .collect();
        centers.sort_by(f32::total_cmp);
        assert!((centers[0] - 2.0).abs() < 1e-3);
        assert!((centers[1] - 8.0).abs() < 1e-3);

        let first = layer.line(&created[0]).unwrap();
        assert_eq!(first.holes.len(), 1);
        let h0 = layer.hole(&first.holes[0]).unwrap();
        assert!((h0.offset - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_merge_equal_vertices_consolidates() {
        // Two separate lines; one endpoint is then dragged onto an endpoint
        // of the other, within tolerance
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        layer
            .add_line(
                Point::new(20.0, 20.0),
                Point::new(10.0, 10.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        assert_eq!(layer.vertices.len(), 4);

        let dragged = layer
            .find_vertex_at(Point::new(10.0, 10.0))
            .unwrap()
            .id
            .clone();
        layer.move_vertex(&dragged, 5.001, 5.001).unwrap();

        let target = layer
            .find_vertex_at(Point::new(5.0, 5.0))
            .unwrap()
            .id
            .clone();
        let layer = merge_equal_vertices(&layer, &target).unwrap();

        assert_eq!(layer.vertices.len(), 3);
        let survivor = layer.vertex(&target).unwrap();
        assert_eq!(survivor.lines.len(), 2);
        // No two live vertices remain within tolerance of each other
        let verts: Vec<_> = layer.vertices.values().collect();
        for i in 0..verts.len() {
            for j in (i + 1)..verts.len() {
                assert!(!same_point(verts[i].point(), verts[j].point()));
            }
        }
    }

    #[test]
    fn test_merge_drops_collapsed_lines() {
        // Drag one endpoint of a line onto its other endpoint; the merge
        // folds the vertices together and deletes the collapsed line
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();

        let dragged = layer
            .find_vertex_at(Point::new(10.0, 0.0))
            .unwrap()
            .id
            .clone();
        layer.move_vertex(&dragged, 0.0, 0.0).unwrap();

        let origin = layer.lines.values().next().unwrap().vertices[0].clone();
        let merged = merge_equal_vertices(&layer, &origin).unwrap();

        // The horizontal line collapsed to nothing; the vertical survives
        assert_eq!(merged.lines.len(), 1);
        assert_eq!(merged.vertices.len(), 2);
    }

    #[test]
    fn test_remove_zero_length_lines() {
        let mut layer = empty_layer();
        layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        layer
            .add_line(
                Point::new(10.0, 0.0),
                Point::new(10.0, 8.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();

        // Shrink the vertical line to nothing by dragging its top endpoint
        // down onto the corner
        let top = layer
            .find_vertex_at(Point::new(10.0, 8.0))
            .unwrap()
            .id
            .clone();
        layer.move_vertex(&top, 10.0, 0.005).unwrap();

        let swept = remove_zero_length_lines(&layer);
        assert_eq!(swept.lines.len(), 1);
        // The collapsed line's private endpoint went with it
        assert_eq!(swept.vertices.len(), 2);
    }
}
