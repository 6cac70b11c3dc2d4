//! Room detection
//!
//! Rooms are derived, not drawn: after every topology-changing operation the
//! whole area set of a layer is recomputed from its line graph. Closed faces
//! are found by biconnected-component decomposition plus planar face
//! tracing, the unbounded face is discarded by winding, and containment
//! between the surviving rooms is re-derived from scratch. Areas whose
//! vertex set did not change keep their id, so downstream caches survive.
//!
//! # Submodules
//! - `graph` - arena-indexed ephemeral graph, biconnected components
//! - `faces` - rotation-system face tracing

mod faces;
mod graph;

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::error::PlanError;
use crate::geometry::{edge_sum_area, point_in_polygon, shoelace_area, Point, MIN_CYCLE_LEN};
use crate::model::{Area, Layer};

use faces::trace_faces;
use graph::IndexGraph;

/// Recompute the full area set of a layer from its vertex/line graph.
///
/// A layer with no closed cycle yields zero areas; that is a normal result,
/// not an error. Crossing edges cannot occur here because insertion keeps
/// the line set planar.
pub fn detect_and_update_areas(layer: &Layer) -> Result<Layer, PlanError> {
    let mut next = layer.clone();
    let index = IndexGraph::from_layer(&next)?;
    let components = index.face_candidate_components();

    let mut cycles: Vec<Vec<usize>> = Vec::new();
    for component in &components {
        cycles.extend(trace_faces(&index.points, &index.edges, component));
    }
    cycles.retain(|c| c.len() >= MIN_CYCLE_LEN);

    // Winding classification: every face got one of two signs from the
    // tracer; the outer faces are the minority. On a tie keep the
    // counter-clockwise ones (negative edge sum), the orientation the
    // tracer gives bounded faces.
    let signs: Vec<f32> = cycles
        .iter()
        .map(|cycle| {
            let poly: Vec<Point> = cycle.iter().map(|&n| index.points[n]).collect();
            edge_sum_area(&poly)
        })
        .collect();
    let negative = signs.iter().filter(|s| **s < 0.0).count();
    let positive = signs.iter().filter(|s| **s > 0.0).count();
    let keep_negative = negative >= positive;

    let mut rooms: Vec<Vec<String>> = Vec::new();
    for (cycle, sign) in cycles.iter().zip(&signs) {
        let keep = if keep_negative {
            *sign < 0.0
        } else {
            *sign > 0.0
        };
        if !keep {
            continue;
        }
        let poly: Vec<Point> = cycle.iter().map(|&n| index.points[n]).collect();
        let mut ids: Vec<String> = cycle.iter().map(|&n| index.vertex_ids[n].clone()).collect();
        // Normalize winding to counter-clockwise
        if shoelace_area(&poly) < 0.0 {
            ids.reverse();
        }
        rooms.push(ids);
    }

    debug!(
        components = components.len(),
        faces = cycles.len(),
        rooms = rooms.len(),
        "room detection pass"
    );

    // Identity preservation: a cycle over the same vertex set keeps the
    // existing area's id and properties; only its cycle order and hole
    // list are refreshed
    let mut unmatched: Vec<(BTreeSet<String>, String)> = next
        .areas
        .iter()
        .map(|(id, area)| (area.vertices.iter().cloned().collect(), id.clone()))
        .collect();

    let mut planned: Vec<(Option<String>, Vec<String>)> = Vec::new();
    for cycle in rooms {
        let key: BTreeSet<String> = cycle.iter().cloned().collect();
        let reused = unmatched
            .iter()
            .position(|(k, _)| *k == key)
            .map(|i| unmatched.swap_remove(i).1);
        planned.push((reused, cycle));
    }

    for (_, stale) in unmatched {
        next.remove_area(&stale)?;
    }

    let mut room_ids: Vec<String> = Vec::new();
    for (reused, cycle) in planned {
        match reused {
            Some(id) => {
                let area = next
                    .areas
                    .get_mut(&id)
                    .ok_or_else(|| PlanError::MissingArea(id.clone()))?;
                area.vertices = cycle;
                area.holes.clear();
                room_ids.push(id);
            }
            None => {
                let id = next.alloc_id();
                next.insert_area(Area {
                    id: id.clone(),
                    vertices: cycle,
                    holes: Vec::new(),
                    properties: Default::default(),
                })?;
                room_ids.push(id);
            }
        }
    }

    // Containment: a room with any vertex strictly inside another room is
    // one of its holes
    let mut polygons: HashMap<String, Vec<Point>> = HashMap::with_capacity(room_ids.len());
    for id in &room_ids {
        let mut poly = Vec::new();
        for vid in &next.area(id)?.vertices.clone() {
            poly.push(next.vertex(vid)?.point());
        }
        polygons.insert(id.clone(), poly);
    }

    for outer in &room_ids {
        for inner in &room_ids {
            if outer == inner {
                continue;
            }
            let nested = polygons[inner]
                .iter()
                .any(|&p| point_in_polygon(p, &polygons[outer]));
            if nested {
                next.areas[outer].holes.push(inner.clone());
            }
        }
    }

    // Drop holes already accounted for one level further down, so deep
    // nesting is not subtracted twice
    let holes_of: HashMap<String, HashSet<String>> = room_ids
        .iter()
        .map(|id| (id.clone(), next.areas[id].holes.iter().cloned().collect()))
        .collect();
    for id in &room_ids {
        let own = next.areas[id].holes.clone();
        let retained: Vec<String> = own
            .iter()
            .filter(|h| {
                !own.iter().any(|h2| {
                    h2 != *h
                        && holes_of
                            .get(h2)
                            .map_or(false, |nested| nested.contains(*h))
                })
            })
            .cloned()
            .collect();
        next.areas[id].holes = retained;
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{same_point, Point};
    use crate::model::PropertyMap;

    fn rect(layer: &mut Layer, x0: f32, y0: f32, x1: f32, y1: f32) {
        let corners = [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ];
        for i in 0..4 {
            layer
                .add_line(corners[i], corners[(i + 1) % 4], 2.0, PropertyMap::new())
                .unwrap();
        }
    }

    #[test]
    fn test_single_room() {
        let mut layer = Layer::new("layer-1", "default");
        rect(&mut layer, 0.0, 0.0, 10.0, 10.0);

        let layer = detect_and_update_areas(&layer).unwrap();
        assert_eq!(layer.areas.len(), 1);
        let area = layer.areas.values().next().unwrap();
        assert_eq!(area.vertices.len(), 4);
        assert!(area.holes.is_empty());

        let poly: Vec<Point> = area
            .vertices
            .iter()
            .map(|v| layer.vertex(v).unwrap().point())
            .collect();
        assert!(shoelace_area(&poly) > 0.0, "room cycles are CCW");
    }

    #[test]
    fn test_no_cycle_no_rooms() {
        let mut layer = Layer::new("layer-1", "default");
        layer
            .add_line(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                2.0,
                PropertyMap::new(),
            )
            .unwrap();
        let layer = detect_and_update_areas(&layer).unwrap();
        assert!(layer.areas.is_empty());
    }

    #[test]
    fn test_shared_wall_two_rooms() {
        let mut layer = Layer::new("layer-1", "default");
        let pts = |x: f32, y: f32| Point::new(x, y);
        // Two 5x10 rooms sharing the middle wall
        for (a, b) in [
            (pts(0.0, 0.0), pts(5.0, 0.0)),
            (pts(5.0, 0.0), pts(10.0, 0.0)),
            (pts(10.0, 0.0), pts(10.0, 10.0)),
            (pts(10.0, 10.0), pts(5.0, 10.0)),
            (pts(5.0, 10.0), pts(0.0, 10.0)),
            (pts(0.0, 10.0), pts(0.0, 0.0)),
            (pts(5.0, 0.0), pts(5.0, 10.0)),
        ] {
            layer.add_line(a, b, 2.0, PropertyMap::new()).unwrap();
        }

        let layer = detect_and_update_areas(&layer).unwrap();
        assert_eq!(layer.areas.len(), 2);
        // Adjacent rooms never nest
        for area in layer.areas.values() {
            assert!(area.holes.is_empty());
        }
    }

    #[test]
    fn test_nested_room_becomes_hole() {
        let mut layer = Layer::new("layer-1", "default");
        rect(&mut layer, 0.0, 0.0, 10.0, 10.0);
        rect(&mut layer, 3.0, 3.0, 7.0, 7.0);

        let layer = detect_and_update_areas(&layer).unwrap();
        assert_eq!(layer.areas.len(), 2);

        let outer = layer
            .areas
            .values()
            .find(|a| {
                a.vertices
                    .iter()
                    .any(|v| same_point(layer.vertex(v).unwrap().point(), Point::new(0.0, 0.0)))
            })
            .unwrap();
        let inner = layer
            .areas
            .values()
            .find(|a| {
                a.vertices
                    .iter()
                    .any(|v| same_point(layer.vertex(v).unwrap().point(), Point::new(3.0, 3.0)))
            })
            .unwrap();

        assert_eq!(outer.holes, vec![inner.id.clone()]);
        assert!(inner.holes.is_empty());
    }

    #[test]
    fn test_detection_is_idempotent_and_preserves_ids() {
        let mut layer = Layer::new("layer-1", "default");
        rect(&mut layer, 0.0, 0.0, 10.0, 10.0);
        rect(&mut layer, 3.0, 3.0, 7.0, 7.0);

        let once = detect_and_update_areas(&layer).unwrap();
        let twice = detect_and_update_areas(&once).unwrap();

        let mut ids_once: Vec<&String> = once.areas.keys().collect();
        let mut ids_twice: Vec<&String> = twice.areas.keys().collect();
        ids_once.sort();
        ids_twice.sort();
        assert_eq!(ids_once, ids_twice);

        for (id, area) in &once.areas {
            assert_eq!(area.vertices, twice.areas[id].vertices);
            assert_eq!(area.holes, twice.areas[id].holes);
        }
    }

    #[test]
    fn test_deep_nesting_deduplicates_holes() {
        let mut layer = Layer::new("layer-1", "default");
        rect(&mut layer, 0.0, 0.0, 30.0, 30.0);
        rect(&mut layer, 5.0, 5.0, 25.0, 25.0);
        rect(&mut layer, 10.0, 10.0, 20.0, 20.0);

        let layer = detect_and_update_areas(&layer).unwrap();
        assert_eq!(layer.areas.len(), 3);

        let find = |x: f32| {
            layer
                .areas
                .values()
                .find(|a| {
                    a.vertices.iter().any(|v| {
                        same_point(layer.vertex(v).unwrap().point(), Point::new(x, x))
                    })
                })
                .unwrap()
        };
        let outermost = find(0.0);
        let middle = find(5.0);
        let innermost = find(10.0);

        // The innermost room is a hole of the middle one only; the
        // outermost subtracts just the middle
        assert_eq!(middle.holes, vec![innermost.id.clone()]);
        assert_eq!(outermost.holes, vec![middle.id.clone()]);
    }
}
