//! Wall corner miter calculation
//!
//! A wall's drawn polygon is wider than its center line; where walls meet
//! at a vertex the end of each polygon has to be cut against its rotational
//! neighbors. The corner points are found by intersecting thickness-offset
//! boundary lines, with a perpendicular flat cut as the fallback for
//! near-parallel joints where that intersection runs away.

use crate::error::PlanError;
use crate::geometry::{
    angle_of, distance, line_coefficients, line_intersection, normalize_angle, Point, EPS,
    SIN_ANGLE_MIN,
};
use crate::model::Layer;

/// End polygon corner points of `line_id` at `vertex_id`, in the line's
/// local frame: the shared vertex at the origin, the line along +x.
///
/// With no other line at the vertex the end is a flat cap at +-thickness/2.
/// Against a single neighbor both corners miter against it (2 points);
/// between two different neighbors the end pinches through the junction
/// center (3 points: left corner, center, right corner).
pub fn calc_line_end(
    layer: &Layer,
    line_id: &str,
    vertex_id: &str,
    thickness: f32,
) -> Result<Vec<Point>, PlanError> {
    let line = layer.line(line_id)?;
    if !line.vertices.iter().any(|v| v == vertex_id) {
        return Err(PlanError::NotAnEndpoint {
            line: line_id.to_string(),
            vertex: vertex_id.to_string(),
        });
    }

    let vertex = layer.vertex(vertex_id)?;
    let origin = vertex.point();
    let far_id = if line.vertices[0] == vertex_id {
        &line.vertices[1]
    } else {
        &line.vertices[0]
    };
    let far = layer.vertex(far_id)?.point();

    let half = thickness / 2.0;
    let flat_cap = vec![Point::new(0.0, half), Point::new(0.0, -half)];
    if distance(origin, far) <= EPS {
        return Ok(flat_cap);
    }
    let direction = angle_of(origin, far);

    // Neighbors at this vertex, by angle relative to our direction in
    // (0, 2pi]
    let mut neighbors: Vec<(f32, f32)> = Vec::new();
    for neighbor_id in &vertex.lines {
        if neighbor_id == line_id {
            continue;
        }
        let neighbor = layer.line(neighbor_id)?;
        let neighbor_far_id = if neighbor.vertices[0] == vertex_id {
            &neighbor.vertices[1]
        } else {
            &neighbor.vertices[0]
        };
        let neighbor_far = layer.vertex(neighbor_far_id)?.point();
        if distance(origin, neighbor_far) <= EPS {
            continue;
        }
        let mut relative = normalize_angle(angle_of(origin, neighbor_far) - direction);
        if relative <= 0.0 {
            relative += std::f32::consts::TAU;
        }
        neighbors.push((relative, neighbor.thickness));
    }

    if neighbors.is_empty() {
        return Ok(flat_cap);
    }
    neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Immediate rotational neighbors of our line (which sits at angle 0)
    let (ccw_angle, ccw_thickness) = neighbors[0];
    let (cw_angle, cw_thickness) = neighbors[neighbors.len() - 1];

    let left = miter_corner(ccw_angle, ccw_thickness, half, Side::Left);
    let right = miter_corner(cw_angle, cw_thickness, half, Side::Right);

    if neighbors.len() == 1 {
        Ok(vec![left, right])
    } else {
        Ok(vec![left, Point::new(0.0, 0.0), right])
    }
}

enum Side {
    Left,
    Right,
}

/// Intersect our thickness-offset boundary with the neighbor's facing
/// boundary; fall back to the perpendicular flat cut when the joint is too
/// shallow for a stable intersection
fn miter_corner(neighbor_angle: f32, neighbor_thickness: f32, half: f32, side: Side) -> Point {
    let (our_boundary, fallback, offset_sign) = match side {
        // Our left boundary y = +half against the neighbor's right offset
        Side::Left => ((0.0, 1.0, -half), Point::new(0.0, half), 1.0),
        // Our right boundary y = -half against the neighbor's left offset
        Side::Right => ((0.0, 1.0, half), Point::new(0.0, -half), -1.0),
    };

    if neighbor_angle.sin().abs() < SIN_ANGLE_MIN {
        return fallback;
    }

    let dx = neighbor_angle.cos();
    let dy = neighbor_angle.sin();
    let off = offset_sign * neighbor_thickness / 2.0;
    // Offset the neighbor's center line sideways by half its thickness
    let p0 = Point::new(off * dy, -off * dx);
    let p1 = Point::new(p0.x + dx, p0.y + dy);

    match line_coefficients(p0, p1).and_then(|boundary| line_intersection(our_boundary, boundary)) {
        Some(corner) => corner,
        None => fallback,
    }
}
