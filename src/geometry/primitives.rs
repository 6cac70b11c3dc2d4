//! Distance, intersection and winding primitives
//!
//! Segment/segment classification is the piece the planarity guarantees hang
//! off: for any pair of segments exactly one of colinear-overlap, single
//! intersection point, or nothing holds, all under the shared [`EPS`].

use serde::{Deserialize, Serialize};

use super::tolerance::EPS;

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How two segments relate to each other under the shared tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentRelation {
    /// Disjoint, parallel, or colinear without overlap
    None,
    /// The segments meet at a single point (possibly an endpoint of either)
    Intersect(Point),
    /// Colinear with an overlap longer than the tolerance
    ColinearOverlap,
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f32 {
    distance_squared(a, b).sqrt()
}

/// Squared distance, for comparisons that don't need the root
pub fn distance_squared(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Midpoint of two points
pub fn mid_point(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Coordinate equality under the shared tolerance
pub fn same_point(a: Point, b: Point) -> bool {
    distance_squared(a, b) <= EPS * EPS
}

/// Direction angle of the vector a -> b, in (-pi, pi]
pub fn angle_of(a: Point, b: Point) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Wrap an angle into (-pi, pi]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle;
    while a <= -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    while a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    }
    a
}

/// Point-to-segment minimum distance and the closest point on the segment
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> (f32, Point) {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;

    if len_sq <= EPS * EPS {
        // Degenerate segment
        return (distance(p, a), a);
    }

    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * abx, a.y + t * aby);
    (distance(p, closest), closest)
}

/// Whether `p` lies on the segment a-b, within tolerance
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    point_segment_distance(p, a, b).0 <= EPS
}

/// Coefficients (a, b, c) of the infinite line a*x + b*y + c = 0 through two
/// points, normalized so that a^2 + b^2 = 1. Returns `None` for coincident
/// input points.
pub fn line_coefficients(p: Point, q: Point) -> Option<(f32, f32, f32)> {
    let a = q.y - p.y;
    let b = p.x - q.x;
    let norm = (a * a + b * b).sqrt();
    if norm <= EPS {
        return None;
    }
    let a = a / norm;
    let b = b / norm;
    let c = -(a * p.x + b * p.y);
    Some((a, b, c))
}

/// Intersection of two infinite lines given as a*x + b*y + c = 0.
/// Returns `None` for (near-)parallel lines.
pub fn line_intersection(l1: (f32, f32, f32), l2: (f32, f32, f32)) -> Option<Point> {
    let (a1, b1, c1) = l1;
    let (a2, b2, c2) = l2;
    let det = a1 * b2 - a2 * b1;
    if det.abs() <= 1e-6 {
        return None;
    }
    Some(Point::new(
        (b1 * c2 - b2 * c1) / det,
        (a2 * c1 - a1 * c2) / det,
    ))
}

/// Classify the relationship of segments a-b and c-d.
///
/// Colinearity is decided first (perpendicular distance of both endpoints of
/// one segment from the other's carrier line), so a pair can never be
/// reported as both colinear and crossing.
pub fn segment_relation(a: Point, b: Point, c: Point, d: Point) -> SegmentRelation {
    let ab_len = distance(a, b);
    let cd_len = distance(c, d);
    if ab_len <= EPS || cd_len <= EPS {
        return SegmentRelation::None;
    }

    let cross_c = ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() / ab_len;
    let cross_d = ((b.x - a.x) * (d.y - a.y) - (b.y - a.y) * (d.x - a.x)).abs() / ab_len;

    if cross_c <= EPS && cross_d <= EPS {
        // Colinear: project onto the a-b direction and look for 1D overlap
        let ux = (b.x - a.x) / ab_len;
        let uy = (b.y - a.y) / ab_len;
        let t = |p: Point| (p.x - a.x) * ux + (p.y - a.y) * uy;
        let (mut s0, mut s1) = (t(c), t(d));
        if s0 > s1 {
            std::mem::swap(&mut s0, &mut s1);
        }
        let overlap = s1.min(ab_len) - s0.max(0.0);
        if overlap > EPS {
            return SegmentRelation::ColinearOverlap;
        }
        return SegmentRelation::None;
    }

    let denom = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if denom.abs() <= 1e-6 {
        // Parallel but not colinear
        return SegmentRelation::None;
    }

    let t = ((c.x - a.x) * (d.y - c.y) - (c.y - a.y) * (d.x - c.x)) / denom;
    let u = ((c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)) / denom;

    let slack_ab = EPS / ab_len;
    let slack_cd = EPS / cd_len;
    if t >= -slack_ab && t <= 1.0 + slack_ab && u >= -slack_cd && u <= 1.0 + slack_cd {
        let p = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        return SegmentRelation::Intersect(p);
    }

    SegmentRelation::None
}

/// Signed area of a polygon under the standard shoelace formula.
/// Positive for counter-clockwise winding.
pub fn shoelace_area(poly: &[Point]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let p = poly[i];
        let q = poly[(i + 1) % poly.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

/// Winding discriminant: the sum of (x2 - x1) * (y2 + y1) over consecutive
/// edges. Negative for counter-clockwise cycles, positive for clockwise.
pub fn edge_sum_area(poly: &[Point]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let p = poly[i];
        let q = poly[(i + 1) % poly.len()];
        sum += (q.x - p.x) * (q.y + p.y);
    }
    sum
}

/// Ray-casting point-in-polygon test.
///
/// Points within [`EPS`] of the polygon boundary are reported as outside, so
/// two rooms sharing a wall never classify each other as nested.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    if poly.len() < 3 {
        return false;
    }

    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        if point_segment_distance(p, a, b).0 <= EPS {
            return false;
        }
    }

    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let pi = poly[i];
        let pj = poly[j];
        if (pi.y > p.y) != (pj.y > p.y)
            && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
