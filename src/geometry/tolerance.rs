//! Shared tolerance constants
//!
//! Every geometric equality test in the crate goes through the same epsilon,
//! so colinearity, crossing and coincidence classifications stay mutually
//! exclusive for any pair of segments.

/// Coordinate tolerance: two points closer than this are the same point,
/// and a point closer than this to a segment lies on it.
pub const EPS: f32 = 1e-2;

/// Minimum number of vertices for a cycle to bound a face.
pub const MIN_CYCLE_LEN: usize = 3;

/// Sine of the smallest junction angle the miter calculator will intersect
/// offset boundaries at. Below this the intersection runs away and the wall
/// end falls back to a perpendicular flat cut.
pub const SIN_ANGLE_MIN: f32 = 0.05;
