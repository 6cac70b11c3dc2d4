//! Pure 2D geometry primitives
//!
//! Stateless helpers shared by the graph maintainer, the room detector, the
//! snap resolver and the wall miter calculator. Everything in here operates
//! on plain coordinates; no layer state is touched.
//!
//! # Submodules
//! - `tolerance` - the shared epsilon constants every comparison uses
//! - `primitives` - distances, intersections, winding, point-in-polygon

mod primitives;
mod tolerance;

pub use primitives::{
    Point,
    SegmentRelation,
    angle_of,
    distance,
    distance_squared,
    edge_sum_area,
    line_coefficients,
    line_intersection,
    mid_point,
    normalize_angle,
    point_in_polygon,
    point_on_segment,
    point_segment_distance,
    same_point,
    segment_relation,
    shoelace_area,
};

pub use tolerance::{EPS, MIN_CYCLE_LEN, SIN_ANGLE_MIN};
