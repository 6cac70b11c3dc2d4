//! Snap resolution for interactive placement
//!
//! Every placement runs the raw cursor point through a set of candidates
//! (vertex points, construction lines, wall segments, the grid lattice,
//! user guides). A candidate captures the cursor when it is within its own
//! radius; among the captures, the highest priority wins outright and ties
//! within a priority resolve by distance.
//!
//! # Submodules
//! - `spatial` - R-tree candidate index for repeated queries during a drag

mod spatial;

pub use spatial::SnapIndex;

use crate::geometry::{line_intersection, point_segment_distance, Point};
use crate::model::{Guide, Scene};

pub const PRIORITY_POINT: i32 = 10;
pub const PRIORITY_GUIDE: i32 = 8;
pub const PRIORITY_LINE: i32 = 5;
pub const PRIORITY_SEGMENT: i32 = 5;
pub const PRIORITY_GRID: i32 = 3;

pub const RADIUS_POINT: f32 = 10.0;
pub const RADIUS_GUIDE: f32 = 10.0;
pub const RADIUS_LINE: f32 = 5.0;
pub const RADIUS_SEGMENT: f32 = 5.0;
pub const RADIUS_GRID: f32 = 5.0;

/// Candidate categories, maskable per interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Point,
    Line,
    Segment,
    Grid,
    Guide,
}

/// Which candidate categories an interaction allows
#[derive(Debug, Clone, Copy)]
pub struct SnapMask {
    pub point: bool,
    pub line: bool,
    pub segment: bool,
    pub grid: bool,
    pub guide: bool,
}

impl Default for SnapMask {
    fn default() -> Self {
        Self {
            point: true,
            line: true,
            segment: true,
            grid: true,
            guide: true,
        }
    }
}

impl SnapMask {
    pub fn none() -> Self {
        Self {
            point: false,
            line: false,
            segment: false,
            grid: false,
            guide: false,
        }
    }

    pub fn enables(&self, kind: SnapKind) -> bool {
        match kind {
            SnapKind::Point => self.point,
            SnapKind::Line => self.line,
            SnapKind::Segment => self.segment,
            SnapKind::Grid => self.grid,
            SnapKind::Guide => self.guide,
        }
    }
}

/// The geometry a candidate constrains the cursor to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapShape {
    Point(Point),
    /// Infinite line a*x + b*y + c = 0, normalized so a^2 + b^2 = 1
    Line { a: f32, b: f32, c: f32 },
    Segment(Point, Point),
}

/// One geometric constraint competing for the cursor
#[derive(Debug, Clone)]
pub struct SnapCandidate {
    pub kind: SnapKind,
    pub shape: SnapShape,
    /// Capture radius: beyond this distance the candidate never wins
    pub radius: f32,
    /// Higher priority always beats lower, regardless of distance
    pub priority: i32,
    /// Entity ids, for highlighting only
    pub related: Vec<String>,
}

impl SnapCandidate {
    pub fn new(
        kind: SnapKind,
        shape: SnapShape,
        radius: f32,
        priority: i32,
        related: Vec<String>,
    ) -> Self {
        Self {
            kind,
            shape,
            radius,
            priority,
            related,
        }
    }

    /// Cheap bounding pre-filter: can this candidate possibly capture the
    /// cursor?
    pub fn is_near(&self, x: f32, y: f32) -> bool {
        match self.shape {
            SnapShape::Point(p) => {
                (p.x - x).abs() <= self.radius && (p.y - y).abs() <= self.radius
            }
            SnapShape::Line { a, b, c } => (a * x + b * y + c).abs() <= self.radius,
            SnapShape::Segment(p, q) => {
                x >= p.x.min(q.x) - self.radius
                    && x <= p.x.max(q.x) + self.radius
                    && y >= p.y.min(q.y) - self.radius
                    && y <= p.y.max(q.y) + self.radius
            }
        }
    }

    /// Exact nearest constrained point and its distance to the cursor
    pub fn nearest_point(&self, x: f32, y: f32) -> (Point, f32) {
        let cursor = Point::new(x, y);
        match self.shape {
            SnapShape::Point(p) => (p, crate::geometry::distance(cursor, p)),
            SnapShape::Line { a, b, c } => {
                let d = a * x + b * y + c;
                (Point::new(x - a * d, y - b * d), d.abs())
            }
            SnapShape::Segment(p, q) => {
                let (d, closest) = point_segment_distance(cursor, p, q);
                (closest, d)
            }
        }
    }
}

/// A winning snap: the candidate plus the constrained cursor point
#[derive(Debug, Clone)]
pub struct NearestSnap {
    pub snap: SnapCandidate,
    pub point: Point,
    pub distance: f32,
}

/// Candidate list builder.
///
/// Registering a second infinite line immediately registers its
/// intersections with every line already present as point candidates with
/// elevated priority, so line crossings attract more strongly than the
/// lines themselves.
#[derive(Debug, Default)]
pub struct CandidateSet {
    items: Vec<SnapCandidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, candidate: SnapCandidate) {
        if let SnapShape::Line { a, b, c } = candidate.shape {
            let mut crossings = Vec::new();
            for other in &self.items {
                if let SnapShape::Line {
                    a: oa,
                    b: ob,
                    c: oc,
                } = other.shape
                {
                    if let Some(p) = line_intersection((a, b, c), (oa, ob, oc)) {
                        let mut related = candidate.related.clone();
                        related.extend(other.related.iter().cloned());
                        crossings.push(SnapCandidate::new(
                            SnapKind::Point,
                            SnapShape::Point(p),
                            candidate.radius.max(other.radius),
                            candidate.priority.max(other.priority) + 1,
                            related,
                        ));
                    }
                }
            }
            self.items.extend(crossings);
        }
        self.items.push(candidate);
    }

    pub fn into_vec(self) -> Vec<SnapCandidate> {
        self.items
    }
}

pub(crate) fn select_best<'a>(
    candidates: impl Iterator<Item = &'a SnapCandidate>,
    x: f32,
    y: f32,
    mask: &SnapMask,
) -> Option<NearestSnap> {
    let mut best: Option<NearestSnap> = None;
    for candidate in candidates {
        if !mask.enables(candidate.kind) || !candidate.is_near(x, y) {
            continue;
        }
        let (point, distance) = candidate.nearest_point(x, y);
        if distance > candidate.radius {
            continue;
        }
        let better = match &best {
            None => true,
            Some(b) => {
                candidate.priority > b.snap.priority
                    || (candidate.priority == b.snap.priority && distance < b.distance)
            }
        };
        if better {
            best = Some(NearestSnap {
                snap: candidate.clone(),
                point,
                distance,
            });
        }
    }
    best
}

/// Resolve the best-fit constrained point for a raw cursor position
pub fn nearest_snap(
    candidates: &[SnapCandidate],
    x: f32,
    y: f32,
    mask: &SnapMask,
) -> Option<NearestSnap> {
    select_best(candidates.iter(), x, y, mask)
}

/// Build the candidate list for a scene: vertex points with their
/// horizontal/vertical construction lines, wall segments, the grid lattice
/// and user guides, filtered by the mask up front.
pub fn scene_snap_candidates(scene: &Scene, mask: &SnapMask) -> Vec<SnapCandidate> {
    let mut set = CandidateSet::new();

    for layer in scene.layers.values() {
        for vertex in layer.vertices.values() {
            if mask.point {
                set.add(SnapCandidate::new(
                    SnapKind::Point,
                    SnapShape::Point(vertex.point()),
                    RADIUS_POINT,
                    PRIORITY_POINT,
                    vec![vertex.id.clone()],
                ));
            }
            if mask.line {
                set.add(SnapCandidate::new(
                    SnapKind::Line,
                    SnapShape::Line {
                        a: 1.0,
                        b: 0.0,
                        c: -vertex.x,
                    },
                    RADIUS_LINE,
                    PRIORITY_LINE,
                    vec![vertex.id.clone()],
                ));
                set.add(SnapCandidate::new(
                    SnapKind::Line,
                    SnapShape::Line {
                        a: 0.0,
                        b: 1.0,
                        c: -vertex.y,
                    },
                    RADIUS_LINE,
                    PRIORITY_LINE,
                    vec![vertex.id.clone()],
                ));
            }
        }
        if mask.segment {
            for line in layer.lines.values() {
                if let Ok((a, b)) = layer.line_points(line) {
                    set.add(SnapCandidate::new(
                        SnapKind::Segment,
                        SnapShape::Segment(a, b),
                        RADIUS_SEGMENT,
                        PRIORITY_SEGMENT,
                        vec![line.id.clone()],
                    ));
                }
            }
        }
    }

    if mask.guide {
        for guide in &scene.guides {
            let shape = match *guide {
                Guide::Horizontal { y } => {
                    SnapShape::Segment(Point::new(0.0, y), Point::new(scene.width, y))
                }
                Guide::Vertical { x } => {
                    SnapShape::Segment(Point::new(x, 0.0), Point::new(x, scene.height))
                }
            };
            set.add(SnapCandidate::new(
                SnapKind::Guide,
                shape,
                RADIUS_GUIDE,
                PRIORITY_GUIDE,
                Vec::new(),
            ));
        }
        // Guide crossings attract more strongly than either guide
        for (i, a) in scene.guides.iter().enumerate() {
            for b in scene.guides.iter().skip(i + 1) {
                let crossing = match (*a, *b) {
                    (Guide::Horizontal { y }, Guide::Vertical { x })
                    | (Guide::Vertical { x }, Guide::Horizontal { y }) => Some(Point::new(x, y)),
                    _ => None,
                };
                if let Some(p) = crossing {
                    set.add(SnapCandidate::new(
                        SnapKind::Guide,
                        SnapShape::Point(p),
                        RADIUS_GUIDE,
                        PRIORITY_GUIDE + 1,
                        Vec::new(),
                    ));
                }
            }
        }
    }

    if mask.grid && scene.grid_spacing > 0.0 {
        let cols = (scene.width / scene.grid_spacing).floor() as i32;
        let rows = (scene.height / scene.grid_spacing).floor() as i32;
        for i in 0..=cols {
            for j in 0..=rows {
                set.add(SnapCandidate::new(
                    SnapKind::Grid,
                    SnapShape::Point(Point::new(
                        i as f32 * scene.grid_spacing,
                        j as f32 * scene.grid_spacing,
                    )),
                    RADIUS_GRID,
                    PRIORITY_GRID,
                    Vec::new(),
                ));
            }
        }
    }

    set.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::same_point;

    #[test]
    fn test_priority_beats_distance() {
        let candidates = vec![
            SnapCandidate::new(
                SnapKind::Point,
                SnapShape::Point(Point::new(10.0, 10.0)),
                5.0,
                1,
                Vec::new(),
            ),
            SnapCandidate::new(
                SnapKind::Grid,
                SnapShape::Point(Point::new(10.0, 12.0)),
                5.0,
                2,
                Vec::new(),
            ),
        ];
        let hit = nearest_snap(&candidates, 10.0, 11.0, &SnapMask::default()).unwrap();
        assert_eq!(hit.snap.kind, SnapKind::Grid);
        assert!(same_point(hit.point, Point::new(10.0, 12.0)));
    }

    #[test]
    fn test_distance_breaks_priority_ties() {
        let candidates = vec![
            SnapCandidate::new(
                SnapKind::Point,
                SnapShape::Point(Point::new(0.0, 0.0)),
                10.0,
                5,
                Vec::new(),
            ),
            SnapCandidate::new(
                SnapKind::Point,
                SnapShape::Point(Point::new(4.0, 0.0)),
                10.0,
                5,
                Vec::new(),
            ),
        ];
        let hit = nearest_snap(&candidates, 3.0, 0.0, &SnapMask::default()).unwrap();
        assert!(same_point(hit.point, Point::new(4.0, 0.0)));
    }

    #[test]
    fn test_radius_cuts_candidates() {
        let candidates = vec![SnapCandidate::new(
            SnapKind::Point,
            SnapShape::Point(Point::new(0.0, 0.0)),
            5.0,
            10,
            Vec::new(),
        )];
        assert!(nearest_snap(&candidates, 20.0, 0.0, &SnapMask::default()).is_none());
    }

    #[test]
    fn test_mask_disables_categories() {
        let candidates = vec![SnapCandidate::new(
            SnapKind::Grid,
            SnapShape::Point(Point::new(0.0, 0.0)),
            5.0,
            10,
            Vec::new(),
        )];
        let mut mask = SnapMask::default();
        mask.grid = false;
        assert!(nearest_snap(&candidates, 1.0, 0.0, &mask).is_none());
    }

    #[test]
    fn test_line_crossings_become_stronger_points() {
        let mut set = CandidateSet::new();
        set.add(SnapCandidate::new(
            SnapKind::Line,
            SnapShape::Line {
                a: 1.0,
                b: 0.0,
                c: -5.0,
            },
            5.0,
            PRIORITY_LINE,
            Vec::new(),
        ));
        set.add(SnapCandidate::new(
            SnapKind::Line,
            SnapShape::Line {
                a: 0.0,
                b: 1.0,
                c: -7.0,
            },
            5.0,
            PRIORITY_LINE,
            Vec::new(),
        ));
        let candidates = set.into_vec();
        assert_eq!(candidates.len(), 3);

        // Near the crossing, the synthesized point wins over both lines
        let hit = nearest_snap(&candidates, 5.5, 7.5, &SnapMask::default()).unwrap();
        assert_eq!(hit.snap.kind, SnapKind::Point);
        assert_eq!(hit.snap.priority, PRIORITY_LINE + 1);
        assert!(same_point(hit.point, Point::new(5.0, 7.0)));
    }

    #[test]
    fn test_segment_snap_clamps_to_endpoints() {
        let candidates = vec![SnapCandidate::new(
            SnapKind::Segment,
            SnapShape::Segment(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            5.0,
            5,
            Vec::new(),
        )];
        let hit = nearest_snap(&candidates, 12.0, 2.0, &SnapMask::default()).unwrap();
        assert!(same_point(hit.point, Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_scene_candidates_respect_mask() {
        let mut scene = Scene::new(100.0, 100.0);
        let layer = scene.add_layer("layer-1", "default");
        layer
            .add_line(
                Point::new(10.0, 10.0),
                Point::new(50.0, 10.0),
                2.0,
                crate::model::PropertyMap::new(),
            )
            .unwrap();
        scene.guides.push(Guide::Horizontal { y: 30.0 });
        scene.guides.push(Guide::Vertical { x: 40.0 });

        let mut mask = SnapMask::none();
        mask.point = true;
        let candidates = scene_snap_candidates(&scene, &mask);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.kind == SnapKind::Point));

        let all = scene_snap_candidates(&scene, &SnapMask::default());
        // 2 vertex points, 4 construction lines, their crossings, 1 wall
        // segment, 2 guides, 1 guide crossing, plus the grid lattice
        assert!(all.iter().any(|c| c.kind == SnapKind::Segment));
        assert!(all.iter().any(|c| c.kind == SnapKind::Grid));
        assert!(all
            .iter()
            .any(|c| c.kind == SnapKind::Guide && matches!(c.shape, SnapShape::Point(_))));
    }
}
