//! Spatial index over snap candidates
//!
//! During a drag the same candidate list is probed on every mouse move; an
//! R-tree over the capture envelopes keeps those probes cheap. Bounded
//! shapes (points, segments) go into the tree with their radius-inflated
//! AABB; infinite lines have no finite envelope and stay in a side list
//! that is always scanned.

use rstar::{RTree, RTreeObject, AABB};

use super::{select_best, NearestSnap, SnapCandidate, SnapMask, SnapShape};

#[derive(Clone, Debug)]
struct IndexedCandidate {
    candidate: SnapCandidate,
    bounds: AABB<[f32; 2]>,
}

impl RTreeObject for IndexedCandidate {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

/// R-tree backed candidate lookup for repeated cursor queries
pub struct SnapIndex {
    tree: RTree<IndexedCandidate>,
    unbounded: Vec<SnapCandidate>,
}

impl SnapIndex {
    pub fn build(candidates: Vec<SnapCandidate>) -> Self {
        let mut bounded = Vec::new();
        let mut unbounded = Vec::new();
        for candidate in candidates {
            let bounds = match candidate.shape {
                SnapShape::Point(p) => AABB::from_corners(
                    [p.x - candidate.radius, p.y - candidate.radius],
                    [p.x + candidate.radius, p.y + candidate.radius],
                ),
                SnapShape::Segment(p, q) => AABB::from_corners(
                    [
                        p.x.min(q.x) - candidate.radius,
                        p.y.min(q.y) - candidate.radius,
                    ],
                    [
                        p.x.max(q.x) + candidate.radius,
                        p.y.max(q.y) + candidate.radius,
                    ],
                ),
                SnapShape::Line { .. } => {
                    unbounded.push(candidate);
                    continue;
                }
            };
            bounded.push(IndexedCandidate { candidate, bounds });
        }
        Self {
            tree: RTree::bulk_load(bounded),
            unbounded,
        }
    }

    /// Same contract as [`super::nearest_snap`], served from the index
    pub fn nearest(&self, x: f32, y: f32, mask: &SnapMask) -> Option<NearestSnap> {
        let probe = AABB::from_point([x, y]);
        let hits = self
            .tree
            .locate_in_envelope_intersecting(&probe)
            .map(|ic| &ic.candidate);
        select_best(hits.chain(self.unbounded.iter()), x, y, mask)
    }

    pub fn len(&self) -> usize {
        self.tree.size() + self.unbounded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
