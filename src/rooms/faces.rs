//! Planar face tracing over a rotation system
//!
//! At every node the incident arcs are ordered by angle. Arriving at a node
//! along an arc, the walk leaves along the arc preceding the reverse arc in
//! that cyclic order; each arc (edge direction) is consumed exactly once,
//! and every closed walk collected this way is one face of the embedding.
//! With this convention bounded faces come out counter-clockwise and the
//! unbounded face clockwise.

use crate::geometry::{angle_of, Point};

/// Trace every face of the sub-embedding spanned by `edge_subset`.
/// Returns node-index cycles; open walks (possible only on inconsistent
/// input) are dropped.
pub(crate) fn trace_faces(
    points: &[Point],
    edges: &[(usize, usize)],
    edge_subset: &[usize],
) -> Vec<Vec<usize>> {
    let m = edge_subset.len();
    if m == 0 {
        return Vec::new();
    }

    // Arc 2i runs edges[edge_subset[i]] forward, arc 2i+1 backward
    let arc_tail = |arc: usize| {
        let (u, v) = edges[edge_subset[arc / 2]];
        if arc % 2 == 0 {
            u
        } else {
            v
        }
    };
    let arc_head = |arc: usize| {
        let (u, v) = edges[edge_subset[arc / 2]];
        if arc % 2 == 0 {
            v
        } else {
            u
        }
    };

    // Rotation: outgoing arcs per node, sorted by angle
    let mut rotation: Vec<Vec<(f32, usize)>> = vec![Vec::new(); points.len()];
    for arc in 0..2 * m {
        let u = arc_tail(arc);
        let v = arc_head(arc);
        rotation[u].push((angle_of(points[u], points[v]), arc));
    }
    for list in &mut rotation {
        list.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    }
    let mut pos_in_rotation = vec![0usize; 2 * m];
    for list in &rotation {
        for (k, &(_, arc)) in list.iter().enumerate() {
            pos_in_rotation[arc] = k;
        }
    }

    let mut visited = vec![false; 2 * m];
    let mut faces = Vec::new();

    for start in 0..2 * m {
        if visited[start] {
            continue;
        }
        let mut cycle = Vec::new();
        let mut arc = start;
        let mut closed = false;
        while cycle.len() <= 2 * m {
            visited[arc] = true;
            cycle.push(arc_tail(arc));
            // Continue with the arc preceding the reverse arc in rotation
            let reverse = arc ^ 1;
            let list = &rotation[arc_head(arc)];
            let next = list[(pos_in_rotation[reverse] + list.len() - 1) % list.len()].1;
            if next == start {
                closed = true;
                break;
            }
            if visited[next] {
                break;
            }
            arc = next;
        }
        if closed {
            faces.push(cycle);
        }
    }

    faces
}
