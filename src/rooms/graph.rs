//! Ephemeral index graph over a layer
//!
//! The detector never walks the id-keyed maps directly: it builds an
//! arena-indexed graph (one integer node per vertex, one integer edge per
//! line) per recomputation and throws it away afterwards. Biconnected
//! components are computed iteratively with an explicit stack so deep plans
//! cannot overflow recursion.

use std::collections::HashMap;

use crate::error::PlanError;
use crate::geometry::Point;
use crate::model::Layer;

pub(crate) struct IndexGraph {
    /// Node coordinates, indexed by node
    pub points: Vec<Point>,
    /// Layer vertex id per node
    pub vertex_ids: Vec<String>,
    /// Node pair per edge
    pub edges: Vec<(usize, usize)>,
    /// Per node: (neighbor node, edge index)
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl IndexGraph {
    pub fn from_layer(layer: &Layer) -> Result<Self, PlanError> {
        let mut points = Vec::with_capacity(layer.vertices.len());
        let mut vertex_ids = Vec::with_capacity(layer.vertices.len());
        let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(layer.vertices.len());
        for (id, vertex) in &layer.vertices {
            index_of.insert(id.as_str(), points.len());
            points.push(vertex.point());
            vertex_ids.push(id.clone());
        }

        let mut edges = Vec::with_capacity(layer.lines.len());
        let mut adjacency = vec![Vec::new(); points.len()];
        for line in layer.lines.values() {
            let u = *index_of
                .get(line.vertices[0].as_str())
                .ok_or_else(|| PlanError::MissingVertex(line.vertices[0].clone()))?;
            let v = *index_of
                .get(line.vertices[1].as_str())
                .ok_or_else(|| PlanError::MissingVertex(line.vertices[1].clone()))?;
            if u == v {
                continue;
            }
            let e = edges.len();
            edges.push((u, v));
            adjacency[u].push((v, e));
            adjacency[v].push((u, e));
        }

        Ok(Self {
            points,
            vertex_ids,
            edges,
            adjacency,
        })
    }

    /// Edge-index sets of the biconnected components that can bound a face
    /// (at least 3 distinct vertices; bridges and dangling chains cannot)
    pub fn face_candidate_components(&self) -> Vec<Vec<usize>> {
        self.biconnected_components()
            .into_iter()
            .filter(|component| {
                let mut nodes: Vec<usize> = component
                    .iter()
                    .flat_map(|&e| [self.edges[e].0, self.edges[e].1])
                    .collect();
                nodes.sort_unstable();
                nodes.dedup();
                nodes.len() >= 3
            })
            .collect()
    }

    /// Hopcroft-Tarjan biconnected components, iterative
    fn biconnected_components(&self) -> Vec<Vec<usize>> {
        struct Frame {
            node: usize,
            parent_edge: Option<usize>,
            next_child: usize,
        }

        let n = self.points.len();
        let mut disc = vec![usize::MAX; n];
        let mut low = vec![0usize; n];
        let mut timer = 0usize;
        let mut edge_stack: Vec<usize> = Vec::new();
        let mut components = Vec::new();

        for start in 0..n {
            if disc[start] != usize::MAX {
                continue;
            }
            disc[start] = timer;
            low[start] = timer;
            timer += 1;
            let mut stack = vec![Frame {
                node: start,
                parent_edge: None,
                next_child: 0,
            }];

            while let Some(top) = stack.last_mut() {
                let v = top.node;
                if top.next_child < self.adjacency[v].len() {
                    let (w, eidx) = self.adjacency[v][top.next_child];
                    top.next_child += 1;
                    if top.parent_edge == Some(eidx) {
                        continue;
                    }
                    if disc[w] == usize::MAX {
                        edge_stack.push(eidx);
                        disc[w] = timer;
                        low[w] = timer;
                        timer += 1;
                        stack.push(Frame {
                            node: w,
                            parent_edge: Some(eidx),
                            next_child: 0,
                        });
                    } else if disc[w] < disc[v] {
                        // Back edge to an ancestor
                        edge_stack.push(eidx);
                        if disc[w] < low[v] {
                            low[v] = disc[w];
                        }
                    }
                } else {
                    let finished = match stack.pop() {
                        Some(frame) => frame,
                        None => break,
                    };
                    if let Some(parent) = stack.last_mut() {
                        let u = parent.node;
                        if low[finished.node] < low[u] {
                            low[u] = low[finished.node];
                        }
                        if low[finished.node] >= disc[u] {
                            // u is an articulation point (or the root) for
                            // this subtree; everything above the tree edge
                            // into `finished` is one component
                            if let Some(boundary) = finished.parent_edge {
                                let mut component = Vec::new();
                                while let Some(e) = edge_stack.pop() {
                                    component.push(e);
                                    if e == boundary {
                                        break;
                                    }
                                }
                                if !component.is_empty() {
                                    components.push(component);
                                }
                            }
                        }
                    }
                }
            }
        }

        components
    }
}
