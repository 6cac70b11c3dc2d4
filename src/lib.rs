//! Planar graph maintenance and room detection for a 2D floor-plan editor
//!
//! This crate is the topology core an interactive editor calls into: it
//! keeps an editable set of vertices, lines and areas planar while the user
//! draws, drags and merges geometry, and it derives the enclosed rooms from
//! the line graph after every change. Two supporting algorithms operate on
//! the same state: a priority-ranked snap resolver used during interactive
//! placement, and a wall-corner miter calculator that derives each wall's
//! end polygon from its neighbors.
//!
//! Rendering, undo history and UI concerns live outside; collaborators call
//! the pure operations here and re-render from the returned state.
//!
//! Every operation is a synchronous `(layer) -> layer'` transformation:
//!
//! ```
//! use plankit::geometry::Point;
//! use plankit::model::{PropertyMap, Scene};
//! use plankit::{graph, rooms};
//!
//! let mut scene = Scene::new(800.0, 600.0);
//! scene.add_layer("layer-1", "ground floor");
//! let mut layer = scene.layers["layer-1"].clone();
//!
//! for (a, b) in [
//!     ((0.0, 0.0), (400.0, 0.0)),
//!     ((400.0, 0.0), (400.0, 300.0)),
//!     ((400.0, 300.0), (0.0, 300.0)),
//!     ((0.0, 300.0), (0.0, 0.0)),
//! ] {
//!     let (next, _) = graph::add_line_avoiding_intersections(
//!         &layer,
//!         Point::new(a.0, a.1),
//!         Point::new(b.0, b.1),
//!         10.0,
//!         PropertyMap::new(),
//!         Vec::new(),
//!     )
//!     .unwrap();
//!     layer = next;
//! }
//!
//! let layer = rooms::detect_and_update_areas(&layer).unwrap();
//! assert_eq!(layer.areas.len(), 1);
//! ```

pub mod error;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod model;
pub mod rooms;
pub mod snap;
pub mod walls;

pub use error::PlanError;
pub use geometry::Point;
pub use model::{Area, Group, Guide, Hole, Layer, Line, PropertyMap, Scene, Vertex};
