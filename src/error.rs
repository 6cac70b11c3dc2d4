//! Error types for the floor-plan core
//!
//! Structural contract violations (dangling ids) are surfaced as errors and
//! propagate to the caller. Degenerate geometry is not an error anywhere in
//! this crate: operations skip it and return less output instead.

use thiserror::Error;

/// A broken reference inside a layer.
///
/// These indicate a programming error in the calling code, not a state a
/// user drawing can reach. The core never logs or swallows them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A line or area points at a vertex id that is not in the layer
    #[error("vertex '{0}' does not exist in this layer")]
    MissingVertex(String),

    /// An operation was given a line id that is not in the layer
    #[error("line '{0}' does not exist in this layer")]
    MissingLine(String),

    /// An operation was given an area id that is not in the layer
    #[error("area '{0}' does not exist in this layer")]
    MissingArea(String),

    /// A hole id attached to a line is not in the layer
    #[error("hole '{0}' does not exist in this layer")]
    MissingHole(String),

    /// A vertex id was passed for a line it does not belong to
    #[error("vertex '{vertex}' is not an endpoint of line '{line}'")]
    NotAnEndpoint {
        /// The line the caller named.
        line: String,
        /// The vertex that is not one of its endpoints.
        vertex: String,
    },
}
