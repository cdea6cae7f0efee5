//! Overlapping wave function collapse for terrain synthesis
//!
//! Patterns are extracted from a sample of terrain ids, then placed over a
//! target region one overlapping footprint at a time. The most constrained
//! frontier cell is filled first and dead ends are undone by chronological
//! backtracking. Cells that could not be filled are reported back to the
//! caller rather than treated as a failure.

#![forbid(unsafe_code)]

/// Placement legality, frontier ordering, pattern application and backtracking
pub mod algorithm;
/// Pattern extraction from sample terrain
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Weighted random selection
pub mod math;
/// Coordinates, pattern shapes, the grid model and host surfaces
pub mod spatial;

pub use algorithm::executor::{CollapseConfig, RenderMode, UnderflowPolicy, generate};
pub use io::error::{AlgorithmError, Result};
