//! Spatial data structures and grid manipulation
//!
//! This module contains spatial-related functionality including:
//! - Pattern footprints, rotations and adjacency topologies
//! - Grid state management for a single generation call
//! - The host surface that receives terrain assignments

/// Grid state management and target region helpers
pub mod grid;
/// Pattern footprints and their geometric capabilities
pub mod shape;
/// Host tile surface abstraction and an in-memory implementation
pub mod surface;

pub use grid::GridState;
pub use shape::PatternShape;

/// Integer grid coordinate `[x, y]`
pub type Coordinate = [i32; 2];

/// Opaque terrain category identifier
///
/// Every value is a real terrain. Cells without terrain are represented by
/// `None` wherever an unset state is possible.
pub type TerrainId = u32;

/// Component-wise sum of two coordinates
pub const fn offset_by(position: Coordinate, offset: Coordinate) -> Coordinate {
    [position[0] + offset[0], position[1] + offset[1]]
}

/// Component-wise difference `position - offset`
pub const fn offset_from(position: Coordinate, offset: Coordinate) -> Coordinate {
    [position[0] - offset[0], position[1] - offset[1]]
}
