//! Pattern footprints and the geometry that goes with them
//!
//! A shape decides which relative cells a pattern covers, which rotations map
//! that footprint onto itself, and which cells count as neighbours. Square
//! footprints live on an orthogonal grid; the hexagon footprint lives on an
//! axial hex grid where `(+1, -1)` and `(-1, +1)` are also neighbours.

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::{Coordinate, offset_by, offset_from};
use std::collections::BTreeMap;

/// Largest square side accepted by [`PatternShape::square`]
pub const MAX_SQUARE_SIZE: usize = 16;

const SQUARE_ROTATIONS: [u32; 4] = [0, 90, 180, 270];
const HEXAGON_ROTATIONS: [u32; 2] = [0, 180];

// Opposite directions are consecutive entries
const SQUARE_NEIGHBORS: [Coordinate; 4] = [[-1, 0], [1, 0], [0, -1], [0, 1]];
const HEXAGON_NEIGHBORS: [Coordinate; 6] = [[1, 0], [-1, 0], [0, 1], [0, -1], [-1, 1], [1, -1]];

// Ring of six around the centre (1, 1), laid out in axial coordinates
const HEXAGON_SIZE_2_CELLS: [Coordinate; 7] = [
    [0, 1],
    [0, 2],
    [1, 0],
    [1, 1],
    [1, 2],
    [2, 0],
    [2, 1],
];

/// N×N square footprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareShape {
    size: usize,
    cells: Vec<Coordinate>,
}

/// Seven-cell hexagon footprint (centre plus ring)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexagonShape {
    size: usize,
    cells: Vec<Coordinate>,
}

/// Footprint used for pattern extraction and placement
///
/// The variant set is closed; each variant validates its size on construction
/// so every capability below is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternShape {
    /// Square footprint on an orthogonal grid
    Square(SquareShape),
    /// Hexagon footprint on an axial hex grid
    Hexagon(HexagonShape),
}

impl PatternShape {
    /// Create a square footprint with the given side length
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedShapeSize` if `size` is below 2 or above
    /// [`MAX_SQUARE_SIZE`]. A single cell can never overlap existing terrain
    /// and extend it at the same time.
    pub fn square(size: usize) -> Result<Self> {
        if !(2..=MAX_SQUARE_SIZE).contains(&size) {
            return Err(AlgorithmError::UnsupportedShapeSize {
                shape: "square",
                size,
            });
        }

        let side = size as i32;
        let cells = (0..side)
            .flat_map(|i| (0..side).map(move |j| [i, j]))
            .collect();

        Ok(Self::Square(SquareShape { size, cells }))
    }

    /// Create a hexagon footprint
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedShapeSize` for any size other than 2.
    pub fn hexagon(size: usize) -> Result<Self> {
        if size != 2 {
            return Err(AlgorithmError::UnsupportedShapeSize {
                shape: "hexagon",
                size,
            });
        }

        Ok(Self::Hexagon(HexagonShape {
            size,
            cells: HEXAGON_SIZE_2_CELLS.to_vec(),
        }))
    }

    /// Short lowercase name used in errors and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Square(_) => "square",
            Self::Hexagon(_) => "hexagon",
        }
    }

    /// Construction parameter (side length or hexagon size)
    pub const fn size(&self) -> usize {
        match self {
            Self::Square(square) => square.size,
            Self::Hexagon(hexagon) => hexagon.size,
        }
    }

    /// Footprint offsets relative to the bounding-box origin, in row-major order
    pub fn cells(&self) -> &[Coordinate] {
        match self {
            Self::Square(square) => &square.cells,
            Self::Hexagon(hexagon) => &hexagon.cells,
        }
    }

    /// Rotation angles (degrees) that map the footprint onto itself
    pub const fn superimposed_rotations(&self) -> &'static [u32] {
        match self {
            Self::Square(_) => &SQUARE_ROTATIONS,
            Self::Hexagon(_) => &HEXAGON_ROTATIONS,
        }
    }

    /// Whether a placement may leave gaps that only adjacency can close
    ///
    /// 2×2 squares are the one footprint that readily strands single cells,
    /// so they get the stricter placement rules.
    pub const fn can_close_gaps(&self) -> bool {
        match self {
            Self::Square(square) => square.size != 2,
            Self::Hexagon(_) => true,
        }
    }

    /// Rotate a full footprint mapping clockwise about the footprint centre
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRotation` if `degrees` (mod 360) is not one of
    /// [`Self::superimposed_rotations`], and `ShapeMismatch` if the key set
    /// of `pattern` is not exactly [`Self::cells`].
    pub fn rotate_pattern<T: Clone>(
        &self,
        pattern: &BTreeMap<Coordinate, T>,
        degrees: u32,
    ) -> Result<BTreeMap<Coordinate, T>> {
        let degrees = degrees % 360;
        if !self.superimposed_rotations().contains(&degrees) {
            return Err(AlgorithmError::UnsupportedRotation {
                degrees,
                shape: self.name(),
            });
        }

        if !self.matches_footprint(pattern) {
            return Err(AlgorithmError::ShapeMismatch {
                expected: self.cells().len(),
                actual: pattern.len(),
            });
        }

        let quarter_turns = degrees / 90;
        Ok(pattern
            .iter()
            .map(|(&offset, value)| (self.rotate_offset(offset, quarter_turns), value.clone()))
            .collect())
    }

    /// Whether the key set of `pattern` is exactly this footprint
    pub fn matches_footprint<T>(&self, pattern: &BTreeMap<Coordinate, T>) -> bool {
        pattern.len() == self.cells().len()
            && self.cells().iter().all(|cell| pattern.contains_key(cell))
    }

    /// True iff `a` and `b` are geometric neighbours in this shape's topology
    pub fn are_adjacent(&self, a: Coordinate, b: Coordinate) -> bool {
        self.neighbor_offsets().contains(&offset_from(b, a))
    }

    /// Neighbouring coordinates of `position` (4 for square, 6 for hexagon)
    pub fn adjacencies(&self, position: Coordinate) -> Vec<Coordinate> {
        self.neighbor_offsets()
            .iter()
            .map(|&offset| offset_by(position, offset))
            .collect()
    }

    const fn neighbor_offsets(&self) -> &'static [Coordinate] {
        match self {
            Self::Square(_) => &SQUARE_NEIGHBORS,
            Self::Hexagon(_) => &HEXAGON_NEIGHBORS,
        }
    }

    /// Side length of the footprint's bounding box
    const fn span(&self) -> i32 {
        match self {
            Self::Square(square) => square.size as i32,
            Self::Hexagon(hexagon) => 2 * hexagon.size as i32 - 1,
        }
    }

    fn rotate_offset(&self, offset: Coordinate, quarter_turns: u32) -> Coordinate {
        let last = self.span() - 1;
        (0..quarter_turns).fold(offset, |[x, y], _| [y, last - x])
    }
}
