//! Grid state for a single generation call
//!
//! The grid is a sparse mapping from coordinate to cell state. It tracks the
//! target region (initially unset) together with every cell the host already
//! holds (initially collapsed). Coordinates outside the mapping are
//! "untracked" and are ignored by pattern placement.

use crate::spatial::{Coordinate, TerrainId};
use std::collections::{BTreeMap, HashMap};

/// Axis-aligned bounding box for generation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum coordinates (inclusive)
    pub min: [i32; 2],
    /// Maximum coordinates (inclusive)
    pub max: [i32; 2],
}

impl BoundingBox {
    /// Box covering `[0, width) × [0, height)`
    pub const fn from_size(width: usize, height: usize) -> Self {
        Self {
            min: [0, 0],
            max: [width as i32 - 1, height as i32 - 1],
        }
    }

    /// Check if a position is within the bounds
    pub const fn contains(&self, pos: [i32; 2]) -> bool {
        pos[0] >= self.min[0]
            && pos[0] <= self.max[0]
            && pos[1] >= self.min[1]
            && pos[1] <= self.max[1]
    }

    /// Centre cell, rounded towards the minimum corner
    pub const fn center(&self) -> Coordinate {
        [
            self.min[0] + (self.max[0] - self.min[0]) / 2,
            self.min[1] + (self.max[1] - self.min[1]) / 2,
        ]
    }

    /// Every coordinate in the box, x-major
    pub fn cells(&self) -> Vec<Coordinate> {
        (self.min[0]..=self.max[0])
            .flat_map(|x| (self.min[1]..=self.max[1]).map(move |y| [x, y]))
            .collect()
    }
}

/// State of a single tracked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapCell {
    terrain: Option<TerrainId>,
}

impl MapCell {
    /// Unset cell awaiting collapse
    pub const fn unset() -> Self {
        Self { terrain: None }
    }

    /// Cell already holding `terrain`
    pub const fn collapsed_with(terrain: TerrainId) -> Self {
        Self {
            terrain: Some(terrain),
        }
    }

    /// Assigned terrain, if any
    pub const fn terrain(&self) -> Option<TerrainId> {
        self.terrain
    }

    /// A cell is collapsed exactly when it holds a terrain
    pub const fn collapsed(&self) -> bool {
        self.terrain.is_some()
    }
}

/// Sparse grid of tracked cells, exclusively owned by one generation call
#[derive(Debug, Clone, Default)]
pub struct GridState {
    cells: HashMap<Coordinate, MapCell>,
}

impl GridState {
    /// Create an empty grid with no tracked cells
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is tracked
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell state at `position`, or `None` if untracked
    pub fn get(&self, position: Coordinate) -> Option<MapCell> {
        self.cells.get(&position).copied()
    }

    /// Whether `position` is part of the grid
    pub fn contains(&self, position: Coordinate) -> bool {
        self.cells.contains_key(&position)
    }

    /// Whether `position` is tracked and collapsed
    pub fn is_collapsed(&self, position: Coordinate) -> bool {
        self.cells.get(&position).is_some_and(MapCell::collapsed)
    }

    /// Whether `position` is tracked and still unset
    pub fn is_open(&self, position: Coordinate) -> bool {
        self.cells.get(&position).is_some_and(|cell| !cell.collapsed())
    }

    /// Terrain at `position` if it is tracked and collapsed
    pub fn terrain(&self, position: Coordinate) -> Option<TerrainId> {
        self.cells.get(&position).and_then(MapCell::terrain)
    }

    /// Start tracking `position` as unset (no-op if already tracked)
    pub fn track(&mut self, position: Coordinate) {
        self.cells.entry(position).or_insert_with(MapCell::unset);
    }

    /// Start tracking `position` as collapsed with `terrain`, overriding any prior state
    pub fn seed(&mut self, position: Coordinate, terrain: TerrainId) {
        self.cells.insert(position, MapCell::collapsed_with(terrain));
    }

    /// Collapse a tracked, unset cell
    ///
    /// Returns `false` (and changes nothing) if the cell is untracked or
    /// already collapsed.
    pub fn collapse(&mut self, position: Coordinate, terrain: TerrainId) -> bool {
        match self.cells.get_mut(&position) {
            Some(cell) if !cell.collapsed() => {
                *cell = MapCell::collapsed_with(terrain);
                true
            }
            _ => false,
        }
    }

    /// Return a tracked cell to the unset state
    ///
    /// Only backtracking may call this; it is the single way a collapsed cell
    /// reverts.
    pub fn reset(&mut self, position: Coordinate) {
        if let Some(cell) = self.cells.get_mut(&position) {
            *cell = MapCell::unset();
        }
    }

    /// Collapsed cells in coordinate order
    pub fn collapsed_cells(&self) -> Vec<(Coordinate, TerrainId)> {
        let mut collapsed: Vec<_> = self
            .cells
            .iter()
            .filter_map(|(&position, cell)| cell.terrain().map(|terrain| (position, terrain)))
            .collect();
        collapsed.sort_unstable();
        collapsed
    }
}

/// Build the grid for one generation call
///
/// Every target coordinate starts unset; every pre-existing host cell is
/// seeded collapsed with its terrain, including target coordinates the host
/// already holds.
pub fn initialize_map(
    target_cells: &[Coordinate],
    preexisting: &BTreeMap<Coordinate, TerrainId>,
) -> GridState {
    let mut grid = GridState::new();

    for &position in target_cells {
        grid.track(position);
    }

    for (&position, &terrain) in preexisting {
        grid.seed(position, terrain);
    }

    grid
}
