//! Host tile surface
//!
//! The engine never renders anything itself. It reads the cells the host
//! already holds and hands terrain assignments back in batches that share a
//! terrain id, so a host can connect same-category tiles in one call.

use crate::spatial::{Coordinate, TerrainId};
use std::collections::BTreeMap;

/// Tile map that stores terrain ids and receives batched assignments
pub trait TerrainSurface {
    /// Every cell the surface currently holds, with its terrain
    fn used_cells(&self) -> Vec<(Coordinate, TerrainId)>;

    /// Assign `terrain` to all of `cells`
    fn set_cells_terrain(&mut self, cells: &[Coordinate], terrain: TerrainId);

    /// Remove any terrain from `cells`
    fn erase_cells(&mut self, cells: &[Coordinate]);
}

/// Hand `cells` to `surface`, one batch per terrain id in ascending id order
///
/// Returns the number of batches sent.
pub fn emit_by_terrain<S>(
    surface: &mut S,
    cells: impl IntoIterator<Item = (Coordinate, TerrainId)>,
) -> usize
where
    S: TerrainSurface + ?Sized,
{
    let mut groups: BTreeMap<TerrainId, Vec<Coordinate>> = BTreeMap::new();
    for (position, terrain) in cells {
        groups.entry(terrain).or_default().push(position);
    }

    for (&terrain, positions) in &groups {
        surface.set_cells_terrain(positions, terrain);
    }

    groups.len()
}

/// In-memory surface that also records every batch it receives
#[derive(Debug, Clone, Default)]
pub struct TileLayer {
    cells: BTreeMap<Coordinate, TerrainId>,
    batches: Vec<(TerrainId, Vec<Coordinate>)>,
    erased: usize,
}

impl TileLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer pre-populated with `cells`
    pub fn with_cells(cells: impl IntoIterator<Item = (Coordinate, TerrainId)>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Terrain at `position`, if any
    pub fn terrain(&self, position: Coordinate) -> Option<TerrainId> {
        self.cells.get(&position).copied()
    }

    /// All cells currently held, in coordinate order
    pub const fn cells(&self) -> &BTreeMap<Coordinate, TerrainId> {
        &self.cells
    }

    /// Assignment batches in the order they arrived
    pub fn batches(&self) -> &[(TerrainId, Vec<Coordinate>)] {
        &self.batches
    }

    /// Total number of cells erased so far
    pub const fn erased_count(&self) -> usize {
        self.erased
    }
}

impl TerrainSurface for TileLayer {
    fn used_cells(&self) -> Vec<(Coordinate, TerrainId)> {
        self.cells.iter().map(|(&pos, &terrain)| (pos, terrain)).collect()
    }

    fn set_cells_terrain(&mut self, cells: &[Coordinate], terrain: TerrainId) {
        for &position in cells {
            self.cells.insert(position, terrain);
        }
        self.batches.push((terrain, cells.to_vec()));
    }

    fn erase_cells(&mut self, cells: &[Coordinate]) {
        for position in cells {
            if self.cells.remove(position).is_some() {
                self.erased += 1;
            }
        }
    }
}
