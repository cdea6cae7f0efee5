//! Prefill image parsing into pre-collapsed host cells

use crate::io::error::{AlgorithmError, Result};
use crate::io::image::Palette;
use crate::spatial::grid::BoundingBox;
use crate::spatial::{Coordinate, TerrainId};
use std::collections::BTreeMap;
use std::path::Path;

/// Cells a host holds before generation starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefillData {
    /// Terrain per coordinate, pixel `(x, y)` mapped to `[x, y]`
    pub cells: BTreeMap<Coordinate, TerrainId>,
    /// Bounding box of all prefilled cells
    pub bounds: BoundingBox,
}

impl PrefillData {
    /// Parse a prefill PNG against the sample palette
    ///
    /// Only pixels matching palette colours become cells. All other pixels
    /// are treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The PNG file cannot be loaded
    /// - The prefill image contains no colors from the palette
    pub fn from_png(path: &Path, palette: &Palette) -> Result<Self> {
        let img = image::open(path).map_err(|e| AlgorithmError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        let cells: BTreeMap<Coordinate, TerrainId> = img
            .to_rgba8()
            .enumerate_pixels()
            .filter_map(|(x, y, pixel)| {
                palette
                    .terrain_of(pixel.0)
                    .map(|terrain| ([x as i32, y as i32], terrain))
            })
            .collect();

        Self::from_cells(cells).ok_or_else(|| AlgorithmError::InvalidSourceData {
            reason: "Prefill image contains no colors from source palette".to_string(),
        })
    }

    /// Wrap explicit cells, or `None` when there are none
    pub fn from_cells(cells: BTreeMap<Coordinate, TerrainId>) -> Option<Self> {
        let mut positions = cells.keys();
        let &first = positions.next()?;

        let (min, max) = positions.fold((first, first), |(min, max), &[x, y]| {
            ([min[0].min(x), min[1].min(y)], [max[0].max(x), max[1].max(y)])
        });

        Some(Self {
            cells,
            bounds: BoundingBox { min, max },
        })
    }

    /// Terrain prefilled at `position`
    pub fn terrain_at(&self, position: Coordinate) -> Option<TerrainId> {
        self.cells.get(&position).copied()
    }

    /// Number of prefilled cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is prefilled
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
