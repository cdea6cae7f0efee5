//! Pattern extraction from sample terrain
//!
//! Slides a [`PatternShape`] over every position of the sample, expands each
//! complete window into its rotations and deduplicates the results into a
//! catalogue that counts how often each pattern occurred.

use crate::io::error::Result;
use crate::spatial::{Coordinate, PatternShape, TerrainId, offset_by};
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};

/// A single sample cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCell {
    /// Terrain held by the cell
    pub terrain: TerrainId,
    /// `false` pins any pattern containing this cell to its authored orientation
    pub is_rotatable: bool,
}

impl PatternCell {
    /// Rotatable cell
    pub const fn new(terrain: TerrainId) -> Self {
        Self {
            terrain,
            is_rotatable: true,
        }
    }

    /// Cell whose patterns must never be rotated
    pub const fn pinned(terrain: TerrainId) -> Self {
        Self {
            terrain,
            is_rotatable: false,
        }
    }
}

/// Reference terrain that patterns are learned from
pub type Sample = BTreeMap<Coordinate, PatternCell>;

/// Canonical, hashable form of a pattern's cells
pub type PatternSignature = Vec<(Coordinate, TerrainId)>;

/// Build a sample from a dense grid indexed `[[x, y]]`
pub fn sample_from_grid(grid: &Array2<TerrainId>, rotatable: bool) -> Sample {
    grid.indexed_iter()
        .map(|((x, y), &terrain)| {
            let cell = PatternCell {
                terrain,
                is_rotatable: rotatable,
            };
            ([x as i32, y as i32], cell)
        })
        .collect()
}

/// Terrain footprint with its occurrence count
///
/// Equality and hashing only look at the cells; the frequency is bookkeeping.
#[derive(Debug, Clone)]
pub struct Pattern {
    cells: BTreeMap<Coordinate, TerrainId>,
    frequency: usize,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Pattern {}

impl std::hash::Hash for Pattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl Pattern {
    /// Pattern seen once
    pub const fn new(cells: BTreeMap<Coordinate, TerrainId>) -> Self {
        Self::with_frequency(cells, 1)
    }

    /// Pattern with an explicit frequency
    pub const fn with_frequency(cells: BTreeMap<Coordinate, TerrainId>, frequency: usize) -> Self {
        Self { cells, frequency }
    }

    /// Relative offsets and their terrain
    pub const fn cells(&self) -> &BTreeMap<Coordinate, TerrainId> {
        &self.cells
    }

    /// Number of times this pattern occurred during extraction
    pub const fn frequency(&self) -> usize {
        self.frequency
    }

    /// Terrain at a relative offset
    pub fn terrain_at(&self, offset: Coordinate) -> Option<TerrainId> {
        self.cells.get(&offset).copied()
    }

    /// Offsets covered by this pattern
    pub fn offsets(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.keys().copied()
    }

    /// Absolute cells when the pattern is anchored at `anchor`
    pub fn placed_at(
        &self,
        anchor: Coordinate,
    ) -> impl Iterator<Item = (Coordinate, TerrainId)> + '_ {
        self.cells
            .iter()
            .map(move |(&offset, &terrain)| (offset_by(anchor, offset), terrain))
    }

    /// Canonical signature used by the dedup index
    pub fn signature(&self) -> PatternSignature {
        self.cells.iter().map(|(&offset, &terrain)| (offset, terrain)).collect()
    }
}

/// Deduplicated patterns in first-seen order
///
/// Lookup goes through a signature index into an owned pattern array so the
/// frequency of an existing entry can be bumped in place.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalogue {
    patterns: Vec<Pattern>,
    index: HashMap<PatternSignature, usize>,
}

impl PatternCatalogue {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every unique pattern of `shape` from `sample`
    ///
    /// Windows that run past the edge of the sample are skipped. A window that
    /// contains a pinned cell contributes only its unrotated form; every other
    /// window contributes one candidate per superimposed rotation.
    ///
    /// # Errors
    ///
    /// Propagates rotation errors from the shape. These indicate a shape whose
    /// rotation set does not match its footprint.
    pub fn extract(sample: &Sample, shape: &PatternShape) -> Result<Self> {
        let mut catalogue = Self::new();
        let mut windows = 0usize;

        'positions: for &position in sample.keys() {
            let mut window = BTreeMap::new();
            let mut rotatable = true;

            for &offset in shape.cells() {
                let Some(cell) = sample.get(&offset_by(position, offset)) else {
                    continue 'positions;
                };
                rotatable &= cell.is_rotatable;
                window.insert(offset, cell.terrain);
            }

            windows += 1;

            if rotatable {
                for &degrees in shape.superimposed_rotations() {
                    catalogue.record(shape.rotate_pattern(&window, degrees)?);
                }
            } else {
                catalogue.record(window);
            }
        }

        tracing::debug!(
            shape = shape.name(),
            size = shape.size(),
            sample_cells = sample.len(),
            windows,
            unique_patterns = catalogue.len(),
            "extracted pattern catalogue"
        );

        Ok(catalogue)
    }

    /// Count one occurrence of `cells`, inserting it if unseen
    ///
    /// Returns the catalogue index of the pattern.
    pub fn record(&mut self, cells: BTreeMap<Coordinate, TerrainId>) -> usize {
        let pattern = Pattern::new(cells);
        let signature = pattern.signature();

        if let Some(&slot) = self.index.get(&signature) {
            if let Some(pattern) = self.patterns.get_mut(slot) {
                pattern.frequency += 1;
            }
            return slot;
        }

        let slot = self.patterns.len();
        self.patterns.push(pattern);
        self.index.insert(signature, slot);
        slot
    }

    /// Unique patterns in insertion order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Pattern at catalogue index `slot`
    pub fn get(&self, slot: usize) -> Option<&Pattern> {
        self.patterns.get(slot)
    }

    /// Number of unique patterns
    pub const fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern has been recorded
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Sum of all pattern frequencies
    pub fn total_frequency(&self) -> usize {
        self.patterns.iter().map(Pattern::frequency).sum()
    }

    /// Consume the catalogue and return its patterns
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }
}

/// Extract the unique patterns of `shape` found in `sample`
///
/// # Errors
///
/// See [`PatternCatalogue::extract`].
pub fn extract_unique_patterns(sample: &Sample, shape: &PatternShape) -> Result<Vec<Pattern>> {
    PatternCatalogue::extract(sample, shape).map(PatternCatalogue::into_patterns)
}
