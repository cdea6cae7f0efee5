//! Pattern application, undo, and frontier growth

use crate::{
    algorithm::{
        deadlock::SequenceStep, feasibility::PlacementRules, frontier::Frontier,
        selection::chaos,
    },
    analysis::patterns::Pattern,
    spatial::{Coordinate, GridState, PatternShape},
};
use std::collections::{BTreeSet, HashSet};

/// Read-only inputs shared by every step of one generation call
#[derive(Debug, Clone)]
pub struct StepData {
    /// Footprint the catalogue was extracted with
    pub shape: PatternShape,
    /// Unique patterns with their frequencies
    pub patterns: Vec<Pattern>,
    /// Optional placement rules
    pub rules: PlacementRules,
    /// Chaos added per untracked neighbour
    pub empty_neighbor_chaos_bias: u64,
}

/// Write `pattern` onto the grid at `anchor`
///
/// Only tracked, unset cells are collapsed. Cells that were already collapsed
/// (they agree by legality) and untracked cells are skipped and do not appear
/// in the returned step.
pub fn apply_pattern_at(
    grid_state: &mut GridState,
    pattern_index: usize,
    pattern: &Pattern,
    anchor: Coordinate,
) -> SequenceStep {
    let applied_cells = pattern
        .placed_at(anchor)
        .filter_map(|(position, terrain)| {
            grid_state.collapse(position, terrain).then_some(position)
        })
        .collect();

    SequenceStep::new(pattern_index, anchor, applied_cells)
}

/// Return every cell a step collapsed to the unset state
pub fn unapply_step(grid_state: &mut GridState, step: &SequenceStep) {
    for &position in step.applied_cells() {
        grid_state.reset(position);
    }
}

/// Whether any neighbour of `position` is collapsed
pub fn has_collapsed_neighbor(
    grid_state: &GridState,
    shape: &PatternShape,
    position: Coordinate,
) -> bool {
    shape
        .adjacencies(position)
        .into_iter()
        .any(|neighbor| grid_state.is_collapsed(neighbor))
}

/// Queue the open neighbours of `cells` with freshly computed chaos
///
/// Neighbours already on the frontier are re-scored. Returns the number of
/// coordinates whose score changed.
pub fn enqueue_neighbors(
    grid_state: &GridState,
    data: &StepData,
    frontier: &mut Frontier,
    cells: &[Coordinate],
    excluded: &HashSet<Coordinate>,
) -> usize {
    let neighbors: BTreeSet<Coordinate> = cells
        .iter()
        .flat_map(|&cell| data.shape.adjacencies(cell))
        .filter(|&neighbor| grid_state.is_open(neighbor) && !excluded.contains(&neighbor))
        .collect();

    enqueue_cells(grid_state, data, frontier, neighbors)
}

/// Queue open cells that touch collapsed terrain
///
/// Used after an undo, where the reset cells and the failed candidate go
/// back onto the frontier only if they still border the structure.
pub fn requeue_cells(
    grid_state: &GridState,
    data: &StepData,
    frontier: &mut Frontier,
    cells: &[Coordinate],
    excluded: &HashSet<Coordinate>,
) -> usize {
    let candidates: BTreeSet<Coordinate> = cells
        .iter()
        .copied()
        .filter(|&cell| {
            grid_state.is_open(cell)
                && !excluded.contains(&cell)
                && has_collapsed_neighbor(grid_state, &data.shape, cell)
        })
        .collect();

    enqueue_cells(grid_state, data, frontier, candidates)
}

fn enqueue_cells(
    grid_state: &GridState,
    data: &StepData,
    frontier: &mut Frontier,
    cells: BTreeSet<Coordinate>,
) -> usize {
    cells
        .into_iter()
        .filter(|&cell| {
            let score = chaos(grid_state, data, cell);
            tracing::trace!(x = cell[0], y = cell[1], chaos = score, "queued frontier cell");
            frontier.push(cell, score)
        })
        .count()
}
