//! Pattern placement legality
//!
//! A placement is legal when it agrees with every collapsed cell it covers,
//! anchors against at least one of them and fills at least one unset cell.
//! Shapes that cannot close gaps get extra rules that keep them from sealing
//! off cells they could never reach again.

use crate::analysis::patterns::Pattern;
use crate::spatial::{Coordinate, GridState, PatternShape};

/// Optional placement rules on top of the core legality test
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementRules {
    /// Reject placements that squeeze an open cell between filled cells on
    /// opposite sides (only for shapes that cannot close gaps)
    pub gap_trap_check: bool,
}

/// Whether `pattern` may be placed with its origin at `anchor`
///
/// Uses the default [`PlacementRules`].
pub fn can_apply_pattern_at(
    grid: &GridState,
    shape: &PatternShape,
    pattern: &Pattern,
    anchor: Coordinate,
) -> bool {
    can_apply_pattern_with(grid, shape, pattern, anchor, PlacementRules::default())
}

/// Whether `pattern` may be placed at `anchor` under `rules`
///
/// Pattern cells outside the tracked grid are ignored. Any disagreement with a
/// collapsed cell rejects immediately. The placement must overlap at least one
/// collapsed cell and at least one unset cell.
pub fn can_apply_pattern_with(
    grid: &GridState,
    shape: &PatternShape,
    pattern: &Pattern,
    anchor: Coordinate,
    rules: PlacementRules,
) -> bool {
    let mut collapsed_overlap = 0usize;
    let mut empty_cells = Vec::new();

    for (position, terrain) in pattern.placed_at(anchor) {
        let Some(cell) = grid.get(position) else {
            continue;
        };

        match cell.terrain() {
            Some(existing) if existing != terrain => return false,
            Some(_) => collapsed_overlap += 1,
            None => empty_cells.push(position),
        }
    }

    if collapsed_overlap == 0 || empty_cells.is_empty() {
        return false;
    }

    if shape.can_close_gaps() {
        return true;
    }

    let footprint: Vec<Coordinate> = pattern.placed_at(anchor).map(|(pos, _)| pos).collect();

    if touches_structure_outside(grid, shape, &empty_cells, &footprint) {
        return false;
    }

    !(rules.gap_trap_check && leaves_gap_trap(grid, shape, &empty_cells, &footprint))
}

/// An empty cell of the placement borders collapsed terrain the pattern does not cover
fn touches_structure_outside(
    grid: &GridState,
    shape: &PatternShape,
    empty_cells: &[Coordinate],
    footprint: &[Coordinate],
) -> bool {
    empty_cells.iter().any(|&cell| {
        shape
            .adjacencies(cell)
            .into_iter()
            .any(|neighbor| !footprint.contains(&neighbor) && grid.is_collapsed(neighbor))
    })
}

/// An open cell next to the placement would end up filled on two opposite sides
fn leaves_gap_trap(
    grid: &GridState,
    shape: &PatternShape,
    empty_cells: &[Coordinate],
    footprint: &[Coordinate],
) -> bool {
    let filled_after = |position: Coordinate| {
        grid.is_collapsed(position) || (footprint.contains(&position) && grid.contains(position))
    };

    empty_cells.iter().any(|&cell| {
        shape.adjacencies(cell).into_iter().any(|outside| {
            if footprint.contains(&outside) || !grid.is_open(outside) {
                return false;
            }
            // Adjacency lists keep opposite directions next to each other
            shape
                .adjacencies(outside)
                .chunks_exact(2)
                .any(|pair| pair.iter().all(|&side| filled_after(side)))
        })
    })
}
