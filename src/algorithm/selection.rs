//! Chaos scoring and frequency-weighted pattern selection
//!
//! Chaos counts how many (pattern, offset) placements are still legal around a
//! cell. Lower chaos means a more constrained cell, which the frontier visits
//! first.

use crate::{
    algorithm::{
        deadlock::{PlacementChoice, Sequence},
        feasibility::can_apply_pattern_with,
        propagation::StepData,
    },
    io::error::Result,
    math::probability::select_weighted,
    spatial::{Coordinate, GridState, offset_from},
};
use rand::Rng;

/// Count the legal placements that touch the neighbours of `position`
///
/// For every tracked neighbour, each pattern is tried at every anchor that
/// puts one of its offsets on that neighbour. Untracked neighbours add
/// `empty_neighbor_chaos_bias` each instead.
pub fn chaos(grid_state: &GridState, data: &StepData, position: Coordinate) -> u64 {
    data.shape
        .adjacencies(position)
        .into_iter()
        .map(|neighbor| {
            if !grid_state.contains(neighbor) {
                return data.empty_neighbor_chaos_bias;
            }

            data.patterns
                .iter()
                .map(|pattern| {
                    pattern
                        .offsets()
                        .filter(|&offset| {
                            can_apply_pattern_with(
                                grid_state,
                                &data.shape,
                                pattern,
                                offset_from(neighbor, offset),
                                data.rules,
                            )
                        })
                        .count() as u64
                })
                .sum::<u64>()
        })
        .sum()
}

/// Every legal placement that covers `candidate`, minus those in `tried`
///
/// Ordered by catalogue index, then by the pattern's offset order.
pub fn legal_placements(
    grid_state: &GridState,
    data: &StepData,
    candidate: Coordinate,
    tried: &[PlacementChoice],
) -> Vec<PlacementChoice> {
    data.patterns
        .iter()
        .enumerate()
        .flat_map(|(index, pattern)| {
            pattern
                .offsets()
                .map(move |offset| (index, offset_from(candidate, offset)))
                .filter(move |&(_, anchor)| {
                    can_apply_pattern_with(grid_state, &data.shape, pattern, anchor, data.rules)
                })
        })
        .filter(|choice| !tried.contains(choice))
        .collect()
}

/// Pick a placement for `candidate`, weighted by pattern frequency
///
/// Placements already tried from the current state of `sequence` are
/// excluded. Returns `None` when no placement survives.
///
/// # Errors
///
/// Propagates errors from weighted selection.
pub fn select_pattern<R: Rng + ?Sized>(
    grid_state: &GridState,
    data: &StepData,
    candidate: Coordinate,
    sequence: &Sequence,
    rng: &mut R,
) -> Result<Option<PlacementChoice>> {
    let survivors = legal_placements(grid_state, data, candidate, sequence.top_tried());

    if survivors.is_empty() {
        return Ok(None);
    }

    let selected = select_weighted(
        &survivors,
        |&(index, _)| {
            data.patterns
                .get(index)
                .map_or(0.0, |pattern| pattern.frequency() as f64)
        },
        rng,
    )?;

    Ok(survivors.get(selected).copied())
}
