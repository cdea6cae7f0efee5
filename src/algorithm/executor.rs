//! Overlapping collapse engine
//!
//! The engine grows terrain outwards from already-collapsed cells. Each
//! iteration takes the most constrained frontier cell, places a legal pattern
//! over it, and undoes the latest placement when nothing fits. Partial
//! failure is an observable result: cells that could not be filled are
//! returned, not raised.

use crate::{
    algorithm::{
        deadlock::{self, Sequence},
        feasibility::PlacementRules,
        frontier::Frontier,
        propagation::{
            StepData, apply_pattern_at, enqueue_neighbors, has_collapsed_neighbor, requeue_cells,
        },
        selection::select_pattern,
    },
    analysis::patterns::{Pattern, PatternCatalogue, Sample},
    io::configuration::{DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED},
    io::error::{AlgorithmError, Result},
    math::probability::select_weighted,
    spatial::{
        Coordinate, GridState, PatternShape, TerrainId,
        grid::initialize_map,
        surface::{TerrainSurface, emit_by_terrain},
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::{BTreeMap, HashSet};

/// When collapsed cells are handed to the host surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Emit after every applied step and erase on every undo
    #[default]
    Immediate,
    /// Emit every generated cell once, when generation finishes
    OnStepComplete,
}

/// What happens when backtracking finds only the base frame left
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnderflowPolicy {
    /// Mark the candidate unfillable and keep generating elsewhere
    #[default]
    Abandon,
    /// Stop with [`AlgorithmError::BacktrackUnderflow`]
    Abort,
}

/// Parameters for one generation call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollapseConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Main-loop iterations before generation stops
    pub max_iterations: usize,
    /// Chaos added per untracked neighbour
    pub empty_neighbor_chaos_bias: u64,
    /// When the host surface receives terrain
    pub render_mode: RenderMode,
    /// Backtrack underflow handling
    pub underflow_policy: UnderflowPolicy,
    /// Enable the gap-trap placement rule for shapes that cannot close gaps
    pub gap_trap_check: bool,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            empty_neighbor_chaos_bias: DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS,
            render_mode: RenderMode::default(),
            underflow_policy: UnderflowPolicy::default(),
            gap_trap_check: false,
        }
    }
}

/// States of the collapse loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapsePhase {
    /// Waiting to pick the next candidate
    Selecting,
    /// A placement was chosen for `candidate`
    Applying {
        /// Frontier cell being filled
        candidate: Coordinate,
        /// Catalogue index of the chosen pattern
        pattern: usize,
        /// Anchor of the chosen placement
        anchor: Coordinate,
    },
    /// No placement fits `candidate`
    Backtracking {
        /// Frontier cell that could not be filled
        candidate: Coordinate,
    },
    /// Generation finished
    Done,
}

/// Summary of a finished generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Target cells left unset, in target order
    pub unfilled: Vec<Coordinate>,
    /// Candidates given up on after a backtrack underflow, in coordinate order
    pub abandoned: Vec<Coordinate>,
    /// Applied steps left on the sequence stack
    pub steps: usize,
    /// Main-loop iterations performed
    pub iterations: usize,
    /// Steps undone by backtracking
    pub backtracks: usize,
    /// Whether the iteration budget ran out before the frontier emptied
    pub budget_exhausted: bool,
}

/// Overlapping collapse state for one generation call
pub struct OverlappingCollapse {
    /// Shape, patterns and placement rules
    pub step_data: StepData,
    /// Cell states of the target region and the host's existing cells
    pub grid_state: GridState,
    /// Candidate cells ordered by chaos
    pub frontier: Frontier,
    /// Applied steps, newest last
    pub sequence: Sequence,
    /// Main-loop iterations performed so far
    pub iteration: usize,
    /// Steps undone so far
    pub backtracks: usize,
    config: CollapseConfig,
    rng: StdRng,
    target_cells: Vec<Coordinate>,
    preexisting: HashSet<Coordinate>,
    abandoned: HashSet<Coordinate>,
    phase: CollapsePhase,
    budget_exhausted: bool,
}

impl OverlappingCollapse {
    /// Build the grid and seed the frontier from every collapsed cell
    pub fn new(
        shape: PatternShape,
        patterns: Vec<Pattern>,
        target_cells: &[Coordinate],
        preexisting: &BTreeMap<Coordinate, TerrainId>,
        config: CollapseConfig,
    ) -> Self {
        let grid_state = initialize_map(target_cells, preexisting);
        let step_data = StepData {
            shape,
            patterns,
            rules: PlacementRules {
                gap_trap_check: config.gap_trap_check,
            },
            empty_neighbor_chaos_bias: config.empty_neighbor_chaos_bias,
        };

        let collapsed: Vec<Coordinate> = grid_state
            .collapsed_cells()
            .into_iter()
            .map(|(position, _)| position)
            .collect();
        let abandoned = HashSet::new();
        let mut frontier = Frontier::new();
        enqueue_neighbors(&grid_state, &step_data, &mut frontier, &collapsed, &abandoned);

        tracing::info!(
            shape = step_data.shape.name(),
            patterns = step_data.patterns.len(),
            target_cells = target_cells.len(),
            collapsed = collapsed.len(),
            frontier = frontier.len(),
            seed = config.seed,
            "initialized collapse"
        );

        Self {
            step_data,
            grid_state,
            frontier,
            sequence: Sequence::new(),
            iteration: 0,
            backtracks: 0,
            config,
            rng: StdRng::seed_from_u64(config.seed),
            target_cells: target_cells.to_vec(),
            preexisting: preexisting.keys().copied().collect(),
            abandoned,
            phase: CollapsePhase::Selecting,
            budget_exhausted: false,
        }
    }

    /// Current state of the collapse loop
    pub const fn phase(&self) -> CollapsePhase {
        self.phase
    }

    /// Configuration this engine was built with
    pub const fn config(&self) -> &CollapseConfig {
        &self.config
    }

    /// Target cells that are still unset, in target order
    pub fn unfilled_cells(&self) -> Vec<Coordinate> {
        self.target_cells
            .iter()
            .copied()
            .filter(|&position| !self.grid_state.is_collapsed(position))
            .collect()
    }

    /// Candidates abandoned after a backtrack underflow, in coordinate order
    pub fn abandoned_cells(&self) -> Vec<Coordinate> {
        let mut abandoned: Vec<_> = self.abandoned.iter().copied().collect();
        abandoned.sort_unstable();
        abandoned
    }

    /// Cells collapsed by this run, with their terrain, in coordinate order
    pub fn generated_cells(&self) -> Vec<(Coordinate, TerrainId)> {
        self.grid_state
            .collapsed_cells()
            .into_iter()
            .filter(|(position, _)| !self.preexisting.contains(position))
            .collect()
    }

    /// Perform a single state transition
    ///
    /// # Errors
    ///
    /// Returns `BacktrackUnderflow` under [`UnderflowPolicy::Abort`] and
    /// propagates weighted-selection errors.
    pub fn advance<S: TerrainSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<CollapsePhase> {
        self.phase = match self.phase {
            CollapsePhase::Selecting => self.select(surface)?,
            CollapsePhase::Applying {
                candidate,
                pattern,
                anchor,
            } => {
                self.apply(candidate, pattern, anchor, surface)?;
                CollapsePhase::Selecting
            }
            CollapsePhase::Backtracking { candidate } => {
                self.backtrack(candidate, surface)?;
                CollapsePhase::Selecting
            }
            CollapsePhase::Done => CollapsePhase::Done,
        };

        Ok(self.phase)
    }

    /// Run transitions until the loop is back at selection or done
    ///
    /// Returns `false` once generation has finished.
    ///
    /// # Errors
    ///
    /// See [`Self::advance`].
    pub fn run_iteration<S: TerrainSurface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
        loop {
            match self.advance(surface)? {
                CollapsePhase::Selecting => return Ok(true),
                CollapsePhase::Done => return Ok(false),
                CollapsePhase::Applying { .. } | CollapsePhase::Backtracking { .. } => {}
            }
        }
    }

    /// Run until the frontier empties or the iteration budget runs out
    ///
    /// # Errors
    ///
    /// See [`Self::advance`].
    pub fn run<S: TerrainSurface + ?Sized>(&mut self, surface: &mut S) -> Result<GenerationReport> {
        while self.run_iteration(surface)? {}
        Ok(self.report())
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            unfilled: self.unfilled_cells(),
            abandoned: self.abandoned_cells(),
            steps: self.sequence.depth(),
            iterations: self.iteration,
            backtracks: self.backtracks,
            budget_exhausted: self.budget_exhausted,
        }
    }

    fn select<S: TerrainSurface + ?Sized>(&mut self, surface: &mut S) -> Result<CollapsePhase> {
        if self.iteration >= self.config.max_iterations {
            self.budget_exhausted = !self.frontier.is_empty();
            if self.budget_exhausted {
                tracing::warn!(
                    max_iterations = self.config.max_iterations,
                    frontier = self.frontier.len(),
                    "iteration budget exhausted"
                );
            }
            return Ok(self.finish(surface));
        }

        let Some(candidate) = self.next_candidate() else {
            return Ok(self.finish(surface));
        };
        self.iteration += 1;

        let choice = select_pattern(
            &self.grid_state,
            &self.step_data,
            candidate,
            &self.sequence,
            &mut self.rng,
        )?;

        Ok(match choice {
            Some((pattern, anchor)) => CollapsePhase::Applying {
                candidate,
                pattern,
                anchor,
            },
            None => CollapsePhase::Backtracking { candidate },
        })
    }

    // Pops until a cell is open, not abandoned and still touches the structure
    fn next_candidate(&mut self) -> Option<Coordinate> {
        while let Some((position, _)) = self.frontier.pop() {
            if self.grid_state.is_open(position)
                && !self.abandoned.contains(&position)
                && has_collapsed_neighbor(&self.grid_state, &self.step_data.shape, position)
            {
                return Some(position);
            }
        }
        None
    }

    fn apply<S: TerrainSurface + ?Sized>(
        &mut self,
        candidate: Coordinate,
        pattern_index: usize,
        anchor: Coordinate,
        surface: &mut S,
    ) -> Result<()> {
        let pattern = self
            .step_data
            .patterns
            .get(pattern_index)
            .ok_or_else(|| AlgorithmError::InvalidArgument {
                reason: format!("pattern index {pattern_index} is out of range"),
            })?;

        let step = apply_pattern_at(&mut self.grid_state, pattern_index, pattern, anchor);

        if self.config.render_mode == RenderMode::Immediate {
            let grid_state = &self.grid_state;
            emit_by_terrain(
                surface,
                step.applied_cells()
                    .iter()
                    .filter_map(|&position| grid_state.terrain(position).map(|t| (position, t))),
            );
        }

        enqueue_neighbors(
            &self.grid_state,
            &self.step_data,
            &mut self.frontier,
            step.applied_cells(),
            &self.abandoned,
        );

        tracing::debug!(
            iteration = self.iteration,
            x = candidate[0],
            y = candidate[1],
            pattern = pattern_index,
            anchor_x = anchor[0],
            anchor_y = anchor[1],
            applied = step.applied_cells().len(),
            depth = self.sequence.depth() + 1,
            "applied pattern"
        );

        self.sequence.push(step);
        Ok(())
    }

    fn backtrack<S: TerrainSurface + ?Sized>(
        &mut self,
        candidate: Coordinate,
        surface: &mut S,
    ) -> Result<()> {
        let Some(step) = deadlock::backtrack(&mut self.grid_state, &mut self.sequence) else {
            return match self.config.underflow_policy {
                UnderflowPolicy::Abandon => {
                    tracing::warn!(
                        iteration = self.iteration,
                        x = candidate[0],
                        y = candidate[1],
                        "no step left to undo, abandoning cell"
                    );
                    self.abandoned.insert(candidate);
                    self.frontier.remove(candidate);
                    Ok(())
                }
                UnderflowPolicy::Abort => Err(AlgorithmError::BacktrackUnderflow {
                    candidate,
                    iteration: self.iteration,
                }),
            };
        };

        self.backtracks += 1;

        if self.config.render_mode == RenderMode::Immediate {
            surface.erase_cells(step.applied_cells());
        }

        let mut reopened = step.applied_cells().to_vec();
        reopened.push(candidate);
        requeue_cells(
            &self.grid_state,
            &self.step_data,
            &mut self.frontier,
            &reopened,
            &self.abandoned,
        );

        tracing::debug!(
            iteration = self.iteration,
            x = candidate[0],
            y = candidate[1],
            undone_pattern = step.pattern(),
            reset = step.applied_cells().len(),
            depth = self.sequence.depth(),
            "backtracked"
        );

        Ok(())
    }

    fn finish<S: TerrainSurface + ?Sized>(&self, surface: &mut S) -> CollapsePhase {
        if self.config.render_mode == RenderMode::OnStepComplete {
            emit_by_terrain(surface, self.generated_cells());
        }

        tracing::info!(
            iterations = self.iteration,
            steps = self.sequence.depth(),
            backtracks = self.backtracks,
            unfilled = self.unfilled_cells().len(),
            abandoned = self.abandoned.len(),
            "generation finished"
        );

        CollapsePhase::Done
    }
}

/// Choose a catalogue pattern by frequency and return its cells placed at `anchor`
///
/// Used to start generation on a host surface that holds no terrain yet.
///
/// # Errors
///
/// Returns `InvalidArgument` if `patterns` is empty.
pub fn seed_stamp<R: Rng + ?Sized>(
    patterns: &[Pattern],
    anchor: Coordinate,
    rng: &mut R,
) -> Result<Vec<(Coordinate, TerrainId)>> {
    let selected = select_weighted(patterns, |pattern| pattern.frequency() as f64, rng)?;

    Ok(patterns
        .get(selected)
        .map(|pattern| pattern.placed_at(anchor).collect())
        .unwrap_or_default())
}

/// Fill `target_cells` on `surface` with terrain synthesised from `sample`
///
/// The surface's existing cells act as collapsed context. Returns the target
/// cells that could not be filled, in target order.
///
/// # Errors
///
/// Propagates pattern extraction errors, and returns `BacktrackUnderflow`
/// when `config` uses [`UnderflowPolicy::Abort`] and the search runs out of
/// steps to undo.
pub fn generate<S: TerrainSurface + ?Sized>(
    sample: &Sample,
    shape: &PatternShape,
    target_cells: &[Coordinate],
    surface: &mut S,
    config: CollapseConfig,
) -> Result<Vec<Coordinate>> {
    let catalogue = PatternCatalogue::extract(sample, shape)?;
    let preexisting: BTreeMap<Coordinate, TerrainId> = surface.used_cells().into_iter().collect();

    if catalogue.is_empty() {
        tracing::warn!(
            sample_cells = sample.len(),
            shape = shape.name(),
            size = shape.size(),
            "sample holds no complete pattern window"
        );
        return Ok(target_cells
            .iter()
            .copied()
            .filter(|position| !preexisting.contains_key(position))
            .collect());
    }

    let mut engine = OverlappingCollapse::new(
        shape.clone(),
        catalogue.into_patterns(),
        target_cells,
        &preexisting,
        config,
    );

    Ok(engine.run(surface)?.unfilled)
}
