use crate::{
    algorithm::propagation::unapply_step,
    spatial::{Coordinate, GridState},
};

/// A placement identified by catalogue index and anchor
pub type PlacementChoice = (usize, Coordinate);

/// One applied pattern and the alternatives already ruled out after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStep {
    pattern: usize,
    anchor: Coordinate,
    applied_cells: Vec<Coordinate>,
    tried_patterns: Vec<PlacementChoice>,
}

impl SequenceStep {
    /// Record a placement that collapsed `applied_cells`
    pub const fn new(pattern: usize, anchor: Coordinate, applied_cells: Vec<Coordinate>) -> Self {
        Self {
            pattern,
            anchor,
            applied_cells,
            tried_patterns: Vec::new(),
        }
    }

    /// Catalogue index of the applied pattern
    pub const fn pattern(&self) -> usize {
        self.pattern
    }

    /// Anchor the pattern was placed at
    pub const fn anchor(&self) -> Coordinate {
        self.anchor
    }

    /// Cells this step moved from unset to collapsed
    pub fn applied_cells(&self) -> &[Coordinate] {
        &self.applied_cells
    }

    /// Placements that failed from the state right after this step
    pub fn tried_patterns(&self) -> &[PlacementChoice] {
        &self.tried_patterns
    }

    /// The placement this step made
    pub const fn choice(&self) -> PlacementChoice {
        (self.pattern, self.anchor)
    }
}

/// Ordered stack of applied steps above a base frame that is never popped
///
/// The base frame only holds the placements that failed from the initial
/// state, so failures recorded while the stack is empty are still remembered.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    base_tried: Vec<PlacementChoice>,
    steps: Vec<SequenceStep>,
}

impl Sequence {
    /// Create a sequence holding only the base frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a freshly applied step
    pub fn push(&mut self, step: SequenceStep) {
        self.steps.push(step);
    }

    /// Pop the most recent step; the base frame always stays
    pub fn pop(&mut self) -> Option<SequenceStep> {
        self.steps.pop()
    }

    /// Most recent applied step, if any
    pub fn top(&self) -> Option<&SequenceStep> {
        self.steps.last()
    }

    /// Failed placements recorded against the current state
    pub fn top_tried(&self) -> &[PlacementChoice] {
        self.steps
            .last()
            .map_or(&self.base_tried, |step| &step.tried_patterns)
    }

    /// Whether `choice` already failed from the current state
    pub fn has_tried(&self, choice: PlacementChoice) -> bool {
        self.top_tried().contains(&choice)
    }

    /// Remember that `choice` failed from the current state
    pub fn record_tried(&mut self, choice: PlacementChoice) {
        let tried = match self.steps.last_mut() {
            Some(step) => &mut step.tried_patterns,
            None => &mut self.base_tried,
        };
        if !tried.contains(&choice) {
            tried.push(choice);
        }
    }

    /// Number of applied steps above the base frame
    pub const fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Whether only the base frame remains
    pub const fn is_at_base(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Undo the most recent step and mark it as tried for the state below it
///
/// Returns the undone step, or `None` when only the base frame is left and
/// there is nothing to undo.
pub fn backtrack(grid_state: &mut GridState, sequence: &mut Sequence) -> Option<SequenceStep> {
    let step = sequence.pop()?;
    unapply_step(grid_state, &step);
    sequence.record_tried(step.choice());
    Some(step)
}
