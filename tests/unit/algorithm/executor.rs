//! Tests for the collapse engine state machine and the generate entry point

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use overlaptile::algorithm::executor::{CollapsePhase, OverlappingCollapse, seed_stamp};
    use overlaptile::analysis::patterns::{Pattern, sample_from_grid};
    use overlaptile::spatial::grid::BoundingBox;
    use overlaptile::spatial::surface::{TerrainSurface, TileLayer};
    use overlaptile::spatial::{Coordinate, PatternShape, TerrainId};
    use overlaptile::{AlgorithmError, CollapseConfig, RenderMode, UnderflowPolicy, generate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn uniform(shape: &PatternShape, terrain: TerrainId) -> Pattern {
        Pattern::new(shape.cells().iter().map(|&cell| (cell, terrain)).collect())
    }

    fn engine(
        size: usize,
        terrain: TerrainId,
        targets: &[Coordinate],
        preexisting: &[(Coordinate, TerrainId)],
        config: CollapseConfig,
    ) -> OverlappingCollapse {
        let shape = PatternShape::square(size).unwrap();
        let patterns = vec![uniform(&shape, terrain)];
        let preexisting: BTreeMap<_, _> = preexisting.iter().copied().collect();
        OverlappingCollapse::new(shape, patterns, targets, &preexisting, config)
    }

    // A uniform catalogue fills a connected region without backtracking
    #[test]
    fn test_uniform_fill_completes() {
        let targets = BoundingBox::from_size(4, 4).cells();
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 1)], CollapseConfig::default());
        let mut layer = TileLayer::new();

        let report = collapse.run(&mut layer).unwrap();

        assert!(report.unfilled.is_empty());
        assert!(report.abandoned.is_empty());
        assert_eq!(report.backtracks, 0);
        assert!(!report.budget_exhausted);
        assert_eq!(collapse.phase(), CollapsePhase::Done);
        assert_eq!(layer.cells().len(), 15);
        assert!(layer.cells().values().all(|&terrain| terrain == 1));
        // Immediate mode sends one batch per applied step
        assert_eq!(layer.batches().len(), report.steps);
    }

    // Deferred rendering sends every generated cell once at the end
    #[test]
    fn test_on_step_complete_emits_once() {
        let targets = BoundingBox::from_size(4, 4).cells();
        let config = CollapseConfig {
            render_mode: RenderMode::OnStepComplete,
            ..CollapseConfig::default()
        };
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 1)], config);
        let mut layer = TileLayer::new();

        assert!(collapse.run_iteration(&mut layer).unwrap());
        assert!(layer.batches().is_empty());

        collapse.run(&mut layer).unwrap();

        assert_eq!(layer.batches().len(), 1);
        assert_eq!(layer.cells().len(), 15);
        assert_eq!(collapse.generated_cells().len(), 15);
    }

    // The loop moves Selecting -> Applying -> Selecting for a fillable cell
    #[test]
    fn test_phase_transitions() {
        let mut collapse = engine(2, 1, &[[1, 0]], &[([0, 0], 1)], CollapseConfig::default());
        let mut layer = TileLayer::new();

        assert_eq!(collapse.phase(), CollapsePhase::Selecting);
        let applying = collapse.advance(&mut layer).unwrap();
        assert!(matches!(
            applying,
            CollapsePhase::Applying {
                candidate: [1, 0],
                pattern: 0,
                ..
            }
        ));
        assert_eq!(collapse.advance(&mut layer).unwrap(), CollapsePhase::Selecting);
        assert_eq!(collapse.advance(&mut layer).unwrap(), CollapsePhase::Done);
        assert_eq!(collapse.advance(&mut layer).unwrap(), CollapsePhase::Done);
        assert_eq!(layer.terrain([1, 0]), Some(1));
    }

    // A dead end undoes the previous step and erases it from the surface
    #[test]
    fn test_backtrack_resets_cells_and_surface() {
        let mut collapse = engine(
            2,
            1,
            &[[1, 0], [2, 0]],
            &[([0, 0], 1)],
            CollapseConfig::default(),
        );
        let mut layer = TileLayer::new();

        assert!(collapse.run_iteration(&mut layer).unwrap());
        assert_eq!(collapse.sequence.depth(), 1);
        assert_eq!(layer.terrain([1, 0]), Some(1));

        // Conflicting terrain next to the only remaining candidate
        collapse.grid_state.seed([3, 0], 2);
        assert!(collapse.run_iteration(&mut layer).unwrap());

        assert_eq!(collapse.backtracks, 1);
        assert!(collapse.sequence.is_at_base());
        assert_eq!(collapse.sequence.top_tried().len(), 1);
        assert!(collapse.grid_state.is_open([1, 0]));
        assert_eq!(layer.terrain([1, 0]), None);
        assert_eq!(layer.erased_count(), 1);
        assert!(collapse.frontier.contains([1, 0]));
        assert!(collapse.frontier.contains([2, 0]));
    }

    // Under Abort, running out of steps to undo is an error
    #[test]
    fn test_abort_on_underflow() {
        let targets = BoundingBox::from_size(3, 3).cells();
        let config = CollapseConfig {
            underflow_policy: UnderflowPolicy::Abort,
            ..CollapseConfig::default()
        };
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 5)], config);

        let result = collapse.run(&mut TileLayer::new());

        assert!(matches!(
            result,
            Err(AlgorithmError::BacktrackUnderflow {
                candidate: [0, 1],
                iteration: 1
            })
        ));
    }

    // Under Abandon, unfillable candidates are reported and skipped
    #[test]
    fn test_abandon_on_underflow() {
        let targets = BoundingBox::from_size(3, 3).cells();
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 5)], CollapseConfig::default());
        let mut layer = TileLayer::new();

        let report = collapse.run(&mut layer).unwrap();

        assert_eq!(report.abandoned, vec![[0, 1], [1, 0]]);
        assert_eq!(report.unfilled.len(), 8);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.steps, 0);
        assert!(layer.batches().is_empty());
    }

    // The iteration budget stops generation and is reported
    #[test]
    fn test_budget_exhaustion() {
        let targets = BoundingBox::from_size(6, 6).cells();
        let config = CollapseConfig {
            max_iterations: 1,
            ..CollapseConfig::default()
        };
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 1)], config);

        let report = collapse.run(&mut TileLayer::new()).unwrap();

        assert_eq!(report.iterations, 1);
        assert_eq!(report.steps, 1);
        assert!(report.budget_exhausted);
        assert!(!report.unfilled.is_empty());
    }

    // A zero budget leaves the grid untouched
    #[test]
    fn test_zero_budget() {
        let targets = BoundingBox::from_size(3, 3).cells();
        let config = CollapseConfig {
            max_iterations: 0,
            ..CollapseConfig::default()
        };
        let mut collapse = engine(3, 1, &targets, &[([0, 0], 1)], config);

        let report = collapse.run(&mut TileLayer::new()).unwrap();

        assert_eq!(report.iterations, 0);
        assert_eq!(report.unfilled.len(), 8);
        assert!(report.budget_exhausted);
    }

    // Without collapsed context nothing can grow
    #[test]
    fn test_no_context_finishes_immediately() {
        let targets = BoundingBox::from_size(3, 3).cells();
        let mut collapse = engine(3, 1, &targets, &[], CollapseConfig::default());

        let report = collapse.run(&mut TileLayer::new()).unwrap();

        assert_eq!(report.iterations, 0);
        assert_eq!(report.unfilled, targets);
    }

    // Seed stamps place a whole pattern at the anchor
    #[test]
    fn test_seed_stamp() {
        let shape = PatternShape::square(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let stamp = seed_stamp(&[uniform(&shape, 4)], [5, 5], &mut rng).unwrap();

        assert_eq!(stamp, vec![([5, 5], 4), ([5, 6], 4), ([6, 5], 4), ([6, 6], 4)]);
        assert!(matches!(
            seed_stamp(&[], [0, 0], &mut rng),
            Err(AlgorithmError::InvalidArgument { .. })
        ));
    }

    // generate reads the surface context and returns unfilled cells
    #[test]
    fn test_generate_fills_surface() {
        let sample = sample_from_grid(&Array2::from_elem((4, 4), 2), true);
        let shape = PatternShape::square(3).unwrap();
        let mut layer = TileLayer::with_cells([([0, 0], 2)]);
        let targets = BoundingBox::from_size(5, 5).cells();

        let unfilled =
            generate(&sample, &shape, &targets, &mut layer, CollapseConfig::default()).unwrap();

        assert!(unfilled.is_empty());
        assert_eq!(layer.used_cells().len(), 25);
    }

    // A sample too small for the shape leaves every new cell unfilled
    #[test]
    fn test_generate_without_patterns() {
        let sample = sample_from_grid(&Array2::from_elem((2, 2), 1), true);
        let shape = PatternShape::square(3).unwrap();
        let mut layer = TileLayer::with_cells([([0, 0], 1)]);

        let unfilled = generate(
            &sample,
            &shape,
            &[[0, 0], [1, 0], [2, 0]],
            &mut layer,
            CollapseConfig::default(),
        )
        .unwrap();

        assert_eq!(unfilled, vec![[1, 0], [2, 0]]);
        assert!(layer.batches().is_empty());
    }
}
