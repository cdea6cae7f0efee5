//! Tests for synthesis constants and their relationships

#[cfg(test)]
mod tests {
    use overlaptile::CollapseConfig;
    use overlaptile::io::configuration::{
        DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS, DEFAULT_HEXAGON_SIZE, DEFAULT_MAX_ITERATIONS,
        DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED, MAX_REGION_DIMENSION,
        OUTPUT_SUFFIX, PREFILL_SUFFIX, PROGRESS_BAR_WIDTH, PROGRESS_REFRESH_INTERVAL,
    };
    use overlaptile::spatial::PatternShape;

    // Default pattern sizes are accepted by their shapes
    #[test]
    fn test_default_sizes_are_valid() {
        assert!(PatternShape::square(DEFAULT_PATTERN_SIZE).is_ok());
        assert!(PatternShape::hexagon(DEFAULT_HEXAGON_SIZE).is_ok());
    }

    // Default region fits inside the dimension limit
    #[test]
    fn test_output_size_within_limit() {
        assert!(DEFAULT_OUTPUT_SIZE > 0);
        assert!(DEFAULT_OUTPUT_SIZE <= MAX_REGION_DIMENSION);
    }

    // Library defaults come from the constants
    #[test]
    fn test_collapse_config_defaults() {
        let config = CollapseConfig::default();

        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.empty_neighbor_chaos_bias, DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS);
        assert!(!config.gap_trap_check);
    }

    // Output and prefill files never collide
    #[test]
    fn test_suffixes_differ() {
        assert!(!OUTPUT_SUFFIX.is_empty());
        assert_ne!(OUTPUT_SUFFIX, PREFILL_SUFFIX);
    }

    // Progress refreshes at a positive interval on a visible bar
    #[test]
    fn test_progress_settings() {
        assert!(PROGRESS_REFRESH_INTERVAL > 0);
        assert!(PROGRESS_BAR_WIDTH > 0);
    }
}
