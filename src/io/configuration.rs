//! Synthesis constants and runtime configuration defaults

// Pattern and region defaults
/// Side length of square patterns extracted by default
pub const DEFAULT_PATTERN_SIZE: usize = 3;

/// Size of hexagon patterns (the only size the hexagon footprint supports)
pub const DEFAULT_HEXAGON_SIZE: usize = 2;

/// Width and height of the generated region when none is given
pub const DEFAULT_OUTPUT_SIZE: usize = 32;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed region dimension
pub const MAX_REGION_DIMENSION: usize = 4096;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default maximum main-loop iterations before stopping
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Chaos added per untracked neighbour (0 disables the bias)
pub const DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS: u64 = 0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Main-loop iterations between progress bar refreshes
pub const PROGRESS_REFRESH_INTERVAL: usize = 32;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Suffix of the optional prefill image next to a sample
pub const PREFILL_SUFFIX: &str = "_pre";
