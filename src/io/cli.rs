//! Command-line interface for synthesising terrain from a PNG sample

use crate::algorithm::executor::{
    CollapseConfig, GenerationReport, OverlappingCollapse, RenderMode, UnderflowPolicy, seed_stamp,
};
use crate::analysis::patterns::{PatternCatalogue, sample_from_grid};
use crate::io::configuration::{
    DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS, DEFAULT_HEXAGON_SIZE, DEFAULT_MAX_ITERATIONS,
    DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED, MAX_REGION_DIMENSION, OUTPUT_SUFFIX,
    PREFILL_SUFFIX, PROGRESS_REFRESH_INTERVAL,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{export_region_as_png, load_sample_png};
use crate::io::prefill::PrefillData;
use crate::io::progress::GenerationProgress;
use crate::spatial::grid::BoundingBox;
use crate::spatial::surface::{TerrainSurface, TileLayer, emit_by_terrain};
use crate::spatial::{PatternShape, offset_from};
use clap::{Parser, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Pattern footprint selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// N×N square patterns
    Square,
    /// Seven-cell hexagon patterns
    Hexagon,
}

/// Render mode selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderModeArg {
    /// Write each step to the output layer as it is applied
    Immediate,
    /// Write everything once generation finishes
    OnStepComplete,
}

impl From<RenderModeArg> for RenderMode {
    fn from(arg: RenderModeArg) -> Self {
        match arg {
            RenderModeArg::Immediate => Self::Immediate,
            RenderModeArg::OnStepComplete => Self::OnStepComplete,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "overlaptile")]
#[command(
    author,
    version,
    about = "Synthesise terrain from a sample image with overlapping wave function collapse"
)]
/// Command-line arguments for the terrain synthesis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Sample PNG to learn patterns from
    #[arg(value_name = "SAMPLE")]
    pub target: PathBuf,

    /// Output PNG (defaults to <sample>_result.png next to the sample)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Width of the generated region in cells
    #[arg(short = 'W', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub width: usize,

    /// Height of the generated region in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub height: usize,

    /// Pattern footprint
    #[arg(long, value_enum, default_value_t = ShapeArg::Square)]
    pub shape: ShapeArg,

    /// Pattern size (defaults to 3 for squares and 2 for hexagons)
    #[arg(short = 'n', long)]
    pub pattern_size: Option<usize>,

    /// Maximum main-loop iterations before stopping
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Prefill PNG in the sample's palette (without a value, looks for <sample>_pre.png)
    #[arg(short, long, num_args = 0..=1)]
    pub prefill: Option<Option<PathBuf>>,

    /// When generated terrain is written to the output layer
    #[arg(long, value_enum, default_value_t = RenderModeArg::Immediate)]
    pub render_mode: RenderModeArg,

    /// Chaos added per neighbour outside the tracked grid
    #[arg(long, default_value_t = DEFAULT_EMPTY_NEIGHBOR_CHAOS_BIAS)]
    pub chaos_bias: u64,

    /// Extract patterns in their authored orientation only
    #[arg(long)]
    pub fixed_orientation: bool,

    /// Fail instead of skipping a cell when backtracking runs out of steps
    #[arg(long)]
    pub abort_on_underflow: bool,

    /// Reject placements that trap a cell between filled cells (2×2 squares)
    #[arg(long)]
    pub gap_trap: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Pattern size after applying the per-shape default
    pub fn effective_pattern_size(&self) -> usize {
        self.pattern_size.unwrap_or(match self.shape {
            ShapeArg::Square => DEFAULT_PATTERN_SIZE,
            ShapeArg::Hexagon => DEFAULT_HEXAGON_SIZE,
        })
    }

    /// Build the pattern shape requested on the command line
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedShapeSize` if the shape rejects the size.
    pub fn pattern_shape(&self) -> Result<PatternShape> {
        let size = self.effective_pattern_size();
        match self.shape {
            ShapeArg::Square => PatternShape::square(size),
            ShapeArg::Hexagon => PatternShape::hexagon(size),
        }
    }

    /// Library configuration derived from the flags
    pub fn collapse_config(&self) -> CollapseConfig {
        CollapseConfig {
            seed: self.seed,
            max_iterations: self.iterations,
            empty_neighbor_chaos_bias: self.chaos_bias,
            render_mode: self.render_mode.into(),
            underflow_policy: if self.abort_on_underflow {
                UnderflowPolicy::Abort
            } else {
                UnderflowPolicy::Abandon
            },
            gap_trap_check: self.gap_trap,
        }
    }

    /// Region the generator fills
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either dimension is zero or above the
    /// allowed maximum.
    pub fn region(&self) -> Result<BoundingBox> {
        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_REGION_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_REGION_DIMENSION}"),
                ));
            }
        }
        Ok(BoundingBox::from_size(self.width, self.height))
    }
}

/// Install the global `tracing` subscriber for the binary
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs one synthesis job described by the command line
pub struct FileProcessor {
    cli: Cli,
}

impl FileProcessor {
    /// Create a new processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the sample, generate the region and write the output PNG
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, an image cannot be read
    /// or written, the sample yields no pattern, or generation aborts on a
    /// backtrack underflow.
    pub fn process(&self) -> Result<GenerationReport> {
        let start_time = Instant::now();
        let input_path = &self.cli.target;

        if input_path.extension().and_then(|s| s.to_str()) != Some("png") {
            return Err(crate::io::error::io_error("Sample file must be a PNG image"));
        }

        let shape = self.cli.pattern_shape()?;
        let bounds = self.cli.region()?;
        let config = self.cli.collapse_config();

        let labelled = load_sample_png(input_path)?;
        let sample = sample_from_grid(&labelled.labels, !self.cli.fixed_orientation);
        let catalogue = PatternCatalogue::extract(&sample, &shape)?;

        if catalogue.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: format!(
                    "sample '{}' is smaller than a {} pattern of size {}",
                    input_path.display(),
                    shape.name(),
                    shape.size()
                ),
            });
        }

        let mut layer = match self.prefill_path() {
            Some(path) => {
                TileLayer::with_cells(PrefillData::from_png(&path, &labelled.palette)?.cells)
            }
            None => TileLayer::new(),
        };

        let touches_region = layer.cells().keys().any(|&position| {
            bounds.contains(position)
                || shape
                    .adjacencies(position)
                    .into_iter()
                    .any(|neighbor| bounds.contains(neighbor))
        });

        if !touches_region {
            let half = (shape.size() / 2) as i32;
            let anchor = offset_from(bounds.center(), [half, half]);
            let mut rng = StdRng::seed_from_u64(self.cli.seed);
            let stamp: Vec<_> = seed_stamp(catalogue.patterns(), anchor, &mut rng)?
                .into_iter()
                .filter(|&(position, _)| bounds.contains(position))
                .collect();
            tracing::debug!(
                x = anchor[0],
                y = anchor[1],
                cells = stamp.len(),
                "stamped seed pattern"
            );
            emit_by_terrain(&mut layer, stamp);
        }

        let target_cells = bounds.cells();
        let preexisting: BTreeMap<_, _> = layer.used_cells().into_iter().collect();
        let mut engine = OverlappingCollapse::new(
            shape,
            catalogue.into_patterns(),
            &target_cells,
            &preexisting,
            config,
        );

        let progress = if self.cli.should_show_progress() {
            GenerationProgress::new(input_path, target_cells.len())
        } else {
            GenerationProgress::hidden()
        };

        while engine.run_iteration(&mut layer)? {
            if engine.iteration % PROGRESS_REFRESH_INTERVAL == 0 {
                progress.update(
                    target_cells.len() - engine.unfilled_cells().len(),
                    engine.backtracks,
                );
            }
        }

        let report = engine.report();
        progress.update(target_cells.len() - report.unfilled.len(), report.backtracks);
        progress.finish(report.unfilled.len());

        let output_path = self
            .cli
            .output
            .clone()
            .unwrap_or_else(|| Self::get_output_path(input_path));
        export_region_as_png(layer.cells(), &bounds, &labelled.palette, &output_path)?;

        tracing::info!(
            output = %output_path.display(),
            unfilled = report.unfilled.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "wrote generated region"
        );

        Ok(report)
    }

    /// Prefill image to load, if any; a bare flag resolves to `<sample>_pre.png`
    pub fn prefill_path(&self) -> Option<PathBuf> {
        self.cli
            .prefill
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(|| Self::get_prefill_path(&self.cli.target)))
    }

    /// Default prefill path: `<stem>_pre.png` next to the sample
    pub fn get_prefill_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let prefill_name = format!("{}{PREFILL_SUFFIX}.png", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(prefill_name)
        } else {
            PathBuf::from(prefill_name)
        }
    }

    /// Default output path: `<stem>_result.<ext>` next to the sample
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
