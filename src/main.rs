//! CLI entry point for overlapping terrain synthesis

use clap::Parser;
use overlaptile::io::cli::{Cli, FileProcessor, init_tracing};

fn main() -> overlaptile::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let processor = FileProcessor::new(cli);
    processor.process().map(|_| ())
}
