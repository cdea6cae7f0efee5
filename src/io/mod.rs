//! Command line, images, configuration and errors

/// Command-line parsing and the synthesis job runner
pub mod cli;
/// Default values and limits
pub mod configuration;
/// Crate-wide error type
pub mod error;
/// Sample decoding and PNG export
pub mod image;
/// Pre-collapsed host cells from a prefill image
pub mod prefill;
/// Terminal progress display
pub mod progress;
