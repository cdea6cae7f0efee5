//! Mathematical utilities for the algorithm

/// Frequency-weighted random selection
pub mod probability;
