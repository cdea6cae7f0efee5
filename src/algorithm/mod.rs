//! Overlapping collapse: legality, ordering, application and backtracking

/// Sequence stack and backtracking
pub mod deadlock;
/// Main collapse state machine and generation entry point
pub mod executor;
/// Pattern placement legality
pub mod feasibility;
/// Chaos-ordered frontier of candidate cells
pub mod frontier;
/// Pattern application and frontier growth
pub mod propagation;
/// Chaos scoring and pattern selection
pub mod selection;
