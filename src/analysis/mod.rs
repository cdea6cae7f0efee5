//! Analysis of sample terrain into reusable patterns

/// Pattern extraction and catalogue deduplication
pub mod patterns;
