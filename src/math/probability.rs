//! Frequency-weighted random selection

use crate::io::error::{AlgorithmError, Result};
use rand::Rng;

/// Pick an index into `items` with probability proportional to `weight`
///
/// Builds a running prefix sum of the weights and returns the first index
/// whose prefix sum exceeds a uniform draw from `[0, total)`. When every
/// weight is zero the choice falls back to a uniform index instead.
///
/// # Errors
///
/// Returns `InvalidArgument` if `items` is empty or any weight is negative
/// or not finite.
pub fn select_weighted<T, R, F>(items: &[T], weight: F, rng: &mut R) -> Result<usize>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return Err(AlgorithmError::InvalidArgument {
            reason: "'items' must contain one or more elements".to_string(),
        });
    }

    let mut prefix_sum = Vec::with_capacity(items.len());
    let mut total = 0.0;
    for (index, item) in items.iter().enumerate() {
        let value = weight(item);
        if !value.is_finite() || value < 0.0 {
            return Err(AlgorithmError::InvalidArgument {
                reason: format!(
                    "weight {value} at index {index} is not a finite non-negative number"
                ),
            });
        }
        total += value;
        prefix_sum.push(total);
    }

    if total <= 0.0 {
        return Ok(rng.random_range(0..items.len()));
    }

    let r = rng.random::<f64>() * total;
    let selected = prefix_sum
        .iter()
        .position(|&sum| sum > r)
        // Rounding can leave r at the very top of the range
        .or_else(|| prefix_sum.iter().position(|&sum| sum >= total))
        .unwrap_or(items.len() - 1);

    Ok(selected)
}
