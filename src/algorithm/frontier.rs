//! Min-chaos frontier of candidate cells
//!
//! A binary heap with lazy deletion. Each coordinate carries at most one live
//! score; pushing a new score for a queued coordinate supersedes the old heap
//! entry, which is discarded when it surfaces. Ties break on the coordinate so
//! pop order is fully deterministic.

use crate::spatial::Coordinate;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Priority queue of open cells keyed by chaos, lowest first
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<(u64, Coordinate)>>,
    live: HashMap<Coordinate, u64>,
}

impl Frontier {
    /// Create an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `position` with `chaos`, replacing any score it already had
    ///
    /// Returns `false` when the coordinate was already queued with the same score.
    pub fn push(&mut self, position: Coordinate, chaos: u64) -> bool {
        if self.live.get(&position) == Some(&chaos) {
            return false;
        }

        self.live.insert(position, chaos);
        self.heap.push(Reverse((chaos, position)));
        true
    }

    /// Remove and return the lowest-chaos coordinate with its score
    pub fn pop(&mut self) -> Option<(Coordinate, u64)> {
        while let Some(Reverse((chaos, position))) = self.heap.pop() {
            if self.live.get(&position) == Some(&chaos) {
                self.live.remove(&position);
                return Some((position, chaos));
            }
        }
        None
    }

    /// Drop `position` from the frontier
    pub fn remove(&mut self, position: Coordinate) -> bool {
        self.live.remove(&position).is_some()
    }

    /// Whether `position` is currently queued
    pub fn contains(&self, position: Coordinate) -> bool {
        self.live.contains_key(&position)
    }

    /// Current score of a queued coordinate
    pub fn chaos_of(&self, position: Coordinate) -> Option<u64> {
        self.live.get(&position).copied()
    }

    /// Number of queued coordinates
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
