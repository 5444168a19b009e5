use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use crate::packing::Packing;
use crate::types::Cost;

/// Tracks the progress and state of an annealing run
#[derive(Debug, Default)]
pub struct SearchProgress {
    /// Best costs found so far, one entry per improvement
    pub best_costs: Vec<Cost>,
    /// Map tracking how many times each candidate packing has been encountered
    pub candidate_frequency: HashMap<u64, usize>,
    /// Hash of the current candidate packing
    pub candidate_hash: u64,
}

impl SearchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_candidate(&mut self, packing: &Packing) {
        let mut hasher = DefaultHasher::new();
        packing.hash(&mut hasher);
        let hash = hasher.finish();

        self.candidate_hash = hash;

        *self.candidate_frequency.entry(hash).or_insert(0) += 1;
    }

    pub fn candidate_seen(&self) -> usize {
        *self.candidate_frequency.get(&self.candidate_hash).unwrap_or(&0)
    }

    pub fn update_best(&mut self, best_cost: Cost) {
        self.best_costs.push(best_cost);
    }
}
