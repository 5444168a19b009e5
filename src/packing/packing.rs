use rand::SeedableRng;
use rand_xoshiro::rand_core::RngCore;
use rand_xoshiro::SplitMix64;
use std::hash::{Hash, Hasher};

use crate::packing::cost::total_cost;
use crate::packing::{Structure, StructureBuilder};
use crate::params::Params;
use crate::types::Cost;

/// An ordered set of finalized structures produced by one strategy run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Packing {
    structures: Vec<Structure>,
}

impl Packing {
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Total respondents recruited across all structures.
    pub fn total_cost(&self) -> Cost {
        total_cost(&self.structures)
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(|s| s.over_budget())
    }

    /// How many structures each category appears in, indexed by category id.
    pub fn membership_counts(&self, n_categories: usize) -> Vec<usize> {
        let mut counts = vec![0; n_categories];
        for structure in &self.structures {
            for id in structure.categories() {
                counts[id.index()] += 1;
            }
        }
        counts
    }
}

impl Hash for Packing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut hasher_rng = SplitMix64::seed_from_u64(self.structures.len() as u64);

        for (i, structure) in self.structures.iter().enumerate() {
            for id in structure.categories() {
                let random_val = hasher_rng.next_u64();
                state.write_u64(random_val ^ (((i as u64) << 32) | id.raw() as u64));
            }
        }
    }
}

/// Collects structures while a strategy runs, then freezes them into a [`Packing`].
#[derive(Debug, Default)]
pub struct PackingBuilder {
    structures: Vec<Structure>,
}

impl PackingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes and appends an open structure. Empty builders are dropped.
    pub fn close(&mut self, builder: StructureBuilder, params: &Params) {
        if let Some(structure) = builder.finish(params) {
            self.structures.push(structure);
        }
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn build(self) -> Packing {
        Packing {
            structures: self.structures,
        }
    }
}
