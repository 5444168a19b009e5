use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::AllocationError;
use crate::types::{Incidence, Seconds};

/// Safety multiplier applied to the raw respondent requirement.
pub const BUFFER: f64 = 1.35;
/// Expected seconds a single respondent may spend across one structure.
pub const TIME_BUDGET: Seconds = 480.0;
/// Qualifying respondents required per category.
pub const TARGET: u32 = 200;
pub const N_SIMULATIONS: usize = 1_000;
pub const N_ITERATIONS: usize = 500;
/// Acceptance probability for a worsening move at temperature 1.0.
pub const ESCAPE_PROBABILITY: f64 = 0.3;

pub const INCIDENCE_BANDS: [(Incidence, Incidence); 4] =
    [(0.0, 0.3), (0.3, 0.5), (0.5, 0.7), (0.7, 1.0)];

/// What to do with a category whose expected time alone exceeds the budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Refuse to pack and report every offending category.
    #[default]
    FailFast,
    /// Place each offending category alone in an over-budget structure.
    Isolate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub buffer: f64,                        // Multiplier on TARGET / bottleneck incidence
    pub time_budget: Seconds,               // Max summed expected time per structure
    pub target: u32,                        // Qualifiers required per category
    pub n_simulations: usize,               // Monte Carlo trials per validation
    pub n_iterations: usize,                // Annealing swap proposals
    pub escape_probability: f64,            // Worsening acceptance at temperature 1.0
    pub bands: Vec<(Incidence, Incidence)>, // Incidence bands, last one closed above
    pub seed: u64,
    pub capacity_policy: CapacityPolicy,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            buffer: BUFFER,
            time_budget: TIME_BUDGET,
            target: TARGET,
            n_simulations: N_SIMULATIONS,
            n_iterations: N_ITERATIONS,
            escape_probability: ESCAPE_PROBABILITY,
            bands: INCIDENCE_BANDS.to_vec(),
            seed: 0,
            capacity_policy: CapacityPolicy::default(),
        }
    }
}

impl Params {
    pub fn with_seed(seed: u64) -> Self {
        Params {
            seed,
            ..Params::default()
        }
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        if !self.buffer.is_finite() || self.buffer < 1.0 {
            return Err(AllocationError::params(format!(
                "buffer must be a finite value >= 1.0, got {}",
                self.buffer
            )));
        }
        if !self.time_budget.is_finite() || self.time_budget <= 0.0 {
            return Err(AllocationError::params(format!(
                "time budget must be positive, got {}",
                self.time_budget
            )));
        }
        if self.n_simulations == 0 {
            return Err(AllocationError::params("at least one simulation is required"));
        }
        if !(0.0..=1.0).contains(&self.escape_probability) {
            return Err(AllocationError::params(format!(
                "escape probability must lie in [0, 1], got {}",
                self.escape_probability
            )));
        }
        self.validate_bands()
    }

    /// Bands must be ascending, contiguous and cover (0, 1] exactly.
    fn validate_bands(&self) -> Result<(), AllocationError> {
        let (Some(first), Some(last)) = (self.bands.first(), self.bands.last()) else {
            return Err(AllocationError::params("at least one incidence band is required"));
        };
        if first.0 != 0.0 || last.1 != 1.0 {
            return Err(AllocationError::params(format!(
                "incidence bands must span 0.0 to 1.0, got {} to {}",
                first.0, last.1
            )));
        }
        for &(low, high) in &self.bands {
            if low >= high {
                return Err(AllocationError::params(format!(
                    "empty incidence band ({}, {})",
                    low, high
                )));
            }
        }
        for pair in self.bands.windows(2) {
            if pair[0].1 != pair[1].0 {
                return Err(AllocationError::params(format!(
                    "incidence bands ({}, {}) and ({}, {}) are not contiguous",
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1
                )));
            }
        }
        Ok(())
    }

    /// Returns the random stream `stream` derived from the configured seed.
    ///
    /// Streams are separated by xoshiro jumps (2^128 draws apart), so a
    /// validation never shares draws with the annealing run before it.
    pub fn rng(&self, stream: u64) -> Xoshiro256PlusPlus {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        for _ in 0..stream {
            rng.jump();
        }
        rng
    }
}
