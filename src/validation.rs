use rand::Rng;

use crate::packing::Packing;
use crate::params::Params;
use crate::registry::{Category, Registry};
use crate::types::Seconds;

/// Outcome of a Monte Carlo validation of one packing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationReport {
    /// Fraction of trials in which every category reached its target.
    pub success_rate: f64,
    /// Mean over trials of the per-trial mean respondent duration.
    pub mean_time: Seconds,
    pub trials: usize,
}

/// Estimates how often `packing` meets every category's target.
///
/// Each trial simulates every respondent of every structure and draws an
/// independent Bernoulli outcome per member category. A qualifying draw counts
/// towards that category and adds its length to the respondent's time. A trial
/// succeeds only if all categories in the registry reach `params.target`,
/// including categories the packing does not cover.
pub fn validate<R: Rng + ?Sized>(
    packing: &Packing,
    registry: &Registry,
    params: &Params,
    rng: &mut R,
) -> ValidationReport {
    let members: Vec<Vec<&Category>> = packing
        .structures()
        .iter()
        .map(|s| s.categories().iter().map(|&id| registry.get(id)).collect())
        .collect();

    let target = params.target as u64;
    let mut qualified = vec![0u64; registry.len()];

    let mut successes = 0usize;
    let mut mean_time_sum = 0.0;
    let mut mean_time_count = 0usize;

    for _ in 0..params.n_simulations {
        qualified.fill(0);
        let mut total_time: Seconds = 0.0;
        let mut total_respondents: u64 = 0;

        for (structure, categories) in packing.structures().iter().zip(&members) {
            for _ in 0..structure.respondents() {
                let mut respondent_time: Seconds = 0.0;
                for category in categories {
                    if rng.random_bool(category.incidence_rate) {
                        qualified[category.id.index()] += 1;
                        respondent_time += category.length_seconds;
                    }
                }
                total_time += respondent_time;
                total_respondents += 1;
            }
        }

        if total_respondents > 0 {
            mean_time_sum += total_time / total_respondents as f64;
            mean_time_count += 1;
        }
        if qualified.iter().all(|&count| count >= target) {
            successes += 1;
        }
    }

    ValidationReport {
        success_rate: successes as f64 / params.n_simulations as f64,
        mean_time: if mean_time_count > 0 {
            mean_time_sum / mean_time_count as f64
        } else {
            0.0
        },
        trials: params.n_simulations,
    }
}
