use rand::Rng;
use rand::seq::index::sample;
use std::time::Instant;
use tracing::debug;

use crate::error::AllocationError;
use crate::packing::{Packing, PackingBuilder};
use crate::params::Params;
use crate::registry::Registry;
use crate::strategies::capacity::{isolate, split_oversized};
use crate::strategies::first_fit::first_fit;
use crate::types::{CategoryId, Cost};

use crate::metrics::IterationRecord;
use crate::search::progress::SearchProgress;

/// Packs `order` first-fit, then appends any isolated over-budget categories.
/// Deterministic in `order`.
pub fn build_structures(
    registry: &Registry,
    order: &[CategoryId],
    oversized: &[CategoryId],
    params: &Params,
) -> Packing {
    let mut packing = PackingBuilder::new();
    first_fit(order.iter().map(|&id| registry.get(id)), params, &mut packing);
    isolate(registry, oversized, params, &mut packing);
    packing.build()
}

/// Searches over category orders, each scored by its first-fit packing.
///
/// Starts from the rarest-first order and proposes one random transposition
/// per iteration. Improvements are always accepted; worsening moves are
/// accepted with probability `temperature * escape_probability`, where the
/// temperature cools linearly from 1 towards 0. The best packing seen is
/// returned, not the last accepted one.
pub fn simulated_annealing<R: Rng + ?Sized>(
    registry: &Registry,
    params: &Params,
    rng: &mut R,
    mut iteration_data: Option<&mut Vec<IterationRecord>>,
) -> Result<(Cost, Packing), AllocationError> {
    let placeable = split_oversized(registry, registry.by_incidence(), params)?;
    let oversized = placeable.oversized;

    let mut current_order = placeable.fits;
    let mut best_packing = build_structures(registry, &current_order, &oversized, params);
    let mut best_cost = best_packing.total_cost();
    let mut current_cost = best_cost;

    // No transposition exists for fewer than two categories.
    if current_order.len() < 2 {
        debug!(categories = current_order.len(), "Skipping annealing on trivial input");
        return Ok((best_cost, best_packing));
    }

    let mut progress = SearchProgress::new();

    let n_iterations = params.n_iterations;

    for i in 0..n_iterations {
        let start_time = Instant::now();

        let temperature = 1.0 - i as f64 / n_iterations as f64;

        let mut candidate_order = current_order.clone();
        let picks = sample(rng, candidate_order.len(), 2);
        candidate_order.swap(picks.index(0), picks.index(1));

        let candidate = build_structures(registry, &candidate_order, &oversized, params);
        let candidate_cost = candidate.total_cost();

        progress.record_candidate(&candidate);

        let accepted = candidate_cost < current_cost
            || rng.random_bool(temperature * params.escape_probability);

        if accepted {
            current_order = candidate_order;
            current_cost = candidate_cost;

            if candidate_cost < best_cost {
                best_cost = candidate_cost;
                best_packing = candidate;
                progress.update_best(best_cost);
                debug!(iteration = i, cost = best_cost, "New best packing");
            }
        }

        if let Some(ref mut iter_data) = iteration_data {
            iter_data.push(IterationRecord {
                iteration: i,
                candidate_cost,
                candidate_seen: progress.candidate_seen(),
                current_cost,
                best_cost,
                accepted,
                time: start_time.elapsed().as_secs_f64(),
                temperature,
            });
        }
    }

    debug!(
        improvements = progress.best_costs.len(),
        distinct_candidates = progress.candidate_frequency.len(),
        cost = best_cost,
        "Annealing complete"
    );

    Ok((best_cost, best_packing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_single_category_takes_trivial_packing() {
        let registry = fixtures::registry(&[(0.4, 100.0)]);
        let params = Params::with_seed(1);
        let mut trace = Vec::new();

        let (cost, packing) =
            simulated_annealing(&registry, &params, &mut params.rng(0), Some(&mut trace)).unwrap();

        assert_eq!(packing.len(), 1);
        assert_eq!(cost, 675);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_empty_registry_costs_nothing() {
        let registry = fixtures::registry(&[]);
        let params = Params::with_seed(1);

        let (cost, packing) = simulated_annealing(&registry, &params, &mut params.rng(0), None).unwrap();

        assert_eq!(cost, 0);
        assert!(packing.is_empty());
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let registry = fixtures::survey_panel();
        let params = Params::with_seed(42);

        let mut first_trace = Vec::new();
        let mut second_trace = Vec::new();
        let first =
            simulated_annealing(&registry, &params, &mut params.rng(0), Some(&mut first_trace)).unwrap();
        let second =
            simulated_annealing(&registry, &params, &mut params.rng(0), Some(&mut second_trace)).unwrap();

        assert_eq!(first, second);
        let costs = |trace: &[IterationRecord]| -> Vec<Cost> {
            trace.iter().map(|r| r.candidate_cost).collect()
        };
        assert_eq!(costs(&first_trace), costs(&second_trace));
    }

    #[test]
    fn test_best_cost_never_increases() {
        let registry = fixtures::survey_panel();
        let params = Params::with_seed(3);
        let mut trace = Vec::new();

        let (cost, packing) =
            simulated_annealing(&registry, &params, &mut params.rng(0), Some(&mut trace)).unwrap();

        assert_eq!(trace.len(), params.n_iterations);
        for pair in trace.windows(2) {
            assert!(pair[1].best_cost <= pair[0].best_cost);
        }
        for record in &trace {
            assert!(record.best_cost <= record.current_cost);
            assert!((0.0..=1.0).contains(&record.temperature));
        }
        assert_eq!(trace.last().unwrap().best_cost, cost);
        assert_eq!(packing.total_cost(), cost);
    }

    #[test]
    fn test_never_worse_than_rarest_first_order() {
        let registry = fixtures::survey_panel();
        let params = Params::with_seed(11);

        let initial = build_structures(&registry, &registry.by_incidence(), &[], &params);
        let (cost, _) = simulated_annealing(&registry, &params, &mut params.rng(0), None).unwrap();

        assert!(cost <= initial.total_cost());
    }

    #[test]
    fn test_first_temperature_is_one() {
        let registry = fixtures::three_categories();
        let params = Params {
            n_iterations: 4,
            ..Params::with_seed(5)
        };
        let mut trace = Vec::new();

        simulated_annealing(&registry, &params, &mut params.rng(0), Some(&mut trace)).unwrap();

        let temperatures: Vec<f64> = trace.iter().map(|r| r.temperature).collect();
        assert_eq!(temperatures, vec![1.0, 0.75, 0.5, 0.25]);
    }
}
