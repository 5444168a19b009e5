use tracing::{debug, info};

use crate::error::AllocationError;
use crate::metrics::IterationRecord;
use crate::packing::{naive_total, Packing};
use crate::params::Params;
use crate::registry::Registry;
use crate::report::{ApproachResult, ComparisonTable, PackingSummary};
use crate::strategies::{Strategy, STRATEGIES};
use crate::types::Cost;
use crate::validation::{validate, ValidationReport};

/// One strategy's packing together with its Monte Carlo validation.
#[derive(Clone, Debug)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub packing: Packing,
    pub validation: ValidationReport,
}

#[derive(Clone, Debug)]
pub struct Comparison {
    pub runs: Vec<StrategyRun>,
    pub naive_cost: Cost,
}

impl Comparison {
    /// Strategy results followed by the naive baseline.
    pub fn results(&self) -> Vec<ApproachResult> {
        self.runs
            .iter()
            .map(|run| ApproachResult {
                approach: run.strategy.label().to_string(),
                cost: run.packing.total_cost(),
                validation: Some(run.validation),
            })
            .chain(std::iter::once(ApproachResult::naive(self.naive_cost)))
            .collect()
    }

    pub fn table(&self) -> ComparisonTable {
        ComparisonTable::new(&self.results(), self.naive_cost)
    }
}

/// Runs every strategy, validates each packing and prices the naive baseline.
///
/// Annealing draws from random stream 0; the validation of the k-th strategy
/// draws from stream k + 1.
pub fn compare(
    registry: &Registry,
    params: &Params,
    mut iteration_data: Option<&mut Vec<IterationRecord>>,
) -> Result<Comparison, AllocationError> {
    params.validate()?;

    let mut search_rng = params.rng(0);
    let mut runs = Vec::with_capacity(STRATEGIES.len());

    for (k, strategy) in STRATEGIES.into_iter().enumerate() {
        let packing = strategy.pack(registry, params, &mut search_rng, iteration_data.as_deref_mut())?;

        let summary = PackingSummary::new(&packing, params);
        debug!(
            strategy = strategy.label(),
            structures = summary.structures,
            mean_categories = summary.mean_categories,
            max_fill = summary.max_fill,
            over_budget = summary.over_budget,
            "Packed categories"
        );

        let validation = validate(&packing, registry, params, &mut params.rng(k as u64 + 1));
        info!(
            strategy = strategy.label(),
            cost = packing.total_cost(),
            success_rate = validation.success_rate,
            mean_time = validation.mean_time,
            "Validated packing"
        );

        runs.push(StrategyRun {
            strategy,
            packing,
            validation,
        });
    }

    Ok(Comparison {
        runs,
        naive_cost: naive_total(registry, params)?,
    })
}
