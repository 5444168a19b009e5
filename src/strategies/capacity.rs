use tracing::warn;

use crate::error::AllocationError;
use crate::packing::{cost_ceiling, PackingBuilder, StructureBuilder};
use crate::params::{CapacityPolicy, Params};
use crate::registry::Registry;
use crate::types::CategoryId;

/// Categories split into those a structure can hold and those too long on their own.
pub(crate) struct Placeable {
    pub fits: Vec<CategoryId>,
    pub oversized: Vec<CategoryId>,
}

/// Separates over-budget categories from `order`, preserving order on both sides.
///
/// Under [`CapacityPolicy::FailFast`] any over-budget category is an error;
/// under [`CapacityPolicy::Isolate`] each one is reported with a warning.
/// Fails first if the cost of some packing could not be counted.
pub(crate) fn split_oversized(
    registry: &Registry,
    order: impl IntoIterator<Item = CategoryId>,
    params: &Params,
) -> Result<Placeable, AllocationError> {
    cost_ceiling(registry, params)?;

    let (fits, oversized): (Vec<CategoryId>, Vec<CategoryId>) = order
        .into_iter()
        .partition(|&id| registry.get(id).expected_time() <= params.time_budget);

    if !oversized.is_empty() && params.capacity_policy == CapacityPolicy::FailFast {
        return Err(AllocationError::Capacity {
            budget: params.time_budget,
            categories: oversized
                .iter()
                .map(|&id| registry.get(id).key.clone())
                .collect(),
        });
    }

    for &id in &oversized {
        let category = registry.get(id);
        warn!(
            category = %category.key,
            expected_time = category.expected_time(),
            budget = params.time_budget,
            "Category exceeds the time budget on its own; isolating it"
        );
    }

    Ok(Placeable { fits, oversized })
}

/// Closes one single-category structure per over-budget category.
pub(crate) fn isolate(
    registry: &Registry,
    oversized: &[CategoryId],
    params: &Params,
    packing: &mut PackingBuilder,
) {
    for &id in oversized {
        packing.close(StructureBuilder::with(registry.get(id)), params);
    }
}
