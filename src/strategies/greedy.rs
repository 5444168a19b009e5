use tracing::debug;

use crate::error::AllocationError;
use crate::packing::{Packing, PackingBuilder, StructureBuilder};
use crate::params::Params;
use crate::registry::Registry;
use crate::strategies::capacity::{isolate, split_oversized};

/// Rarest-first greedy packing.
///
/// Categories are visited from lowest to highest incidence. Each one joins the
/// open structure whose bottleneck incidence degrades least, among those with
/// room left in the time budget; the first such structure wins ties. When no
/// structure has room, a new one is opened.
pub fn rarest_first(registry: &Registry, params: &Params) -> Result<Packing, AllocationError> {
    let placeable = split_oversized(registry, registry.by_incidence(), params)?;

    let mut open: Vec<StructureBuilder> = Vec::new();

    for id in placeable.fits {
        let category = registry.get(id);

        let mut best: Option<(usize, f64)> = None;
        for (idx, structure) in open.iter().enumerate() {
            if !structure.fits(category, params.time_budget) {
                continue;
            }
            let current_min = structure.min_incidence();
            let score = current_min - current_min.min(category.incidence_rate);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, _)) => open[idx].push(category),
            None => open.push(StructureBuilder::with(category)),
        }
    }

    let mut packing = PackingBuilder::new();
    for structure in open {
        packing.close(structure, params);
    }
    isolate(registry, &placeable.oversized, params, &mut packing);

    let packing = packing.build();
    debug!(
        structures = packing.len(),
        cost = packing.total_cost(),
        "Rarest-first packing complete"
    );
    Ok(packing)
}
