use tracing::debug;

use crate::error::AllocationError;
use crate::packing::{Packing, PackingBuilder};
use crate::params::Params;
use crate::registry::{Category, Registry};
use crate::strategies::capacity::{isolate, split_oversized};
use crate::strategies::first_fit::first_fit;
use crate::types::Incidence;

/// Returns `true` if `incidence` lies in `[low, high)`, or `[low, high]` for the last band.
#[inline]
pub(crate) fn in_band(incidence: Incidence, (low, high): (Incidence, Incidence), last: bool) -> bool {
    incidence >= low && (incidence < high || (last && incidence == high))
}

/// Incidence-banded first-fit-decreasing packing.
///
/// Categories are grouped by incidence band and each band is packed on its
/// own, longest expected time first. No structure mixes bands.
pub fn incidence_banding(registry: &Registry, params: &Params) -> Result<Packing, AllocationError> {
    let placeable = split_oversized(registry, registry.ids(), params)?;
    let last_band = params.bands.len().saturating_sub(1);

    let mut packing = PackingBuilder::new();

    for (band_idx, &band) in params.bands.iter().enumerate() {
        let mut members: Vec<&Category> = placeable
            .fits
            .iter()
            .map(|&id| registry.get(id))
            .filter(|c| in_band(c.incidence_rate, band, band_idx == last_band))
            .collect();

        if members.is_empty() {
            continue;
        }

        // Stable, so equal expected times keep input order.
        members.sort_by(|a, b| b.expected_time().total_cmp(&a.expected_time()));

        let before = packing.len();
        first_fit(members, params, &mut packing);
        debug!(
            low = band.0,
            high = band.1,
            structures = packing.len() - before,
            "Packed incidence band"
        );
    }

    isolate(registry, &placeable.oversized, params, &mut packing);

    Ok(packing.build())
}
