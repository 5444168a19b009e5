use crate::error::AllocationError;
use crate::packing::Structure;
use crate::params::Params;
use crate::registry::{Category, Registry};
use crate::types::{Cost, Incidence, Respondents};

/// Respondents a structure must recruit so that its bottleneck category
/// reaches `target` qualifiers, inflated by the safety buffer:
///   ceil(target / min_incidence * buffer)
///
/// Saturates at `Respondents::MAX`; strategies reject such inputs through
/// [`cost_ceiling`] before packing.
#[inline]
pub fn respondents_for(min_incidence: Incidence, params: &Params) -> Respondents {
    (params.target as f64 / min_incidence * params.buffer).ceil() as Respondents
}

/// Respondents needed without any buffer.
#[inline]
pub fn raw_respondents(incidence: Incidence, target: u32) -> Respondents {
    (target as f64 / incidence).ceil() as Respondents
}

pub fn total_cost(structures: &[Structure]) -> Cost {
    structures
        .iter()
        .fold(0, |sum: Cost, s| sum.saturating_add(s.respondents()))
}

/// Cost of surveying every category on its own, without buffer.
pub fn naive_total(registry: &Registry, params: &Params) -> Result<Cost, AllocationError> {
    checked_sum(registry, |c| params.target as f64 / c.incidence_rate)
}

/// Cost of surveying every category on its own, with buffer.
///
/// Each category sits in exactly one structure and a structure costs what its
/// rarest member costs alone, so this bounds the cost of any packing. Fails
/// when a category's requirement or the bound itself does not fit in
/// [`Cost`].
pub fn cost_ceiling(registry: &Registry, params: &Params) -> Result<Cost, AllocationError> {
    checked_sum(registry, |c| {
        params.target as f64 / c.incidence_rate * params.buffer
    })
}

fn checked_sum(
    registry: &Registry,
    requirement: impl Fn(&Category) -> f64,
) -> Result<Cost, AllocationError> {
    registry.categories().iter().try_fold(0, |sum: Cost, category| {
        let respondents = to_respondents(requirement(category)).ok_or_else(|| {
            AllocationError::data(
                format!("category '{}'", category.key),
                format!(
                    "incidence_rate {} needs more respondents than can be counted",
                    category.incidence_rate
                ),
            )
        })?;
        sum.checked_add(respondents).ok_or_else(|| {
            AllocationError::data(
                format!("category '{}'", category.key),
                "total respondents across categories overflow",
            )
        })
    })
}

fn to_respondents(requirement: f64) -> Option<Respondents> {
    let requirement = requirement.ceil();
    (requirement.is_finite() && requirement < Respondents::MAX as f64)
        .then_some(requirement as Respondents)
}
