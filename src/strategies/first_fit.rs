use crate::packing::{PackingBuilder, StructureBuilder};
use crate::params::Params;
use crate::registry::Category;

/// Packs categories in the given order: keep appending to the current
/// structure while it fits, otherwise close it and open a new one.
///
/// Categories must each fit the budget on their own.
pub(crate) fn first_fit<'a>(
    categories: impl IntoIterator<Item = &'a Category>,
    params: &Params,
    packing: &mut PackingBuilder,
) {
    let mut current = StructureBuilder::new();

    for category in categories {
        if current.fits(category, params.time_budget) {
            current.push(category);
        } else {
            packing.close(current, params);
            current = StructureBuilder::with(category);
        }
    }

    packing.close(current, params);
}
