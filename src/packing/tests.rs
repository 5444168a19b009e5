use super::cost::{raw_respondents, total_cost};
use super::*;
use crate::fixtures;
use crate::params::Params;
use crate::types::CategoryId;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(packing: &Packing) -> u64 {
    let mut hasher = DefaultHasher::new();
    packing.hash(&mut hasher);
    hasher.finish()
}

fn pack_all_in_one(registry: &crate::registry::Registry, params: &Params) -> Packing {
    let mut builder = StructureBuilder::new();
    for category in registry.categories() {
        builder.push(category);
    }
    let mut packing = PackingBuilder::new();
    packing.close(builder, params);
    packing.build()
}

#[test]
fn test_respondents_for_bottleneck() {
    let params = Params::default();
    assert_eq!(respondents_for(0.1, &params), 2700);
    assert_eq!(respondents_for(0.5, &params), 540);
    assert_eq!(respondents_for(1.0, &params), 270);
}

#[test]
fn test_respondents_never_below_raw_requirement() {
    let params = Params::default();
    for incidence in [0.01, 0.07, 0.123, 0.3, 0.333, 0.5, 0.77, 0.9, 1.0] {
        assert!(respondents_for(incidence, &params) >= raw_respondents(incidence, params.target));
    }

    let unbuffered = Params {
        buffer: 1.0,
        ..Params::default()
    };
    assert_eq!(respondents_for(0.9, &unbuffered), 223);
}

#[test]
fn test_shared_structure_can_cost_more_than_naive() {
    let registry = fixtures::three_categories();
    let params = Params::default();

    let packing = pack_all_in_one(&registry, &params);
    let structure = &packing.structures()[0];

    assert_eq!(structure.expected_time(), 30.0);
    assert_eq!(structure.min_incidence(), 0.1);
    assert_eq!(structure.respondents(), 2700);
    assert!(!structure.over_budget());
    assert_eq!(packing.total_cost(), 2700);
    assert_eq!(naive_total(&registry, &params).unwrap(), 2623);
}

#[test]
fn test_builder_fits_at_exact_budget() {
    let registry = fixtures::registry(&[(0.5, 600.0), (0.5, 360.0)]);
    let params = Params::default();
    let first = registry.get(CategoryId::from_index(0).unwrap());
    let second = registry.get(CategoryId::from_index(1).unwrap());

    let builder = StructureBuilder::with(first);
    assert_eq!(builder.expected_time(), 300.0);
    assert!(builder.fits(second, params.time_budget));
    assert!(!builder.fits(second, params.time_budget - 1.0));
}

#[test]
fn test_empty_builder_is_dropped() {
    let params = Params::default();
    let mut packing = PackingBuilder::new();
    packing.close(StructureBuilder::new(), &params);
    assert!(packing.is_empty());
    assert_eq!(packing.build().total_cost(), 0);
}

#[test]
fn test_total_cost_sums_structures() {
    let registry = fixtures::registry(&[(0.2, 100.0), (0.4, 100.0), (0.8, 100.0)]);
    let params = Params::default();

    let mut packing = PackingBuilder::new();
    for category in registry.categories() {
        packing.close(StructureBuilder::with(category), &params);
    }
    let packing = packing.build();

    assert_eq!(packing.len(), 3);
    assert_eq!(packing.total_cost(), 1350 + 675 + 338);
    assert_eq!(total_cost(packing.structures()), packing.total_cost());
    assert_eq!(packing.membership_counts(registry.len()), vec![1, 1, 1]);
}

#[test]
fn test_hash_follows_membership() {
    let registry = fixtures::three_categories();
    let params = Params::default();
    let together = pack_all_in_one(&registry, &params);

    let mut apart = PackingBuilder::new();
    for category in registry.categories() {
        apart.close(StructureBuilder::with(category), &params);
    }
    let apart = apart.build();

    assert_eq!(hash_of(&together), hash_of(&together.clone()));
    assert_ne!(hash_of(&together), hash_of(&apart));
}

#[test]
fn test_uncountable_requirement_is_data_error() {
    // 200 / 1e-18 does not fit in a u64.
    let registry = fixtures::registry(&[(1e-18, 10.0), (1e-18, 10.0)]);
    let params = Params::default();

    let err = naive_total(&registry, &params).unwrap_err();
    assert!(err.to_string().contains("category 'C1'"), "got {}", err);
    assert!(cost_ceiling(&registry, &params).is_err());
}

#[test]
fn test_total_respondents_overflow_is_data_error() {
    // Each category alone fits (about 1e19 respondents), their sum does not.
    let registry = fixtures::registry(&[(2e-17, 10.0), (2e-17, 10.0)]);
    let params = Params::default();

    let err = naive_total(&registry, &params).unwrap_err();
    assert!(err.to_string().contains("overflow"), "got {}", err);
    let err = cost_ceiling(&registry, &params).unwrap_err();
    assert!(err.to_string().contains("category 'C2'"), "got {}", err);
}

#[test]
fn test_cost_ceiling_bounds_shared_packing() {
    let registry = fixtures::three_categories();
    let params = Params::default();

    assert_eq!(cost_ceiling(&registry, &params).unwrap(), 2700 + 540 + 300);
    assert!(pack_all_in_one(&registry, &params).total_cost() <= cost_ceiling(&registry, &params).unwrap());
}
