//! Shared category sets for unit tests.

use crate::registry::{CategoryRecord, Registry};

/// Builds a registry from `(incidence_rate, length_seconds)` pairs keyed `C1`, `C2`, ...
pub(crate) fn registry(rows: &[(f64, f64)]) -> Registry {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, &(incidence_rate, length_seconds))| CategoryRecord {
            key: format!("C{}", i + 1),
            name: format!("Category {}", i + 1),
            incidence_rate: Some(incidence_rate),
            length_seconds,
        })
        .collect();
    Registry::from_records(records).expect("fixture categories are valid")
}

/// Three categories that all fit one structure: expected times 6, 15 and 9.
pub(crate) fn three_categories() -> Registry {
    registry(&[(0.1, 60.0), (0.5, 30.0), (0.9, 10.0)])
}

/// A mixed set large enough to need several structures under the default budget.
pub(crate) fn survey_panel() -> Registry {
    registry(&[
        (0.05, 300.0),
        (0.12, 900.0),
        (0.18, 400.0),
        (0.25, 700.0),
        (0.30, 500.0),
        (0.34, 600.0),
        (0.41, 300.0),
        (0.45, 800.0),
        (0.50, 240.0),
        (0.55, 350.0),
        (0.62, 200.0),
        (0.68, 420.0),
        (0.70, 150.0),
        (0.77, 380.0),
        (0.83, 260.0),
        (0.91, 120.0),
        (0.95, 300.0),
        (1.00, 90.0),
    ])
}
