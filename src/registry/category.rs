use crate::types::{CategoryId, Incidence, Seconds};

/// A row as it arrives from the tabular source, before validation.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRecord {
    /// External `category_id`, unique per input.
    pub key: String,
    pub name: String,
    /// `None` when the source cell was empty or null.
    pub incidence_rate: Option<f64>,
    pub length_seconds: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// Dense internal id (input order).
    pub id: CategoryId,
    /// External `category_id`.
    pub key: String,
    pub name: String,
    /// Probability that a respondent qualifies, in (0, 1].
    pub incidence_rate: Incidence,
    /// Seconds spent by a respondent who qualifies.
    pub length_seconds: Seconds,
}

impl Category {
    /// Amortized seconds this category adds per respondent routed through it.
    #[inline(always)]
    pub fn expected_time(&self) -> Seconds {
        self.incidence_rate * self.length_seconds
    }
}
