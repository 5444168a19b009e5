use crate::packing::cost::respondents_for;
use crate::params::Params;
use crate::registry::Category;
use crate::types::{CategoryId, Incidence, Respondents, Seconds};

/// A finalized bundle of categories asked together.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    categories: Vec<CategoryId>,
    expected_time: Seconds,
    min_incidence: Incidence,
    respondents: Respondents,
    over_budget: bool,
}

impl Structure {
    pub fn categories(&self) -> &[CategoryId] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Summed expected time of all members.
    pub fn expected_time(&self) -> Seconds {
        self.expected_time
    }

    /// Incidence of the bottleneck category.
    pub fn min_incidence(&self) -> Incidence {
        self.min_incidence
    }

    pub fn respondents(&self) -> Respondents {
        self.respondents
    }

    /// True only for an isolated category whose own expected time exceeds the budget.
    pub fn over_budget(&self) -> bool {
        self.over_budget
    }
}

/// An open structure that strategies grow before sizing it.
#[derive(Clone, Debug)]
pub struct StructureBuilder {
    categories: Vec<CategoryId>,
    expected_time: Seconds,
    min_incidence: Incidence,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        StructureBuilder {
            categories: Vec::new(),
            expected_time: 0.0,
            min_incidence: f64::INFINITY,
        }
    }
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(category: &Category) -> Self {
        let mut builder = Self::new();
        builder.push(category);
        builder
    }

    /// Returns `true` if adding `category` keeps the summed expected time within `budget`.
    #[inline]
    pub fn fits(&self, category: &Category, budget: Seconds) -> bool {
        self.expected_time + category.expected_time() <= budget
    }

    pub fn push(&mut self, category: &Category) {
        self.categories.push(category.id);
        self.expected_time += category.expected_time();
        self.min_incidence = self.min_incidence.min(category.incidence_rate);
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn expected_time(&self) -> Seconds {
        self.expected_time
    }

    /// Bottleneck incidence so far; infinite while the builder is empty.
    pub fn min_incidence(&self) -> Incidence {
        self.min_incidence
    }

    /// Sizes the structure via the cost model. Empty builders yield nothing.
    pub fn finish(self, params: &Params) -> Option<Structure> {
        if self.categories.is_empty() {
            return None;
        }
        let over_budget = self.expected_time > params.time_budget;
        debug_assert!(
            !over_budget || self.categories.len() == 1,
            "only isolated categories may exceed the time budget"
        );

        Some(Structure {
            respondents: respondents_for(self.min_incidence, params),
            categories: self.categories,
            expected_time: self.expected_time,
            min_incidence: self.min_incidence,
            over_budget,
        })
    }
}
