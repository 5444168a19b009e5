pub mod banding;
pub(crate) mod capacity;
pub(crate) mod first_fit;
pub mod greedy;

pub use banding::incidence_banding;
pub use greedy::rarest_first;

use rand::Rng;

use crate::error::AllocationError;
use crate::metrics::IterationRecord;
use crate::packing::Packing;
use crate::params::Params;
use crate::registry::Registry;
use crate::search::simulated_annealing;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    RarestFirst,
    IncidenceBanding,
    Annealing,
}

pub const STRATEGIES: [Strategy; 3] = [
    Strategy::RarestFirst,
    Strategy::IncidenceBanding,
    Strategy::Annealing,
];

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::RarestFirst => "Smart Greedy",
            Strategy::IncidenceBanding => "Incidence Banding",
            Strategy::Annealing => "Simulated Annealing",
        }
    }

    /// Runs the strategy. Only annealing draws from `rng` or fills `iteration_data`.
    pub fn pack<R: Rng + ?Sized>(
        self,
        registry: &Registry,
        params: &Params,
        rng: &mut R,
        iteration_data: Option<&mut Vec<IterationRecord>>,
    ) -> Result<Packing, AllocationError> {
        match self {
            Strategy::RarestFirst => rarest_first(registry, params),
            Strategy::IncidenceBanding => incidence_banding(registry, params),
            Strategy::Annealing => {
                simulated_annealing(registry, params, rng, iteration_data).map(|(_, packing)| packing)
            }
        }
    }
}
