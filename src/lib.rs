pub mod compare;
pub mod error;
pub mod metrics;
pub mod packing;
pub mod params;
pub mod registry;
pub mod report;
pub mod search;
pub mod strategies;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use compare::{compare, Comparison, StrategyRun};
pub use error::AllocationError;
pub use params::{CapacityPolicy, Params};
pub use registry::{Category, Registry};
