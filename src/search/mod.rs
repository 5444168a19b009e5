pub mod annealing;
pub mod progress;

pub use annealing::{build_structures, simulated_annealing};
