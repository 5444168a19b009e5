pub mod cost;
mod packing;
mod structure;

pub use cost::{cost_ceiling, naive_total, respondents_for};
pub use packing::{Packing, PackingBuilder};
pub use structure::{Structure, StructureBuilder};

#[cfg(test)]
mod tests;
