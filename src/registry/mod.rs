mod category;
mod registry;

pub use category::{Category, CategoryRecord};
pub use registry::{Registry, INCIDENCE_COLUMN, KEY_COLUMN, LENGTH_COLUMN, NAME_COLUMN};
