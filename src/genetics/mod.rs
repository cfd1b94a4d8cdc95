//! Genetics module - trait model and inheritance between generations.

pub mod genome;
pub mod inheritance;

pub use genome::{decile_roll, Genome, Sight};
pub use inheritance::Inheritance;
