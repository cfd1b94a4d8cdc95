//! Vegetation: the only food source in the world.
//!
//! - Plant species tiers, their energy and placement rule
//! - The per-cell vegetation collection owned by the world

pub mod plant;
pub mod vegetation;

pub use plant::{Plant, Species};
pub use vegetation::Vegetation;
