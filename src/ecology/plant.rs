//! Stationary vegetation with three rarity tiers.

use crate::grid::{Addressing, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vegetation rarity tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Common,
    Uncommon,
    Rare,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Common, Species::Uncommon, Species::Rare];

    /// Weighted draw: 70% common, 25% uncommon, 5% rare
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll = (rng.gen::<f64>() * 100.0).round() / 100.0;
        Self::from_roll(roll)
    }

    /// Map a roll in `[0, 1]` onto a tier
    pub fn from_roll(roll: f64) -> Self {
        if roll <= 0.70 {
            Species::Common
        } else if roll < 0.95 {
            Species::Uncommon
        } else {
            Species::Rare
        }
    }

    /// Lifespan gained by the animal that eats it
    pub fn energy(self) -> i32 {
        match self {
            Species::Common => 10,
            Species::Uncommon => 15,
            Species::Rare => 25,
        }
    }

    /// The only tier an animal with this vision can eat.
    ///
    /// Tiers are exclusive: sharper sight unlocks rarer plants and loses
    /// access to the commoner ones.
    pub fn edible_at(vision: usize) -> Self {
        if vision < 65 {
            Species::Common
        } else if vision < 100 {
            Species::Uncommon
        } else {
            Species::Rare
        }
    }

    /// One-time placement adjustment applied when a plant is created.
    ///
    /// Common plants scale their coordinates up by 1 or 2, uncommon ones
    /// divide by 1 to 4, rare ones stay put. Results are clamped.
    pub fn reposition<R: Rng + ?Sized>(self, pos: Position, dimension: usize, rng: &mut R) -> Position {
        let (x, y) = (pos.x as i64, pos.y as i64);
        match self {
            Species::Common => Addressing::Clamp.resolve(
                x * rng.gen_range(1..=2),
                y * rng.gen_range(1..=2),
                dimension,
            ),
            Species::Uncommon => Addressing::Clamp.resolve(
                x / rng.gen_range(1..=4),
                y / rng.gen_range(1..=4),
                dimension,
            ),
            Species::Rare => pos,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Species::Common => "common",
            Species::Uncommon => "uncommon",
            Species::Rare => "rare",
        };
        f.write_str(name)
    }
}

/// A plant on the grid. Its position never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    position: Position,
    species: Species,
}

impl Plant {
    /// Fixed for every plant; plants never age
    pub const LIFESPAN: i32 = 500;

    /// Draw a species and apply its repositioning rule to `seed`
    pub fn new<R: Rng + ?Sized>(seed: Position, dimension: usize, rng: &mut R) -> Self {
        let species = Species::draw(rng);
        let position = species.reposition(seed, dimension, rng);
        Self { position, species }
    }

    /// Plant of a known species at an exact position
    pub fn with_species(position: Position, species: Species) -> Self {
        Self { position, species }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn species(&self) -> Species {
        self.species
    }

    #[inline]
    pub fn energy(&self) -> i32 {
        self.species.energy()
    }

    #[inline]
    pub fn lifespan(&self) -> i32 {
        Self::LIFESPAN
    }
}
