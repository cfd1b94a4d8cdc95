//! Heritable trait set carried by every animal.

use crate::perception::Direction;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Directional sight configuration: how far an animal sees and along which
/// of the eight compass lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sight {
    /// Number of cells seen along each enabled line
    pub radius: u32,
    pub front: bool,
    pub hind: bool,
    pub left: bool,
    pub right: bool,
    pub front_right: bool,
    pub front_left: bool,
    pub back_right: bool,
    pub back_left: bool,
}

impl Sight {
    pub const RADIUS_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

    /// Random radius with each of the eight lines a fair coin
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            radius: rng.gen_range(Self::RADIUS_RANGE),
            front: rng.gen(),
            hind: rng.gen(),
            left: rng.gen(),
            right: rng.gen(),
            front_right: rng.gen(),
            front_left: rng.gen(),
            back_right: rng.gen(),
            back_left: rng.gen(),
        }
    }

    /// Sight along a single line only
    pub fn only(direction: Direction, radius: u32) -> Self {
        let mut sight = Self {
            radius,
            ..Self::default()
        };
        sight.set(direction, true);
        sight
    }

    /// Every line enabled
    pub fn all(radius: u32) -> Self {
        let mut sight = Self {
            radius,
            ..Self::default()
        };
        for direction in Direction::ALL {
            sight.set(direction, true);
        }
        sight
    }

    #[inline]
    pub fn sees(&self, direction: Direction) -> bool {
        match direction {
            Direction::Front => self.front,
            Direction::Hind => self.hind,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::FrontRight => self.front_right,
            Direction::FrontLeft => self.front_left,
            Direction::BackRight => self.back_right,
            Direction::BackLeft => self.back_left,
        }
    }

    pub fn set(&mut self, direction: Direction, enabled: bool) {
        let flag = match direction {
            Direction::Front => &mut self.front,
            Direction::Hind => &mut self.hind,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::FrontRight => &mut self.front_right,
            Direction::FrontLeft => &mut self.front_left,
            Direction::BackRight => &mut self.back_right,
            Direction::BackLeft => &mut self.back_left,
        };
        *flag = enabled;
    }

    /// Number of enabled lines
    pub fn line_count(&self) -> usize {
        Direction::ALL.iter().filter(|d| self.sees(**d)).count()
    }
}

/// Heritable traits of an animal.
///
/// `lifespan` doubles as the energy reserve: meals add to it, movement
/// subtracts from it, and the animal dies once it reaches zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Upper bound (exclusive) of each roaming step per axis, at least 1
    pub mobility: u32,
    pub lifespan: i32,
    pub memory: u32,
    /// Satiety ratio that must be exceeded before mating, in `[0, 1]`
    pub hunger_tolerance: f32,
    /// Mating succeeds when a 0-10 roll is at most this value
    pub fertility: u32,
    pub sight: Sight,
}

impl Genome {
    pub const MOBILITY_RANGE: std::ops::RangeInclusive<u32> = 1..=4;
    pub const LIFESPAN_RANGE: std::ops::RangeInclusive<i32> = 1..=20;
    pub const MEMORY_RANGE: std::ops::RangeInclusive<u32> = 4..=20;

    /// Fresh random genome used for genesis and as the base of every child
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            mobility: rng.gen_range(Self::MOBILITY_RANGE),
            lifespan: rng.gen_range(Self::LIFESPAN_RANGE),
            memory: rng.gen_range(Self::MEMORY_RANGE),
            hunger_tolerance: round2(rng.gen::<f32>()),
            fertility: decile_roll(rng),
            sight: Sight::random(rng),
        }
    }
}

/// Uniform draw in `[0, 1)` scaled to ten and rounded, giving `0..=10`
/// with half weight at both ends.
pub fn decile_roll<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    (rng.gen::<f64>() * 10.0).round() as u32
}

#[inline]
pub(crate) fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_genome_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let genome = Genome::random(&mut rng);
            assert!(Genome::MOBILITY_RANGE.contains(&genome.mobility));
            assert!(Genome::LIFESPAN_RANGE.contains(&genome.lifespan));
            assert!(Genome::MEMORY_RANGE.contains(&genome.memory));
            assert!((0.0..=1.0).contains(&genome.hunger_tolerance));
            assert!(genome.fertility <= 10);
            assert!(Sight::RADIUS_RANGE.contains(&genome.sight.radius));
        }
    }

    #[test]
    fn test_hunger_tolerance_has_two_decimals() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let genome = Genome::random(&mut rng);
        let scaled = genome.hunger_tolerance * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-3);
    }

    #[test]
    fn test_sight_only_sets_single_line() {
        let sight = Sight::only(Direction::Front, 3);
        assert_eq!(sight.line_count(), 1);
        assert!(sight.sees(Direction::Front));
        assert!(!sight.sees(Direction::Hind));
        assert_eq!(sight.radius, 3);
    }

    #[test]
    fn test_sight_all_lines() {
        assert_eq!(Sight::all(2).line_count(), 8);
        assert_eq!(Sight::default().line_count(), 0);
    }

    #[test]
    fn test_decile_roll_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rolls: Vec<u32> = (0..2000).map(|_| decile_roll(&mut rng)).collect();
        assert!(rolls.iter().all(|&r| r <= 10));
        assert!(rolls.contains(&0));
        assert!(rolls.contains(&10));
    }
}
