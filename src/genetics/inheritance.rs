//! Partial trait transfer from two parents to a child.
//!
//! A child starts from a fresh random genome. Every heritable trait then
//! independently flips a Bernoulli coin; on success it is replaced by the
//! value of a uniformly chosen parent. Lifespan skips the coin and always
//! comes from a random parent. Mobility and sight radius drift upwards by
//! `0..=MAX_DRIFT` when inherited.

use crate::genetics::genome::Genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inheritance contract shared by every breeding pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inheritance {
    /// Probability that a trait is taken from a parent
    pub probability: f64,
}

impl Default for Inheritance {
    fn default() -> Self {
        Self { probability: 0.6 }
    }
}

impl Inheritance {
    pub const MAX_DRIFT: u32 = 2;

    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Bernoulli draw: does this trait come from a parent?
    #[inline]
    pub fn inherits<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.probability)
    }

    /// Uniform selection between the two parents
    #[inline]
    pub fn pick<'a, R: Rng + ?Sized>(&self, a: &'a Genome, b: &'a Genome, rng: &mut R) -> &'a Genome {
        if rng.gen() {
            a
        } else {
            b
        }
    }

    /// Build a child genome from two parents
    pub fn child<R: Rng + ?Sized>(&self, a: &Genome, b: &Genome, rng: &mut R) -> Genome {
        let mut child = Genome::random(rng);

        child.lifespan = self.pick(a, b, rng).lifespan;

        if self.inherits(rng) {
            child.mobility = self.pick(a, b, rng).mobility + rng.gen_range(0..=Self::MAX_DRIFT);
        }
        if self.inherits(rng) {
            child.memory = self.pick(a, b, rng).memory;
        }
        if self.inherits(rng) {
            child.hunger_tolerance = self.pick(a, b, rng).hunger_tolerance;
        }
        if self.inherits(rng) {
            child.fertility = self.pick(a, b, rng).fertility;
        }

        if self.inherits(rng) {
            child.sight.radius = self.pick(a, b, rng).sight.radius + rng.gen_range(0..=Self::MAX_DRIFT);
        }
        for direction in crate::perception::Direction::ALL {
            if self.inherits(rng) {
                let flag = self.pick(a, b, rng).sight.sees(direction);
                child.sight.set(direction, flag);
            }
        }

        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::Sight;
    use crate::perception::Direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parent(lifespan: i32, memory: u32, fertility: u32, sight: Sight) -> Genome {
        Genome {
            mobility: 3,
            lifespan,
            memory,
            hunger_tolerance: 0.25,
            fertility,
            sight,
        }
    }

    #[test]
    fn test_lifespan_always_from_a_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = parent(111, 5, 2, Sight::default());
        let b = parent(222, 6, 3, Sight::default());
        let never = Inheritance::new(0.0);

        for _ in 0..200 {
            let child = never.child(&a, &b, &mut rng);
            assert!(child.lifespan == 111 || child.lifespan == 222);
        }
    }

    #[test]
    fn test_certain_inheritance_copies_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sight = Sight::only(Direction::BackLeft, 4);
        let a = parent(50, 17, 9, sight);
        let b = parent(60, 17, 9, sight);
        let always = Inheritance::new(1.0);

        for _ in 0..200 {
            let child = always.child(&a, &b, &mut rng);
            assert_eq!(child.memory, 17);
            assert_eq!(child.fertility, 9);
            assert_eq!(child.hunger_tolerance, 0.25);
            assert!((3..=3 + Inheritance::MAX_DRIFT).contains(&child.mobility));
            assert!((4..=4 + Inheritance::MAX_DRIFT).contains(&child.sight.radius));
            assert_eq!(child.sight.line_count(), 1);
            assert!(child.sight.sees(Direction::BackLeft));
        }
    }

    #[test]
    fn test_inherit_rate_close_to_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let contract = Inheritance::default();
        let trials = 20_000;
        let hits = (0..trials).filter(|_| contract.inherits(&mut rng)).count();
        let rate = hits as f64 / trials as f64;
        assert!((rate - 0.6).abs() < 0.02, "rate was {}", rate);
    }

    #[test]
    fn test_pick_selects_both_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let a = parent(1, 4, 0, Sight::default());
        let b = parent(2, 4, 0, Sight::default());
        let contract = Inheritance::default();
        let picks: Vec<i32> = (0..100).map(|_| contract.pick(&a, &b, &mut rng).lifespan).collect();
        assert!(picks.contains(&1));
        assert!(picks.contains(&2));
    }
}
