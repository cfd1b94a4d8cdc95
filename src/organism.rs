//! Animal structure and behavior.

use crate::config::AnimalConfig;
use crate::ecology::{Species, Vegetation};
use crate::genetics::{decile_roll, Genome};
use crate::grid::{Addressing, Position, SpatialIndex};
use crate::perception::{self, Survey};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Unique animal identifier, never reused within a world
pub type AnimalId = u64;

/// What an animal did with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forage {
    /// Moved onto a plant and ate it; the world must remove the plant
    Fed { at: Position, species: Species },
    /// Found nothing edible and wandered
    Roamed,
}

/// Lifespan band used for display markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifespanBand {
    Frail,
    Weak,
    Steady,
    Strong,
    Robust,
}

impl LifespanBand {
    pub fn of(lifespan: i32) -> Self {
        match lifespan {
            i32::MIN..=100 => LifespanBand::Frail,
            101..=300 => LifespanBand::Weak,
            301..=400 => LifespanBand::Steady,
            401..=600 => LifespanBand::Strong,
            _ => LifespanBand::Robust,
        }
    }
}

/// Rolling record of feeding outcomes, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    outcomes: VecDeque<bool>,
}

impl History {
    /// Append an outcome, dropping the oldest once `capacity` is reached
    pub fn record(&mut self, fed: bool, capacity: usize) {
        while self.outcomes.len() >= capacity.max(1) {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(fed);
    }

    /// Fraction of the last `window` turns with a meal, rounded to two
    /// decimals. Young animals are measured against the full window.
    pub fn satiety(&self, window: usize) -> f32 {
        if window == 0 {
            return 0.0;
        }
        let meals = self.outcomes.iter().rev().take(window).filter(|&&fed| fed).count();
        ((meals as f32 / window as f32) * 100.0).round() / 100.0
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn last(&self) -> Option<bool> {
        self.outcomes.back().copied()
    }
}

/// A mobile forager
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub position: Position,
    pub genome: Genome,
    /// Size of the most recent survey; stale until the next one
    pub vision: usize,
    pub history: History,
}

impl Animal {
    pub fn new(id: AnimalId, position: Position, genome: Genome) -> Self {
        Self {
            id,
            position,
            genome,
            vision: 0,
            history: History::default(),
        }
    }

    #[inline]
    pub fn lifespan(&self) -> i32 {
        self.genome.lifespan
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.genome.lifespan > 0
    }

    /// Survey the surroundings, refreshing `vision`
    pub fn survey(&mut self, dimension: usize) -> Survey {
        let result = perception::survey(self.position, &self.genome.sight, dimension);
        self.vision = result.vision();
        result
    }

    /// Distinct surveyed cells holding a plant this animal can eat
    pub fn hunt(&mut self, vegetation: &Vegetation, dimension: usize) -> Vec<Position> {
        let survey = self.survey(dimension);
        let edible = Species::edible_at(self.vision);

        let mut targets: Vec<Position> = survey
            .cells
            .into_iter()
            .filter(|pos| vegetation.get(*pos).map_or(false, |p| p.species() == edible))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Bounded random walk: per axis, step back by `[0, mobility)` or
    /// forward by `[0, mobility)`, wrapping at the edges.
    pub fn roam<R: Rng + ?Sized>(&self, dimension: usize, rng: &mut R) -> Position {
        let mobility = self.genome.mobility.max(1) as i64;
        let (back_x, fwd_x) = (rng.gen_range(0..mobility), rng.gen_range(0..mobility));
        let (back_y, fwd_y) = (rng.gen_range(0..mobility), rng.gen_range(0..mobility));

        let x = self.position.x as i64;
        let y = self.position.y as i64;
        let nx = if rng.gen() { x - back_x } else { x + fwd_x };
        let ny = if rng.gen() { y - back_y } else { y + fwd_y };

        Addressing::Wrap.resolve(nx, ny, dimension)
    }

    /// One turn: eat a reachable plant or roam, then pay for the distance.
    ///
    /// Only reads the vegetation; on `Forage::Fed` the caller removes the
    /// eaten plant before the next animal acts.
    pub fn turn<R: Rng + ?Sized>(
        &mut self,
        vegetation: &Vegetation,
        dimension: usize,
        config: &AnimalConfig,
        rng: &mut R,
    ) -> Forage {
        let origin = self.position;
        let targets = self.hunt(vegetation, dimension);

        let outcome = match targets.choose(rng).and_then(|pos| vegetation.get(*pos)) {
            Some(meal) => {
                self.position = meal.position();
                self.history.record(true, config.history_capacity);
                self.genome.lifespan += meal.energy();
                Forage::Fed {
                    at: meal.position(),
                    species: meal.species(),
                }
            }
            None => {
                self.history.record(false, config.history_capacity);
                self.position = self.roam(dimension, rng);
                Forage::Roamed
            }
        };

        self.genome.lifespan -= movement_cost(origin.distance(&self.position));
        outcome
    }

    /// Both conditions must hold: recent satiety above hunger tolerance,
    /// and a 0-10 roll no greater than fertility.
    pub fn mate_check<R: Rng + ?Sized>(&self, window: usize, rng: &mut R) -> bool {
        let fed = self.history.satiety(window) > self.genome.hunger_tolerance;
        let fertile = decile_roll(rng) <= self.genome.fertility;
        fed && fertile
    }

    /// First adjacent animal accepted by this animal's mate check
    pub fn find_mate<R: Rng + ?Sized>(
        &self,
        index: &SpatialIndex,
        animals: &[Animal],
        config: &AnimalConfig,
        rng: &mut R,
    ) -> Option<AnimalId> {
        for cell in perception::mate_survey(self.position, index.dimension()) {
            let occupant = index
                .get(cell)
                .iter()
                .map(|&idx| &animals[idx])
                .find(|other| other.id != self.id);

            if let Some(other) = occupant {
                if self.mate_check(config.satiety_window, rng) {
                    return Some(other.id);
                }
            }
        }
        None
    }

    pub fn band(&self) -> LifespanBand {
        LifespanBand::of(self.genome.lifespan)
    }
}

/// Lifespan cost of moving `distance` cells in one turn
pub fn movement_cost(distance: f64) -> i32 {
    if distance <= 1.1 {
        1
    } else if distance <= 5.0 {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecology::Plant;
    use crate::genetics::Sight;
    use crate::perception::Direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn genome(sight: Sight) -> Genome {
        Genome {
            mobility: 2,
            lifespan: 20,
            memory: 10,
            hunger_tolerance: 0.0,
            fertility: 10,
            sight,
        }
    }

    #[test]
    fn test_animal_creation() {
        let animal = Animal::new(1, Position::new(3, 4), genome(Sight::default()));
        assert_eq!(animal.id, 1);
        assert_eq!(animal.vision, 0);
        assert!(animal.is_alive());
        assert!(animal.history.is_empty());
    }

    #[test]
    fn test_eats_visible_common_plant() {
        let config = AnimalConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut vegetation = Vegetation::new();
        vegetation.insert(Plant::with_species(Position::new(1, 0), Species::Common));

        let mut animal = Animal::new(1, Position::new(0, 0), genome(Sight::only(Direction::Front, 1)));
        let outcome = animal.turn(&vegetation, 10, &config, &mut rng);

        assert_eq!(
            outcome,
            Forage::Fed {
                at: Position::new(1, 0),
                species: Species::Common
            }
        );
        assert_eq!(animal.position, Position::new(1, 0));
        // +10 energy, -1 for a single-cell move
        assert_eq!(animal.lifespan(), 29);
        assert_eq!(animal.history.last(), Some(true));
    }

    #[test]
    fn test_low_vision_ignores_rare_plants() {
        let mut vegetation = Vegetation::new();
        vegetation.insert(Plant::with_species(Position::new(1, 0), Species::Rare));
        vegetation.insert(Plant::with_species(Position::new(2, 0), Species::Uncommon));

        let mut animal = Animal::new(1, Position::new(0, 0), genome(Sight::only(Direction::Front, 2)));
        assert!(animal.hunt(&vegetation, 10).is_empty());
        assert_eq!(animal.vision, 2);
    }

    #[test]
    fn test_high_vision_eats_only_rare() {
        let mut vegetation = Vegetation::new();
        vegetation.insert(Plant::with_species(Position::new(11, 10), Species::Common));
        vegetation.insert(Plant::with_species(Position::new(12, 10), Species::Uncommon));
        vegetation.insert(Plant::with_species(Position::new(13, 10), Species::Rare));

        // 8 lines x 13 radius = 104 sightings
        let mut animal = Animal::new(1, Position::new(10, 10), genome(Sight::all(13)));
        let targets = animal.hunt(&vegetation, 40);

        assert!(animal.vision >= 100);
        assert_eq!(targets, vec![Position::new(13, 10)]);
    }

    #[test]
    fn test_roam_records_starvation_and_stays_in_bounds() {
        let config = AnimalConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let vegetation = Vegetation::new();
        let mut animal = Animal::new(1, Position::new(0, 9), genome(Sight::default()));
        animal.genome.mobility = 4;

        for _ in 0..5 {
            let outcome = animal.turn(&vegetation, 10, &config, &mut rng);
            assert_eq!(outcome, Forage::Roamed);
            assert!(animal.position.in_bounds(10));
        }
        assert_eq!(animal.history.len(), 5);
        assert_eq!(animal.history.satiety(10), 0.0);
        assert!(animal.lifespan() <= 15);
    }

    #[test]
    fn test_roam_with_unit_mobility_stays_put() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut animal = Animal::new(1, Position::new(5, 5), genome(Sight::default()));
        animal.genome.mobility = 1;
        for _ in 0..20 {
            assert_eq!(animal.roam(10, &mut rng), Position::new(5, 5));
        }
    }

    #[test]
    fn test_movement_cost_tiers() {
        assert_eq!(movement_cost(0.0), 1);
        assert_eq!(movement_cost(1.0), 1);
        assert_eq!(movement_cost(1.5), 2);
        assert_eq!(movement_cost(5.0), 2);
        assert_eq!(movement_cost(5.1), 3);
    }

    #[test]
    fn test_history_capacity_and_satiety() {
        let mut history = History::default();
        for i in 0..150 {
            history.record(i % 2 == 0, 100);
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.satiety(10), 0.5);

        let mut young = History::default();
        young.record(true, 100);
        young.record(true, 100);
        assert_eq!(young.satiety(10), 0.2);
    }

    #[test]
    fn test_mate_check_requires_satiety() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut animal = Animal::new(1, Position::new(0, 0), genome(Sight::default()));
        animal.genome.hunger_tolerance = 0.5;

        // Starving animals never mate
        for _ in 0..10 {
            animal.history.record(false, 100);
        }
        assert!((0..50).all(|_| !animal.mate_check(10, &mut rng)));

        // Well fed and maximally fertile animals always do
        for _ in 0..10 {
            animal.history.record(true, 100);
        }
        assert!((0..50).all(|_| animal.mate_check(10, &mut rng)));
    }

    #[test]
    fn test_find_mate_ignores_self_and_distant_animals() {
        let config = AnimalConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut a = Animal::new(1, Position::new(5, 5), genome(Sight::default()));
        let mut b = Animal::new(2, Position::new(8, 8), genome(Sight::default()));
        for _ in 0..10 {
            a.history.record(true, 100);
            b.history.record(true, 100);
        }
        let animals = vec![a, b];
        let mut index = SpatialIndex::new(10);
        index.rebuild(animals.iter().map(|a| a.position));

        assert_eq!(animals[0].find_mate(&index, &animals, &config, &mut rng), None);
    }

    #[test]
    fn test_find_mate_adjacent() {
        let config = AnimalConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut a = Animal::new(1, Position::new(5, 5), genome(Sight::default()));
        let mut b = Animal::new(2, Position::new(5, 6), genome(Sight::default()));
        for _ in 0..10 {
            a.history.record(true, 100);
            b.history.record(true, 100);
        }
        let animals = vec![a, b];
        let mut index = SpatialIndex::new(10);
        index.rebuild(animals.iter().map(|a| a.position));

        assert_eq!(animals[0].find_mate(&index, &animals, &config, &mut rng), Some(2));
        assert_eq!(animals[1].find_mate(&index, &animals, &config, &mut rng), Some(1));
    }

    #[test]
    fn test_lifespan_bands() {
        assert_eq!(LifespanBand::of(-4), LifespanBand::Frail);
        assert_eq!(LifespanBand::of(100), LifespanBand::Frail);
        assert_eq!(LifespanBand::of(101), LifespanBand::Weak);
        assert_eq!(LifespanBand::of(400), LifespanBand::Steady);
        assert_eq!(LifespanBand::of(600), LifespanBand::Strong);
        assert_eq!(LifespanBand::of(601), LifespanBand::Robust);
    }
}
