//! World simulation engine - the turn state machine.
//!
//! Each call to [`World::step`] runs one turn:
//!
//! 1. **Act**: shuffle the animals, then every animal eats or roams in the
//!    new order. Earlier animals can take plants later ones were aiming at.
//! 2. **Mate resolve**: with everyone moved, each animal looks for a mate.
//! 3. **Breed**: only when the mate queue is even and non-empty.
//! 4. **Expire**: animals with no lifespan left are removed.
//! 5. **Advance**: bump the turn counter; every `turns_per_generation`
//!    turns, roll the generation and grow a new vegetation cohort.

use crate::checkpoint::Checkpoint;
use crate::config::{Config, ConfigError};
use crate::ecology::{Plant, Vegetation};
use crate::genetics::{Genome, Inheritance};
use crate::grid::{Position, SpatialIndex};
use crate::organism::{Animal, AnimalId, Forage};
use crate::stats::{Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, SystemTime};

/// A queued breeding pair, `first` being the animal that asked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatePair {
    pub first: AnimalId,
    pub second: AnimalId,
}

/// Whatever stands on a cell
#[derive(Clone, Copy, Debug)]
pub enum Occupant<'a> {
    Animal(&'a Animal),
    Plant(&'a Plant),
}

/// The simulation world
pub struct World {
    // Population, in this turn's acting order
    pub animals: Vec<Animal>,

    // Environment
    pub vegetation: Vegetation,
    spatial_index: SpatialIndex,

    // Pending breeding pairs; an odd leftover waits for a partner turn
    pub mates: Vec<MatePair>,

    // State
    pub turn: u64,
    pub generation: u32,

    // Configuration
    pub config: Config,
    inheritance: Inheritance,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,
    started_at: SystemTime,

    // ID generation
    next_id: AnimalId,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    births_this_turn: usize,
    deaths_this_turn: usize,
}

impl World {
    /// Create a populated world with a random seed
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Validate `config`, then build a populated world from it
    pub fn try_new_with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new_with_seed(config, seed))
    }

    /// Create a populated world: genesis followed by the first vegetation
    /// cohort
    ///
    /// # Panics
    ///
    /// If `config` fails [`Config::validate`].
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut world = Self::empty(config, seed);
        world.genesis();
        world.generate_eco();
        world.update_stats();
        world
    }

    /// A world with no animals or plants, at turn 1 of generation 1
    ///
    /// # Panics
    ///
    /// If `config` fails [`Config::validate`].
    pub fn empty(config: Config, seed: u64) -> Self {
        if let Err(e) = config.validate() {
            panic!("cannot build world: {}", e);
        }
        let dimension = config.world.dimension;
        let inheritance = Inheritance::new(config.animals.inherit_probability);
        let stats_interval = config.logging.stats_interval;

        Self {
            animals: Vec::new(),
            vegetation: Vegetation::new(),
            spatial_index: SpatialIndex::new(dimension),
            mates: Vec::new(),
            turn: 1,
            generation: 1,
            config,
            inheritance,
            stats: Stats::new(),
            stats_history: StatsHistory::new(stats_interval),
            started_at: SystemTime::now(),
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            births_this_turn: 0,
            deaths_this_turn: 0,
        }
    }

    /// Restore world from checkpoint. Checkpoints decoded with
    /// [`Checkpoint::from_bytes`] already carry a validated config.
    ///
    /// # Panics
    ///
    /// If the checkpoint's config fails [`Config::validate`].
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        if let Err(e) = checkpoint.config.validate() {
            panic!("cannot restore world: {}", e);
        }
        let dimension = checkpoint.config.world.dimension;
        let inheritance = Inheritance::new(checkpoint.config.animals.inherit_probability);

        let mut world = Self {
            animals: checkpoint.animals,
            vegetation: checkpoint.vegetation,
            spatial_index: SpatialIndex::new(dimension),
            mates: checkpoint.mates,
            turn: checkpoint.turn,
            generation: checkpoint.generation,
            config: checkpoint.config,
            inheritance,
            stats: Stats::new(),
            stats_history: checkpoint.stats_history,
            started_at: checkpoint.started_at,
            next_id: checkpoint.next_id,
            rng: checkpoint.rng,
            seed: checkpoint.seed,
            births_this_turn: 0,
            deaths_this_turn: 0,
        };

        world.rebuild_spatial_index();
        world.update_stats();
        world
    }

    /// Create checkpoint of current state
    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.config.clone(),
            self.turn,
            self.generation,
            self.next_id,
            self.animals.clone(),
            self.vegetation.clone(),
            self.mates.clone(),
            self.stats_history.clone(),
            self.rng.clone(),
            self.seed,
            self.started_at,
        )
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.config.world.dimension
    }

    /// Hand out the next animal id
    fn next_id(&mut self) -> AnimalId {
        self.next_id += 1;
        self.next_id
    }

    /// Populate generation 1: one random-genome animal on each of
    /// `initial_population` distinct random cells
    pub fn genesis(&mut self) {
        let count = self.config.world.initial_population;
        let dimension = self.dimension();
        assert!(
            count <= dimension * dimension,
            "initial population {} does not fit a {}x{} grid",
            count,
            dimension,
            dimension
        );

        let mut seen = HashSet::with_capacity(count);
        let mut positions = Vec::with_capacity(count);
        while positions.len() < count {
            let pos = Position::random(&mut self.rng, dimension);
            if seen.insert(pos) {
                positions.push(pos);
            }
        }

        for pos in positions {
            let id = self.next_id();
            let genome = Genome::random(&mut self.rng);
            self.animals.push(Animal::new(id, pos, genome));
        }

        self.rebuild_spatial_index();
        log::info!("Genesis: {} animals on a {}x{} grid", count, dimension, dimension);
    }

    /// Grow a vegetation cohort. Best effort: gives up after `2 x max`
    /// sampled cells and returns how many plants were placed.
    ///
    /// Plants never land on a cell held by an animal or another plant.
    pub fn generate_eco(&mut self) -> usize {
        let max = self.config.vegetation.max_count;
        let min = self.config.vegetation.min_count.min(max);
        let target = if self.generation == 1 {
            max
        } else {
            self.rng.gen_range(min..=max)
        };
        let budget = max * 2;
        let dimension = self.dimension();

        let animal_cells: HashSet<Position> = self.animals.iter().map(|a| a.position).collect();

        let mut placed = 0;
        let mut attempts = 0;
        while placed < target && attempts < budget {
            attempts += 1;

            let seed = Position::random(&mut self.rng, dimension);
            if animal_cells.contains(&seed) {
                continue;
            }

            let plant = Plant::new(seed, dimension, &mut self.rng);
            if animal_cells.contains(&plant.position()) {
                continue;
            }
            if self.vegetation.insert(plant) {
                placed += 1;
            }
        }

        if placed < target {
            log::debug!(
                "Vegetation cohort short: placed {} of {} after {} attempts",
                placed,
                target,
                attempts
            );
        }
        log::info!(
            "Generation {}: {} plants grown, {} total",
            self.generation,
            placed,
            self.vegetation.len()
        );

        placed
    }

    /// Add an animal with a fresh id and return that id
    pub fn spawn(&mut self, position: Position, genome: Genome) -> AnimalId {
        let id = self.next_id();
        self.animals.push(Animal::new(id, position, genome));
        self.rebuild_spatial_index();
        id
    }

    /// Main simulation step
    pub fn step(&mut self) {
        self.births_this_turn = 0;
        self.deaths_this_turn = 0;

        self.act();
        self.resolve_mates();
        if self.breeding_ready() {
            self.breed();
        }
        self.expire();
        self.advance();
    }

    /// Shuffle the acting order, then let every animal take its turn
    fn act(&mut self) {
        self.animals.shuffle(&mut self.rng);

        let dimension = self.dimension();
        for i in 0..self.animals.len() {
            let outcome = self.animals[i].turn(
                &self.vegetation,
                dimension,
                &self.config.animals,
                &mut self.rng,
            );

            if let Forage::Fed { at, .. } = outcome {
                let eaten = self.vegetation.remove(at);
                assert!(eaten.is_some(), "animal fed on a missing plant at {}", at);
            }
        }

        self.rebuild_spatial_index();
    }

    /// Every animal searches its adjacent cells for a mate. An animal
    /// queues at most once per pass; pairs carried over from an odd queue
    /// do not count against it.
    fn resolve_mates(&mut self) {
        let mut queued: HashSet<AnimalId> = HashSet::new();
        for i in 0..self.animals.len() {
            if queued.contains(&self.animals[i].id) {
                continue;
            }

            let found = self.animals[i].find_mate(
                &self.spatial_index,
                &self.animals,
                &self.config.animals,
                &mut self.rng,
            );

            if let Some(second) = found {
                let first = self.animals[i].id;
                queued.insert(first);
                self.mates.push(MatePair { first, second });
            }
        }
    }

    /// Breeding waits until the queue holds an even, non-zero count
    pub fn breeding_ready(&self) -> bool {
        !self.mates.is_empty() && self.mates.len() % 2 == 0
    }

    /// Produce one child per queued pair, then clear the queue
    fn breed(&mut self) {
        let by_id: HashMap<AnimalId, usize> = self
            .animals
            .iter()
            .enumerate()
            .map(|(idx, a)| (a.id, idx))
            .collect();

        let pairs = std::mem::take(&mut self.mates);
        let spawn_bound = self.dimension() - 1;
        let mut offspring = Vec::with_capacity(pairs.len());

        for pair in &pairs {
            let parents = by_id.get(&pair.first).zip(by_id.get(&pair.second));
            let Some((&a, &b)) = parents else {
                log::trace!("Skipping pair {:?}: a parent has already expired", pair);
                continue;
            };

            let genome = self.inheritance.child(
                &self.animals[a].genome,
                &self.animals[b].genome,
                &mut self.rng,
            );
            let position = Position::random(&mut self.rng, spawn_bound);
            let id = self.next_id();
            offspring.push(Animal::new(id, position, genome));
        }

        self.births_this_turn = offspring.len();
        log::debug!("Turn {}: {} pairs bred {} children", self.turn, pairs.len(), offspring.len());
        self.animals.extend(offspring);
    }

    /// Remove every animal with no lifespan left
    fn expire(&mut self) {
        let before = self.animals.len();
        self.animals.retain(Animal::is_alive);
        self.deaths_this_turn = before - self.animals.len();

        assert!(
            self.animals.iter().all(|a| a.lifespan() > 0),
            "animal with no lifespan survived expiry"
        );
        if self.deaths_this_turn > 0 {
            log::debug!("Turn {}: {} animals expired", self.turn, self.deaths_this_turn);
        }
        self.rebuild_spatial_index();
    }

    /// Advance the turn counter, rolling the generation when due
    fn advance(&mut self) {
        self.turn += 1;

        if self.turn % self.config.world.turns_per_generation == 0 {
            self.generation += 1;
            self.generate_eco();
        }

        self.update_stats();
    }

    fn rebuild_spatial_index(&mut self) {
        self.spatial_index
            .rebuild(self.animals.iter().map(|a| a.position));
    }

    fn update_stats(&mut self) {
        self.stats.turn = self.turn;
        self.stats.generation = self.generation;
        self.stats.births = self.births_this_turn;
        self.stats.deaths = self.deaths_this_turn;
        self.stats.update(&self.animals, &self.vegetation);

        if self.turn % self.config.logging.stats_interval == 0 {
            self.stats_history.record(self.stats.clone());
        }
    }

    /// Run simulation for the specified number of turns
    pub fn run(&mut self, turns: u64) {
        for _ in 0..turns {
            self.step();
        }
    }

    /// Run simulation with callback after every turn
    pub fn run_with_callback<F>(&mut self, turns: u64, mut callback: F)
    where
        F: FnMut(&World, u64),
    {
        for i in 0..turns {
            self.step();
            callback(self, i);
        }
    }

    /// Whatever occupies `pos`, animals first
    pub fn occupant_at(&self, pos: Position) -> Option<Occupant<'_>> {
        if let Some(&idx) = self.spatial_index.get(pos).first() {
            return Some(Occupant::Animal(&self.animals[idx]));
        }
        self.vegetation.get(pos).map(Occupant::Plant)
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.iter().find(|a| a.id == id)
    }

    /// Get current population count
    pub fn population(&self) -> usize {
        self.animals.len()
    }

    /// Mean lifespan of the living population, 0 when empty
    pub fn average_lifespan(&self) -> f64 {
        if self.animals.is_empty() {
            return 0.0;
        }
        let total: i64 = self.animals.iter().map(|a| a.lifespan() as i64).sum();
        total as f64 / self.animals.len() as f64
    }

    /// Population too small to continue breeding
    pub fn is_collapsed(&self) -> bool {
        self.population() <= 1
    }

    /// Time since the world was first created
    pub fn elapsed(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.started_at)
            .unwrap_or_default()
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
