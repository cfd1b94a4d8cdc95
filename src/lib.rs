//! # darwinian
//!
//! Turn-based artificial-life simulator. Monerons forage for vegetation on
//! a square grid, pay lifespan for every move, and breed with their
//! neighbours; children inherit a random share of their parents' sight,
//! mobility and appetite.
//!
//! ## Features
//!
//! - **Directional sight**: eight toggleable sight lines decide which
//!   plants an animal can see, and how much it sees decides what it eats
//! - **Partial inheritance**: each trait independently comes from a parent
//!   or from a fresh roll
//! - **Reproducible**: seeded random number generation
//! - **Resumable**: whole-world checkpoints in named slots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use darwinian::{Config, World};
//!
//! let mut world = World::new(Config::default());
//! world.run(500);
//!
//! println!("Population: {}", world.population());
//! println!("Generation: {}", world.generation);
//! ```
//!
//! ## Checkpoints
//!
//! ```rust,no_run
//! use darwinian::checkpoint::{CheckpointStore, FileStore};
//! use darwinian::{Config, World};
//!
//! let mut store = FileStore::new("checkpoints").unwrap();
//! let mut world = World::new(Config::default());
//! world.run(100);
//! store.save("darwins_children", &world.create_checkpoint()).unwrap();
//!
//! let restored = match store.load("darwins_children").unwrap() {
//!     Some(checkpoint) => World::from_checkpoint(checkpoint),
//!     None => World::new(Config::default()),
//! };
//! assert_eq!(restored.turn, world.turn);
//! ```

pub mod checkpoint;
pub mod config;
pub mod ecology;
pub mod genetics;
pub mod grid;
pub mod organism;
pub mod perception;
pub mod snapshot;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::Config;
pub use organism::Animal;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(turns: u64, population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.dimension = 80;
    config.world.initial_population = population.min(80 * 80);

    let mut world = World::new_with_seed(config, 42);
    let start = Instant::now();
    world.run(turns);
    let elapsed = start.elapsed();

    BenchmarkResult {
        turns,
        initial_population: population,
        final_population: world.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        turns_per_second: turns as f64 / elapsed.as_secs_f64(),
        generation: world.generation,
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub turns: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub turns_per_second: f64,
    pub generation: u32,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Turns: {}", self.turns)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} turns/s", self.turns_per_second)?;
        writeln!(f, "Generation: {}", self.generation)?;
        Ok(())
    }
}
