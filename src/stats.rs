//! Statistics tracking for the simulation.

use crate::ecology::Vegetation;
use crate::organism::Animal;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation turn
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub turn: u64,
    pub generation: u32,
    /// Living animals
    pub population: usize,
    /// Mean lifespan across animals
    pub lifespan_mean: f64,
    /// Highest lifespan in the population
    pub lifespan_max: i32,
    /// Mean size of the last survey
    pub vision_mean: f64,
    /// Plants on the grid
    pub vegetation: usize,
    /// Plants per species (common, uncommon, rare)
    pub vegetation_by_species: [usize; 3],
    /// Births this turn
    pub births: usize,
    /// Deaths this turn
    pub deaths: usize,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from current simulation state
    pub fn update(&mut self, animals: &[Animal], vegetation: &Vegetation) {
        self.population = animals.len();
        self.vegetation = vegetation.len();
        self.vegetation_by_species = vegetation.census();

        if animals.is_empty() {
            self.lifespan_mean = 0.0;
            self.lifespan_max = 0;
            self.vision_mean = 0.0;
            return;
        }

        let n = animals.len() as f64;
        self.lifespan_mean = animals.iter().map(|a| a.lifespan() as f64).sum::<f64>() / n;
        self.lifespan_max = animals.iter().map(Animal::lifespan).max().unwrap_or(0);
        self.vision_mean = animals.iter().map(|a| a.vision as f64).sum::<f64>() / n;
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Gen:{:3} | Pop:{:5} | Lifespan:{:.0} | Vision:{:.1} | Vegetation:{} | +{} -{}",
            self.turn,
            self.generation,
            self.population,
            self.lifespan_mean,
            self.vision_mean,
            self.vegetation,
            self.births,
            self.deaths,
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Get population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.turn, s.population))
            .collect()
    }

    /// Get mean lifespan over time
    pub fn lifespan_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.turn, s.lifespan_mean))
            .collect()
    }

    /// Save history to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load history from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecology::{Plant, Species};
    use crate::genetics::Genome;
    use crate::grid::Position;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_stats_update() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = Animal::new(1, Position::new(0, 0), Genome::random(&mut rng));
        let mut b = Animal::new(2, Position::new(1, 1), Genome::random(&mut rng));
        a.genome.lifespan = 10;
        b.genome.lifespan = 30;

        let mut vegetation = Vegetation::new();
        vegetation.insert(Plant::with_species(Position::new(5, 5), Species::Rare));

        let mut stats = Stats::new();
        stats.update(&[a, b], &vegetation);

        assert_eq!(stats.population, 2);
        assert_eq!(stats.lifespan_mean, 20.0);
        assert_eq!(stats.lifespan_max, 30);
        assert_eq!(stats.vegetation, 1);
        assert_eq!(stats.vegetation_by_species, [0, 0, 1]);
    }

    #[test]
    fn test_empty_population() {
        let mut stats = Stats::new();
        stats.update(&[], &Vegetation::new());
        assert_eq!(stats.population, 0);
        assert_eq!(stats.lifespan_mean, 0.0);
    }

    #[test]
    fn test_history_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = StatsHistory::new(10);
        history.record(Stats {
            turn: 10,
            population: 7,
            ..Stats::default()
        });
        history.save(&path).unwrap();

        let loaded = StatsHistory::load(&path).unwrap();
        assert_eq!(loaded.population_series(), vec![(10, 7)]);
        assert_eq!(loaded.interval, 10);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let stats = Stats {
            turn: 42,
            population: 9,
            vegetation: 120,
            ..Stats::default()
        };
        let line = stats.summary();
        assert!(line.contains("42"));
        assert!(line.contains("Vegetation:120"));
    }
}
