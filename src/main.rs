//! darwinian - CLI entry point
//!
//! Runs the simulation in a terminal, checkpointing a named slot so an
//! interrupted run can pick up where it stopped.

use clap::{Parser, Subcommand};
use darwinian::checkpoint::{CheckpointManager, CheckpointStore, FileStore};
use darwinian::snapshot::{LogRenderer, Renderer, Snapshot, TextRenderer};
use darwinian::{benchmark, Animal, Config, World};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "darwinian")]
#[command(version)]
#[command(about = "Turn-based artificial-life simulator with evolving foragers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation, fresh or resumed from the checkpoint slot
    Run {
        /// Configuration file (YAML), used for fresh worlds only
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Resume from the checkpoint slot instead of running genesis
        #[arg(short, long)]
        resume: bool,

        /// Stop after this many turns (default: run until collapse)
        #[arg(short, long)]
        turns: Option<u64>,

        /// Directory holding checkpoint slots
        #[arg(short, long, default_value = "checkpoints")]
        dir: PathBuf,

        /// Checkpoint slot name
        #[arg(long, default_value = "darwins_children")]
        slot: String,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Pause between rendered turns, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,

        /// Quiet mode (log summaries instead of drawing the map)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of turns
        #[arg(short, long, default_value = "1000")]
        turns: u64,

        /// Population size
        #[arg(short, long, default_value = "500")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Summarize the world stored in a checkpoint slot
    Analyze {
        #[arg(short, long, default_value = "checkpoints")]
        dir: PathBuf,

        #[arg(long, default_value = "darwins_children")]
        slot: String,
    },
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            resume,
            turns,
            dir,
            slot,
            seed,
            delay_ms,
            quiet,
        } => run_simulation(config, resume, turns, dir, slot, seed, delay_ms, quiet),

        Commands::Benchmark { turns, population } => {
            init_logging("warn");
            run_benchmark(turns, population)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }

        Commands::Analyze { dir, slot } => {
            init_logging("info");
            analyze_checkpoint(dir, slot)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    config_path: PathBuf,
    resume: bool,
    turns: Option<u64>,
    dir: PathBuf,
    slot: String,
    seed: Option<u64>,
    delay_ms: u64,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    let store = FileStore::new(&dir)?;
    let restored = if resume { store.load(&slot)? } else { None };

    // A resumed world keeps the settings it was saved with
    let log_level = restored
        .as_ref()
        .map_or(&config.logging.log_level, |c| &c.config.logging.log_level);
    init_logging(log_level);

    let fresh = restored.is_none();
    let mut world = match restored {
        Some(checkpoint) => {
            let world = World::from_checkpoint(checkpoint);
            log::info!(
                "Resumed '{}' at turn {} (generation {}, population {})",
                slot,
                world.turn,
                world.generation,
                world.population()
            );
            world
        }
        None => {
            if resume {
                log::warn!("No checkpoint in slot '{}', starting a fresh world", slot);
            }
            let world = match seed {
                Some(s) => World::try_new_with_seed(config.clone(), s)?,
                None => World::new(config.clone()),
            };
            log::info!(
                "Fresh world: {}x{} grid, population {}, seed {}",
                config.world.dimension,
                config.world.dimension,
                world.population(),
                world.seed()
            );
            world
        }
    };

    let mut checkpoints = CheckpointManager::new(store, slot, world.config.logging.checkpoint_interval);
    if fresh {
        checkpoints.save(&world.create_checkpoint())?;
    }

    let mut renderer: Box<dyn Renderer> = if quiet {
        Box::new(LogRenderer)
    } else {
        Box::new(TextRenderer::new(
            std::io::stdout(),
            world.config.logging.map_population_threshold,
        ))
    };

    let start = Instant::now();
    let start_turn = world.turn;
    let stop_turn = turns.map(|t| world.turn + t);

    while !world.is_collapsed() {
        if stop_turn.map_or(false, |stop| world.turn >= stop) {
            break;
        }

        world.step();

        if !quiet || world.turn % world.config.logging.stats_interval == 0 {
            renderer.render(&Snapshot::from_world(&world))?;
        }

        if checkpoints.should_save(world.turn) {
            if let Err(e) = checkpoints.save(&world.create_checkpoint()) {
                log::error!("Checkpoint save failed: {}", e);
            }
        }

        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
    }

    if world.is_collapsed() {
        log::info!("Population collapsed at turn {}", world.turn);
    }

    checkpoints.save(&world.create_checkpoint())?;

    let elapsed = start.elapsed();
    let played = world.turn - start_turn;
    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Turns played: {}", played);
    println!("Speed: {:.1} turns/s", played as f64 / elapsed.as_secs_f64().max(1e-9));
    println!("Final population: {}", world.population());
    println!("Generation: {}", world.generation);

    let stats_path = dir.join("stats_history.json");
    world.stats_history.save(&stats_path)?;
    println!("Stats history: {:?}", stats_path);

    Ok(())
}

fn run_benchmark(turns: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== darwinian Benchmark ===");
    println!("Turns: {}", turns);
    println!("Population: {}", population);
    println!();

    let result = benchmark(turns, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(dir: PathBuf, slot: String) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(&dir)?;
    let Some(checkpoint) = store.load(&slot)? else {
        println!("No checkpoint named '{}' in {:?}", slot, dir);
        return Ok(());
    };

    println!("=== Checkpoint Analysis ===");
    println!("Slot: {} ({:.2} KB)", slot, checkpoint.size_bytes() as f64 / 1_000.0);
    println!("Turn: {} | Generation: {}", checkpoint.turn, checkpoint.generation);
    println!("Population: {}", checkpoint.animals.len());
    println!("Vegetation: {}", checkpoint.vegetation.len());
    println!("Pending mate pairs: {}", checkpoint.mates.len());

    let animals = &checkpoint.animals;
    if !animals.is_empty() {
        println!();
        println!("Mean lifespan: {:.1}", mean(animals, |a| a.lifespan() as f64));
        println!("Mean mobility: {:.2}", mean(animals, |a| a.genome.mobility as f64));
        println!("Mean sight radius: {:.2}", mean(animals, |a| a.genome.sight.radius as f64));
        println!("Mean sight lines: {:.2}", mean(animals, |a| a.genome.sight.line_count() as f64));
        println!("Mean fertility: {:.2}", mean(animals, |a| a.genome.fertility as f64));
        println!("Mean hunger tolerance: {:.2}", mean(animals, |a| a.genome.hunger_tolerance as f64));
    }

    let [common, uncommon, rare] = checkpoint.vegetation.census();
    println!();
    println!("Plants: {} common, {} uncommon, {} rare", common, uncommon, rare);

    Ok(())
}

fn mean(animals: &[Animal], trait_of: impl Fn(&Animal) -> f64) -> f64 {
    animals.iter().map(trait_of).sum::<f64>() / animals.len() as f64
}
