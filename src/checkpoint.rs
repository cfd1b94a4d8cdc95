//! Checkpoint system for saving and loading simulation state.
//!
//! A [`Checkpoint`] is a full world snapshot. [`CheckpointStore`] is the
//! named-slot store it is written to; loading an empty slot yields
//! `Ok(None)`, which callers treat as "start a fresh world".

use crate::config::{Config, ConfigError};
use crate::ecology::Vegetation;
use crate::organism::{Animal, AnimalId};
use crate::stats::StatsHistory;
use crate::world::MatePair;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Complete simulation state for checkpointing
#[derive(Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Configuration the world was created with
    pub config: Config,
    pub turn: u64,
    pub generation: u32,
    /// Last id handed out
    pub next_id: AnimalId,
    /// All animals, in their last acting order
    pub animals: Vec<Animal>,
    pub vegetation: Vegetation,
    /// Unresolved breeding pairs
    pub mates: Vec<MatePair>,
    pub stats_history: StatsHistory,
    /// Random stream position, so a resumed run continues the same draws
    pub rng: ChaCha8Rng,
    /// Seed the world was created with
    pub seed: u64,
    pub started_at: SystemTime,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    const MAGIC: &'static [u8; 4] = b"DRWN";

    /// Create a new checkpoint
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        turn: u64,
        generation: u32,
        next_id: AnimalId,
        animals: Vec<Animal>,
        vegetation: Vegetation,
        mates: Vec<MatePair>,
        stats_history: StatsHistory,
        rng: ChaCha8Rng,
        seed: u64,
        started_at: SystemTime,
    ) -> Self {
        Self {
            version: Self::VERSION,
            config,
            turn,
            generation,
            next_id,
            animals,
            vegetation,
            mates,
            stats_history,
            rng,
            seed,
            started_at,
        }
    }

    /// Encode with magic header
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        let mut bytes = Self::MAGIC.to_vec();
        bincode::serialize_into(&mut bytes, self)?;
        Ok(bytes)
    }

    /// Decode, checking magic bytes and version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        if bytes.len() < Self::MAGIC.len() || &bytes[..Self::MAGIC.len()] != Self::MAGIC {
            return Err(CheckpointError::InvalidFormat("Invalid magic bytes".to_string()));
        }

        let checkpoint: Checkpoint = bincode::deserialize(&bytes[Self::MAGIC.len()..])?;

        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }
        checkpoint.config.validate()?;

        Ok(checkpoint)
    }

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.to_bytes()?)?;
        writer.flush()?;
        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize + Self::MAGIC.len()
    }
}

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stored configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Durable named-slot storage for world snapshots
pub trait CheckpointStore {
    /// Replace the slot's contents with `checkpoint` in one step
    fn save(&mut self, name: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Read a slot; `Ok(None)` when nothing has been saved under `name`
    fn load(&self, name: &str) -> Result<Option<Checkpoint>, CheckpointError>;
}

/// One `<name>.bin` file per slot inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CheckpointStore for FileStore {
    fn save(&mut self, name: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let path = self.slot_path(name);
        let tmp = self.dir.join(format!(".{}.bin.tmp", name));
        checkpoint.save(&tmp)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let path = self.slot_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Checkpoint::load(path).map(Some)
    }
}

/// In-memory store, encoded exactly like the file store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }
}

impl CheckpointStore for MemoryStore {
    fn save(&mut self, name: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.slots.insert(name.to_string(), checkpoint.to_bytes()?);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        self.slots
            .get(name)
            .map(|bytes| Checkpoint::from_bytes(bytes))
            .transpose()
    }
}

/// Periodic saving of a single named slot
pub struct CheckpointManager<S: CheckpointStore> {
    store: S,
    /// Slot name written on every save
    pub slot: String,
    /// Turns between checkpoints
    pub interval: u64,
    last_checkpoint: u64,
}

impl<S: CheckpointStore> CheckpointManager<S> {
    /// Create a new checkpoint manager
    pub fn new(store: S, slot: impl Into<String>, interval: u64) -> Self {
        Self {
            store,
            slot: slot.into(),
            interval: interval.max(1),
            last_checkpoint: 0,
        }
    }

    /// Check if a checkpoint should be saved
    pub fn should_save(&self, turn: u64) -> bool {
        turn > 0 && turn % self.interval == 0 && turn != self.last_checkpoint
    }

    /// Save checkpoint and update state
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.store.save(&self.slot, checkpoint)?;
        self.last_checkpoint = checkpoint.turn;
        log::debug!("Checkpoint '{}' saved at turn {}", self.slot, checkpoint.turn);
        Ok(())
    }

    /// Latest snapshot in the slot, if any
    pub fn load(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        self.store.load(&self.slot)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
