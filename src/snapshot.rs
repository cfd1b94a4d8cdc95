//! Read-only world views for renderers.
//!
//! A [`Snapshot`] copies everything a display needs out of the world, so a
//! renderer never holds a reference into live simulation state.

use crate::ecology::Species;
use crate::grid::Position;
use crate::organism::{Animal, AnimalId, LifespanBand};
use crate::world::World;
use std::io::{self, Write};
use std::time::Duration;

/// Display tag for whatever occupies a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Plant(Species),
    Animal { band: LifespanBand, vision: usize },
}

impl Marker {
    /// Single-character glyph for text maps
    pub fn glyph(&self) -> char {
        match self {
            Marker::Plant(Species::Common) => '.',
            Marker::Plant(Species::Uncommon) => '+',
            Marker::Plant(Species::Rare) => '*',
            Marker::Animal { band, .. } => match band {
                LifespanBand::Frail => 'a',
                LifespanBand::Weak => 'b',
                LifespanBand::Steady => 'c',
                LifespanBand::Strong => 'd',
                LifespanBand::Robust => 'e',
            },
        }
    }
}

/// One animal's traits as a table row
#[derive(Clone, Debug, PartialEq)]
pub struct ChromosomeRow {
    pub id: AnimalId,
    pub left: bool,
    pub right: bool,
    pub front: bool,
    pub hind: bool,
    pub front_right: bool,
    pub front_left: bool,
    pub back_right: bool,
    pub back_left: bool,
    pub mobility: u32,
    pub sight: u32,
    pub vision: usize,
    pub memory: u32,
    pub hunger_tolerance: f32,
    pub fertility: u32,
}

impl ChromosomeRow {
    pub const HEADER: &'static str =
        " ID | L | R | F | B | FR| FL| BR| BL| M | S | V  | MEM| TOL | FRT";

    pub fn of(animal: &Animal) -> Self {
        let g = &animal.genome;
        Self {
            id: animal.id,
            left: g.sight.left,
            right: g.sight.right,
            front: g.sight.front,
            hind: g.sight.hind,
            front_right: g.sight.front_right,
            front_left: g.sight.front_left,
            back_right: g.sight.back_right,
            back_left: g.sight.back_left,
            mobility: g.mobility,
            sight: g.sight.radius,
            vision: animal.vision,
            memory: g.memory,
            hunger_tolerance: g.hunger_tolerance,
            fertility: g.fertility,
        }
    }
}

impl std::fmt::Display for ChromosomeRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = |flag: bool| u8::from(flag);
        write!(
            f,
            "{:3} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {:3}| {:3}| {:.2}| {:2}",
            self.id,
            b(self.left),
            b(self.right),
            b(self.front),
            b(self.hind),
            b(self.front_right),
            b(self.front_left),
            b(self.back_right),
            b(self.back_left),
            self.mobility,
            self.sight,
            self.vision,
            self.memory,
            self.hunger_tolerance,
            self.fertility,
        )
    }
}

/// Everything a renderer may look at
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub dimension: usize,
    pub plants: Vec<(Position, Marker)>,
    pub animals: Vec<(Position, Marker)>,
    pub population: usize,
    pub lifespan_mean: f64,
    pub vegetation: usize,
    pub generation: u32,
    pub turn: u64,
    pub elapsed: Duration,
    /// Trait rows of the last five animals in acting order
    pub recent: Vec<ChromosomeRow>,
}

impl Snapshot {
    pub const RECENT_ROWS: usize = 5;

    /// Create a snapshot from the current world state
    pub fn from_world(world: &World) -> Self {
        let plants = world
            .vegetation
            .iter()
            .map(|p| (p.position(), Marker::Plant(p.species())))
            .collect();

        let animals = world
            .animals
            .iter()
            .map(|a| {
                let marker = Marker::Animal {
                    band: a.band(),
                    vision: a.vision,
                };
                (a.position, marker)
            })
            .collect();

        let skip = world.animals.len().saturating_sub(Self::RECENT_ROWS);
        let recent = world.animals[skip..].iter().map(ChromosomeRow::of).collect();

        Self {
            dimension: world.dimension(),
            plants,
            animals,
            population: world.population(),
            lifespan_mean: world.average_lifespan(),
            vegetation: world.vegetation.len(),
            generation: world.generation,
            turn: world.turn,
            elapsed: world.elapsed(),
            recent,
        }
    }

    /// Derived display grid, `grid[y][x]`; animals are drawn over plants
    pub fn grid(&self) -> Vec<Vec<Option<Marker>>> {
        let mut grid = vec![vec![None; self.dimension]; self.dimension];
        for (pos, marker) in self.plants.iter().chain(self.animals.iter()) {
            if pos.in_bounds(self.dimension) {
                grid[pos.y as usize][pos.x as usize] = Some(*marker);
            }
        }
        grid
    }
}

/// Consumer of snapshots
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}

/// Plain-text renderer: an optional glyph map followed by the stat block
pub struct TextRenderer<W: Write> {
    out: W,
    /// Draw the map only while the population is below this
    pub map_threshold: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, map_threshold: usize) -> Self {
        Self { out, map_threshold }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if snapshot.population < self.map_threshold {
            for row in snapshot.grid() {
                let line: String = row
                    .iter()
                    .map(|cell| cell.map_or(' ', |m| m.glyph()))
                    .flat_map(|c| [c, ' ', ' '])
                    .collect();
                writeln!(self.out, "{}", line.trim_end())?;
            }
            writeln!(self.out)?;
        }

        writeln!(
            self.out,
            "Population: {} | Average lifespan: {:.0} | Vegetation: {}",
            snapshot.population, snapshot.lifespan_mean, snapshot.vegetation
        )?;
        writeln!(
            self.out,
            "Generation: {} | Turn: {} | Elapsed: {:.1} mins",
            snapshot.generation,
            snapshot.turn,
            snapshot.elapsed.as_secs_f64() / 60.0
        )?;
        writeln!(self.out, "{}", ChromosomeRow::HEADER)?;
        for row in &snapshot.recent {
            writeln!(self.out, "{}", row)?;
        }
        self.out.flush()
    }
}

/// Renderer that routes the stat block through the `log` facade
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        log::info!(
            "Gen {} turn {}: population {}, mean lifespan {:.0}, vegetation {}",
            snapshot.generation,
            snapshot.turn,
            snapshot.population,
            snapshot.lifespan_mean,
            snapshot.vegetation
        );
        for row in &snapshot.recent {
            log::debug!("{}", row);
        }
        Ok(())
    }
}
