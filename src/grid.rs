//! Grid coordinates, edge addressing and spatial indexing.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A cell on the square grid, `0 <= x, y < dimension`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Uniformly random cell with both axes in `[0, bound)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> Self {
        let bound = bound.clamp(1, 256);
        Self {
            x: rng.gen_range(0..bound) as u8,
            y: rng.gen_range(0..bound) as u8,
        }
    }

    /// Euclidean distance between two cells, ignoring wrap-around
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn in_bounds(&self, dimension: usize) -> bool {
        (self.x as usize) < dimension && (self.y as usize) < dimension
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How out-of-range coordinates are mapped back onto the grid.
///
/// The two policies are not interchangeable: wrapping a peripheral sight
/// line or a repositioned plant puts it on the opposite edge, clamping a
/// movement pins the animal to the border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// Modular arithmetic, the grid is a torus
    Wrap,
    /// Saturate to the nearest edge cell
    Clamp,
}

impl Addressing {
    /// Map a possibly out-of-range coordinate pair onto the grid
    #[inline]
    pub fn resolve(self, x: i64, y: i64, dimension: usize) -> Position {
        Position::new(self.axis(x, dimension), self.axis(y, dimension))
    }

    #[inline]
    pub fn axis(self, value: i64, dimension: usize) -> u8 {
        let dim = dimension as i64;
        match self {
            Addressing::Wrap => value.rem_euclid(dim) as u8,
            Addressing::Clamp => value.clamp(0, dim - 1) as u8,
        }
    }
}

/// Spatial index for fast animal lookups by position
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    dimension: usize,
    /// cells[y][x] contains indices of animals at that position
    cells: Vec<Vec<Vec<usize>>>,
}

impl SpatialIndex {
    /// Create a new spatial index for the given grid size
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![vec![Vec::new(); dimension]; dimension],
        }
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                cell.clear();
            }
        }
    }

    /// Rebuild from an iterator of occupied positions, indexed in order
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Position>,
    {
        self.clear();
        for (idx, pos) in positions.into_iter().enumerate() {
            self.insert(pos, idx);
        }
    }

    /// Insert an animal index at the given position
    #[inline]
    pub fn insert(&mut self, pos: Position, idx: usize) {
        if pos.in_bounds(self.dimension) {
            self.cells[pos.y as usize][pos.x as usize].push(idx);
        }
    }

    /// Get all animal indices at a specific cell
    #[inline]
    pub fn get(&self, pos: Position) -> &[usize] {
        if pos.in_bounds(self.dimension) {
            &self.cells[pos.y as usize][pos.x as usize]
        } else {
            &[]
        }
    }

    /// Check if a cell is occupied
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        !self.get(pos).is_empty()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
