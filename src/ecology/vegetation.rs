//! The world's plant collection, keyed by cell.

use crate::ecology::plant::{Plant, Species};
use crate::grid::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All plants currently on the grid, at most one per cell.
///
/// Ordered by position so iteration (and therefore every random choice
/// derived from it) is reproducible for a given seed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vegetation {
    plants: BTreeMap<Position, Plant>,
}

impl Vegetation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plant at its own position. Returns `false` and leaves the
    /// collection unchanged if the cell already holds a plant.
    pub fn insert(&mut self, plant: Plant) -> bool {
        use std::collections::btree_map::Entry;
        match self.plants.entry(plant.position()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(plant);
                true
            }
        }
    }

    /// Remove and return the plant at `pos` (it has been eaten)
    pub fn remove(&mut self, pos: Position) -> Option<Plant> {
        self.plants.remove(&pos)
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Plant> {
        self.plants.get(&pos)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.plants.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plant> {
        self.plants.values()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.plants.keys().copied()
    }

    /// Plant count per species, in `Species::ALL` order
    pub fn census(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for plant in self.iter() {
            let slot = Species::ALL
                .iter()
                .position(|s| *s == plant.species())
                .unwrap_or(0);
            counts[slot] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_occupied_cell() {
        let mut vegetation = Vegetation::new();
        let pos = Position::new(3, 4);

        assert!(vegetation.insert(Plant::with_species(pos, Species::Common)));
        assert!(!vegetation.insert(Plant::with_species(pos, Species::Rare)));
        assert_eq!(vegetation.len(), 1);
        assert_eq!(vegetation.get(pos).map(Plant::species), Some(Species::Common));
    }

    #[test]
    fn test_remove_eaten_plant() {
        let mut vegetation = Vegetation::new();
        let pos = Position::new(1, 0);
        vegetation.insert(Plant::with_species(pos, Species::Rare));

        let eaten = vegetation.remove(pos);
        assert_eq!(eaten.map(|p| p.energy()), Some(25));
        assert!(!vegetation.contains(pos));
        assert!(vegetation.remove(pos).is_none());
    }

    #[test]
    fn test_census() {
        let mut vegetation = Vegetation::new();
        vegetation.insert(Plant::with_species(Position::new(0, 0), Species::Common));
        vegetation.insert(Plant::with_species(Position::new(0, 1), Species::Common));
        vegetation.insert(Plant::with_species(Position::new(0, 2), Species::Rare));
        assert_eq!(vegetation.census(), [2, 0, 1]);
    }
}
