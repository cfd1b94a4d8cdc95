//! Directional perception: which cells an animal can see, and which cells
//! count as adjacent for mate search.
//!
//! Orthogonal sight lines wrap around the grid edges. The four peripheral
//! (diagonal) lines are clamped to the border instead, so an animal in a
//! corner sees the corner cell repeatedly rather than the far side.

use crate::genetics::Sight;
use crate::grid::{Addressing, Position};

/// Grids at least this wide also count diagonal neighbours as adjacent
pub const DIAGONAL_MATE_MIN_DIMENSION: usize = 50;

/// The eight sight lines, relative to an animal facing +x
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Front,
    Hind,
    Right,
    Left,
    FrontRight,
    FrontLeft,
    BackRight,
    BackLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Front,
        Direction::Hind,
        Direction::Right,
        Direction::Left,
        Direction::FrontRight,
        Direction::FrontLeft,
        Direction::BackRight,
        Direction::BackLeft,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Front,
        Direction::Hind,
        Direction::Right,
        Direction::Left,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::FrontRight,
        Direction::FrontLeft,
        Direction::BackRight,
        Direction::BackLeft,
    ];

    /// Unit step `(dx, dy)` along this line
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Front => (1, 0),
            Direction::Hind => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Left => (0, -1),
            Direction::FrontRight => (1, 1),
            Direction::FrontLeft => (1, -1),
            Direction::BackRight => (-1, 1),
            Direction::BackLeft => (-1, -1),
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// Edge policy used when surveying along this line
    #[inline]
    pub fn sight_addressing(self) -> Addressing {
        if self.is_diagonal() {
            Addressing::Clamp
        } else {
            Addressing::Wrap
        }
    }

    /// Cell `steps` away from `origin` along this line
    #[inline]
    pub fn step(self, origin: Position, steps: i64, addressing: Addressing, dimension: usize) -> Position {
        let (dx, dy) = self.offset();
        addressing.resolve(
            origin.x as i64 + dx * steps,
            origin.y as i64 + dy * steps,
            dimension,
        )
    }
}

/// Result of a sight survey. Duplicated cells are kept: `vision` counts
/// every sighting, not distinct cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Survey {
    pub cells: Vec<Position>,
}

impl Survey {
    #[inline]
    pub fn vision(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Cells visible from `origin` given a sight configuration.
///
/// For every radius step `1..=sight.radius`, each enabled line contributes
/// one cell.
pub fn survey(origin: Position, sight: &Sight, dimension: usize) -> Survey {
    let lines: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| sight.sees(*d))
        .collect();

    let mut cells = Vec::with_capacity(lines.len() * sight.radius as usize);
    for i in 1..=sight.radius as i64 {
        for &direction in &lines {
            cells.push(direction.step(origin, i, direction.sight_addressing(), dimension));
        }
    }

    Survey { cells }
}

/// Cells adjacent to `origin` for mate search, always wrap-addressed.
///
/// Returns the four orthogonal neighbours, plus the four diagonal ones on
/// grids of at least [`DIAGONAL_MATE_MIN_DIMENSION`].
pub fn mate_survey(origin: Position, dimension: usize) -> Vec<Position> {
    let diagonals = dimension >= DIAGONAL_MATE_MIN_DIMENSION;
    Direction::ORTHOGONAL
        .into_iter()
        .chain(Direction::DIAGONAL.into_iter().filter(|_| diagonals))
        .map(|d| d.step(origin, 1, Addressing::Wrap, dimension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blind_survey_is_empty() {
        for radius in 1..=8 {
            let sight = Sight {
                radius,
                ..Sight::default()
            };
            let result = survey(Position::new(5, 5), &sight, 10);
            assert!(result.is_empty());
            assert_eq!(result.vision(), 0);
        }
    }

    #[test]
    fn test_front_sight_single_cell() {
        let sight = Sight::only(Direction::Front, 1);
        let result = survey(Position::new(0, 0), &sight, 10);
        assert_eq!(result.cells, vec![Position::new(1, 0)]);
        assert_eq!(result.vision(), 1);
    }

    #[test]
    fn test_vision_counts_lines_times_radius() {
        let sight = Sight::all(3);
        let result = survey(Position::new(20, 20), &sight, 40);
        assert_eq!(result.vision(), 24);
    }

    #[test]
    fn test_orthogonal_lines_wrap() {
        let sight = Sight::only(Direction::Hind, 2);
        let result = survey(Position::new(0, 4), &sight, 10);
        assert_eq!(result.cells, vec![Position::new(9, 4), Position::new(8, 4)]);
    }

    #[test]
    fn test_peripheral_lines_clamp() {
        let sight = Sight::only(Direction::BackLeft, 2);
        let result = survey(Position::new(0, 0), &sight, 10);
        assert_eq!(result.cells, vec![Position::new(0, 0), Position::new(0, 0)]);
        assert_eq!(result.vision(), 2);
    }

    #[test]
    fn test_mate_survey_small_grid() {
        let cells = mate_survey(Position::new(3, 3), 10);
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&Position::new(4, 3)));
        assert!(cells.contains(&Position::new(2, 3)));
        assert!(cells.contains(&Position::new(3, 4)));
        assert!(cells.contains(&Position::new(3, 2)));
    }

    #[test]
    fn test_mate_survey_large_grid_includes_diagonals() {
        let cells = mate_survey(Position::new(0, 0), 60);
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&Position::new(59, 59)));
        assert!(cells.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_mate_survey_threshold_boundary() {
        assert_eq!(mate_survey(Position::new(10, 10), 49).len(), 4);
        assert_eq!(mate_survey(Position::new(10, 10), 50).len(), 8);
    }
}
