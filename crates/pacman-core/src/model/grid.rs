//! Boolean cell masks (walls, food) and legal move enumeration.

use super::direction::{Direction, MoveSet};
use super::position::Position;

const WORD_BITS: usize = 64;

/// Immutable-by-convention `width × height` bit mask with a bottom-left origin.
///
/// Cells are flattened column-major (`x * height + y`), the same layout used by
/// belief distributions and transition matrices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    bits: Vec<u64>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            bits: vec![0; cells.div_ceil(WORD_BITS)],
        }
    }

    pub fn filled(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        for index in 0..grid.cell_count() {
            grid.set_index(index, true);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Flattened index of `pos`, or `None` when out of bounds.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.x as usize * self.height + pos.y as usize)
    }

    pub fn position_of(&self, index: usize) -> Position {
        debug_assert!(index < self.cell_count());
        Position::new((index / self.height) as i32, (index % self.height) as i32)
    }

    /// Reads a cell; out-of-bounds cells read as `false`.
    pub fn get(&self, pos: Position) -> bool {
        self.index_of(pos)
            .map(|index| self.get_index(index))
            .unwrap_or(false)
    }

    pub fn get_index(&self, index: usize) -> bool {
        self.bits[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Writes a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, value: bool) {
        if let Some(index) = self.index_of(pos) {
            self.set_index(index, value);
        }
    }

    pub fn with(mut self, pos: Position, value: bool) -> Self {
        self.set(pos, value);
        self
    }

    fn set_index(&mut self, index: usize, value: bool) {
        let word = &mut self.bits[index / WORD_BITS];
        let bit = 1 << (index % WORD_BITS);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// Set cells, `x` outer and `y` inner.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count())
            .filter(|index| self.get_index(*index))
            .map(|index| self.position_of(index))
    }

    /// Directions leading from `pos` to an in-bounds cell that is not set in
    /// this mask. Intended for wall masks.
    pub fn legal_moves(&self, pos: Position) -> MoveSet {
        Direction::CARDINAL
            .into_iter()
            .filter(|direction| {
                let next = pos.step(*direction);
                self.contains(next) && !self.get(next)
            })
            .fold(MoveSet::EMPTY, MoveSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::Grid;
    use crate::model::direction::Direction;
    use crate::model::position::Position;

    #[test]
    fn flattening_is_column_major() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index_of(Position::new(0, 0)), Some(0));
        assert_eq!(grid.index_of(Position::new(0, 2)), Some(2));
        assert_eq!(grid.index_of(Position::new(1, 0)), Some(3));
        assert_eq!(grid.index_of(Position::new(4, 0)), None);
        assert_eq!(grid.index_of(Position::new(-1, 0)), None);
        assert_eq!(grid.position_of(7), Position::new(2, 1));
    }

    #[test]
    fn set_and_count_span_word_boundaries() {
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(6, 3), true);
        grid.set(Position::new(9, 9), true);
        grid.set(Position::new(12, 0), true);
        assert_eq!(grid.count(), 2);
        assert!(grid.get(Position::new(6, 3)));
        assert!(!grid.get(Position::new(12, 0)));
        grid.set(Position::new(6, 3), false);
        assert_eq!(grid.count(), 1);
        assert_eq!(
            grid.positions().collect::<Vec<_>>(),
            vec![Position::new(9, 9)]
        );
    }

    #[test]
    fn legal_moves_respect_walls_and_bounds() {
        // 3x3 with a wall to the east of the centre.
        let walls = Grid::new(3, 3).with(Position::new(2, 1), true);
        let centre = walls.legal_moves(Position::new(1, 1));
        assert!(centre.contains(Direction::North));
        assert!(centre.contains(Direction::South));
        assert!(centre.contains(Direction::West));
        assert!(!centre.contains(Direction::East));

        let corner = walls.legal_moves(Position::new(0, 0));
        assert_eq!(
            corner.iter().collect::<Vec<_>>(),
            vec![Direction::North, Direction::East]
        );
    }

    #[test]
    fn equal_masks_hash_equal() {
        use std::collections::HashSet;
        let a = Grid::new(5, 5).with(Position::new(1, 1), true);
        let b = Grid::filled(5, 5)
            .positions()
            .filter(|pos| *pos != Position::new(1, 1))
            .fold(Grid::filled(5, 5), |grid, pos| grid.with(pos, false));
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
