//! Ghost motion model: a row-stochastic matrix over flattened maze cells.

use super::distribution::BeliefDistribution;
use crate::model::direction::Direction;
use crate::model::grid::Grid;
use crate::model::position::Position;
use rand::Rng;

/// `T[from][to]`, the probability that a ghost standing on `from` is on `to`
/// one turn later.
///
/// From an open cell with legal moves `L` the ghost takes East with
/// probability `p + (1 - p) / |L|` and every other legal move with
/// `(1 - p) / |L|`; a lone East move is taken with probability 1. Without
/// East, moves are uniform. Walls and enclosed cells are absorbing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    width: usize,
    height: usize,
    probs: Vec<f64>,
}

impl TransitionMatrix {
    pub fn build(walls: &Grid, east_bias: f64) -> Self {
        let cells = walls.cell_count();
        let mut probs = vec![0.0; cells * cells];

        for from in 0..cells {
            let row = &mut probs[from * cells..(from + 1) * cells];
            if walls.get_index(from) {
                row[from] = 1.0;
                continue;
            }

            let pos = walls.position_of(from);
            let moves = walls.legal_moves(pos);
            if moves.is_empty() {
                row[from] = 1.0;
                continue;
            }

            let count = moves.len() as f64;
            let east_legal = moves.contains(Direction::East);
            for direction in moves.iter() {
                let Some(to) = walls.index_of(pos.step(direction)) else {
                    continue;
                };
                row[to] = match (east_legal, direction) {
                    (true, Direction::East) if moves.len() == 1 => 1.0,
                    (true, Direction::East) => east_bias + (1.0 - east_bias) / count,
                    (true, _) => (1.0 - east_bias) / count,
                    (false, _) => 1.0 / count,
                };
            }
        }

        Self {
            width: walls.width(),
            height: walls.height(),
            probs,
        }
    }

    /// Number of cells (rows and columns).
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn row(&self, from: usize) -> &[f64] {
        let cells = self.size();
        &self.probs[from * cells..(from + 1) * cells]
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.probs[from * self.size() + to]
    }

    /// Propagates a belief one turn forward: `predicted[c] = Σ_r belief[r] · T[r][c]`.
    pub fn predict(&self, belief: &BeliefDistribution) -> BeliefDistribution {
        debug_assert_eq!(belief.dimensions(), self.dimensions());
        let cells = self.size();
        let mut predicted = vec![0.0; cells];
        for (from, mass) in belief.as_slice().iter().copied().enumerate() {
            if mass == 0.0 {
                continue;
            }
            for (to, prob) in self.row(from).iter().enumerate() {
                predicted[to] += mass * prob;
            }
        }
        BeliefDistribution::from_raw(self.width, self.height, predicted)
    }

    /// Draws the next cell of a ghost standing on `from`. Positions outside the
    /// maze do not move.
    pub fn sample_next<R: Rng + ?Sized>(&self, from: Position, rng: &mut R) -> Position {
        let in_bounds = from.x >= 0
            && from.y >= 0
            && (from.x as usize) < self.width
            && (from.y as usize) < self.height;
        if !in_bounds {
            return from;
        }
        let index = from.x as usize * self.height + from.y as usize;
        let row = self.row(index);
        let draw: f64 = rng.r#gen();
        let mut cumulative = 0.0;
        let mut last_reachable = index;
        for (to, prob) in row.iter().copied().enumerate() {
            if prob <= 0.0 {
                continue;
            }
            last_reachable = to;
            cumulative += prob;
            if draw < cumulative {
                return self.position_at(to);
            }
        }
        self.position_at(last_reachable)
    }

    fn position_at(&self, index: usize) -> Position {
        Position::new((index / self.height) as i32, (index % self.height) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionMatrix;
    use crate::model::grid::Grid;
    use crate::model::position::Position;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corridor() -> Grid {
        // 4x3 with an open middle row: (1,1) and (2,1).
        let mut walls = Grid::filled(4, 3);
        walls.set(Position::new(1, 1), false);
        walls.set(Position::new(2, 1), false);
        walls
    }

    #[test]
    fn lone_east_move_is_certain() {
        let walls = corridor();
        let matrix = TransitionMatrix::build(&walls, 0.3);
        let from = walls.index_of(Position::new(1, 1)).unwrap();
        let to = walls.index_of(Position::new(2, 1)).unwrap();
        assert_eq!(matrix.get(from, to), 1.0);
        let back = walls.index_of(Position::new(1, 1)).unwrap();
        assert_eq!(matrix.get(to, back), 1.0);
    }

    #[test]
    fn east_bias_splits_remaining_mass() {
        let walls = Grid::new(3, 3);
        let matrix = TransitionMatrix::build(&walls, 0.5);
        // Centre has four legal moves.
        let centre = walls.index_of(Position::new(1, 1)).unwrap();
        let east = walls.index_of(Position::new(2, 1)).unwrap();
        let north = walls.index_of(Position::new(1, 2)).unwrap();
        assert!((matrix.get(centre, east) - 0.625).abs() < 1e-12);
        assert!((matrix.get(centre, north) - 0.125).abs() < 1e-12);
        assert_eq!(matrix.get(centre, centre), 0.0);
    }

    #[test]
    fn enclosed_cell_is_absorbing() {
        let mut walls = Grid::filled(3, 3);
        walls.set(Position::new(1, 1), false);
        let matrix = TransitionMatrix::build(&walls, 0.8);
        let centre = walls.index_of(Position::new(1, 1)).unwrap();
        assert_eq!(matrix.get(centre, centre), 1.0);
    }

    #[test]
    fn sampling_only_reaches_supported_cells() {
        let walls = Grid::new(3, 3);
        let matrix = TransitionMatrix::build(&walls, 0.5);
        let mut rng = StdRng::seed_from_u64(11);
        let start = Position::new(1, 1);
        for _ in 0..200 {
            let next = matrix.sample_next(start, &mut rng);
            assert_eq!(next.manhattan(start), 1);
        }
        let outside = Position::new(-2, 5);
        assert_eq!(matrix.sample_next(outside, &mut rng), outside);
    }
}
