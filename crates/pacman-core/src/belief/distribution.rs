use crate::model::grid::Grid;
use crate::model::position::Position;
use serde::{Deserialize, Serialize};

/// Probability mass over the cells of a maze for one ghost.
///
/// Stored flattened in the grid layout (`x * height + y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefDistribution {
    width: usize,
    height: usize,
    probs: Vec<f64>,
}

impl BeliefDistribution {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            probs: vec![0.0; width * height],
        }
    }

    /// Uniform mass over every cell that is not a wall.
    pub fn uniform_over_open(walls: &Grid) -> Self {
        let mut belief = Self::zeros(walls.width(), walls.height());
        let open = walls.cell_count() - walls.count();
        if open == 0 {
            return belief;
        }
        let mass = 1.0 / open as f64;
        for (index, prob) in belief.probs.iter_mut().enumerate() {
            if !walls.get_index(index) {
                *prob = mass;
            }
        }
        belief
    }

    /// All mass on `pos`; an out-of-bounds `pos` yields the zero distribution.
    pub fn point_mass(width: usize, height: usize, pos: Position) -> Self {
        let mut belief = Self::zeros(width, height);
        if let Some(index) = belief.index_of(pos) {
            belief.probs[index] = 1.0;
        }
        belief
    }

    /// Wraps raw values; returns `None` when the length does not match the
    /// dimensions or a value is negative or not finite.
    pub fn from_values(width: usize, height: usize, probs: Vec<f64>) -> Option<Self> {
        if probs.len() != width * height {
            return None;
        }
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return None;
        }
        Some(Self {
            width,
            height,
            probs,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, probs: Vec<f64>) -> Self {
        debug_assert_eq!(probs.len(), width * height);
        Self {
            width,
            height,
            probs,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.x as usize * self.height + pos.y as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new((index / self.height) as i32, (index % self.height) as i32)
    }

    /// Mass at `pos`; zero outside the maze.
    pub fn prob(&self, pos: Position) -> f64 {
        self.index_of(pos).map(|index| self.probs[index]).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.probs.iter().all(|p| *p == 0.0)
    }

    /// Divides by the total mass. A distribution whose total is exactly zero
    /// is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self;
        }
        for prob in &mut self.probs {
            *prob /= total;
        }
        self
    }

    /// Cell with the highest mass (first in flattened order on ties).
    pub fn most_likely(&self) -> Option<Position> {
        let mut best: Option<(usize, f64)> = None;
        for (index, prob) in self.probs.iter().copied().enumerate() {
            if prob <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, best_prob)| prob > best_prob) {
                best = Some((index, prob));
            }
        }
        best.map(|(index, _)| self.position_of(index))
    }

    /// Total mass within Chebyshev distance `radius` of `center`.
    pub fn mass_within(&self, center: Position, radius: u32) -> f64 {
        self.probs
            .iter()
            .enumerate()
            .filter(|(index, _)| self.position_of(*index).chebyshev(center) <= radius)
            .map(|(_, prob)| *prob)
            .sum()
    }

    /// Shannon entropy in bits.
    pub fn entropy(&self) -> f64 {
        self.probs
            .iter()
            .filter(|p| **p > 0.0)
            .map(|p| -p * p.log2())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::BeliefDistribution;
    use crate::model::grid::Grid;
    use crate::model::position::Position;

    #[test]
    fn uniform_skips_walls() {
        let walls = Grid::new(3, 2).with(Position::new(1, 0), true);
        let belief = BeliefDistribution::uniform_over_open(&walls);
        assert_eq!(belief.prob(Position::new(1, 0)), 0.0);
        assert!((belief.prob(Position::new(0, 0)) - 0.2).abs() < 1e-12);
        assert!((belief.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalizing_zero_mass_is_a_no_op() {
        let belief = BeliefDistribution::zeros(2, 2).normalized();
        assert!(belief.is_zero());
        assert_eq!(belief.most_likely(), None);
    }

    #[test]
    fn summaries_follow_mass() {
        let values = vec![0.1, 0.0, 0.6, 0.3];
        let belief = BeliefDistribution::from_values(2, 2, values).expect("valid");
        assert_eq!(belief.most_likely(), Some(Position::new(1, 0)));
        assert!((belief.mass_within(Position::new(1, 1), 0) - 0.3).abs() < 1e-12);
        assert!((belief.mass_within(Position::new(0, 0), 1) - 1.0).abs() < 1e-12);
        let point = BeliefDistribution::point_mass(2, 2, Position::new(0, 1));
        assert_eq!(point.entropy(), 0.0);
    }

    #[test]
    fn from_values_rejects_bad_input() {
        assert!(BeliefDistribution::from_values(2, 2, vec![0.25; 3]).is_none());
        assert!(BeliefDistribution::from_values(1, 2, vec![1.5, -0.5]).is_none());
    }
}
