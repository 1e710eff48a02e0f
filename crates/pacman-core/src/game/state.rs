use crate::belief::BeliefDistribution;
use crate::model::direction::Direction;
use crate::model::grid::Grid;
use crate::model::position::Position;

/// Read-only view of a game position consumed by the agents.
///
/// Successor generators yield `(next_state, action)` pairs in
/// North, South, East, West order. Terminal states have no successors.
pub trait GameState: Clone {
    fn is_win(&self) -> bool;

    fn is_lose(&self) -> bool;

    fn is_terminal(&self) -> bool {
        self.is_win() || self.is_lose()
    }

    fn score(&self) -> f64;

    fn pacman_position(&self) -> Position;

    fn ghost_positions(&self) -> &[Position];

    fn ghost_count(&self) -> usize {
        self.ghost_positions().len()
    }

    fn food(&self) -> &Grid;

    fn walls(&self) -> &Grid;

    fn pacman_successors(&self) -> Vec<(Self, Direction)>;

    fn ghost_successors(&self, ghost: usize) -> Vec<(Self, Direction)>;

    /// Initial beliefs for each ghost, read once at episode start.
    fn ghost_belief_states(&self) -> Vec<BeliefDistribution> {
        let uniform = BeliefDistribution::uniform_over_open(self.walls());
        vec![uniform; self.ghost_count()]
    }
}

/// Identity of a position for cycle and visited detection: who is where and
/// which food remains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSignature {
    pub pacman: Position,
    pub ghosts: Vec<Position>,
    pub food: Grid,
}

impl StateSignature {
    pub fn of<S: GameState>(state: &S) -> Self {
        Self {
            pacman: state.pacman_position(),
            ghosts: state.ghost_positions().to_vec(),
            food: state.food().clone(),
        }
    }
}
