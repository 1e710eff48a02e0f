use super::layout::Layout;
use super::state::GameState;
use crate::model::direction::Direction;
use crate::model::grid::Grid;
use crate::model::position::Position;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TIME_PENALTY: f64 = 1.0;
pub const FOOD_REWARD: f64 = 10.0;
pub const WIN_REWARD: f64 = 500.0;
pub const CAUGHT_PENALTY: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Running,
    Won,
    Lost,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Running => "running",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}

/// Reference Pacman rules over a fixed maze.
///
/// Pacman pays one point per move and earns ten per food pellet; clearing the
/// board adds 500 and wins, sharing a cell with a ghost costs 500 and loses.
/// A win on the same move takes precedence over the catch.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeState {
    walls: Arc<Grid>,
    food: Grid,
    pacman: Position,
    ghosts: Vec<Position>,
    score: f64,
    outcome: Outcome,
}

impl MazeState {
    pub fn new(walls: Arc<Grid>, food: Grid, pacman: Position, ghosts: Vec<Position>) -> Self {
        Self::from_parts(walls, food, pacman, ghosts, 0.0, Outcome::Running)
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(
            Arc::new(layout.walls().clone()),
            layout.food().clone(),
            layout.pacman(),
            layout.ghosts().to_vec(),
        )
    }

    pub(crate) fn from_parts(
        walls: Arc<Grid>,
        food: Grid,
        pacman: Position,
        ghosts: Vec<Position>,
        score: f64,
        outcome: Outcome,
    ) -> Self {
        Self {
            walls,
            food,
            pacman,
            ghosts,
            score,
            outcome,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn food_remaining(&self) -> usize {
        self.food.count()
    }

    pub fn shared_walls(&self) -> &Arc<Grid> {
        &self.walls
    }

    fn can_enter(&self, pos: Position) -> bool {
        self.walls.contains(pos) && !self.walls.get(pos)
    }

    fn check_caught(&mut self) {
        if self.outcome == Outcome::Running && self.ghosts.contains(&self.pacman) {
            self.score -= CAUGHT_PENALTY;
            self.outcome = Outcome::Lost;
        }
    }

    /// Moves Pacman. Blocked moves and `Stop` leave him in place but still
    /// cost the time penalty. Terminal states are returned unchanged.
    pub fn apply_pacman(&self, direction: Direction) -> Self {
        let mut next = self.clone();
        if self.is_terminal() {
            return next;
        }

        let target = self.pacman.step(direction);
        if self.can_enter(target) {
            next.pacman = target;
        }
        next.score -= TIME_PENALTY;

        if next.food.get(next.pacman) {
            next.food.set(next.pacman, false);
            next.score += FOOD_REWARD;
            if next.food.is_empty() {
                next.score += WIN_REWARD;
                next.outcome = Outcome::Won;
            }
        }
        next.check_caught();
        next
    }

    /// Moves one ghost a single step; blocked moves stay in place.
    pub fn apply_ghost(&self, ghost: usize, direction: Direction) -> Self {
        let Some(current) = self.ghosts.get(ghost).copied() else {
            return self.clone();
        };
        let target = current.step(direction);
        if self.can_enter(target) {
            self.place_ghost(ghost, target)
        } else {
            self.place_ghost(ghost, current)
        }
    }

    /// Puts a ghost on an arbitrary cell, as chosen by an external motion model.
    pub fn place_ghost(&self, ghost: usize, pos: Position) -> Self {
        let mut next = self.clone();
        if self.is_terminal() || ghost >= self.ghosts.len() {
            return next;
        }
        next.ghosts[ghost] = pos;
        next.check_caught();
        next
    }
}

impl GameState for MazeState {
    fn is_win(&self) -> bool {
        self.outcome == Outcome::Won
    }

    fn is_lose(&self) -> bool {
        self.outcome == Outcome::Lost
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn pacman_position(&self) -> Position {
        self.pacman
    }

    fn ghost_positions(&self) -> &[Position] {
        &self.ghosts
    }

    fn food(&self) -> &Grid {
        &self.food
    }

    fn walls(&self) -> &Grid {
        &self.walls
    }

    fn pacman_successors(&self) -> Vec<(Self, Direction)> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.walls
            .legal_moves(self.pacman)
            .iter()
            .map(|direction| (self.apply_pacman(direction), direction))
            .collect()
    }

    fn ghost_successors(&self, ghost: usize) -> Vec<(Self, Direction)> {
        if self.is_terminal() {
            return Vec::new();
        }
        let Some(pos) = self.ghosts.get(ghost).copied() else {
            return Vec::new();
        };
        let moves = self.walls.legal_moves(pos);
        if moves.is_empty() {
            return vec![(self.apply_ghost(ghost, Direction::Stop), Direction::Stop)];
        }
        moves
            .iter()
            .map(|direction| (self.apply_ghost(ghost, direction), direction))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{MazeState, Outcome};
    use crate::game::layout::Layout;
    use crate::game::state::GameState;
    use crate::model::direction::Direction;
    use crate::model::grid::Grid;
    use crate::model::position::Position;
    use std::sync::Arc;

    fn corridor() -> MazeState {
        let layout: Layout = "%%%%%%%\n%.P .G%\n%%%%%%%".parse().unwrap();
        MazeState::from_layout(&layout)
    }

    #[test]
    fn pacman_successors_follow_generation_order() {
        let state = corridor();
        let moves: Vec<_> = state
            .pacman_successors()
            .into_iter()
            .map(|(_, direction)| direction)
            .collect();
        assert_eq!(moves, vec![Direction::East, Direction::West]);
    }

    #[test]
    fn eating_food_scores_and_moves() {
        let state = corridor().apply_pacman(Direction::West);
        assert_eq!(state.pacman_position(), Position::new(1, 1));
        assert_eq!(state.score(), 9.0);
        assert_eq!(state.food_remaining(), 1);
        assert_eq!(state.outcome(), Outcome::Running);

        let blocked = state.apply_pacman(Direction::West);
        assert_eq!(blocked.pacman_position(), Position::new(1, 1));
        assert_eq!(blocked.score(), 8.0);
    }

    #[test]
    fn clearing_the_board_wins_over_being_caught() {
        let walls = Grid::filled(4, 3)
            .with(Position::new(1, 1), false)
            .with(Position::new(2, 1), false);
        let food = Grid::new(4, 3).with(Position::new(2, 1), true);
        let state = MazeState::new(
            Arc::new(walls),
            food,
            Position::new(1, 1),
            vec![Position::new(2, 1)],
        );
        let next = state.apply_pacman(Direction::East);
        assert!(next.is_win());
        assert!(!next.is_lose());
        assert_eq!(next.score(), 509.0);
        assert!(next.pacman_successors().is_empty());
        assert!(next.ghost_successors(0).is_empty());
    }

    #[test]
    fn ghost_catching_pacman_loses() {
        let state = corridor().apply_pacman(Direction::East);
        assert_eq!(state.pacman_position(), Position::new(3, 1));
        let caught = state
            .apply_ghost(0, Direction::West)
            .apply_ghost(0, Direction::West);
        assert!(caught.is_lose());
        assert_eq!(caught.score(), -501.0);
        assert_eq!(caught.ghost_positions(), &[Position::new(3, 1)]);
    }

    #[test]
    fn enclosed_ghost_can_only_stop() {
        let walls = Grid::filled(5, 3)
            .with(Position::new(1, 1), false)
            .with(Position::new(3, 1), false);
        let state = MazeState::new(
            Arc::new(walls),
            Grid::new(5, 3),
            Position::new(1, 1),
            vec![Position::new(3, 1)],
        );
        let successors = state.ghost_successors(0);
        assert_eq!(successors.len(), 1);
        assert_eq!(successors[0].1, Direction::Stop);
        assert_eq!(successors[0].0.ghost_positions(), &[Position::new(3, 1)]);
        assert!(state.ghost_successors(1).is_empty());
    }
}
