mod adversarial;
mod belief;
mod planner;

pub use adversarial::AdversarialAgent;
pub use belief::BeliefView;
pub use planner::PlannerAgent;

use pacman_core::game::GameState;
use pacman_core::model::Direction;

/// Decision interface presented to the game loop.
pub trait Agent<S: GameState> {
    /// Choose one move for Pacman in `state`.
    fn choose_action(&mut self, state: &S) -> Direction;

    /// Forget everything carried over from earlier decisions.
    fn reset(&mut self);

    fn name(&self) -> &str;
}
