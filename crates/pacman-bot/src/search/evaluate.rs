//! Leaf scoring for the adversarial search.

use pacman_core::game::{GameState, StateSignature};
use pacman_core::model::Position;
use std::collections::HashMap;

/// How often each position has been the root of a decision, plus the number
/// of decisions taken so far in the episode.
#[derive(Debug, Clone, Default)]
pub struct ReachHistory {
    counts: HashMap<StateSignature, u32>,
    decisions: u32,
}

impl ReachHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, signature: StateSignature) -> u32 {
        let count = self.counts.entry(signature).or_insert(0);
        *count += 1;
        *count
    }

    pub fn reach_count(&self, signature: &StateSignature) -> u32 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    pub fn note_decision(&mut self) {
        self.decisions += 1;
    }

    pub fn decisions(&self) -> u32 {
        self.decisions
    }

    pub fn distinct_states(&self) -> usize {
        self.counts.len()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.decisions = 0;
    }
}

/// What an evaluator sees at a cutoff.
#[derive(Debug, Clone, Copy)]
pub struct EvalFrame<'a, S> {
    pub state: &'a S,
    /// State on the current path where Pacman is about to move again after
    /// one full round below the root. The leaf itself when the path is
    /// shallower than a round.
    pub first_round: &'a S,
    pub history: &'a ReachHistory,
}

pub trait Evaluator {
    fn evaluate<S: GameState>(&self, frame: &EvalFrame<'_, S>) -> f64;
}

/// Raw game score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEvaluator;

impl Evaluator for ScoreEvaluator {
    fn evaluate<S: GameState>(&self, frame: &EvalFrame<'_, S>) -> f64 {
        frame.state.score()
    }
}

/// Score minus a penalty that grows with the length of a greedy food tour,
/// with revisits and losing first rounds weighted further.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodPathEvaluator;

impl FoodPathEvaluator {
    /// Greedy tour weight: food sorted by distance from Pacman (ties by `x`
    /// then `y`), each hop weighted by how many pellets remain after it.
    pub fn food_chain(pacman: Position, food: impl IntoIterator<Item = Position>) -> f64 {
        let mut pellets: Vec<(u32, Position)> = food
            .into_iter()
            .map(|pellet| (pacman.manhattan(pellet), pellet))
            .collect();
        pellets.sort_by_key(|(distance, pellet)| (*distance, pellet.x, pellet.y));

        let n = pellets.len();
        let Some((first, _)) = pellets.first() else {
            return 0.0;
        };
        let mut chain = u64::from(*first) * n as u64;
        for (i, pair) in pellets.windows(2).enumerate() {
            let hop = pair[0].1.manhattan(pair[1].1);
            chain += u64::from(hop) * (n - 1 - i) as u64;
        }
        chain as f64
    }

    pub fn penalty<S: GameState>(&self, frame: &EvalFrame<'_, S>) -> f64 {
        let state = frame.state;
        let remaining = state.food().count() as f64;
        let chain = Self::food_chain(state.pacman_position(), state.food().positions());
        let mut penalty = chain * remaining;

        let reached = frame
            .history
            .reach_count(&StateSignature::of(frame.first_round));
        if reached > 0 {
            penalty *= f64::from(reached + 1);
        }
        if frame.first_round.is_lose() {
            penalty = penalty * f64::from(frame.history.decisions() + 1) + 1.0;
        }
        penalty
    }
}

impl Evaluator for FoodPathEvaluator {
    fn evaluate<S: GameState>(&self, frame: &EvalFrame<'_, S>) -> f64 {
        if frame.state.is_win() {
            return frame.state.score();
        }
        frame.state.score() - self.penalty(frame)
    }
}
